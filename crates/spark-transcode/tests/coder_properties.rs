//! 增量编解码驱动的性质测试。
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：场景测试只能覆盖少数切分点；驱动的价值恰在于“任意切分、任意输出容量下行为一致”，
//!   因此用 Proptest 随机生成输入、错误位置、替换序列与输出容量，验证以下性质：
//!   1. 替换律：单个错误区间在 `Replace` 策略下被替换序列原位取代，输入恰好跨过错误长度；
//!   2. 溢出重试律：输出容量每次至少增长一个单元时，重试在有限次数内以下溢结束，且各片段拼接结果与
//!      无限容量下的输出一致；
//!   3. 末尾畸形律：`N` 个完整单元后跟 `K` 个残缺单元，最终调用必然得到长度恰为 `K` 的畸形结果；
//!   4. 幂等：重置后重复一次性转换得到相同输出；
//!   5. 往返：仅含可表示单元的文本，编码后再解码可精确还原。
//! - **结构说明 (How)**：使用 `test_stubs` 中的两个桩，以及本文件定义的 4 字节定宽原语 `Quad`，
//!   后者允许构造 1~3 个残缺尾部字节。
//! - **边界 (What)**：用例规模受 Proptest 默认 256 次迭代约束，输入长度不超过 64 个单元。

use proptest::prelude::*;
use spark_transcode::prelude::*;
use spark_transcode::test_stubs::{AsciiStub, ShiftStub};
use spark_transcode::{CharsetRef, Coder};

fn printable() -> impl Strategy<Value = u8> {
    0x20u8..0x7F
}

fn text_units() -> impl Strategy<Value = u16> {
    prop_oneof![0x20u16..0x7F, 0x0120u16..0x0180]
}

/// 以逐次增长的输出容量驱动完整的 `step`/`flush` 序列，返回拼接后的输出与重试次数。
fn drive_with_growing_output<D: Direction>(
    coder: &mut Coder<D>,
    input: &[D::Input],
    initial: usize,
    growth: &[usize],
) -> (Vec<D::Output>, usize) {
    let mut produced = Vec::new();
    let mut capacity = initial;
    let mut retries = 0;
    let mut src = InputBuffer::new(input);
    let mut flushing = false;

    loop {
        let mut storage = vec![D::Output::default(); capacity];
        let mut dst = OutputBuffer::new(&mut storage);
        let result = if flushing {
            coder.flush(&mut dst).expect("flush 调用合法")
        } else {
            coder.step(&mut src, &mut dst, true).expect("最终 step 调用合法")
        };
        produced.extend_from_slice(dst.written());

        if result.is_overflow() {
            retries += 1;
            capacity += growth[retries % growth.len()].max(1);
            continue;
        }
        assert!(result.is_underflow(), "替换策略下不应出现错误结果: {result}");
        if flushing {
            break;
        }
        flushing = true;
    }
    (produced, retries)
}

proptest! {
    #[test]
    fn replacement_takes_place_of_erroneous_span(
        prefix in prop::collection::vec(printable(), 0..24),
        bad in 0x80u8..=0xFF,
        suffix in prop::collection::vec(printable(), 0..24),
        replacement in prop::collection::vec(0x21u16..0x7F, 1..=4),
    ) {
        let mut decoder = AsciiStub::with_max_chars_per_byte(4.0)
            .new_decoder()
            .expect("桩解码器构造成功");
        decoder.replace_with(&replacement).expect("替换序列合法");

        let mut input = prefix.clone();
        input.push(bad);
        input.extend_from_slice(&suffix);

        let mut storage = vec![0u16; input.len() + replacement.len()];
        let mut src = InputBuffer::new(&input);
        let mut dst = OutputBuffer::new(&mut storage);

        let reported = decoder.step(&mut src, &mut dst, true).expect("首次调用合法");
        prop_assert!(reported.is_malformed());
        prop_assert_eq!(reported.length(), Ok(1));
        prop_assert_eq!(src.position(), prefix.len());

        decoder.on_malformed_input(CodingErrorAction::Replace);
        let before = src.position();
        let resumed = decoder.step(&mut src, &mut dst, true).expect("再次发起最终 step");
        prop_assert!(resumed.is_underflow());
        prop_assert_eq!(src.position() - before, 1 + suffix.len());

        let mut expected: Vec<u16> = prefix.iter().map(|&b| u16::from(b)).collect();
        expected.extend_from_slice(&replacement);
        expected.extend(suffix.iter().map(|&b| u16::from(b)));
        prop_assert_eq!(dst.written(), expected.as_slice());
    }

    #[test]
    fn overflow_retries_terminate_with_identical_output(
        input in prop::collection::vec(any::<u8>(), 0..64),
        initial in 0usize..3,
        growth in prop::collection::vec(1usize..4, 1..8),
    ) {
        let charset = AsciiStub::new();
        let mut reference = charset.clone().new_decoder().expect("桩解码器构造成功");
        reference
            .on_malformed_input(CodingErrorAction::Replace)
            .on_unmappable_character(CodingErrorAction::Replace);
        let expected = reference.decode_all(&input).expect("替换策略不报错");

        let mut decoder = charset.new_decoder().expect("桩解码器构造成功");
        decoder
            .on_malformed_input(CodingErrorAction::Replace)
            .on_unmappable_character(CodingErrorAction::Replace);
        let (produced, retries) = drive_with_growing_output(&mut decoder, &input, initial, &growth);

        prop_assert_eq!(produced, expected);
        prop_assert!(retries <= input.len() + 2, "重试次数 {} 超出上界", retries);
        prop_assert_eq!(decoder.state(), CoderState::Flushed);
    }

    #[test]
    fn shift_state_survives_output_retries(
        text in prop::collection::vec(text_units(), 0..48),
        initial in 0usize..3,
        growth in prop::collection::vec(1usize..3, 1..8),
    ) {
        let charset: CharsetRef = ShiftStub::new();
        let expected = charset
            .clone()
            .new_encoder()
            .expect("移位桩编码器")
            .encode_all(&text)
            .expect("可表示文本");

        let mut encoder = charset.new_encoder().expect("移位桩编码器");
        let (produced, retries) = drive_with_growing_output(&mut encoder, &text, initial, &growth);

        prop_assert_eq!(produced, expected);
        prop_assert!(retries <= 2 * text.len() + 3, "重试次数 {} 超出上界", retries);
    }

    #[test]
    fn truncated_tail_is_malformed_of_exact_length(
        words in prop::collection::vec(any::<u16>(), 0..16),
        tail in prop::collection::vec(any::<u8>(), 1..4),
    ) {
        let mut decoder = Decoder::new(AsciiStub::new(), Box::new(Quad), 0.25, 1.0, &[0xFFFD])
            .expect("构造合法");

        let mut input = Vec::with_capacity(words.len() * 4 + tail.len());
        for word in &words {
            input.extend_from_slice(&[0, 0]);
            input.extend_from_slice(&word.to_be_bytes());
        }
        input.extend_from_slice(&tail);

        let mut storage = vec![0u16; words.len()];
        let mut src = InputBuffer::new(&input);
        let mut dst = OutputBuffer::new(&mut storage);
        let result = decoder.step(&mut src, &mut dst, true).expect("调用合法");

        prop_assert!(result.is_malformed());
        prop_assert_eq!(result.length(), Ok(tail.len()));
        prop_assert_eq!(src.position(), words.len() * 4);
        prop_assert_eq!(dst.written(), words.as_slice());
    }

    #[test]
    fn one_shot_conversion_is_idempotent(
        input in prop::collection::vec(any::<u8>(), 0..64),
        action in prop_oneof![Just(CodingErrorAction::Ignore), Just(CodingErrorAction::Replace)],
    ) {
        let mut decoder = AsciiStub::new().new_decoder().expect("桩解码器构造成功");
        decoder.on_malformed_input(action);

        let first = decoder.decode_all(&input).expect("恢复策略不报错");
        decoder.reset();
        let second = decoder.decode_all(&input).expect("恢复策略不报错");
        let third = decoder.decode_all(&input).expect("Flushed 状态可直接再次转换");
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &third);
    }

    #[test]
    fn representable_text_round_trips(text in prop::collection::vec(text_units(), 0..48)) {
        let charset: CharsetRef = ShiftStub::new();
        let bytes = charset.clone().new_encoder().expect("移位桩编码器").encode_all(&text).expect("可编码");
        let decoded = charset.new_decoder().expect("移位桩解码器").decode_all(&bytes).expect("可解码");
        prop_assert_eq!(decoded, text);
    }

    #[test]
    fn ascii_text_round_trips(text in "[ -~]{0,64}") {
        let charset = AsciiStub::new();
        let bytes = charset.clone().new_encoder().expect("桩编码器").encode_str(&text).expect("可编码");
        prop_assert_eq!(bytes.as_slice(), text.as_bytes());
        let decoded = charset.new_decoder().expect("桩解码器").decode_to_string(&bytes).expect("可解码");
        prop_assert_eq!(decoded, text);
    }
}

/// 4 字节定宽原语：每 4 个字节产出其低 16 位作为一个码元，不足 4 字节时请求更多输入。
struct Quad;

impl Transform<Decode> for Quad {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u8>,
        dst: &mut OutputBuffer<'_, u16>,
    ) -> CoderResult {
        while let Some(&[_, _, hi, lo]) = src.remaining_slice().first_chunk::<4>() {
            if !dst.put(u16::from_be_bytes([hi, lo])) {
                return CoderResult::OVERFLOW;
            }
            if src.advance(4).is_err() {
                return CoderResult::UNDERFLOW;
            }
        }
        CoderResult::UNDERFLOW
    }
}
