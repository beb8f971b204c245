//! UTF-8。
//!
//! # 教案意图（Why）
//! - UTF-8 是增量解码最典型的场景：一个字符最多横跨 4 个字节，可能在任意位置被切分；
//!   原语必须在残缺序列处返回下溢而不消费任何字节，由驱动在最终调用时统一判定为畸形。
//!
//! # 契约说明（What）
//! - 解码按“最大合法子序列”报告畸形长度：首字节非法为 1；第二字节越界为 1；
//!   第 `i` 个后续字节非法时长度为 `i`（即已校验通过的前缀长度）；
//! - 过长编码、代理项区间（`ED A0..BF`）与超出 `U+10FFFF` 的序列在第二字节处即被拒绝；
//! - 补充平面字符产出两个 UTF-16 码元，需要同时具备两个单元的输出空间；
//! - 编码端：孤立代理项畸形（长度 1），高代理项位于输入末尾时等待更多输入；
//! - 比例：解码 1.0/1.0，编码 1.1/3.0。

use crate::unicode::{ONE, Scalar, peek_scalar, to_surrogates};
use alloc::{boxed::Box, sync::Arc};
use core::num::NonZeroUsize;
use spark_transcode::prelude::*;

/// UTF-8 字符集。
#[derive(Debug, Default)]
pub struct Utf8;

/// UTF-8 字符集实例。
pub fn utf_8() -> CharsetRef {
    Arc::new(Utf8)
}

impl Charset for Utf8 {
    fn name(&self) -> &str {
        "UTF-8"
    }

    fn aliases(&self) -> &[&'static str] {
        &["utf8", "unicode-1-1-utf-8"]
    }

    fn new_decoder(self: Arc<Self>) -> Result<Decoder> {
        Decoder::new(self, Box::new(Utf8Decode), 1.0, 1.0, &[0xFFFD])
    }

    fn new_encoder(self: Arc<Self>) -> Result<Encoder> {
        Encoder::new(self, Box::new(Utf8Encode), 1.1, 3.0, b"?")
    }
}

/// 首字节确定的后续字节数，以及第二字节的合法区间。
fn lead_byte(byte: u8) -> Option<(usize, u8, u8)> {
    match byte {
        0xC2..=0xDF => Some((1, 0x80, 0xBF)),
        0xE0 => Some((2, 0xA0, 0xBF)),
        0xE1..=0xEC | 0xEE..=0xEF => Some((2, 0x80, 0xBF)),
        0xED => Some((2, 0x80, 0x9F)),
        0xF0 => Some((3, 0x90, 0xBF)),
        0xF1..=0xF3 => Some((3, 0x80, 0xBF)),
        0xF4 => Some((3, 0x80, 0x8F)),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// 对剩余字节头部的一个序列的判定结果。
enum Sequence {
    /// 完整字符及其字节长度。
    Char(u32, usize),
    /// 合法前缀，但可用字节不足。
    Truncated,
    /// 畸形前缀长度。
    Malformed(NonZeroUsize),
}

fn classify(bytes: &[u8]) -> Sequence {
    let lead = bytes[0];
    let Some((trailing, lower, upper)) = lead_byte(lead) else {
        return Sequence::Malformed(ONE);
    };
    let Some(&second) = bytes.get(1) else {
        return Sequence::Truncated;
    };
    if !(lower..=upper).contains(&second) {
        return Sequence::Malformed(ONE);
    }

    let mask = match trailing {
        1 => 0x1F,
        2 => 0x0F,
        _ => 0x07,
    };
    let mut code_point = (u32::from(lead) & mask) << 6 | u32::from(second & 0x3F);
    for index in 2..=trailing {
        let Some(&byte) = bytes.get(index) else {
            return Sequence::Truncated;
        };
        if !is_continuation(byte) {
            return match NonZeroUsize::new(index) {
                Some(length) => Sequence::Malformed(length),
                None => Sequence::Malformed(ONE),
            };
        }
        code_point = code_point << 6 | u32::from(byte & 0x3F);
    }
    Sequence::Char(code_point, trailing + 1)
}

struct Utf8Decode;

impl Transform<Decode> for Utf8Decode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u8>,
        dst: &mut OutputBuffer<'_, u16>,
    ) -> CoderResult {
        loop {
            let bytes = src.remaining_slice();
            let Some(&lead) = bytes.first() else {
                return CoderResult::UNDERFLOW;
            };
            if lead < 0x80 {
                if !dst.put(u16::from(lead)) {
                    return CoderResult::OVERFLOW;
                }
                src.get();
                continue;
            }

            let (code_point, width) = match classify(bytes) {
                Sequence::Char(code_point, width) => (code_point, width),
                Sequence::Truncated => return CoderResult::UNDERFLOW,
                Sequence::Malformed(length) => return CoderResult::malformed(length),
            };
            let written = if code_point < 0x10000 {
                dst.put(code_point as u16)
            } else {
                dst.put_slice(&to_surrogates(code_point))
            };
            if !written {
                return CoderResult::OVERFLOW;
            }
            if src.advance(width).is_err() {
                return CoderResult::UNDERFLOW;
            }
        }
    }
}

struct Utf8Encode;

impl Transform<Encode> for Utf8Encode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u16>,
        dst: &mut OutputBuffer<'_, u8>,
    ) -> CoderResult {
        while let Some(scalar) = peek_scalar(src) {
            let code_point = match scalar {
                Scalar::Bmp(unit) => u32::from(unit),
                Scalar::Supplementary(code_point) => code_point,
                Scalar::Incomplete => return CoderResult::UNDERFLOW,
                Scalar::Malformed => return CoderResult::malformed(ONE),
            };
            let mut buf = [0u8; 4];
            let encoded = match char::from_u32(code_point) {
                Some(ch) => ch.encode_utf8(&mut buf).as_bytes(),
                None => return CoderResult::malformed(ONE),
            };
            if !dst.put_slice(encoded) {
                return CoderResult::OVERFLOW;
            }
            if src.advance(scalar.width()).is_err() {
                return CoderResult::UNDERFLOW;
            }
        }
        CoderResult::UNDERFLOW
    }

    fn is_legal_replacement(&self, replacement: &[u8]) -> Option<bool> {
        Some(core::str::from_utf8(replacement).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn decode_report(bytes: &[u8]) -> Result<Vec<u16>> {
        utf_8().new_decoder()?.decode_all(bytes)
    }

    #[test]
    fn maximal_subpart_lengths() {
        let cases: &[(&[u8], usize)] = &[
            (&[0x80], 1),
            (&[0xC0, 0x80], 1),
            (&[0xE0, 0x80, 0x80], 1),
            (&[0xED, 0xA0, 0x80], 1),
            (&[0xF4, 0x90, 0x80, 0x80], 1),
            (&[0xE2, 0x41], 1),
            (&[0xE2, 0x82, 0x41], 2),
            (&[0xF0, 0x9F, 0x98, 0x41], 3),
            (&[0xF8], 1),
        ];
        for &(bytes, length) in cases {
            assert_eq!(
                decode_report(bytes),
                Err(TranscodeError::MalformedInput { length }),
                "{bytes:02X?}"
            );
        }
    }

    #[test]
    fn truncated_sequence_waits_for_more_input() {
        let mut decoder = utf_8().new_decoder().expect("UTF-8 解码器");
        let input = [0x41, 0xE2, 0x82];
        let mut storage = [0u16; 4];
        let mut src = InputBuffer::new(&input);
        let mut dst = OutputBuffer::new(&mut storage);
        let result = decoder.step(&mut src, &mut dst, false).expect("非最终 step");
        assert!(result.is_underflow());
        assert_eq!(src.position(), 1);

        let result = decoder.step(&mut src, &mut dst, true).expect("最终 step");
        assert!(result.is_malformed());
        assert_eq!(result.length(), Ok(2));
    }

    #[test]
    fn supplementary_needs_two_units_of_room() {
        let mut decoder = utf_8().new_decoder().expect("UTF-8 解码器");
        let input = "\u{1F600}".as_bytes();
        let mut storage = [0u16; 1];
        let mut src = InputBuffer::new(input);
        let mut dst = OutputBuffer::new(&mut storage);
        let result = decoder.step(&mut src, &mut dst, true).expect("最终 step");
        assert!(result.is_overflow());
        assert_eq!(src.position(), 0);
        assert_eq!(dst.position(), 0);
    }

    #[test]
    fn encoder_reports_lone_surrogates() {
        let mut encoder = utf_8().new_encoder().expect("UTF-8 编码器");
        assert_eq!(
            encoder.encode_all(&[0x41, 0xDC00]),
            Err(TranscodeError::MalformedInput { length: 1 })
        );
        assert_eq!(
            encoder.encode_all(&[0xD83D, 0x41]),
            Err(TranscodeError::MalformedInput { length: 1 })
        );
        assert_eq!(
            encoder.encode_all(&[0xD83D, 0xDE00]),
            Ok("\u{1F600}".as_bytes().to_vec())
        );
    }
}
