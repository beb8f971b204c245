//! 测试桩字符集。
//!
//! # 设计背景（Why）
//! - 核心 crate 不包含任何真实字符集规则，但状态机、恢复策略与一次性转换都需要在具体原语上验证；
//!   统一维护两个最小桩，避免各测试重复定义。
//! - 桩的行为刻意简单、可预测，便于在属性测试中推导期望输出。
//!
//! # 契约说明（What）
//! - [`AsciiStub`]（`X-TEST-ASCII`）：7 位单字节映射。解码时 `>= 0x80` 的字节为畸形（长度 1）；
//!   编码时大于 `0x7F` 的码元不可映射，合法代理对整体不可映射（长度 2），孤立代理项为畸形（长度 1）。
//!   解码方向最大比例可配置，用于验证较长的替换序列。
//! - [`ShiftStub`]（`X-TEST-SHIFT`）：带移位状态的编码。`U+0100..=U+01FF` 编码为 `SO` 之后的低字节，
//!   回到 ASCII 时先写 `SI`；`flush` 在仍处于移位状态时补写 `SI`。钩子调用次数通过
//!   [`HookCounters`] 暴露。

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::charset::{Charset, CharsetRef};
use crate::coder::{CoderResult, CodingErrorAction, Decoder, Encoder, ErrorKind, Transform};
use crate::direction::{Decode, Encode};
use crate::error::Result;
use alloc::{boxed::Box, sync::Arc};
use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicUsize, Ordering};

const ONE: NonZeroUsize = NonZeroUsize::MIN;
const TWO: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(two) => two,
    None => unreachable!(),
};

const SO: u8 = 0x0E;
const SI: u8 = 0x0F;

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// 7 位单字节桩字符集。
#[derive(Debug)]
pub struct AsciiStub {
    max_chars_per_byte: f32,
}

impl AsciiStub {
    /// 解码方向最大比例为 1 的默认桩。
    pub fn new() -> CharsetRef {
        Self::with_max_chars_per_byte(1.0)
    }

    /// 指定解码方向的最大比例，允许更长的文本替换序列。
    pub fn with_max_chars_per_byte(max_chars_per_byte: f32) -> CharsetRef {
        Arc::new(Self { max_chars_per_byte })
    }
}

impl Charset for AsciiStub {
    fn name(&self) -> &str {
        "X-TEST-ASCII"
    }

    fn aliases(&self) -> &[&'static str] {
        &["test-ascii"]
    }

    fn new_decoder(self: Arc<Self>) -> Result<Decoder> {
        let maximum = self.max_chars_per_byte;
        Decoder::new(self, Box::new(AsciiDecode), 1.0, maximum, &[0xFFFD])
    }

    fn new_encoder(self: Arc<Self>) -> Result<Encoder> {
        Encoder::new(self, Box::new(AsciiEncode), 1.0, 1.0, b"?")
    }
}

struct AsciiDecode;

impl Transform<Decode> for AsciiDecode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u8>,
        dst: &mut OutputBuffer<'_, u16>,
    ) -> CoderResult {
        while let Some(byte) = src.peek() {
            if byte >= 0x80 {
                return CoderResult::malformed(ONE);
            }
            if !dst.put(u16::from(byte)) {
                return CoderResult::OVERFLOW;
            }
            src.get();
        }
        CoderResult::UNDERFLOW
    }
}

struct AsciiEncode;

impl Transform<Encode> for AsciiEncode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u16>,
        dst: &mut OutputBuffer<'_, u8>,
    ) -> CoderResult {
        while let Some(unit) = src.peek() {
            if unit < 0x80 {
                if !dst.put(unit as u8) {
                    return CoderResult::OVERFLOW;
                }
                src.get();
                continue;
            }
            return surrogate_aware_unmappable(src, unit);
        }
        CoderResult::UNDERFLOW
    }
}

/// 对无法输出的码元给出精确的错误结果：合法代理对整体不可映射，孤立代理项畸形，
/// 输入末尾的高代理项等待后续输入。
fn surrogate_aware_unmappable(src: &InputBuffer<'_, u16>, unit: u16) -> CoderResult {
    if is_high_surrogate(unit) {
        return match src.peek_at(1) {
            None => CoderResult::UNDERFLOW,
            Some(next) if is_low_surrogate(next) => CoderResult::unmappable(TWO),
            Some(_) => CoderResult::malformed(ONE),
        };
    }
    if is_low_surrogate(unit) {
        return CoderResult::malformed(ONE);
    }
    CoderResult::unmappable(ONE)
}

/// 钩子调用计数。
#[derive(Debug, Default)]
pub struct HookCounters {
    pub resets: AtomicUsize,
    pub flushes: AtomicUsize,
    pub replacement_changes: AtomicUsize,
    pub action_changes: AtomicUsize,
}

impl HookCounters {
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn replacement_changes(&self) -> usize {
        self.replacement_changes.load(Ordering::SeqCst)
    }

    pub fn action_changes(&self) -> usize {
        self.action_changes.load(Ordering::SeqCst)
    }
}

/// 带移位状态的桩字符集。
#[derive(Debug, Default)]
pub struct ShiftStub {
    counters: Arc<HookCounters>,
}

impl ShiftStub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 本字符集创建的所有编解码器共享的钩子计数。
    pub fn counters(&self) -> Arc<HookCounters> {
        Arc::clone(&self.counters)
    }
}

impl Charset for ShiftStub {
    fn name(&self) -> &str {
        "X-TEST-SHIFT"
    }

    fn new_decoder(self: Arc<Self>) -> Result<Decoder> {
        let transform = ShiftDecode {
            shifted: false,
            counters: self.counters(),
        };
        Decoder::new(self, Box::new(transform), 1.0, 1.0, &[0xFFFD])
    }

    fn new_encoder(self: Arc<Self>) -> Result<Encoder> {
        let transform = ShiftEncode {
            shifted: false,
            counters: self.counters(),
        };
        Encoder::new(self, Box::new(transform), 1.0, 2.0, b"?")
    }
}

struct ShiftDecode {
    shifted: bool,
    counters: Arc<HookCounters>,
}

impl Transform<Decode> for ShiftDecode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u8>,
        dst: &mut OutputBuffer<'_, u16>,
    ) -> CoderResult {
        while let Some(byte) = src.peek() {
            match byte {
                SO => self.shifted = true,
                SI => self.shifted = false,
                0x80.. => return CoderResult::malformed(ONE),
                _ => {
                    let unit = if self.shifted {
                        0x0100 | u16::from(byte)
                    } else {
                        u16::from(byte)
                    };
                    if !dst.put(unit) {
                        return CoderResult::OVERFLOW;
                    }
                }
            }
            src.get();
        }
        CoderResult::UNDERFLOW
    }

    fn reset(&mut self) {
        self.shifted = false;
        self.counters.resets.fetch_add(1, Ordering::SeqCst);
    }
}

struct ShiftEncode {
    shifted: bool,
    counters: Arc<HookCounters>,
}

impl Transform<Encode> for ShiftEncode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u16>,
        dst: &mut OutputBuffer<'_, u8>,
    ) -> CoderResult {
        while let Some(unit) = src.peek() {
            let (wants_shift, byte) = match unit {
                0x0000..=0x007F => (false, unit as u8),
                0x0100..=0x017F => (true, (unit & 0x7F) as u8),
                _ => return surrogate_aware_unmappable(src, unit),
            };
            if wants_shift != self.shifted {
                let marker = if wants_shift { SO } else { SI };
                if !dst.put_slice(&[marker, byte]) {
                    return CoderResult::OVERFLOW;
                }
                self.shifted = wants_shift;
            } else if !dst.put(byte) {
                return CoderResult::OVERFLOW;
            }
            src.get();
        }
        CoderResult::UNDERFLOW
    }

    fn reset(&mut self) {
        self.shifted = false;
        self.counters.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&mut self, dst: &mut OutputBuffer<'_, u8>) -> CoderResult {
        self.counters.flushes.fetch_add(1, Ordering::SeqCst);
        if self.shifted {
            if !dst.put(SI) {
                return CoderResult::OVERFLOW;
            }
            self.shifted = false;
        }
        CoderResult::UNDERFLOW
    }

    fn replacement_changed(&mut self, _replacement: &[u8]) {
        self.counters
            .replacement_changes
            .fetch_add(1, Ordering::SeqCst);
    }

    fn action_changed(&mut self, _kind: ErrorKind, _action: CodingErrorAction) {
        self.counters.action_changes.fetch_add(1, Ordering::SeqCst);
    }
}
