//! UTF-16 的三种变体：固定大端、固定小端，以及依靠字节序标记（BOM）协商的 `UTF-16`。
//!
//! # 教案意图（Why）
//! - 带 BOM 的变体是“原语需要跨调用保存状态”的最小例子：解码器在首次看到输入时决定字节序，
//!   编码器只在一次操作开头写一次 BOM；两者都依赖 `reset` 钩子重新武装。
//!
//! # 契约说明（What）
//! - 解码：每 2 字节一个码元；高代理项需与随后的低代理项成对输出，否则为长度 2 的畸形输入；
//!   孤立低代理项同样为长度 2；奇数尾字节在最终调用时由驱动判定为长度 1 的畸形输入；
//! - `UTF-16` 解码器：输入以 `FE FF`/`FF FE` 开头时消费 BOM 并采用对应字节序，否则按大端处理；
//! - `UTF-16` 编码器：在第一次有输入时写出大端 BOM `FE FF`；替换序列不得以 BOM 开头；
//! - 比例：解码 0.5/1.0；编码 2.0/2.0（`UTF-16` 为 2.0/4.0）；替换序列为大端 `FF FD` 或小端 `FD FF`。

use crate::unicode::{
    ONE, Scalar, TWO, is_high_surrogate, is_low_surrogate, peek_scalar, to_surrogates,
};
use alloc::{boxed::Box, sync::Arc};
use spark_transcode::prelude::*;

/// 字节序。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    fn read(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Big => u16::from_be_bytes(bytes),
            Self::Little => u16::from_le_bytes(bytes),
        }
    }

    fn write(self, unit: u16) -> [u8; 2] {
        match self {
            Self::Big => unit.to_be_bytes(),
            Self::Little => unit.to_le_bytes(),
        }
    }
}

const BOM: u16 = 0xFEFF;

/// UTF-16 字符集；`order` 为 `None` 时依靠 BOM 协商。
#[derive(Debug)]
pub struct Utf16 {
    name: &'static str,
    aliases: &'static [&'static str],
    order: Option<ByteOrder>,
}

impl Utf16 {
    /// 固定字节序；`None` 表示 BOM 协商。
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.order
    }

    fn encode_order(&self) -> ByteOrder {
        self.order.unwrap_or(ByteOrder::Big)
    }
}

/// UTF-16BE。
pub fn utf_16be() -> CharsetRef {
    Arc::new(Utf16 {
        name: "UTF-16BE",
        aliases: &["utf_16be", "x-utf-16be", "unicodebigunmarked", "iso-10646-ucs-2"],
        order: Some(ByteOrder::Big),
    })
}

/// UTF-16LE。
pub fn utf_16le() -> CharsetRef {
    Arc::new(Utf16 {
        name: "UTF-16LE",
        aliases: &["utf_16le", "x-utf-16le", "unicodelittleunmarked"],
        order: Some(ByteOrder::Little),
    })
}

/// 带 BOM 的 UTF-16。
pub fn utf_16() -> CharsetRef {
    Arc::new(Utf16 {
        name: "UTF-16",
        aliases: &["utf_16", "utf16", "unicode", "unicodebig"],
        order: None,
    })
}

impl Charset for Utf16 {
    fn name(&self) -> &str {
        self.name
    }

    fn aliases(&self) -> &[&'static str] {
        self.aliases
    }

    fn new_decoder(self: Arc<Self>) -> Result<Decoder> {
        let transform = Utf16Decode {
            fixed: self.order,
            current: self.order,
        };
        Decoder::new(self, Box::new(transform), 0.5, 1.0, &[0xFFFD])
    }

    fn new_encoder(self: Arc<Self>) -> Result<Encoder> {
        let order = self.encode_order();
        let marked = self.order.is_none();
        let maximum = if marked { 4.0 } else { 2.0 };
        let transform = Utf16Encode {
            order,
            mark: order.write(BOM),
            marked,
            needs_mark: marked,
        };
        Encoder::new(
            self,
            Box::new(transform),
            2.0,
            maximum,
            &order.write(0xFFFD),
        )
    }
}

struct Utf16Decode {
    fixed: Option<ByteOrder>,
    /// 当前生效的字节序；`None` 表示尚未检测 BOM。
    current: Option<ByteOrder>,
}

impl Utf16Decode {
    /// 检测并消费 BOM；字节不足两个时返回 `None` 以等待更多输入。
    fn detect(&mut self, src: &mut InputBuffer<'_, u8>) -> Option<ByteOrder> {
        let &[first, second] = src.remaining_slice().first_chunk::<2>()?;
        let order = match [first, second] {
            [0xFE, 0xFF] => Some(ByteOrder::Big),
            [0xFF, 0xFE] => Some(ByteOrder::Little),
            _ => None,
        };
        if order.is_some() && src.advance(2).is_err() {
            return None;
        }
        let order = order.unwrap_or(ByteOrder::Big);
        tracing::trace!(?order, "utf-16 byte order selected");
        self.current = Some(order);
        Some(order)
    }
}

impl Transform<Decode> for Utf16Decode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u8>,
        dst: &mut OutputBuffer<'_, u16>,
    ) -> CoderResult {
        let order = match self.current {
            Some(order) => order,
            None => match self.detect(src) {
                Some(order) => order,
                None => return CoderResult::UNDERFLOW,
            },
        };

        while let Some(&pair) = src.remaining_slice().first_chunk::<2>() {
            let unit = order.read(pair);
            if is_low_surrogate(unit) {
                return CoderResult::malformed(TWO);
            }
            if is_high_surrogate(unit) {
                let Some(&[.., third, fourth]) = src.remaining_slice().first_chunk::<4>() else {
                    return CoderResult::UNDERFLOW;
                };
                let low = order.read([third, fourth]);
                if !is_low_surrogate(low) {
                    return CoderResult::malformed(TWO);
                }
                if !dst.put_slice(&[unit, low]) {
                    return CoderResult::OVERFLOW;
                }
                if src.advance(4).is_err() {
                    return CoderResult::UNDERFLOW;
                }
                continue;
            }
            if !dst.put(unit) {
                return CoderResult::OVERFLOW;
            }
            if src.advance(2).is_err() {
                return CoderResult::UNDERFLOW;
            }
        }
        CoderResult::UNDERFLOW
    }

    fn reset(&mut self) {
        self.current = self.fixed;
    }
}

struct Utf16Encode {
    order: ByteOrder,
    mark: [u8; 2],
    marked: bool,
    needs_mark: bool,
}

impl Transform<Encode> for Utf16Encode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u16>,
        dst: &mut OutputBuffer<'_, u8>,
    ) -> CoderResult {
        if self.needs_mark && src.has_remaining() {
            if !dst.put_slice(&self.mark) {
                return CoderResult::OVERFLOW;
            }
            self.needs_mark = false;
        }

        while let Some(scalar) = peek_scalar(src) {
            let pair = match scalar {
                Scalar::Bmp(unit) => [unit, 0],
                Scalar::Supplementary(code_point) => to_surrogates(code_point),
                Scalar::Incomplete => return CoderResult::UNDERFLOW,
                Scalar::Malformed => return CoderResult::malformed(ONE),
            };
            let units = &pair[..scalar.width()];

            let mut encoded = [0u8; 4];
            for (chunk, &unit) in encoded.chunks_exact_mut(2).zip(units) {
                chunk.copy_from_slice(&self.order.write(unit));
            }
            if !dst.put_slice(&encoded[..2 * units.len()]) {
                return CoderResult::OVERFLOW;
            }
            if src.advance(units.len()).is_err() {
                return CoderResult::UNDERFLOW;
            }
        }
        CoderResult::UNDERFLOW
    }

    fn reset(&mut self) {
        self.needs_mark = self.marked;
    }

    /// 带 BOM 的变体中，以 BOM 开头的替换序列会在输出中间插入 U+FEFF。
    fn is_legal_replacement(&self, replacement: &[u8]) -> Option<bool> {
        let leading = replacement.first_chunk::<2>()?;
        if self.marked && matches!(leading, [0xFE, 0xFF] | [0xFF, 0xFE]) {
            return Some(false);
        }
        None
    }

    fn operation_prefix(&self) -> &[u8] {
        if self.marked { &self.mark[..] } else { &[] }
    }
}
