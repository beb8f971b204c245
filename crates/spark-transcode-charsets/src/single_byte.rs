//! 单字节字符集：每个字节对应一个不超过上限的码元。
//!
//! # 契约说明（What）
//! - 解码：`byte <= limit` 直接映射，否则为长度 1 的畸形输入（ISO-8859-1 的上限为 `0xFF`，不存在畸形字节）；
//! - 编码：`unit <= limit` 直接映射；其余基本平面码元不可映射（长度 1），补充平面字符整体不可映射（长度 2），
//!   孤立代理项畸形（长度 1）；
//! - 两个方向的平均与最大比例均为 1；默认替换序列分别为 `U+FFFD` 与 `?`。

use crate::unicode::{ONE, Scalar, TWO, peek_scalar};
use alloc::{boxed::Box, sync::Arc};
use spark_transcode::prelude::*;

/// 单字节字符集。
#[derive(Debug)]
pub struct SingleByte {
    name: &'static str,
    aliases: &'static [&'static str],
    limit: u8,
}

impl SingleByte {
    /// 以名称、别名与映射上限定义单字节字符集。
    pub const fn new(name: &'static str, aliases: &'static [&'static str], limit: u8) -> Self {
        Self {
            name,
            aliases,
            limit,
        }
    }

    /// 映射上限。
    pub fn limit(&self) -> u8 {
        self.limit
    }
}

/// US-ASCII（7 位）。
pub fn us_ascii() -> CharsetRef {
    Arc::new(SingleByte::new(
        "US-ASCII",
        &[
            "ascii",
            "us",
            "iso646-us",
            "ansi_x3.4-1968",
            "cp367",
            "csascii",
            "646",
        ],
        0x7F,
    ))
}

/// ISO-8859-1（Latin-1）。
pub fn iso_8859_1() -> CharsetRef {
    Arc::new(SingleByte::new(
        "ISO-8859-1",
        &[
            "latin1",
            "l1",
            "iso8859_1",
            "iso_8859-1",
            "iso-8859-1:1987",
            "cp819",
            "ibm819",
            "csisolatin1",
            "8859_1",
        ],
        0xFF,
    ))
}

impl Charset for SingleByte {
    fn name(&self) -> &str {
        self.name
    }

    fn aliases(&self) -> &[&'static str] {
        self.aliases
    }

    fn new_decoder(self: Arc<Self>) -> Result<Decoder> {
        let transform = SingleByteDecode { limit: self.limit };
        Decoder::new(self, Box::new(transform), 1.0, 1.0, &[0xFFFD])
    }

    fn new_encoder(self: Arc<Self>) -> Result<Encoder> {
        let transform = SingleByteEncode { limit: self.limit };
        Encoder::new(self, Box::new(transform), 1.0, 1.0, b"?")
    }
}

struct SingleByteDecode {
    limit: u8,
}

impl Transform<Decode> for SingleByteDecode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u8>,
        dst: &mut OutputBuffer<'_, u16>,
    ) -> CoderResult {
        while let Some(byte) = src.peek() {
            if byte > self.limit {
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

struct SingleByteEncode {
    limit: u8,
}

impl Transform<Encode> for SingleByteEncode {
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, u16>,
        dst: &mut OutputBuffer<'_, u8>,
    ) -> CoderResult {
        while let Some(scalar) = peek_scalar(src) {
            match scalar {
                Scalar::Bmp(unit) if unit <= u16::from(self.limit) => {
                    if !dst.put(unit as u8) {
                        return CoderResult::OVERFLOW;
                    }
                    src.get();
                }
                Scalar::Bmp(_) => return CoderResult::unmappable(ONE),
                Scalar::Supplementary(_) => return CoderResult::unmappable(TWO),
                Scalar::Incomplete => return CoderResult::UNDERFLOW,
                Scalar::Malformed => return CoderResult::malformed(ONE),
            }
        }
        CoderResult::UNDERFLOW
    }

    fn is_legal_replacement(&self, replacement: &[u8]) -> Option<bool> {
        Some(replacement.iter().all(|&byte| byte <= self.limit))
    }
}
