//! 字符集工厂边界。
//!
//! # 教案意图（Why）
//! - 命名字符集的注册、查找与具体映射规则属于外部协作方；核心只定义它们必须满足的最小契约：
//!   给出名称，并为每个方向产出**全新、独立**的编解码器。
//! - 编解码器携带每次操作的可变状态，因此核心从不缓存或共享通过工厂获得的实例。
//!
//! # 契约说明（What）
//! - [`Charset::new_decoder`]/[`Charset::new_encoder`] 每次调用都返回新实例；
//! - 不支持编码的字符集应在 `can_encode` 返回 `false`，并让 `new_encoder` 返回 `UnsupportedOperation`；
//! - [`check_name`] 实施统一的命名规则，注册表与查找入口共享同一校验。

use crate::coder::{CodingErrorAction, Decoder, Encoder};
use crate::error::{Result, TranscodeError};
use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt;

/// 共享的字符集引用。
pub type CharsetRef = Arc<dyn Charset>;

/// 命名字符集及其编解码器工厂。
pub trait Charset: Send + Sync + fmt::Debug + 'static {
    /// 规范名称，例如 `UTF-8`。
    fn name(&self) -> &str;

    /// 别名列表。
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// 是否支持编码方向。
    fn can_encode(&self) -> bool {
        true
    }

    /// 构造一个全新的解码器。
    fn new_decoder(self: Arc<Self>) -> Result<Decoder>;

    /// 构造一个全新的编码器。
    fn new_encoder(self: Arc<Self>) -> Result<Encoder>;
}

/// 校验字符集名称。
///
/// # 契约说明（What）
/// - 名称非空，首字符为 ASCII 字母或数字；
/// - 其余字符只能是 ASCII 字母、数字或 `-`、`+`、`:`、`_`、`.`；
/// - 不满足时返回 `IllegalCharsetName`。
pub fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let legal = match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => chars
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '+' | ':' | '_' | '.')),
        _ => false,
    };
    if legal {
        Ok(())
    } else {
        Err(TranscodeError::IllegalCharsetName { name: name.into() })
    }
}

/// 以 `Replace` 策略把字节一次性解码为字符串。
pub fn decode(charset: &CharsetRef, bytes: &[u8]) -> Result<String> {
    let mut decoder = Arc::clone(charset).new_decoder()?;
    decoder
        .on_malformed_input(CodingErrorAction::Replace)
        .on_unmappable_character(CodingErrorAction::Replace);
    decoder.decode_to_string(bytes)
}

/// 以 `Replace` 策略把文本一次性编码为字节。
pub fn encode(charset: &CharsetRef, text: &str) -> Result<Vec<u8>> {
    let mut encoder = Arc::clone(charset).new_encoder()?;
    encoder
        .on_malformed_input(CodingErrorAction::Replace)
        .on_unmappable_character(CodingErrorAction::Replace);
    encoder.encode_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_registry_rules() {
        for name in ["UTF-8", "ISO-8859-1", "x-user+defined", "cp1252", "a:b_c.d"] {
            assert!(check_name(name).is_ok(), "{name} 应被接受");
        }
        for name in ["", "-utf8", "utf 8", "utf/8", "ünicode"] {
            let err = check_name(name).expect_err("非法名称应被拒绝");
            assert_eq!(err.code(), crate::error::codes::ILLEGAL_CHARSET_NAME);
        }
    }
}
