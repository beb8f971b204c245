//! 编解码器的声明式配置。
//!
//! # 教案意图（Why）
//! - 服务通常在配置文件中统一声明“遇到畸形输入怎么办”，而非在每个调用点手写策略；
//!   `CoderConfig` 把两类策略与可选替换文本收敛为一个可序列化结构。
//! - 启用 `toml` Feature 后可直接从 TOML 文本加载，沿用仓库一贯的配置格式。
//!
//! # 契约说明（What）
//! - 缺省值：两类策略均为 `REPORT`，不覆盖替换序列；未知字段会被拒绝；
//! - 替换文本按方向转换为输出单元：解码器直接取 UTF-16 码元，编码器借助同一字符集的
//!   一次性编码器（两类策略均为 `Report`）得到字节，并剥离原语每次操作开头写出的前缀；
//! - 应用配置与逐项调用 setter 的校验完全一致，失败时编解码器保持原配置。
//!
//! ```toml
//! malformed_input = "REPLACE"
//! unmappable_character = "IGNORE"
//! replacement = "?"
//! ```

use crate::coder::{CodingErrorAction, Decoder, Encoder};
use crate::error::{Result, TranscodeError};
use alloc::{string::String, sync::Arc, vec::Vec};
use serde::{Deserialize, Serialize};

/// 编解码器配置。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoderConfig {
    /// 畸形输入策略。
    pub malformed_input: CodingErrorAction,
    /// 不可映射字符策略。
    pub unmappable_character: CodingErrorAction,
    /// 可选替换文本。
    pub replacement: Option<String>,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            malformed_input: CodingErrorAction::Report,
            unmappable_character: CodingErrorAction::Report,
            replacement: None,
        }
    }
}

impl CoderConfig {
    /// 两类错误均使用替换策略的便捷配置。
    pub fn replacing() -> Self {
        Self {
            malformed_input: CodingErrorAction::Replace,
            unmappable_character: CodingErrorAction::Replace,
            replacement: None,
        }
    }

    /// 从 TOML 文本解析配置。
    #[cfg(feature = "toml")]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|err| {
            TranscodeError::illegal_argument(alloc::format!("invalid coder config: {err}"))
        })
    }
}

impl Decoder {
    /// 应用配置。
    pub fn configure(&mut self, config: &CoderConfig) -> Result<&mut Self> {
        if let Some(text) = config.replacement.as_deref() {
            let units: Vec<u16> = text.encode_utf16().collect();
            self.replace_with(&units)?;
        }
        Ok(self
            .on_malformed_input(config.malformed_input)
            .on_unmappable_character(config.unmappable_character))
    }
}

impl Encoder {
    /// 应用配置；替换文本需能被本字符集无错误地编码。
    pub fn configure(&mut self, config: &CoderConfig) -> Result<&mut Self> {
        if let Some(text) = config.replacement.as_deref() {
            let mut probe = Arc::clone(self.charset()).new_encoder()?;
            probe
                .on_malformed_input(CodingErrorAction::Report)
                .on_unmappable_character(CodingErrorAction::Report);
            let bytes = probe.encode_str(text).map_err(|err| {
                TranscodeError::illegal_argument(alloc::format!(
                    "replacement {text:?} is not encodable in {}: {err}",
                    self.charset().name()
                ))
            })?;
            let units = bytes.strip_prefix(probe.operation_prefix()).unwrap_or(&bytes[..]);
            self.replace_with(units)?;
        }
        Ok(self
            .on_malformed_input(config.malformed_input)
            .on_unmappable_character(config.unmappable_character))
    }
}
