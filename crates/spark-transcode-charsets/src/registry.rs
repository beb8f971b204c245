//! 命名字符集注册表。
//!
//! # 教案意图（Why）
//! - 调用方通常只知道名称（配置、协议头中的 `charset=` 参数），注册表把名称解析为字符集工厂；
//! - 查找大小写无关并支持别名，名称本身先经 [`check_name`] 校验，非法名称与未注册名称是两类不同错误。
//!
//! # 契约说明（What）
//! - [`CharsetRegistry::register`]：规范名与别名都不得与已有条目冲突，冲突时返回 `IllegalArgument`；
//! - [`CharsetRegistry::for_name`]：非法名称返回 `IllegalCharsetName`，未注册返回 `UnsupportedCharset`；
//! - [`CharsetRegistry::decoder`]/[`CharsetRegistry::encoder`]：每次调用都构造全新实例，注册表从不缓存编解码器；
//! - 模块级 [`for_name`]/[`available`] 使用惰性初始化的只读内置注册表。

use crate::{iso_8859_1, us_ascii, utf_8, utf_16, utf_16be, utf_16le};
use alloc::{collections::BTreeMap, format, string::String, sync::Arc, vec::Vec};
use spark_transcode::{CharsetRef, Decoder, Encoder, Result, TranscodeError, check_name};
use spin::Lazy;

/// 名称到字符集的映射。
#[derive(Debug, Default, Clone)]
pub struct CharsetRegistry {
    /// 小写名称（含别名）→ 字符集。
    by_key: BTreeMap<String, CharsetRef>,
    /// 规范名称 → 字符集。
    canonical: BTreeMap<String, CharsetRef>,
}

static BUILTIN: Lazy<CharsetRegistry> = Lazy::new(CharsetRegistry::with_builtin);

impl CharsetRegistry {
    /// 空注册表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先注册全部内置字符集的注册表。
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for charset in [
            us_ascii(),
            iso_8859_1(),
            utf_8(),
            utf_16be(),
            utf_16le(),
            utf_16(),
        ] {
            if let Err(err) = registry.register(charset) {
                tracing::warn!(error = %err, "built-in charset rejected by registry");
            }
        }
        registry
    }

    /// 注册字符集。
    ///
    /// # 错误（Errors）
    /// - 名称或别名非法：`IllegalCharsetName`；
    /// - 名称或别名已被占用：`IllegalArgument`，注册表保持不变。
    pub fn register(&mut self, charset: CharsetRef) -> Result<()> {
        let name = charset.name();
        check_name(name)?;
        let mut keys = Vec::with_capacity(charset.aliases().len() + 1);
        keys.push(name.to_ascii_lowercase());
        for alias in charset.aliases() {
            check_name(alias)?;
            keys.push(alias.to_ascii_lowercase());
        }
        keys.sort_unstable();
        keys.dedup();

        if let Some(taken) = keys.iter().find(|key| self.by_key.contains_key(*key)) {
            return Err(TranscodeError::IllegalArgument {
                reason: format!("charset name `{taken}` is already registered").into(),
            });
        }

        tracing::debug!(charset = name, aliases = keys.len() - 1, "charset registered");
        self.canonical.insert(name.into(), Arc::clone(&charset));
        for key in keys {
            self.by_key.insert(key, Arc::clone(&charset));
        }
        Ok(())
    }

    /// 大小写无关地查找名称或别名；非法或未注册的名称返回 `None`。
    pub fn lookup(&self, name: &str) -> Option<CharsetRef> {
        check_name(name).ok()?;
        self.by_key.get(&name.to_ascii_lowercase()).cloned()
    }

    /// 查找字符集，区分非法名称与未注册名称。
    pub fn for_name(&self, name: &str) -> Result<CharsetRef> {
        check_name(name)?;
        self.lookup(name)
            .ok_or_else(|| TranscodeError::UnsupportedCharset { name: name.into() })
    }

    /// 名称是否已注册。
    pub fn is_supported(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// 按字母序排列的规范名称。
    pub fn available(&self) -> Vec<&str> {
        self.canonical.keys().map(String::as_str).collect()
    }

    /// 为指定名称构造全新解码器。
    pub fn decoder(&self, name: &str) -> Result<Decoder> {
        self.for_name(name)?.new_decoder()
    }

    /// 为指定名称构造全新编码器。
    pub fn encoder(&self, name: &str) -> Result<Encoder> {
        let charset = self.for_name(name)?;
        if !charset.can_encode() {
            return Err(TranscodeError::UnsupportedOperation {
                reason: format!("charset {} does not support encoding", charset.name()).into(),
            });
        }
        charset.new_encoder()
    }
}

/// 在内置注册表中查找字符集。
pub fn for_name(name: &str) -> Result<CharsetRef> {
    BUILTIN.for_name(name)
}

/// 内置字符集的规范名称。
pub fn available() -> Vec<&'static str> {
    let registry: &'static CharsetRegistry = &BUILTIN;
    registry.available()
}
