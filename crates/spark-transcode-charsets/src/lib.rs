#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

//! `spark-transcode-charsets` 为 `spark-transcode` 驱动提供内置字符集与命名注册表。
//!
//! # 教案背景（Why）
//! - 核心 crate 只定义转换原语与工厂契约，本 crate 在**不修改核心**的前提下实现常用字符集，
//!   演示如何编写遵循 `Transform`/`Charset` 契约的外部扩展；
//! - 注册表负责名称校验、别名与大小写无关查找，保证每次取得的编解码器都是全新实例。
//!
//! # 使用概览（How）
//! - 直接构造：[`utf_8()`]、[`us_ascii()`] 等函数返回共享的 [`CharsetRef`]；
//! - 按名称查找：[`for_name`] 使用内置注册表，或通过 [`CharsetRegistry`] 组合自定义字符集；
//! - 取得字符集后调用 `new_decoder()`/`new_encoder()` 驱动增量或一次性转换。
//!
//! # 合约说明（What）
//! - US-ASCII、ISO-8859-1：单字节映射，解码错误长度为 1，不可映射字符长度为 1（代理对为 2）；
//! - UTF-8：按“最大合法子序列”规则报告畸形长度，残缺序列在非最终调用时等待更多输入；
//! - UTF-16BE/LE 与带 BOM 的 UTF-16：孤立代理项按 2 字节报告畸形，编码端 BOM 只写一次。
//!
//! # 风险提示与后续（Trade-offs）
//! - 未覆盖多字节东亚字符集与 EBCDIC 等；新增字符集时沿用 [`unicode`] 模块的代理项判定即可。

extern crate alloc;

mod registry;
mod single_byte;
pub mod unicode;
mod utf16;
mod utf8;

pub use registry::{CharsetRegistry, available, for_name};
pub use single_byte::{SingleByte, iso_8859_1, us_ascii};
pub use spark_transcode::CharsetRef;
pub use utf8::{Utf8, utf_8};
pub use utf16::{ByteOrder, Utf16, utf_16, utf_16be, utf_16le};
