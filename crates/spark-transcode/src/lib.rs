#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![allow(private_bounds)]

//! `spark-transcode` 提供字节与文本之间增量、有状态转码的驱动核心。
//!
//! # 教案背景（Why）
//! - 网络与存储边界上的文本很少一次性完整到达：字节可能在任意位置被切分，多字节字符横跨两个缓冲，
//!   输出空间也可能中途耗尽。本 crate 把“可在任意切分点暂停与恢复的转码过程”抽象为统一的驱动，
//!   具体字符集只需实现最小的转换原语；
//! - 畸形输入与不可映射字符的处置（忽略、替换、上报）由驱动统一实施，错误长度精确到单元，
//!   保证调用方能够定点上报或安全跳过。
//!
//! # 使用概览（How）
//! - 字符集通过 [`Charset`] 工厂产出全新的 [`Decoder`]/[`Encoder`]；
//! - 增量调用序列：`reset()` → 零次或多次 `step(.., false)` → 一次 `step(.., true)` → `flush()`；
//! - 简单场景使用一次性入口 [`Coder::convert`] 或 [`charset::decode`]/[`charset::encode`]；
//! - 启用 `toml` Feature 后可通过 [`CoderConfig`] 声明式配置恢复策略。
//!
//! # 合约说明（What）
//! - 内部文本表示为 UTF-16 码元（`u16`），字节为 `u8`；
//! - 所有错误通过 [`TranscodeError`] 返回，并携带 `<域>.<原因>` 形式的稳定错误码（见 [`codes`]）；
//! - 编解码器实例可跨线程移动（`Send`），但不可共享（`!Sync`）；错误结果缓存是唯一的全局状态，由
//!   `spin::Mutex` 保护。
//!
//! # 风险提示与后续（Trade-offs）
//! - 核心不内置任何字符集规则；内置实现见 `spark-transcode-charsets`；
//! - 关闭 `std` Feature 后依旧可用，但需要调用方提供全局分配器。

extern crate alloc;

mod sealed;

pub mod buffer;
pub mod charset;
pub mod coder;
pub mod config;
pub mod direction;
pub mod error;
pub mod prelude;
#[doc(hidden)]
pub mod test_stubs;

pub use buffer::{InputBuffer, OutputBuffer};
pub use charset::{Charset, CharsetRef, check_name};
pub use coder::{
    CACHE_SOFT_LIMIT, Coder, CoderResult, CoderState, CodingErrorAction, Decoder, Encoder,
    ErrorKind, ResultKind, Transform, cache_len,
};
pub use config::CoderConfig;
pub use direction::{Decode, Direction, Encode, Unit};
pub use error::{ErrorCategory, Result, TranscodeError, codes};
