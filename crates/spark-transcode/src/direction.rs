//! 转码方向与缓冲单元。
//!
//! # 教案意图（Why）
//! - 解码（字节 → 文本）与编码（文本 → 字节）共享同一套状态机与恢复策略，差别只在输入/输出单元类型；
//!   以关联类型表达方向，驱动代码只需编写一次。
//! - 内部文本表示固定为 UTF-16 码元（`u16`），与主流增量解码库的 `decode_to_utf16` 接口一致，
//!   也允许编码方向精确报告孤立代理项这类畸形输入。
//!
//! # 契约说明（What）
//! - [`Decode`]：`Input = u8`，`Output = u16`；
//! - [`Encode`]：`Input = u16`，`Output = u8`；
//! - 两个方向类型均为不可实例化的空枚举，仅作类型标记使用。

use crate::charset::CharsetRef;
use crate::coder::{ReplacementCheck, decoder_round_trip};
use crate::sealed::Sealed;
use alloc::sync::Arc;
use core::fmt;

/// 缓冲区中的一个可寻址单元：编码侧为字节，解码侧为 UTF-16 码元。
pub trait Unit: Copy + Default + Eq + fmt::Debug + Send + Sync + 'static + Sealed {}

impl Unit for u8 {}
impl Unit for u16 {}

/// 转码方向标记。
///
/// `NAME` 用于日志与错误描述；`INPUT_UNIT`/`OUTPUT_UNIT` 给出人类可读的单元名称。
pub trait Direction: Send + 'static + Sealed {
    /// 输入单元类型。
    type Input: Unit;
    /// 输出单元类型。
    type Output: Unit;
    /// 方向名称，例如 `decode`。
    const NAME: &'static str;
    /// 输入单元名称，例如 `byte`。
    const INPUT_UNIT: &'static str;
    /// 输出单元名称，例如 `char`。
    const OUTPUT_UNIT: &'static str;

    /// 构造编解码器时默认使用的替换序列校验；`None` 表示只做长度校验。
    #[doc(hidden)]
    fn default_replacement_check(charset: &CharsetRef) -> Option<ReplacementCheck<Self::Output>>;
}

/// 字节 → 文本方向。
#[derive(Debug)]
pub enum Decode {}

/// 文本 → 字节方向。
#[derive(Debug)]
pub enum Encode {}

impl Direction for Decode {
    type Input = u8;
    type Output = u16;
    const NAME: &'static str = "decode";
    const INPUT_UNIT: &'static str = "byte";
    const OUTPUT_UNIT: &'static str = "char";

    fn default_replacement_check(_charset: &CharsetRef) -> Option<ReplacementCheck<u16>> {
        None
    }
}

impl Direction for Encode {
    type Input = u16;
    type Output = u8;
    const NAME: &'static str = "encode";
    const INPUT_UNIT: &'static str = "char";
    const OUTPUT_UNIT: &'static str = "byte";

    fn default_replacement_check(charset: &CharsetRef) -> Option<ReplacementCheck<u8>> {
        let charset = Arc::clone(charset);
        Some(decoder_round_trip(Arc::new(move || {
            Arc::clone(&charset).new_decoder()
        })))
    }
}
