//! 调用方拥有的输入/输出区域。
//!
//! # 设计背景（Why）
//! - 增量转码的位置与上限归调用方所有：驱动只在每次调用给定的范围内推进位置，
//!   调用方在两次调用之间负责排空输出或补充输入。
//! - 以借用切片 + 游标表达区域，避免在热路径中复制数据，也让 `no_std + alloc` 环境同样可用。
//!
//! # 契约说明（What）
//! - [`InputBuffer`]：只读区域，`position()` 之前的单元视为已消费；
//! - [`OutputBuffer`]：可写区域，`position()` 之前的单元视为已产出；
//! - 两者的上限等于底层切片长度，调用方可通过重新切片收紧上限。

mod input;
mod output;

pub use input::InputBuffer;
pub use output::OutputBuffer;
