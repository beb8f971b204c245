//! 内部 sealed 模块用于控制外部扩展边界。
//!
//! # 设计背景（Why）
//! - `spark-transcode` 的转码方向（[`Direction`](crate::Direction)）与缓冲单元（[`Unit`](crate::Unit)）
//!   是驱动循环的类型骨架，需要在 SemVer 框架下保留为其增加关联项的空间。
//! - 通过统一的 `Sealed` 标记，可以在不破坏公开 API 的情况下为这些 Trait 增加默认方法或强化约束。
//!
//! # 契约说明（What）
//! - `Sealed` 无需调用方显式实现；任意类型默认满足该约束。
//! - 若未来需要把方向收紧为仅 `Decode`/`Encode` 两种，可在此处收窄 blanket 实现而无需改动公开签名。
pub(crate) trait Sealed {}

impl<T: ?Sized> Sealed for T {}
