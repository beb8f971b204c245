use crate::error::{Result, TranscodeError};
use alloc::format;

/// `InputBuffer` 定义了转码驱动读取的输入区域。
///
/// # 设计背景（Why）
/// - 综合 `bytes::Buf` 与 NIO `Buffer` 的“观察-推进”语义：`remaining_slice` 暴露未消费单元，
///   `advance` 推进读指针；转换原语只推进实际消费过的单元。
/// - 位置必须在错误上报时精确停留在出错单元处，调用方才能检查或跳过它，因此游标由结构体显式持有。
///
/// # 契约说明（What）
/// - **不变量**：`position() <= limit()`；
/// - `advance(n)`/`set_position(p)` 超出上限时返回 `IllegalArgument`，且不修改位置；
/// - 生命周期 `'a` 绑定调用方的底层切片，区域本身可按值复制以便快照。
#[derive(Clone, Copy, Debug)]
pub struct InputBuffer<'a, U> {
    units: &'a [U],
    position: usize,
}

impl<'a, U: Copy> InputBuffer<'a, U> {
    /// 以整个切片为可读范围，位置从零开始。
    pub fn new(units: &'a [U]) -> Self {
        Self { units, position: 0 }
    }

    /// 当前读位置。
    pub fn position(&self) -> usize {
        self.position
    }

    /// 读位置上限（底层切片长度）。
    pub fn limit(&self) -> usize {
        self.units.len()
    }

    /// 剩余可读单元数。
    pub fn remaining(&self) -> usize {
        self.units.len() - self.position
    }

    /// 是否仍有未消费单元。
    pub fn has_remaining(&self) -> bool {
        self.position < self.units.len()
    }

    /// 尚未消费的单元视图。
    pub fn remaining_slice(&self) -> &'a [U] {
        &self.units[self.position..]
    }

    /// 已消费的单元视图。
    pub fn consumed(&self) -> &'a [U] {
        &self.units[..self.position]
    }

    /// 观察下一个单元而不推进位置。
    pub fn peek(&self) -> Option<U> {
        self.units.get(self.position).copied()
    }

    /// 观察距离当前位置 `offset` 处的单元。
    pub fn peek_at(&self, offset: usize) -> Option<U> {
        self.position
            .checked_add(offset)
            .and_then(|index| self.units.get(index))
            .copied()
    }

    /// 读取下一个单元并推进位置。
    pub fn get(&mut self) -> Option<U> {
        let unit = self.peek()?;
        self.position += 1;
        Some(unit)
    }

    /// 将读位置前移 `len` 个单元。
    pub fn advance(&mut self, len: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(TranscodeError::illegal_argument(format!(
                "cannot advance input by {} units, only {} remaining",
                len,
                self.remaining()
            )));
        }
        self.position += len;
        Ok(())
    }

    /// 直接设置读位置。
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.units.len() {
            return Err(TranscodeError::illegal_argument(format!(
                "input position {} exceeds limit {}",
                position,
                self.units.len()
            )));
        }
        self.position = position;
        Ok(())
    }
}
