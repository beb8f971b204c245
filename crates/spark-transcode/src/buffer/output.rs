use crate::error::{Result, TranscodeError};
use alloc::format;

/// `OutputBuffer` 描述转码驱动写入的输出区域。
///
/// # 设计背景（Why）
/// - 输出容量由调用方决定；容量不足时驱动返回溢出信号而非扩容，调用方排空后以同一调用重试。
/// - 写入接口全部为“全有或全无”：替换序列放不下时不得写入部分单元，否则重试会产生重复输出。
///
/// # 契约说明（What）
/// - **不变量**：`position() <= limit()`；
/// - `put`/`put_slice` 在空间不足时返回 `false` 且不修改区域；
/// - `written()` 返回自区域起点至当前位置的全部已产出单元。
#[derive(Debug)]
pub struct OutputBuffer<'a, U> {
    units: &'a mut [U],
    position: usize,
}

impl<'a, U: Copy> OutputBuffer<'a, U> {
    /// 以整个切片为可写范围，位置从零开始。
    pub fn new(units: &'a mut [U]) -> Self {
        Self { units, position: 0 }
    }

    /// 以指定起始位置包装切片，常用于继续写入已有部分内容的缓冲。
    pub fn with_position(units: &'a mut [U], position: usize) -> Result<Self> {
        if position > units.len() {
            return Err(TranscodeError::illegal_argument(format!(
                "output position {} exceeds limit {}",
                position,
                units.len()
            )));
        }
        Ok(Self { units, position })
    }

    /// 当前写位置。
    pub fn position(&self) -> usize {
        self.position
    }

    /// 写位置上限。
    pub fn limit(&self) -> usize {
        self.units.len()
    }

    /// 剩余可写单元数。
    pub fn remaining(&self) -> usize {
        self.units.len() - self.position
    }

    /// 是否仍可写入至少一个单元。
    pub fn has_remaining(&self) -> bool {
        self.position < self.units.len()
    }

    /// 写入单个单元；空间不足时返回 `false`。
    pub fn put(&mut self, unit: U) -> bool {
        match self.units.get_mut(self.position) {
            Some(slot) => {
                *slot = unit;
                self.position += 1;
                true
            }
            None => false,
        }
    }

    /// 写入整个切片；空间不足时不写入任何单元并返回 `false`。
    pub fn put_slice(&mut self, src: &[U]) -> bool {
        if src.len() > self.remaining() {
            return false;
        }
        let end = self.position + src.len();
        self.units[self.position..end].copy_from_slice(src);
        self.position = end;
        true
    }

    /// 已产出的单元视图。
    pub fn written(&self) -> &[U] {
        &self.units[..self.position]
    }

    /// 回退或前移写位置。
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.units.len() {
            return Err(TranscodeError::illegal_argument(format!(
                "output position {} exceeds limit {}",
                position,
                self.units.len()
            )));
        }
        self.position = position;
        Ok(())
    }
}
