use super::Coder;
use super::result::CoderResult;
use crate::buffer::{InputBuffer, OutputBuffer};
use crate::direction::Direction;
use crate::error::Result;
use alloc::{vec, vec::Vec};

impl<D: Direction> Coder<D> {
    /// 一次性转换：在完整可用的输入上驱动编解码器直至完成，返回长度恰好等于产出的新缓冲。
    ///
    /// # 执行逻辑（How）
    /// 1. 按平均比例估算初始容量；输入为空且容量为零时直接返回空结果；
    /// 2. `reset()` 后循环：有剩余输入时以 `end_of_input = true` 调用 `step`，否则视为下溢；
    ///    下溢后调用 `flush`，再次下溢即完成；
    /// 3. 任一调用溢出时把容量扩展为 `2n + 1`，保留已产出内容后重试；
    /// 4. 错误结果经 [`CoderResult::raise`] 转换为数据错误返回。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：当前不得处于增量操作中途（`Coding`/`End`），否则返回 `IllegalState`；
    /// - **后置条件**：成功时状态为 `Flushed`；返回数据错误时已重置为 `Reset`，可直接再次转换；
    ///   同一输入重复调用得到相同输出。
    pub fn convert(&mut self, input: &[D::Input]) -> Result<Vec<D::Output>> {
        if self.state().in_progress() {
            return Err(self.illegal_state("convert"));
        }

        let mut capacity = (input.len() as f32 * self.average_units_per_input()) as usize;
        if capacity == 0 && input.is_empty() {
            return Ok(Vec::new());
        }

        self.reset();
        let mut out = vec![D::Output::default(); capacity];
        let mut written = 0;
        let mut src = InputBuffer::new(input);

        loop {
            let result = {
                let mut dst = OutputBuffer::with_position(&mut out, written)?;
                let mut result = if src.has_remaining() {
                    self.step(&mut src, &mut dst, true)?
                } else {
                    CoderResult::UNDERFLOW
                };
                if result.is_underflow() {
                    result = self.flush(&mut dst)?;
                }
                written = dst.position();
                result
            };

            if result.is_underflow() {
                break;
            }
            if result.is_overflow() {
                capacity = 2 * capacity + 1;
                out.resize(capacity, D::Output::default());
                tracing::debug!(
                    direction = D::NAME,
                    written,
                    capacity,
                    "one-shot output buffer grown"
                );
                continue;
            }
            let err = result.raise();
            self.reset();
            return Err(err);
        }

        out.truncate(written);
        Ok(out)
    }
}

