use core::fmt;

/// 编解码器的调用序列状态。
///
/// # 设计背景（Why）
/// - 显式状态机把两类调用方错误（在声明输入结束前 `flush`，或在操作结束后未重置就继续 `step`）
///   转换为立即可辨识的使用错误，而不是静默地产生错误输出。
///
/// # 契约说明（What）
/// - 合法迁移：`Reset → Coding → End → Flushed`，`Reset`/`Coding` 可直接进入 `End`；
/// - `End` 允许再次发起 `end_of_input = true` 的 `step`，供溢出后补充输出空间；
/// - `reset()` 可从任意状态回到 `Reset`。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoderState {
    /// 尚未开始或已被重置。
    Reset,
    /// 已处理至少一段非最终输入。
    Coding,
    /// 已声明输入结束，等待 `flush`。
    End,
    /// 已完成冲刷，需 `reset()` 后才能开始新的操作。
    Flushed,
}

impl CoderState {
    /// `step` 在当前状态下是否合法。
    pub fn accepts_step(self, end_of_input: bool) -> bool {
        match self {
            Self::Reset | Self::Coding => true,
            Self::End => end_of_input,
            Self::Flushed => false,
        }
    }

    /// 是否正处于一次编解码操作中途。
    pub fn in_progress(self) -> bool {
        matches!(self, Self::Coding | Self::End)
    }
}

impl fmt::Display for CoderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reset => "RESET",
            Self::Coding => "CODING",
            Self::End => "CODING_END",
            Self::Flushed => "FLUSHED",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_acceptance_matrix() {
        assert!(CoderState::Reset.accepts_step(false));
        assert!(CoderState::Reset.accepts_step(true));
        assert!(CoderState::Coding.accepts_step(false));
        assert!(CoderState::End.accepts_step(true));
        assert!(!CoderState::End.accepts_step(false));
        assert!(!CoderState::Flushed.accepts_step(true));
    }
}
