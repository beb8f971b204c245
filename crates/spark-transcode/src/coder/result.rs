use super::action::ErrorKind;
use super::cache::{self, ErrorResult};
use crate::error::{Result, TranscodeError};
use alloc::sync::Arc;
use core::{
    fmt,
    hash::{Hash, Hasher},
    num::NonZeroUsize,
};

/// 结果类别标签。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultKind {
    /// 需要更多输入。
    Underflow,
    /// 需要更多输出空间。
    Overflow,
    /// 畸形输入。
    Malformed,
    /// 不可映射字符。
    Unmappable,
}

/// `CoderResult` 描述一次转换原语或驱动调用的结局。
///
/// # 设计背景（Why）
/// - 下溢/溢出描述缓冲状态，是控制流信号而非数据错误；畸形/不可映射是真正的数据错误，
///   必须携带精确的错误单元数量，调用方才能定点上报或跳过。
/// - 错误类结果按 `(类别, 长度)` 在进程级缓存中驻留（见 `cache` 模块），两个固定单例
///   [`UNDERFLOW`](Self::UNDERFLOW)/[`OVERFLOW`](Self::OVERFLOW) 不参与缓存。
///
/// # 契约说明（What）
/// - 相等性按“类别 + 长度”判定；实例身份通过 [`same_instance`](Self::same_instance) 观察；
/// - 对下溢/溢出调用 [`length`](Self::length) 属于使用错误；
/// - 克隆仅增加引用计数，可廉价地在调用方之间传递。
#[derive(Clone)]
pub struct CoderResult(Repr);

#[derive(Clone)]
enum Repr {
    Underflow,
    Overflow,
    Error(Arc<ErrorResult>),
}

impl CoderResult {
    /// 输入耗尽：非最终调用时需要补充输入，最终调用时表示完成。
    pub const UNDERFLOW: CoderResult = CoderResult(Repr::Underflow);

    /// 输出空间不足：排空输出后以相同参数重试。
    pub const OVERFLOW: CoderResult = CoderResult(Repr::Overflow);

    /// 长度为 `length` 的畸形输入结果（共享实例）。
    pub fn malformed(length: NonZeroUsize) -> Self {
        Self(Repr::Error(cache::intern(ErrorKind::Malformed, length)))
    }

    /// 长度为 `length` 的不可映射字符结果（共享实例）。
    pub fn unmappable(length: NonZeroUsize) -> Self {
        Self(Repr::Error(cache::intern(ErrorKind::Unmappable, length)))
    }

    /// 按类别构造错误结果。
    pub fn error(kind: ErrorKind, length: NonZeroUsize) -> Self {
        Self(Repr::Error(cache::intern(kind, length)))
    }

    /// 校验长度后返回畸形输入结果。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：`length > 0`，否则返回 `IllegalArgument`；
    /// - **后置条件**：同一长度多次调用得到的结果彼此相等，并在缓存未淘汰时共享实例。
    pub fn malformed_for_length(length: usize) -> Result<Self> {
        Self::checked(ErrorKind::Malformed, length)
    }

    /// 校验长度后返回不可映射字符结果，约束同 [`malformed_for_length`](Self::malformed_for_length)。
    pub fn unmappable_for_length(length: usize) -> Result<Self> {
        Self::checked(ErrorKind::Unmappable, length)
    }

    fn checked(kind: ErrorKind, length: usize) -> Result<Self> {
        NonZeroUsize::new(length)
            .map(|length| Self::error(kind, length))
            .ok_or_else(|| {
                TranscodeError::illegal_argument("error result length must be positive")
            })
    }

    /// 结果类别。
    pub fn kind(&self) -> ResultKind {
        match &self.0 {
            Repr::Underflow => ResultKind::Underflow,
            Repr::Overflow => ResultKind::Overflow,
            Repr::Error(inner) => match inner.kind {
                ErrorKind::Malformed => ResultKind::Malformed,
                ErrorKind::Unmappable => ResultKind::Unmappable,
            },
        }
    }

    /// 数据错误类别；控制流信号返回 `None`。
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.0 {
            Repr::Error(inner) => Some(inner.kind),
            _ => None,
        }
    }

    pub fn is_underflow(&self) -> bool {
        matches!(self.0, Repr::Underflow)
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self.0, Repr::Overflow)
    }

    /// 是否为畸形或不可映射错误。
    pub fn is_error(&self) -> bool {
        matches!(self.0, Repr::Error(_))
    }

    pub fn is_malformed(&self) -> bool {
        self.error_kind() == Some(ErrorKind::Malformed)
    }

    pub fn is_unmappable(&self) -> bool {
        self.error_kind() == Some(ErrorKind::Unmappable)
    }

    /// 错误单元数量；对下溢/溢出调用返回 `UnsupportedOperation`。
    pub fn length(&self) -> Result<usize> {
        match &self.0 {
            Repr::Error(inner) => Ok(inner.length.get()),
            _ => Err(TranscodeError::UnsupportedOperation {
                reason: "length is only defined for malformed or unmappable results".into(),
            }),
        }
    }

    /// 驱动内部使用的非零长度；控制流信号返回 `None`。
    pub(crate) fn error_length(&self) -> Option<NonZeroUsize> {
        match &self.0 {
            Repr::Error(inner) => Some(inner.length),
            _ => None,
        }
    }

    /// 将结果转换为对应的错误信号，供偏好 `?` 传播的上下文使用。
    ///
    /// # 契约说明（What）
    /// - 下溢/溢出映射为 `BufferUnderflow`/`BufferOverflow`，正确的驱动代码不应触发它们；
    /// - 畸形/不可映射映射为携带长度的数据错误。
    pub fn raise(&self) -> TranscodeError {
        match &self.0 {
            Repr::Underflow => TranscodeError::BufferUnderflow,
            Repr::Overflow => TranscodeError::BufferOverflow,
            Repr::Error(inner) => match inner.kind {
                ErrorKind::Malformed => TranscodeError::MalformedInput {
                    length: inner.length.get(),
                },
                ErrorKind::Unmappable => TranscodeError::UnmappableCharacter {
                    length: inner.length.get(),
                },
            },
        }
    }

    /// 两个结果是否共享同一驻留实例。单例信号与自身类别恒为同一实例。
    pub fn same_instance(a: &Self, b: &Self) -> bool {
        match (&a.0, &b.0) {
            (Repr::Underflow, Repr::Underflow) | (Repr::Overflow, Repr::Overflow) => true,
            (Repr::Error(x), Repr::Error(y)) => Arc::ptr_eq(x, y),
            _ => false,
        }
    }
}

impl PartialEq for CoderResult {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.error_length() == other.error_length()
    }
}

impl Eq for CoderResult {}

impl Hash for CoderResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.error_length().hash(state);
    }
}

impl fmt::Display for CoderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Underflow => f.write_str("UNDERFLOW"),
            Repr::Overflow => f.write_str("OVERFLOW"),
            Repr::Error(inner) => write!(f, "{}[{}]", inner.kind, inner.length),
        }
    }
}

impl fmt::Debug for CoderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
