use crate::coder::CoderState;
use alloc::{borrow::Cow, string::String};

/// `TranscodeError` 是 `spark-transcode` 跨模块共享的错误域，是所有可观察故障的最终形态。
///
/// # 设计背景（Why）
/// - 转码过程存在三类本质不同的失败：数据本身的错误（畸形输入、不可映射字符）、调用方违反调用协议
///   （错误的调用顺序、非法参数），以及字符集查找失败；三者需要不同的处置方式，必须在类型层面可区分。
/// - 每个变体都映射到稳定错误码（见 [`codes`]），以便日志与告警系统按 `<域>.<语义>` 聚合。
///
/// # 契约说明（What）
/// - 数据错误始终携带**精确**的错误单元数量，调用方可据此跳过或上报对应区间；
/// - 使用错误（`IllegalState` 等）表示调用代码存在缺陷，驱动在返回它们之前不会修改任何状态；
/// - 所有变体均为 `Send + Sync + 'static`，可安全跨线程传播。
///
/// # 风险提示（Trade-offs）
/// - 通过 `thiserror` 派生，在关闭 `std` 时依赖 `core::error::Error`，要求编译器不低于 1.81。
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TranscodeError {
    /// 输入不是源表示下合法的单元序列。
    #[error("[{}] input length = {length}", codes::MALFORMED_INPUT)]
    MalformedInput { length: usize },

    /// 输入合法但在目标表示中没有对应字符。
    #[error("[{}] input length = {length}", codes::UNMAPPABLE_CHARACTER)]
    UnmappableCharacter { length: usize },

    /// 在错误的状态下调用 `step`/`flush` 等操作。
    #[error("[{}] cannot {operation} in state {state}", codes::ILLEGAL_STATE)]
    IllegalState {
        operation: &'static str,
        state: CoderState,
    },

    /// 构造参数、替换序列或长度参数未通过校验。
    #[error("[{}] {reason}", codes::ILLEGAL_ARGUMENT)]
    IllegalArgument { reason: Cow<'static, str> },

    /// 对不支持该操作的对象发起调用，例如查询下溢结果的长度。
    #[error("[{}] {reason}", codes::UNSUPPORTED_OPERATION)]
    UnsupportedOperation { reason: Cow<'static, str> },

    /// 下溢结果被当作异常抛出；正确的驱动代码不应触发。
    #[error("[{}] buffer underflow", codes::BUFFER_UNDERFLOW)]
    BufferUnderflow,

    /// 溢出结果被当作异常抛出；正确的驱动代码不应触发。
    #[error("[{}] buffer overflow", codes::BUFFER_OVERFLOW)]
    BufferOverflow,

    /// 字符集名称不满足命名规则。
    #[error("[{}] illegal charset name `{name}`", codes::ILLEGAL_CHARSET_NAME)]
    IllegalCharsetName { name: String },

    /// 名称合法但未注册对应字符集。
    #[error("[{}] unsupported charset `{name}`", codes::UNSUPPORTED_CHARSET)]
    UnsupportedCharset { name: String },

    /// 解码产出的 UTF-16 序列无法组成合法字符串。
    #[error("[{}] unpaired surrogate at unit {position}", codes::INVALID_UTF16)]
    InvalidUtf16 { position: usize },
}

/// 错误的主要处置分类。
///
/// - `DataError`：数据本身有误，调用方可以调整输入或切换策略后重试；
/// - `UsageFault`：调用代码缺陷，重试无意义；
/// - `Lookup`：字符集查找失败，通常意味着配置错误。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    DataError,
    UsageFault,
    Lookup,
}

impl TranscodeError {
    /// 获取稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => codes::MALFORMED_INPUT,
            Self::UnmappableCharacter { .. } => codes::UNMAPPABLE_CHARACTER,
            Self::IllegalState { .. } => codes::ILLEGAL_STATE,
            Self::IllegalArgument { .. } => codes::ILLEGAL_ARGUMENT,
            Self::UnsupportedOperation { .. } => codes::UNSUPPORTED_OPERATION,
            Self::BufferUnderflow => codes::BUFFER_UNDERFLOW,
            Self::BufferOverflow => codes::BUFFER_OVERFLOW,
            Self::IllegalCharsetName { .. } => codes::ILLEGAL_CHARSET_NAME,
            Self::UnsupportedCharset { .. } => codes::UNSUPPORTED_CHARSET,
            Self::InvalidUtf16 { .. } => codes::INVALID_UTF16,
        }
    }

    /// 获取结构化错误分类。
    ///
    /// # 契约说明（What）
    /// - `MalformedInput`/`UnmappableCharacter`/`InvalidUtf16` 属于数据错误；
    /// - 字符集名称相关错误归入 `Lookup`；
    /// - 其余全部视为调用方缺陷（`UsageFault`），包括被抛出的下溢/溢出信号。
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedInput { .. }
            | Self::UnmappableCharacter { .. }
            | Self::InvalidUtf16 { .. } => ErrorCategory::DataError,
            Self::IllegalCharsetName { .. } | Self::UnsupportedCharset { .. } => {
                ErrorCategory::Lookup
            }
            _ => ErrorCategory::UsageFault,
        }
    }

    /// 数据错误对应的错误单元数量；其余变体返回 `None`。
    pub fn input_length(&self) -> Option<usize> {
        match self {
            Self::MalformedInput { length } | Self::UnmappableCharacter { length } => {
                Some(*length)
            }
            _ => None,
        }
    }

    pub(crate) fn illegal_argument(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::IllegalArgument {
            reason: reason.into(),
        }
    }
}

/// 错误码常量命名空间。
///
/// 错误码遵循 `<领域>.<语义>` 命名约定，方便在跨组件日志中检索与聚合；新增码值需保持与现有码值兼容。
pub mod codes {
    /// 畸形输入。
    pub const MALFORMED_INPUT: &str = "transcode.malformed_input";
    /// 不可映射字符。
    pub const UNMAPPABLE_CHARACTER: &str = "transcode.unmappable_character";
    /// 调用顺序违反状态机约束。
    pub const ILLEGAL_STATE: &str = "transcode.illegal_state";
    /// 参数校验失败。
    pub const ILLEGAL_ARGUMENT: &str = "transcode.illegal_argument";
    /// 对象不支持该操作。
    pub const UNSUPPORTED_OPERATION: &str = "transcode.unsupported_operation";
    /// 下溢信号被抛出。
    pub const BUFFER_UNDERFLOW: &str = "transcode.buffer_underflow";
    /// 溢出信号被抛出。
    pub const BUFFER_OVERFLOW: &str = "transcode.buffer_overflow";
    /// 非法字符集名称。
    pub const ILLEGAL_CHARSET_NAME: &str = "charset.illegal_name";
    /// 未注册的字符集。
    pub const UNSUPPORTED_CHARSET: &str = "charset.unsupported";
    /// 非法 UTF-16 文本。
    pub const INVALID_UTF16: &str = "transcode.invalid_utf16";
}

/// 统一结果别名。
pub type Result<T, E = TranscodeError> = core::result::Result<T, E>;
