//! 增量编解码驱动。
//!
//! # 教案意图（Why）
//! - 字节 → 文本与文本 → 字节两个方向共享同一形态：持有替换序列、两类错误的处置策略与四态调用序列
//!   状态机，循环驱动调用方注入的字符集转换原语，并解释其结果、施加恢复策略。
//! - 在 `step` 内部循环（而非要求调用方针对每个错误重新调用）使 `Ignore`/`Replace` 恢复完全在驱动内完成，
//!   只有 `Report` 会把数据错误暴露给调用方。
//!
//! # 使用方式（How）
//! 一次完整的编解码操作：`reset()` → 零次或多次 `step(.., false)` → 一次 `step(.., true)` → `flush()`。
//! 简单调用点可直接使用一次性转换 [`Coder::convert`]。
//!
//! # 契约说明（What）
//! - 编解码器实例可变且**不可并发使用**：类型实现 `Send` 但不实现 `Sync`，调用方需为每个任务/线程持有独立实例；
//! - 调用顺序错误以 `IllegalState` 立即返回，且不修改任何状态；
//! - 输入/输出区域的位置与上限归调用方所有，驱动只在本次调用给定的范围内推进位置。

mod action;
mod cache;
mod oneshot;
mod replacement;
mod result;
mod state;
mod transform;
mod typed;

pub use action::{CodingErrorAction, ErrorKind};
pub use cache::{CACHE_SOFT_LIMIT, cache_len};
pub use replacement::{DecoderFactory, ReplacementCheck, decoder_round_trip};
pub use result::{CoderResult, ResultKind};
pub use state::CoderState;
pub use transform::Transform;

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::charset::CharsetRef;
use crate::direction::{Decode, Direction, Encode};
use crate::error::{Result, TranscodeError};
use alloc::{boxed::Box, format, vec::Vec};
use core::{fmt, num::NonZeroUsize};

/// 字节 → 文本编解码器。
pub type Decoder = Coder<Decode>;

/// 文本 → 字节编解码器。
pub type Encoder = Coder<Encode>;

/// `Coder` 是两个方向共用的增量驱动。
///
/// # 设计背景（Why）
/// - 字符集差异全部收敛到 [`Transform`] 原语；驱动负责状态机、结果解释与恢复策略，
///   从而在部分缓冲重入时保持正确、在错误边界上保持精确（错误单元数一个不差）。
///
/// # 契约说明（What）
/// - **构造前置条件**：`average > 0`、`maximum > 0`、`average <= maximum`；替换序列非空且长度不超过
///   `maximum`，并通过方向默认或显式注入的合法性校验（编码方向需能被同一字符集干净解码）；
/// - **默认策略**：两类错误均为 [`CodingErrorAction::Report`]；
/// - **生命周期**：由字符集工厂创建，可任意次数 `reset()`，无显式销毁。
pub struct Coder<D: Direction> {
    charset: CharsetRef,
    transform: Box<dyn Transform<D>>,
    average: f32,
    maximum: f32,
    replacement: Vec<D::Output>,
    malformed_action: CodingErrorAction,
    unmappable_action: CodingErrorAction,
    state: CoderState,
    replacement_check: Option<ReplacementCheck<D::Output>>,
}

impl<D: Direction> Coder<D> {
    /// 使用方向默认的替换序列校验构造编解码器。
    ///
    /// # 参数（What）
    /// - `charset`：所属字符集，对驱动不透明，仅用于回显与构造往返校验所需的解码器；
    /// - `average`/`maximum`：每个输入单元平均/最多产生的输出单元数；
    /// - `replacement`：初始替换序列，内部保存副本。
    ///
    /// # 错误（Errors）
    /// - 任一前置条件不满足时返回 `IllegalArgument`。
    pub fn new(
        charset: CharsetRef,
        transform: Box<dyn Transform<D>>,
        average: f32,
        maximum: f32,
        replacement: &[D::Output],
    ) -> Result<Self> {
        let check = D::default_replacement_check(&charset);
        Self::with_replacement_check(charset, transform, average, maximum, replacement, check)
    }

    /// 显式指定替换序列校验函数的构造入口，供字符集替换通用往返校验。
    pub fn with_replacement_check(
        charset: CharsetRef,
        transform: Box<dyn Transform<D>>,
        average: f32,
        maximum: f32,
        replacement: &[D::Output],
        replacement_check: Option<ReplacementCheck<D::Output>>,
    ) -> Result<Self> {
        if !(average > 0.0 && average.is_finite()) {
            return Err(TranscodeError::illegal_argument(format!(
                "non-positive average {}s per {}: {}",
                D::OUTPUT_UNIT,
                D::INPUT_UNIT,
                average
            )));
        }
        if !(maximum > 0.0 && maximum.is_finite()) {
            return Err(TranscodeError::illegal_argument(format!(
                "non-positive max {}s per {}: {}",
                D::OUTPUT_UNIT,
                D::INPUT_UNIT,
                maximum
            )));
        }
        if average > maximum {
            return Err(TranscodeError::illegal_argument(format!(
                "average {}s per {} ({}) exceeds max ({})",
                D::OUTPUT_UNIT,
                D::INPUT_UNIT,
                average,
                maximum
            )));
        }

        let mut coder = Self {
            charset,
            transform,
            average,
            maximum,
            replacement: Vec::new(),
            malformed_action: CodingErrorAction::Report,
            unmappable_action: CodingErrorAction::Report,
            state: CoderState::Reset,
            replacement_check,
        };
        coder.replace_with(replacement)?;
        tracing::debug!(
            charset = coder.charset.name(),
            direction = D::NAME,
            average,
            maximum,
            "coder constructed"
        );
        Ok(coder)
    }

    /// 所属字符集。
    pub fn charset(&self) -> &CharsetRef {
        &self.charset
    }

    /// 每个输入单元平均产生的输出单元数。
    pub fn average_units_per_input(&self) -> f32 {
        self.average
    }

    /// 每个输入单元最多产生的输出单元数。
    pub fn max_units_per_input(&self) -> f32 {
        self.maximum
    }

    /// 当前调用序列状态。
    pub fn state(&self) -> CoderState {
        self.state
    }

    /// 当前替换序列的副本。
    pub fn replacement(&self) -> Vec<D::Output> {
        self.replacement.clone()
    }

    /// 校验并更换替换序列。
    ///
    /// # 契约说明（What）
    /// - 替换序列非空、长度不超过最大比例，且通过合法性校验；
    /// - 成功后保存副本并触发 [`Transform::replacement_changed`]；失败时保持原替换序列不变。
    pub fn replace_with(&mut self, replacement: &[D::Output]) -> Result<&mut Self> {
        if replacement.is_empty() {
            return Err(TranscodeError::illegal_argument("empty replacement"));
        }
        if replacement.len() as f32 > self.maximum {
            return Err(TranscodeError::illegal_argument(format!(
                "replacement too long: {} {}s exceed max {} per {}",
                replacement.len(),
                D::OUTPUT_UNIT,
                self.maximum,
                D::INPUT_UNIT
            )));
        }
        if !self.is_legal_replacement(replacement) {
            return Err(TranscodeError::illegal_argument(format!(
                "illegal replacement for charset {}",
                self.charset.name()
            )));
        }
        self.replacement = replacement.to_vec();
        self.transform.replacement_changed(&self.replacement);
        Ok(self)
    }

    /// 判定替换序列是否合法：优先采用原语的快速路径，其次使用构造时确定的校验函数。
    pub fn is_legal_replacement(&self, replacement: &[D::Output]) -> bool {
        if let Some(verdict) = self.transform.is_legal_replacement(replacement) {
            return verdict;
        }
        self.replacement_check
            .as_ref()
            .is_none_or(|check| check(replacement))
    }

    /// 原语在每次操作开头写出的固定前缀。
    pub fn operation_prefix(&self) -> &[D::Output] {
        self.transform.operation_prefix()
    }

    /// 畸形输入的当前处置策略。
    pub fn malformed_input_action(&self) -> CodingErrorAction {
        self.malformed_action
    }

    /// 更换畸形输入的处置策略。
    pub fn on_malformed_input(&mut self, action: CodingErrorAction) -> &mut Self {
        self.malformed_action = action;
        self.transform.action_changed(ErrorKind::Malformed, action);
        self
    }

    /// 不可映射字符的当前处置策略。
    pub fn unmappable_character_action(&self) -> CodingErrorAction {
        self.unmappable_action
    }

    /// 更换不可映射字符的处置策略。
    pub fn on_unmappable_character(&mut self, action: CodingErrorAction) -> &mut Self {
        self.unmappable_action = action;
        self.transform.action_changed(ErrorKind::Unmappable, action);
        self
    }

    fn action_for(&self, kind: ErrorKind) -> CodingErrorAction {
        match kind {
            ErrorKind::Malformed => self.malformed_action,
            ErrorKind::Unmappable => self.unmappable_action,
        }
    }

    /// 重置编解码器，丢弃所有内部状态。任意状态下均合法。
    pub fn reset(&mut self) -> &mut Self {
        self.transform.reset();
        self.state = CoderState::Reset;
        self
    }

    /// 在输入区域上推进一次转换，直到需要更多输入、需要更多输出空间或上报错误。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：状态为 `Reset`、`Coding`，或（`End` 且 `end_of_input`）；否则返回 `IllegalState`；
    /// - **返回**：
    ///   - 下溢：非最终调用时需要补充输入；最终调用时输入已全部处理；
    ///   - 溢出：输出空间不足，排空后以同一调用重试，输入位置停留在未处理处；
    ///   - 错误（仅 `Report` 策略）：输入位置指向出错单元起点，长度为精确错误单元数；
    /// - `end_of_input` 为真时，剩余的残缺尾部数据总会被视为畸形输入，绝不会被静默丢弃。
    ///
    /// # 执行逻辑（How）
    /// 1. 调用原语；溢出直接返回；
    /// 2. 下溢且为最终调用、仍有剩余输入 → 改写为剩余长度的畸形错误，否则返回下溢；
    /// 3. 错误结果按策略处理：`Report` 返回；`Replace` 写入替换序列（放不下则返回溢出且不推进输入）
    ///    后跳过错误单元；`Ignore` 直接跳过；随后继续循环。
    pub fn step(
        &mut self,
        src: &mut InputBuffer<'_, D::Input>,
        dst: &mut OutputBuffer<'_, D::Output>,
        end_of_input: bool,
    ) -> Result<CoderResult> {
        if !self.state.accepts_step(end_of_input) {
            return Err(self.illegal_state(D::NAME));
        }
        self.state = if end_of_input {
            CoderState::End
        } else {
            CoderState::Coding
        };

        loop {
            let mut result = self.transform.step(src, dst);

            if result.is_overflow() {
                return Ok(result);
            }

            if result.is_underflow() {
                match NonZeroUsize::new(src.remaining()) {
                    Some(trailing) if end_of_input => result = CoderResult::malformed(trailing),
                    _ => return Ok(result),
                }
            }

            let (Some(kind), Some(length)) = (result.error_kind(), result.error_length()) else {
                return Ok(result);
            };
            if length.get() > src.remaining() {
                return Err(TranscodeError::illegal_argument(format!(
                    "{} reported {} of length {} with only {} {}s remaining",
                    self.charset.name(),
                    kind,
                    length,
                    src.remaining(),
                    D::INPUT_UNIT
                )));
            }

            match self.action_for(kind) {
                CodingErrorAction::Report => return Ok(result),
                CodingErrorAction::Replace => {
                    if !dst.put_slice(&self.replacement) {
                        return Ok(CoderResult::OVERFLOW);
                    }
                }
                CodingErrorAction::Ignore => {}
            }
            src.advance(length.get())?;
            tracing::trace!(
                charset = self.charset.name(),
                direction = D::NAME,
                %kind,
                length = length.get(),
                action = self.action_for(kind).as_str(),
                "recovered from coding error"
            );
        }
    }

    /// 输出尾部状态，结束本次操作。
    ///
    /// # 契约说明（What）
    /// - 状态为 `End`：调用原语的 `flush` 钩子；下溢时迁移到 `Flushed`，溢出时保持 `End` 以便补充空间后重试；
    /// - 状态为 `Flushed`：空操作，返回下溢；
    /// - 其余状态返回 `IllegalState`。
    pub fn flush(&mut self, dst: &mut OutputBuffer<'_, D::Output>) -> Result<CoderResult> {
        match self.state {
            CoderState::End => {
                let result = self.transform.flush(dst);
                if result.is_underflow() {
                    self.state = CoderState::Flushed;
                }
                Ok(result)
            }
            CoderState::Flushed => Ok(CoderResult::UNDERFLOW),
            _ => Err(self.illegal_state("flush")),
        }
    }

    fn illegal_state(&self, operation: &'static str) -> TranscodeError {
        tracing::warn!(
            charset = self.charset.name(),
            operation,
            state = %self.state,
            "coder call sequence violated"
        );
        TranscodeError::IllegalState {
            operation,
            state: self.state,
        }
    }
}

impl<D: Direction> fmt::Debug for Coder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coder")
            .field("direction", &D::NAME)
            .field("charset", &self.charset.name())
            .field("average", &self.average)
            .field("maximum", &self.maximum)
            .field("replacement", &self.replacement)
            .field("malformed_action", &self.malformed_action)
            .field("unmappable_action", &self.unmappable_action)
            .field("state", &self.state)
            .finish()
    }
}
