use super::action::{CodingErrorAction, ErrorKind};
use super::result::CoderResult;
use crate::buffer::{InputBuffer, OutputBuffer};
use crate::direction::Direction;

/// `Transform` 是单个字符集在某一方向上的转换原语，由外部字符集实现注入通用驱动。
///
/// # 设计背景（Why）
/// - 驱动只关心“结果如何解释、策略如何施加”，具体字节与码元的映射规则完全交给原语；
///   以 Trait 对象组合而非继承，使同一驱动可服务任意字符集。
/// - 钩子（`reset`/`flush`/变更通知）默认为空操作，无状态字符集只需实现 [`step`](Self::step)。
///
/// # 契约说明（What）
/// - `step` 只写入输出区域能够容纳的单元，只推进实际消费过的输入；
/// - 遇到普通数据错误时返回畸形/不可映射结果，输入位置停留在出错单元起点，**不得**返回 `Err` 或 panic；
/// - 返回下溢表示剩余输入不足以构成一个完整单元（或已耗尽），剩余部分留给下一次调用；
/// - `flush` 用于输出尾部移位状态，空间不足时返回溢出，调用方补充空间后会再次调用。
///
/// # 风险提示（Trade-offs）
/// - 原语返回的错误长度若超过剩余输入，驱动会以 `IllegalArgument` 拒绝并停止循环，视为原语缺陷。
pub trait Transform<D: Direction>: Send {
    /// 在剩余输入/输出区域上执行一次转换。
    fn step(
        &mut self,
        src: &mut InputBuffer<'_, D::Input>,
        dst: &mut OutputBuffer<'_, D::Output>,
    ) -> CoderResult;

    /// 清空字符集私有状态。
    fn reset(&mut self) {}

    /// 输出尾部状态；默认不写入任何内容并返回下溢。
    fn flush(&mut self, _dst: &mut OutputBuffer<'_, D::Output>) -> CoderResult {
        CoderResult::UNDERFLOW
    }

    /// 替换序列已变更。
    fn replacement_changed(&mut self, _replacement: &[D::Output]) {}

    /// 某类错误的处置策略已变更。
    fn action_changed(&mut self, _kind: ErrorKind, _action: CodingErrorAction) {}

    /// 替换序列合法性的快速判定；返回 `None` 时由驱动执行通用校验。
    fn is_legal_replacement(&self, _replacement: &[D::Output]) -> Option<bool> {
        None
    }

    /// 每次操作开头固定写出的前缀（如字节序标记）；默认为空。
    ///
    /// 由替换文本推导替换序列时，驱动据此剥离前缀，避免把它带进每一次替换。
    fn operation_prefix(&self) -> &[D::Output] {
        &[]
    }
}
