use core::fmt;
use serde::{Deserialize, Serialize};

/// 数据错误的恢复策略。
///
/// # 设计背景（Why）
/// - 畸形输入与不可映射字符各自拥有独立策略；策略本身只是标签，全部行为集中在驱动循环中，
///   避免策略对象与驱动之间出现双向耦合。
///
/// # 契约说明（What）
/// - `Ignore`：跳过出错单元，不产生输出；
/// - `Replace`：写入替换序列并跳过出错单元，输出空间不足时退化为可重试的溢出；
/// - `Report`：原样返回错误结果，输入位置停留在出错单元处。
///
/// # 风险提示（Trade-offs）
/// - 序列化形式为全大写（`"REPLACE"`），与配置文件约定一致。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodingErrorAction {
    Ignore,
    Replace,
    Report,
}

impl CodingErrorAction {
    /// 稳定名称，用于日志与配置回显。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::Replace => "REPLACE",
            Self::Report => "REPORT",
        }
    }
}

impl fmt::Display for CodingErrorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 两类数据错误。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// 输入不是合法结构。
    Malformed,
    /// 输入合法但无法映射。
    Unmappable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Malformed => "MALFORMED",
            Self::Unmappable => "UNMAPPABLE",
        })
    }
}
