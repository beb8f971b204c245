//! 错误结果的进程级驻留缓存。
//!
//! # 教案意图（Why）
//! - 相同 `(类别, 长度)` 的错误结果在所有编解码器之间共享同一实例，热路径上重复上报同一长度的
//!   错误时无需再次分配。
//! - 这是本 crate 唯一的全局可变状态；首次并发使用时必须串行化填充，因此由 `spin::Mutex` 保护，
//!   在 `no_std` 环境同样可用。
//!
//! # 契约说明（What）
//! - 缓存是纯记忆化：条目可被淘汰后重新创建，除实例身份外不改变任何可观察行为；
//! - 条目数超过 [`CACHE_SOFT_LIMIT`] 时，插入前淘汰仅被缓存自身持有的条目。
//!
//! # 风险提示（Trade-offs）
//! - 若调用方长期持有大量不同长度的结果，缓存可短暂超过软上限；这是为保证实例不被复制而接受的代价。

use super::action::ErrorKind;
use alloc::{collections::BTreeMap, sync::Arc};
use core::num::NonZeroUsize;
use spin::Mutex;

/// 缓存条目软上限。
pub const CACHE_SOFT_LIMIT: usize = 256;

/// 被驻留的错误结果载荷。
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct ErrorResult {
    pub(crate) kind: ErrorKind,
    pub(crate) length: NonZeroUsize,
}

type Key = (ErrorKind, NonZeroUsize);

static CACHE: Mutex<BTreeMap<Key, Arc<ErrorResult>>> = Mutex::new(BTreeMap::new());

/// 取得 `(kind, length)` 对应的共享实例，缺失时在锁内创建。
pub(crate) fn intern(kind: ErrorKind, length: NonZeroUsize) -> Arc<ErrorResult> {
    let mut entries = CACHE.lock();
    if let Some(existing) = entries.get(&(kind, length)) {
        return Arc::clone(existing);
    }
    if entries.len() >= CACHE_SOFT_LIMIT {
        let before = entries.len();
        entries.retain(|_, entry| Arc::strong_count(entry) > 1);
        tracing::debug!(
            evicted = before - entries.len(),
            retained = entries.len(),
            "coder result cache trimmed"
        );
    }
    let created = Arc::new(ErrorResult { kind, length });
    entries.insert((kind, length), Arc::clone(&created));
    created
}

/// 当前缓存条目数量，便于观测与测试。
pub fn cache_len() -> usize {
    CACHE.lock().len()
}
