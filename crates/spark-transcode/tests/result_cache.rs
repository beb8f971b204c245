//! 错误结果驻留缓存的契约测试。
//!
//! - **核心目标 (Why)**：缓存是 crate 中唯一的全局可变状态，必须在并发首次使用时串行化填充，
//!   且淘汰条目后除实例身份外不改变任何可观察行为。
//! - **手法 (How)**：多线程同时请求同一组长度，比较相等性与实例身份；随后灌入远超软上限的不同长度，
//!   验证被调用方持有的条目不会被淘汰、缓存规模受控。
//! - **注意 (Gotchas)**：同一测试二进制内的用例并行运行、共享缓存，因此规模断言只给出宽松上界。

use std::sync::{Arc, Barrier};
use std::thread;

use spark_transcode::{CACHE_SOFT_LIMIT, CoderResult, ErrorKind, ResultKind, cache_len, codes};

#[test]
fn equal_lengths_compare_equal() {
    let a = CoderResult::malformed_for_length(3).expect("长度为正");
    let b = CoderResult::malformed_for_length(3).expect("长度为正");
    assert_eq!(a, b);
    assert!(CoderResult::same_instance(&a, &b));
    assert_eq!(a.kind(), ResultKind::Malformed);
    assert_eq!(a.length(), Ok(3));

    let other_kind = CoderResult::unmappable_for_length(3).expect("长度为正");
    assert_ne!(a, other_kind);
    assert!(!CoderResult::same_instance(&a, &other_kind));
}

#[test]
fn non_positive_length_is_an_argument_fault() {
    let err = CoderResult::malformed_for_length(0).expect_err("零长度非法");
    assert_eq!(err.code(), codes::ILLEGAL_ARGUMENT);
    let err = CoderResult::unmappable_for_length(0).expect_err("零长度非法");
    assert_eq!(err.code(), codes::ILLEGAL_ARGUMENT);
}

#[test]
fn control_signals_are_singletons() {
    assert!(CoderResult::same_instance(&CoderResult::UNDERFLOW, &CoderResult::UNDERFLOW));
    assert!(!CoderResult::same_instance(&CoderResult::UNDERFLOW, &CoderResult::OVERFLOW));
    assert_eq!(CoderResult::OVERFLOW.kind(), ResultKind::Overflow);
    assert_eq!(
        CoderResult::UNDERFLOW.length().expect_err("下溢没有长度").code(),
        codes::UNSUPPORTED_OPERATION
    );
    assert_eq!(CoderResult::OVERFLOW.raise().code(), codes::BUFFER_OVERFLOW);
}

#[test]
fn concurrent_first_use_yields_one_instance_per_key() {
    const THREADS: usize = 8;
    const LENGTHS: std::ops::Range<usize> = 1000..1032;

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|index| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let kind = if index % 2 == 0 {
                    ErrorKind::Malformed
                } else {
                    ErrorKind::Unmappable
                };
                LENGTHS
                    .map(|length| {
                        let length = std::num::NonZeroUsize::new(length).expect("长度为正");
                        CoderResult::error(kind, length)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let batches: Vec<Vec<CoderResult>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("线程正常结束"))
        .collect();

    for (index, batch) in batches.iter().enumerate() {
        let peer = &batches[index % 2];
        for (mine, theirs) in batch.iter().zip(peer) {
            assert_eq!(mine, theirs);
            assert!(
                CoderResult::same_instance(mine, theirs),
                "并发首次使用同一键必须得到同一实例: {mine}"
            );
        }
    }
}

#[test]
fn eviction_keeps_held_entries_and_bounds_size() {
    let held = CoderResult::unmappable_for_length(50_000).expect("长度为正");

    for length in 60_000..60_000 + 4 * CACHE_SOFT_LIMIT {
        let transient = CoderResult::malformed_for_length(length).expect("长度为正");
        assert_eq!(transient.length(), Ok(length));
    }

    assert!(
        cache_len() < 2 * CACHE_SOFT_LIMIT,
        "未被持有的条目应被淘汰，当前 {} 条",
        cache_len()
    );
    let again = CoderResult::unmappable_for_length(50_000).expect("长度为正");
    assert!(CoderResult::same_instance(&held, &again), "被持有的条目不得被淘汰");

    // 被淘汰后重新创建的结果与原结果相等。
    let recreated = CoderResult::malformed_for_length(60_000).expect("长度为正");
    assert_eq!(recreated.length(), Ok(60_000));
    assert!(recreated.is_malformed());
}
