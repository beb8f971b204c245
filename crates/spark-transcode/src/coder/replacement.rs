//! 替换序列的合法性校验。
//!
//! # 教案意图（Why）
//! - 编码方向的替换序列是字节，必须能被同一字符集干净地解码回文本，否则“替换”本身就会制造新的畸形输出；
//! - 通用做法是借助一次性解码器往返校验；字符集可通过 [`Transform::is_legal_replacement`]
//!   提供快速路径，也可在构造时注入自定义校验函数。
//!
//! # 契约说明（What）
//! - [`ReplacementCheck`] 返回 `true` 表示合法；
//! - [`decoder_round_trip`] 使用解码器工厂回调创建一次性解码器，两类错误均设为 `Report`，
//!   任何错误结果或构造失败均判为不合法。
//!
//! [`Transform::is_legal_replacement`]: super::Transform::is_legal_replacement

use super::action::CodingErrorAction;
use super::Decoder;
use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::Result;
use alloc::{sync::Arc, vec};

/// 替换序列合法性校验函数。
pub type ReplacementCheck<U> = Arc<dyn Fn(&[U]) -> bool + Send + Sync>;

/// 产生全新、独立解码器的工厂回调。
pub type DecoderFactory = Arc<dyn Fn() -> Result<Decoder> + Send + Sync>;

/// 以解码往返判定字节替换序列是否合法。
pub fn decoder_round_trip(factory: DecoderFactory) -> ReplacementCheck<u8> {
    Arc::new(move |replacement: &[u8]| {
        let mut decoder = match factory() {
            Ok(decoder) => decoder,
            Err(err) => {
                tracing::debug!(error = %err, "replacement check could not obtain a decoder");
                return false;
            }
        };
        decoder
            .on_malformed_input(CodingErrorAction::Report)
            .on_unmappable_character(CodingErrorAction::Report);
        // 容量按最大比例截断后加一，足以覆盖向上取整；溢出不视为错误。
        let capacity = (replacement.len() as f32 * decoder.max_units_per_input()) as usize + 1;
        let mut storage = vec![0u16; capacity];
        let mut src = InputBuffer::new(replacement);
        let mut dst = OutputBuffer::new(&mut storage);
        match decoder.step(&mut src, &mut dst, true) {
            Ok(result) => !result.is_error(),
            Err(_) => false,
        }
    })
}
