//! 按方向细化的便捷入口。

use super::action::CodingErrorAction;
use super::result::CoderResult;
use super::{CoderState, Decoder, Encoder};
use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::{Result, TranscodeError};
use alloc::{string::String, vec::Vec};

impl Decoder {
    /// `step` 的解码方向别名。
    pub fn decode(
        &mut self,
        src: &mut InputBuffer<'_, u8>,
        dst: &mut OutputBuffer<'_, u16>,
        end_of_input: bool,
    ) -> Result<CoderResult> {
        self.step(src, dst, end_of_input)
    }

    /// 一次性解码为 UTF-16 码元。
    pub fn decode_all(&mut self, bytes: &[u8]) -> Result<Vec<u16>> {
        self.convert(bytes)
    }

    /// 一次性解码为 `String`。
    ///
    /// 原语若产出孤立代理项，返回 `InvalidUtf16`，位置为该码元在解码结果中的下标。
    pub fn decode_to_string(&mut self, bytes: &[u8]) -> Result<String> {
        let units = self.convert(bytes)?;
        let mut text = String::with_capacity(units.len());
        let mut position = 0;
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(ch) => {
                    text.push(ch);
                    position += ch.len_utf16();
                }
                Err(_) => return Err(TranscodeError::InvalidUtf16 { position }),
            }
        }
        Ok(text)
    }
}

impl Encoder {
    /// `step` 的编码方向别名。
    pub fn encode(
        &mut self,
        src: &mut InputBuffer<'_, u16>,
        dst: &mut OutputBuffer<'_, u8>,
        end_of_input: bool,
    ) -> Result<CoderResult> {
        self.step(src, dst, end_of_input)
    }

    /// 一次性编码 UTF-16 码元。
    pub fn encode_all(&mut self, text: &[u16]) -> Result<Vec<u8>> {
        self.convert(text)
    }

    /// 一次性编码 `&str`。
    pub fn encode_str(&mut self, text: &str) -> Result<Vec<u8>> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.convert(&units)
    }

    /// 探测文本能否被无错误地编码。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：状态为 `Reset` 或 `Flushed`（后者会先重置），否则返回 `IllegalState`；
    /// - 探测期间两类策略临时设为 `Report`，结束后恢复原策略并重置；
    /// - 畸形或不可映射均返回 `Ok(false)`，其余错误原样传播。
    pub fn can_encode(&mut self, text: &[u16]) -> Result<bool> {
        match self.state() {
            CoderState::Reset => {}
            CoderState::Flushed => {
                self.reset();
            }
            _ => return Err(self.illegal_state("can_encode")),
        }

        let malformed = self.malformed_input_action();
        let unmappable = self.unmappable_character_action();
        self.on_malformed_input(CodingErrorAction::Report)
            .on_unmappable_character(CodingErrorAction::Report);
        let outcome = self.convert(text);
        self.on_malformed_input(malformed)
            .on_unmappable_character(unmappable)
            .reset();

        match outcome {
            Ok(_) => Ok(true),
            Err(err) if err.input_length().is_some() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// 探测单个 UTF-16 码元；孤立代理项总是返回 `false`。
    pub fn can_encode_char(&mut self, unit: u16) -> Result<bool> {
        self.can_encode(&[unit])
    }
}
