//! 常用类型的一站式导入。
//!
//! 字符集实现与调用方通常同时需要缓冲、驱动、结果与错误类型；`use spark_transcode::prelude::*;`
//! 即可获得这些稳定入口，而不必逐一记忆模块路径。

pub use crate::buffer::{InputBuffer, OutputBuffer};
pub use crate::charset::{Charset, CharsetRef};
pub use crate::coder::{
    CoderResult, CoderState, CodingErrorAction, Decoder, Encoder, ErrorKind, Transform,
};
pub use crate::config::CoderConfig;
pub use crate::direction::{Decode, Direction, Encode};
pub use crate::error::{Result, TranscodeError};
