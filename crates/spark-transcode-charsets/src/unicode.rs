//! 编码方向共享的 UTF-16 码元判定。
//!
//! 编码器读取的是 UTF-16 码元：高代理项必须与紧随的低代理项组成补充平面字符，
//! 输入末尾的高代理项需要等待后续输入，孤立代理项属于畸形输入。

use core::num::NonZeroUsize;
use spark_transcode::InputBuffer;

/// 长度 1。
pub(crate) const ONE: NonZeroUsize = NonZeroUsize::MIN;
/// 长度 2。
pub(crate) const TWO: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(two) => two,
    None => unreachable!(),
};

/// 是否为高代理项。
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// 是否为低代理项。
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// 由代理对计算补充平面码点。
pub fn to_supplementary(high: u16, low: u16) -> u32 {
    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
}

/// 把补充平面码点拆分为代理对。
pub fn to_surrogates(code_point: u32) -> [u16; 2] {
    let offset = code_point - 0x10000;
    [
        0xD800 | (offset >> 10) as u16,
        0xDC00 | (offset & 0x3FF) as u16,
    ]
}

/// 输入头部的一个文本标量。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scalar {
    /// 基本多文种平面内的码元。
    Bmp(u16),
    /// 由两个码元组成的补充平面码点。
    Supplementary(u32),
    /// 高代理项位于当前可用输入末尾，需要更多输入。
    Incomplete,
    /// 孤立代理项，长度 1。
    Malformed,
}

impl Scalar {
    /// 本标量占用的输入码元数。
    pub fn width(self) -> usize {
        match self {
            Self::Supplementary(_) => 2,
            _ => 1,
        }
    }
}

/// 查看输入头部的标量，不推进位置；输入耗尽时返回 `None`。
pub fn peek_scalar(src: &InputBuffer<'_, u16>) -> Option<Scalar> {
    let unit = src.peek()?;
    let scalar = if is_high_surrogate(unit) {
        match src.peek_at(1) {
            None => Scalar::Incomplete,
            Some(low) if is_low_surrogate(low) => {
                Scalar::Supplementary(to_supplementary(unit, low))
            }
            Some(_) => Scalar::Malformed,
        }
    } else if is_low_surrogate(unit) {
        Scalar::Malformed
    } else {
        Scalar::Bmp(unit)
    };
    Some(scalar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogate_pairs_round_trip() {
        let [high, low] = to_surrogates(0x1F600);
        assert_eq!([high, low], [0xD83D, 0xDE00]);
        assert_eq!(to_supplementary(high, low), 0x1F600);
    }

    #[test]
    fn scalar_classification() {
        let input = [0x41, 0xD83D, 0xDE00, 0xDC00, 0xD800];
        let mut src = InputBuffer::new(&input);
        assert_eq!(peek_scalar(&src), Some(Scalar::Bmp(0x41)));
        src.get();
        assert_eq!(peek_scalar(&src), Some(Scalar::Supplementary(0x1F600)));
        assert!(src.advance(2).is_ok());
        assert_eq!(peek_scalar(&src), Some(Scalar::Malformed));
        src.get();
        assert_eq!(peek_scalar(&src), Some(Scalar::Incomplete));
        src.get();
        assert_eq!(peek_scalar(&src), None);
    }
}
