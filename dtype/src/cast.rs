use super::*;

/// Truncate `raw` to `bit_width` bits and re-extend it according to `signed`.
#[inline]
const fn wrap_bits(raw: i64, bit_width: u32, signed: bool) -> i64 {
    if bit_width == 0 {
        return 0;
    }
    if bit_width >= 64 {
        return raw;
    }

    let mask = (1u64 << bit_width) - 1;
    let low = (raw as u64) & mask;
    if signed && (low >> (bit_width - 1)) & 1 == 1 { (low | !mask) as i64 } else { low as i64 }
}

impl DType {
    /// Normalize an arbitrary integer into this type's value range.
    ///
    /// Integers wrap modulo `2^bit_width` and are read back with this type's
    /// signedness, so the result is always in `[min_value, max_value]`.
    ///
    /// ```rust
    /// # use veil_dtype::DType;
    /// assert_eq!(DType::int(3).wrap(5), -3);
    /// assert_eq!(DType::uint(3).wrap(-1), 7);
    /// assert_eq!(DType::Index.wrap(-1), -1);
    /// ```
    pub const fn wrap(&self, raw: i64) -> i64 {
        match *self {
            Self::Int { bit_width, signed } => wrap_bits(raw, bit_width, signed),
            Self::Index => raw,
            Self::Void => 0,
        }
    }

    /// Check if casting from `from` to `to` preserves every value of `from`.
    pub const fn can_safe_cast(from: Self, to: Self) -> bool {
        match (from, to) {
            (Self::Int { bit_width: fw, signed: fs }, Self::Int { bit_width: tw, signed: ts }) => match (fs, ts) {
                (false, false) | (true, true) => fw <= tw,
                (false, true) => fw < tw,
                (true, false) => false,
            },
            (Self::Int { bit_width, signed }, Self::Index) => bit_width < 64 || signed,
            (Self::Index, Self::Index) | (Self::Void, Self::Void) => true,
            (Self::Index, Self::Int { bit_width, signed }) => bit_width >= 64 && signed,
            _ => false,
        }
    }

    /// Reinterpret the low `from.bit_width()` bits of `value` as signed and
    /// widen into `self`.
    pub const fn sign_extend(&self, value: i64, from: Self) -> i64 {
        self.wrap(wrap_bits(value, from.bit_width(), true))
    }

    /// Reinterpret the low `from.bit_width()` bits of `value` as unsigned and
    /// widen into `self`.
    pub const fn zero_extend(&self, value: i64, from: Self) -> i64 {
        self.wrap(wrap_bits(value, from.bit_width(), false))
    }

    /// Convert a value of type `from` into `self`, extending according to the
    /// signedness of `from`.
    pub const fn cast_from(&self, value: i64, from: Self) -> i64 {
        if from.is_signed() { self.sign_extend(value, from) } else { self.zero_extend(value, from) }
    }
}
