//! Element types for the veil IR.
//!
//! Values in the IR carry integers of arbitrary width (up to 64 bits) with an
//! explicit signedness, the 64-bit [`DType::Index`] addressing type consumed by
//! extraction operations, and [`DType::Void`] for operations that only have
//! side effects.

pub mod cast;


/// Bit width of [`DType::Index`].
pub const INDEX_BIT_WIDTH: u32 = 64;

/// Widest integer the type system admits.
pub const MAX_BIT_WIDTH: u32 = 64;

/// Element data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr)]
pub enum DType {
    /// Integer of `bit_width` bits. Booleans are `Int { bit_width: 1, signed: false }`.
    Int { bit_width: u32, signed: bool },

    /// Addressing type for element and slice extraction.
    Index,

    /// Void type for side-effect-only operations (no data).
    Void,
}

impl DType {
    // =========================================================================
    // Type Constructors
    // =========================================================================

    /// Signed integer of the given width.
    pub const fn int(bit_width: u32) -> Self {
        Self::Int { bit_width, signed: true }
    }

    /// Unsigned integer of the given width.
    pub const fn uint(bit_width: u32) -> Self {
        Self::Int { bit_width, signed: false }
    }

    pub const fn bool_() -> Self {
        Self::Int { bit_width: 1, signed: false }
    }

    /// Smallest integer type that can hold `value`.
    ///
    /// Non-negative values get an unsigned type, negative values a signed one.
    /// The result is never narrower than one bit.
    ///
    /// ```rust
    /// # use veil_dtype::DType;
    /// assert_eq!(DType::that_can_represent(3), DType::uint(2));
    /// assert_eq!(DType::that_can_represent(0), DType::uint(1));
    /// assert_eq!(DType::that_can_represent(-3), DType::int(3));
    /// ```
    pub const fn that_can_represent(value: i64) -> Self {
        if value >= 0 {
            let bits = u64::BITS - (value as u64).leading_zeros();
            Self::uint(if bits == 0 { 1 } else { bits })
        } else {
            Self::int(i64::BITS - (!value).leading_zeros() + 1)
        }
    }

    // =========================================================================
    // Type Properties
    // =========================================================================

    pub const fn bit_width(&self) -> u32 {
        match self {
            Self::Int { bit_width, .. } => *bit_width,
            Self::Index => INDEX_BIT_WIDTH,
            Self::Void => 0,
        }
    }

    /// Index is a signed type.
    pub const fn is_signed(&self) -> bool {
        match self {
            Self::Int { signed, .. } => *signed,
            Self::Index => true,
            Self::Void => false,
        }
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::Int { signed: false, .. })
    }

    /// Plain integers only, not the index type.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int { .. })
    }

    /// Integer or index.
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int { .. } | Self::Index)
    }

    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index)
    }

    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Smallest value representable by this type.
    pub const fn min_value(&self) -> i64 {
        match *self {
            Self::Int { bit_width, signed: true } if bit_width < 64 => -(1i64 << (bit_width - 1)),
            Self::Int { signed: true, .. } | Self::Index => i64::MIN,
            Self::Int { signed: false, .. } | Self::Void => 0,
        }
    }

    /// Largest value representable by this type.
    ///
    /// Unsigned 64-bit integers are capped at `i64::MAX` since values are stored as `i64`.
    pub const fn max_value(&self) -> i64 {
        match *self {
            Self::Int { bit_width, signed: true } if bit_width < 64 => (1i64 << (bit_width - 1)) - 1,
            Self::Int { bit_width, signed: false } if bit_width < 63 => (1i64 << bit_width) - 1,
            Self::Int { .. } | Self::Index => i64::MAX,
            Self::Void => 0,
        }
    }

    /// Whether `value` lies within this type's range.
    pub const fn contains(&self, value: i64) -> bool {
        self.min_value() <= value && value <= self.max_value()
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { bit_width, signed: true } => write!(f, "i{bit_width}"),
            Self::Int { bit_width, signed: false } => write!(f, "u{bit_width}"),
            Self::Index => f.write_str("index"),
            Self::Void => f.write_str("void"),
        }
    }
}

// Convenient aliases for the common fixed-width integers
#[allow(non_upper_case_globals)]
impl DType {
    pub const Bool: Self = Self::bool_();
    pub const Int8: Self = Self::int(8);
    pub const Int16: Self = Self::int(16);
    pub const Int32: Self = Self::int(32);
    pub const Int64: Self = Self::int(64);
    pub const UInt8: Self = Self::uint(8);
    pub const UInt16: Self = Self::uint(16);
    pub const UInt32: Self = Self::uint(32);
    pub const UInt64: Self = Self::uint(64);
}
