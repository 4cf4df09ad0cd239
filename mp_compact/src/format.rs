//! Tag bytes of the wire format.
//!
//! Every encoded value starts with one of these bytes. Four ranges carry a
//! small value or length inline in their low bits; everything else is an
//! exact tag followed by a fixed-width field and, for variable-length
//! categories, the payload.

// Integers
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
/// Low 7 bits hold the value.
pub const FIXNUM: u8 = 0x00;
/// Low 5 bits hold the value, two's-complement.
pub const NEGATIVE_FIXNUM: u8 = 0xe0;

pub const NIL: u8 = 0xc0;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const FLOAT: u8 = 0xca;
pub const DOUBLE: u8 = 0xcb;

// Strings
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
/// Low 5 bits hold the byte length.
pub const FIXSTR: u8 = 0xa0;

// Binary
pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;

// Containers
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
/// Low 4 bits hold the element count.
pub const FIXARRAY: u8 = 0x90;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;
/// Low 4 bits hold the pair count.
pub const FIXMAP: u8 = 0x80;

pub const MAX_4BIT: u64 = 0xf;
pub const MAX_5BIT: u64 = 0x1f;
pub const MAX_7BIT: u64 = 0x7f;
pub const MAX_8BIT: u64 = 0xff;
pub const MAX_16BIT: u64 = 0xffff;
pub const MAX_32BIT: u64 = 0xffff_ffff;

/// Smallest value a negative fixnum can carry.
pub const MIN_NEGATIVE_FIXNUM: i64 = -32;

pub const TYPE_1BIT: u8 = 0x80;
pub const TYPE_3BIT: u8 = 0xe0;
pub const TYPE_4BIT: u8 = 0xf0;
pub const VALUE_4BIT: u8 = 0x0f;
pub const VALUE_5BIT: u8 = 0x1f;
pub const VALUE_7BIT: u8 = 0x7f;

/// Category of an encoded value, as identified by its tag byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    /// Non-negative integer, inline or explicit unsigned width.
    UInt,
    /// Negative fixnum or explicit signed width.
    Int,
    Float,
    Double,
    Str,
    Bin,
    Array,
    Map,
    /// Reserved bytes and extension types this codec does not speak.
    Unsupported,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Bool => "bool",
            Kind::UInt => "unsigned integer",
            Kind::Int => "signed integer",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Str => "string",
            Kind::Bin => "binary",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Unsupported => "unsupported",
        }
    }

    /// True for both integer kinds.
    pub fn is_integer(self) -> bool {
        matches!(self, Kind::UInt | Kind::Int)
    }
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a tag byte.
///
/// Inline ranges are tested by mask first (1-bit, then the 3-bit patterns,
/// then the 4-bit patterns), exact tags after that. The ranges are
/// disjoint, so the order only matters for speed.
pub fn classify(tag: u8) -> Kind {
    if tag & TYPE_1BIT == FIXNUM {
        return Kind::UInt;
    }
    if tag & TYPE_3BIT == NEGATIVE_FIXNUM {
        return Kind::Int;
    }
    if tag & TYPE_3BIT == FIXSTR {
        return Kind::Str;
    }
    if tag & TYPE_4BIT == FIXARRAY {
        return Kind::Array;
    }
    if tag & TYPE_4BIT == FIXMAP {
        return Kind::Map;
    }

    match tag {
        NIL => Kind::Nil,
        FALSE | TRUE => Kind::Bool,
        UINT8 | UINT16 | UINT32 | UINT64 => Kind::UInt,
        INT8 | INT16 | INT32 | INT64 => Kind::Int,
        FLOAT => Kind::Float,
        DOUBLE => Kind::Double,
        STR8 | STR16 | STR32 => Kind::Str,
        BIN8 | BIN16 | BIN32 => Kind::Bin,
        ARRAY16 | ARRAY32 => Kind::Array,
        MAP16 | MAP32 => Kind::Map,
        _ => Kind::Unsupported,
    }
}
