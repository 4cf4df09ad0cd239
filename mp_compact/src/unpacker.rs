//! Decoder side of the codec.
//!
//! The unpacker borrows its input and never reads past the end of it: every
//! tag, length field and payload is bounds-checked before it is consumed.

use crate::format::{self, Kind};
use crate::unpack::Unpack;
use crate::wire::Wire;
use crate::{MpError, Result};

/// An integer as it appeared on the wire, before narrowing to a target type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Integer {
    Unsigned(u64),
    Signed(i64),
}

/// Decodes values from a borrowed byte slice.
///
/// # Examples
///
/// ```
/// use mp_compact::{MpError, Unpacker};
///
/// let bytes = [0xce, 0xff, 0xff, 0xff, 0xff];
///
/// let mut small = 0u8;
/// let err = Unpacker::new(&bytes).unpack(&mut small).unwrap_err();
/// assert!(matches!(err, MpError::Overflow { .. }));
///
/// let wide: u64 = Unpacker::new(&bytes).read().unwrap();
/// assert_eq!(wide, 4_294_967_295);
/// ```
#[derive(Debug, Clone)]
pub struct Unpacker<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Unpacker<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Unpacker { buf, pos: 0 }
    }

    /// Start over on a new slice. Required after any decode error.
    pub fn reset(&mut self, buf: &'a [u8]) {
        self.buf = buf;
        self.pos = 0;
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unconsumed tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Mark the whole input as consumed.
    pub fn consume_all(&mut self) {
        self.pos = self.buf.len();
    }

    /// Decode one value into `target`.
    pub fn unpack<T: Unpack + ?Sized>(&mut self, target: &mut T) -> Result<&mut Self> {
        target.unpack(self)?;
        Ok(self)
    }

    /// Decode one value into a fresh `T`.
    pub fn read<T: Unpack + Default>(&mut self) -> Result<T> {
        let mut value = T::default();
        value.unpack(self)?;
        Ok(value)
    }

    //  Cursor

    /// Consume exactly `n` bytes.
    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure_available(n)?;
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Fail early when fewer than `n` bytes remain.
    pub(crate) fn ensure_available(&self, n: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(MpError::BufferExhausted {
                needed: n,
                remaining,
            });
        }
        Ok(())
    }

    fn take_wire<W: Wire>(&mut self) -> Result<W> {
        self.take(W::SIZE).map(W::get)
    }

    fn read_tag(&mut self) -> Result<u8> {
        self.take(1).map(|b| b[0])
    }

    /// The next tag byte, without consuming it.
    pub fn peek_tag(&self) -> Result<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(MpError::BufferExhausted {
                needed: 1,
                remaining: 0,
            })
    }

    /// Category of the next value, without consuming it.
    pub fn peek_kind(&self) -> Result<Kind> {
        self.peek_tag().map(format::classify)
    }

    //  Scalars

    /// Consume a nil.
    pub fn read_nil(&mut self) -> Result<()> {
        match self.read_tag()? {
            format::NIL => Ok(()),
            tag => Err(MpError::invalid_type(tag, "nil")),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_tag()? {
            format::TRUE => Ok(true),
            format::FALSE => Ok(false),
            tag => Err(MpError::invalid_type(tag, "bool")),
        }
    }

    /// Any integer encoding, inline or explicit, at its wire signedness.
    pub fn read_integer(&mut self) -> Result<Integer> {
        let tag = self.read_tag()?;

        if tag & format::TYPE_1BIT == format::FIXNUM {
            return Ok(Integer::Unsigned((tag & format::VALUE_7BIT) as u64));
        }
        if tag & format::TYPE_3BIT == format::NEGATIVE_FIXNUM {
            // the tag byte is the two's-complement value
            return Ok(Integer::Signed(tag as i8 as i64));
        }

        Ok(match tag {
            format::UINT8 => Integer::Unsigned(self.take_wire::<u8>()? as u64),
            format::UINT16 => Integer::Unsigned(self.take_wire::<u16>()? as u64),
            format::UINT32 => Integer::Unsigned(self.take_wire::<u32>()? as u64),
            format::UINT64 => Integer::Unsigned(self.take_wire::<u64>()?),
            format::INT8 => Integer::Signed(self.take_wire::<i8>()? as i64),
            format::INT16 => Integer::Signed(self.take_wire::<i16>()? as i64),
            format::INT32 => Integer::Signed(self.take_wire::<i32>()? as i64),
            format::INT64 => Integer::Signed(self.take_wire::<i64>()?),
            _ => return Err(MpError::invalid_type(tag, "integer")),
        })
    }

    /// A float or double, widened to `f64`. The second value tells whether
    /// the wire carried a double.
    pub(crate) fn read_float(&mut self) -> Result<(f64, bool)> {
        match self.read_tag()? {
            format::FLOAT => Ok((self.take_wire::<f32>()? as f64, false)),
            format::DOUBLE => Ok((self.take_wire::<f64>()?, true)),
            tag => Err(MpError::invalid_type(tag, "float")),
        }
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let mut value = 0f32;
        value.unpack(self)?;
        Ok(value)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_float().map(|(v, _)| v)
    }

    //  Variable length

    /// Length of the next string; nil reads as zero.
    pub fn read_str_len(&mut self) -> Result<usize> {
        let tag = self.read_tag()?;
        if tag == format::NIL {
            return Ok(0);
        }
        if tag & format::TYPE_3BIT == format::FIXSTR {
            return Ok((tag & format::VALUE_5BIT) as usize);
        }
        match tag {
            format::STR8 => Ok(self.take_wire::<u8>()? as usize),
            format::STR16 => Ok(self.take_wire::<u16>()? as usize),
            format::STR32 => Ok(self.take_wire::<u32>()? as usize),
            _ => Err(MpError::invalid_type(tag, "string")),
        }
    }

    /// The raw bytes of the next string, borrowed from the input.
    pub fn read_str_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_str_len()?;
        self.take(len)
    }

    pub fn read_bin_len(&mut self) -> Result<usize> {
        match self.read_tag()? {
            format::BIN8 => Ok(self.take_wire::<u8>()? as usize),
            format::BIN16 => Ok(self.take_wire::<u16>()? as usize),
            format::BIN32 => Ok(self.take_wire::<u32>()? as usize),
            tag => Err(MpError::invalid_type(tag, "binary")),
        }
    }

    /// The next binary payload, borrowed from the input.
    pub fn read_bin(&mut self) -> Result<&'a [u8]> {
        let len = self.read_bin_len()?;
        self.take(len)
    }

    /// Element count of the next array.
    pub fn read_array_len(&mut self) -> Result<usize> {
        let tag = self.read_tag()?;
        if tag & format::TYPE_4BIT == format::FIXARRAY {
            return Ok((tag & format::VALUE_4BIT) as usize);
        }
        match tag {
            format::ARRAY16 => Ok(self.take_wire::<u16>()? as usize),
            format::ARRAY32 => Ok(self.take_wire::<u32>()? as usize),
            _ => Err(MpError::invalid_type(tag, "array")),
        }
    }

    /// Pair count of the next map.
    pub fn read_map_len(&mut self) -> Result<usize> {
        let tag = self.read_tag()?;
        if tag & format::TYPE_4BIT == format::FIXMAP {
            return Ok((tag & format::VALUE_4BIT) as usize);
        }
        match tag {
            format::MAP16 => Ok(self.take_wire::<u16>()? as usize),
            format::MAP32 => Ok(self.take_wire::<u32>()? as usize),
            _ => Err(MpError::invalid_type(tag, "map")),
        }
    }

    /// Decode a string into a fixed-capacity, NUL-padded buffer.
    ///
    /// Fails with [`MpError::StringOverflow`] when the string is longer than
    /// `dst`. On success every byte after the string is zeroed.
    pub fn unpack_c_str(&mut self, dst: &mut [u8]) -> Result<usize> {
        let len = self.read_str_len()?;
        if len > dst.len() {
            return Err(MpError::StringOverflow {
                len,
                capacity: dst.len(),
            });
        }
        let bytes = self.take(len)?;
        dst[..len].copy_from_slice(bytes);
        dst[len..].fill(0);
        Ok(len)
    }

    //  Skipping

    /// Consume the next value whatever its kind, containers included.
    pub fn skip_value(&mut self) -> Result<()> {
        // containers push their element count; one pending value to start
        let mut pending: u64 = 1;
        while pending > 0 {
            pending -= 1;
            let tag = self.peek_tag()?;
            match format::classify(tag) {
                Kind::Nil => self.read_nil()?,
                Kind::Bool => {
                    self.read_bool()?;
                }
                Kind::UInt | Kind::Int => {
                    self.read_integer()?;
                }
                Kind::Float | Kind::Double => {
                    self.read_float()?;
                }
                Kind::Str => {
                    self.read_str_bytes()?;
                }
                Kind::Bin => {
                    self.read_bin()?;
                }
                Kind::Array => pending += self.read_array_len()? as u64,
                Kind::Map => pending += 2 * self.read_map_len()? as u64,
                Kind::Unsupported => return Err(MpError::invalid_type(tag, "any value")),
            }
        }
        Ok(())
    }
}

/// Decode exactly one value from `bytes`.
///
/// Fails with [`MpError::TrailingBytes`] if anything is left over.
pub fn from_slice<T: Unpack + Default>(bytes: &[u8]) -> Result<T> {
    let mut unpacker = Unpacker::new(bytes);
    let value = unpacker.read()?;
    match unpacker.remaining() {
        0 => Ok(value),
        n => Err(MpError::TrailingBytes(n)),
    }
}
