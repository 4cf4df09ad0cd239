//! Encoder side of the codec.
//!
//! Every `pack_*` method chooses the smallest tag/width that represents the
//! value or length, so a `u64` holding 5 costs one byte.

use alloc::vec::Vec;

use crate::format::{self, MAX_16BIT, MAX_32BIT, MAX_4BIT, MAX_5BIT, MAX_7BIT, MAX_8BIT};
use crate::pack::Pack;
use crate::sink::Sink;
use crate::wire::Wire;
use crate::{MpError, Result};

/// Encodes values into a growable or fixed-capacity byte sink.
///
/// # Examples
///
/// ```
/// use mp_compact::Packer;
///
/// let mut packer = Packer::new();
/// packer.pack(&5u64).unwrap().pack(&-1i32).unwrap();
/// assert_eq!(packer.data(), &[0x05, 0xff]);
/// ```
///
/// With a caller-supplied buffer:
///
/// ```
/// use mp_compact::{MpError, Packer};
///
/// let mut buf = [0u8; 2];
/// let mut packer = Packer::fixed(&mut buf);
/// packer.pack(&200u8).unwrap();
/// assert!(matches!(packer.pack(&true), Err(MpError::CapacityExceeded { .. })));
/// assert_eq!(packer.data(), &[0xcc, 0xc8]);
/// ```
#[derive(Debug)]
pub struct Packer<'a> {
    sink: Sink<'a>,
}

impl Packer<'static> {
    /// Creates a packer over an internally owned, growable buffer.
    pub fn new() -> Self {
        Packer {
            sink: Sink::growable(),
        }
    }

    /// Creates a growable packer with room for `capacity` bytes before it
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Packer {
            sink: Sink::Growable(Vec::with_capacity(capacity)),
        }
    }
}

impl Default for Packer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Packer<'a> {
    /// Creates a packer writing into `buf`. Packing fails with
    /// [`MpError::CapacityExceeded`] once `buf` is full.
    pub fn fixed(buf: &'a mut [u8]) -> Self {
        Packer {
            sink: Sink::fixed(buf),
        }
    }

    /// Append the encoding of `value`.
    ///
    /// On failure the sink is rolled back to its length before the call, so
    /// a partially encoded value never stays in the output.
    pub fn pack<T: Pack + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.pack_with(|p| value.pack(p))
    }

    /// Run `encode` as one unit: if it fails, everything it wrote is
    /// discarded.
    pub fn pack_with<F>(&mut self, encode: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mark = self.sink.len();
        if let Err(e) = encode(self) {
            tracing::debug!(mark, error = %e, "pack failed, rolling back");
            self.sink.truncate(mark);
            return Err(e);
        }
        Ok(self)
    }

    /// The encoded bytes.
    pub fn data(&self) -> &[u8] {
        self.sink.as_slice()
    }

    /// Number of encoded bytes since construction or the last reset.
    pub fn size(&self) -> usize {
        self.sink.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sink.is_empty()
    }

    /// Discard everything written so far.
    pub fn reset(&mut self) {
        self.sink.clear();
    }

    /// Bytes still available in a fixed sink; `None` when growable.
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.sink.capacity().map(|cap| cap - self.sink.len())
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.sink, Sink::Fixed { .. })
    }

    /// Take the encoded bytes. A fixed sink's bytes are copied out.
    pub fn into_vec(self) -> Vec<u8> {
        match self.sink {
            Sink::Growable(vec) => vec,
            Sink::Fixed { buf, len } => buf[..len].to_vec(),
        }
    }

    pub fn sink(&self) -> &Sink<'a> {
        &self.sink
    }

    //  Raw writes

    fn write_tag(&mut self, tag: u8) -> Result<()> {
        self.sink.write(&[tag])
    }

    /// Tag and fixed-width field go out in a single write so a fixed sink
    /// never holds a tag without its field.
    fn write_tagged<W: Wire>(&mut self, tag: u8, value: W) -> Result<()> {
        let mut buf = [0u8; 9];
        buf[0] = tag;
        value.put(&mut buf[1..1 + W::SIZE]);
        self.sink.write(&buf[..1 + W::SIZE])
    }

    //  Scalars

    pub fn pack_nil(&mut self) -> Result<()> {
        self.write_tag(format::NIL)
    }

    pub fn pack_bool(&mut self, value: bool) -> Result<()> {
        self.write_tag(if value { format::TRUE } else { format::FALSE })
    }

    /// Non-negative integer in the narrowest of fixnum, uint8/16/32/64.
    pub fn pack_u64(&mut self, value: u64) -> Result<()> {
        if value <= MAX_7BIT {
            self.write_tag(value as u8 | format::FIXNUM)
        } else if value <= MAX_8BIT {
            self.write_tagged(format::UINT8, value as u8)
        } else if value <= MAX_16BIT {
            self.write_tagged(format::UINT16, value as u16)
        } else if value <= MAX_32BIT {
            self.write_tagged(format::UINT32, value as u32)
        } else {
            self.write_tagged(format::UINT64, value)
        }
    }

    /// Signed integer. Non-negative values take the unsigned path; negative
    /// ones the narrowest of negative fixnum, int8/16/32/64.
    pub fn pack_i64(&mut self, value: i64) -> Result<()> {
        if value >= 0 {
            return self.pack_u64(value as u64);
        }

        if value >= format::MIN_NEGATIVE_FIXNUM {
            // two's-complement low 5 bits under the 0xe0 prefix
            self.write_tag(value as i8 as u8 | format::NEGATIVE_FIXNUM)
        } else if value >= i8::MIN as i64 {
            self.write_tagged(format::INT8, value as i8)
        } else if value >= i16::MIN as i64 {
            self.write_tagged(format::INT16, value as i16)
        } else if value >= i32::MIN as i64 {
            self.write_tagged(format::INT32, value as i32)
        } else {
            self.write_tagged(format::INT64, value)
        }
    }

    pub fn pack_f32(&mut self, value: f32) -> Result<()> {
        self.write_tagged(format::FLOAT, value)
    }

    pub fn pack_f64(&mut self, value: f64) -> Result<()> {
        self.write_tagged(format::DOUBLE, value)
    }

    //  Variable length

    /// String payload. Zero length is written as nil. On a fixed sink the
    /// header is discarded again if the payload does not fit.
    pub fn pack_str_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let len = bytes.len();
        let wide = len as u64;
        if len == 0 {
            return self.pack_nil();
        } else if wide > MAX_32BIT {
            return Err(MpError::SizeOverflow { what: "string", len });
        }
        self.pack_with(|p| {
            if wide <= MAX_5BIT {
                p.write_tag(len as u8 | format::FIXSTR)?;
            } else if wide <= MAX_8BIT {
                p.write_tagged(format::STR8, len as u8)?;
            } else if wide <= MAX_16BIT {
                p.write_tagged(format::STR16, len as u16)?;
            } else {
                p.write_tagged(format::STR32, len as u32)?;
            }
            p.sink.write(bytes)
        })?;
        Ok(())
    }

    /// Raw binary payload, always length-prefixed, never inline. Written
    /// whole or not at all.
    pub fn pack_bin(&mut self, bytes: &[u8]) -> Result<()> {
        let len = bytes.len();
        let wide = len as u64;
        if wide > MAX_32BIT {
            return Err(MpError::SizeOverflow { what: "binary", len });
        }
        self.pack_with(|p| {
            if wide <= MAX_8BIT {
                p.write_tagged(format::BIN8, len as u8)?;
            } else if wide <= MAX_16BIT {
                p.write_tagged(format::BIN16, len as u16)?;
            } else {
                p.write_tagged(format::BIN32, len as u32)?;
            }
            p.sink.write(bytes)
        })?;
        Ok(())
    }

    /// Array header. The caller packs `len` elements after it.
    pub fn pack_array_len(&mut self, len: usize) -> Result<()> {
        self.pack_container_len(len, format::FIXARRAY, format::ARRAY16, format::ARRAY32, "array")
    }

    /// Map header. The caller packs `len` key/value pairs after it.
    pub fn pack_map_len(&mut self, len: usize) -> Result<()> {
        self.pack_container_len(len, format::FIXMAP, format::MAP16, format::MAP32, "map")
    }

    fn pack_container_len(
        &mut self,
        len: usize,
        fix: u8,
        tag16: u8,
        tag32: u8,
        what: &'static str,
    ) -> Result<()> {
        let wide = len as u64;
        if wide <= MAX_4BIT {
            self.write_tag(len as u8 | fix)
        } else if wide <= MAX_16BIT {
            self.write_tagged(tag16, len as u16)
        } else if wide <= MAX_32BIT {
            self.write_tagged(tag32, len as u32)
        } else {
            Err(MpError::SizeOverflow { what, len })
        }
    }
}

/// Encode a single value into a fresh buffer.
pub fn to_vec<T: Pack + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut packer = Packer::new();
    packer.pack(value)?;
    Ok(packer.into_vec())
}
