//! NUL-padded, fixed-capacity string storage.

use crate::{MpError, Packer, Result, Unpack, Unpacker, pack::Pack};

/// A string stored inline in `N` bytes, padded with NUL.
///
/// Packs the bytes up to the first NUL as a string, so an all-zero value
/// packs as nil. Unpacking fails with [`MpError::StringOverflow`] when the
/// encoded string is longer than `N` and zero-fills the tail otherwise.
///
/// # Examples
///
/// ```
/// use mp_compact::{FixedString, from_slice, to_vec};
///
/// let name = FixedString::<8>::new("ship").unwrap();
/// let bytes = to_vec(&name).unwrap();
/// assert_eq!(bytes, [0xa4, b's', b'h', b'i', b'p']);
///
/// let back: FixedString<8> = from_slice(&bytes).unwrap();
/// assert_eq!(back.as_bytes(), b"ship");
/// assert_eq!(back.raw(), b"ship\0\0\0\0");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedString<N> {
    pub const CAPACITY: usize = N;

    /// All-NUL (empty) string.
    pub const fn empty() -> Self {
        FixedString { bytes: [0; N] }
    }

    pub fn new(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > N {
            return Err(MpError::StringOverflow {
                len: bytes.len(),
                capacity: N,
            });
        }
        let mut out = Self::empty();
        out.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(out)
    }

    /// Length up to the first NUL.
    pub fn len(&self) -> usize {
        self.bytes.iter().position(|&b| b == 0).unwrap_or(N)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    pub fn as_str(&self) -> Result<&str> {
        core::str::from_utf8(self.as_bytes()).map_err(|_| MpError::InvalidUtf8)
    }

    /// The full backing storage, padding included.
    pub fn raw(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> core::fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_str() {
            Ok(s) => write!(f, "FixedString<{N}>({s:?})"),
            Err(_) => write!(f, "FixedString<{N}>({:?})", self.as_bytes()),
        }
    }
}

impl<const N: usize> Pack for FixedString<N> {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_str_bytes(self.as_bytes())
    }
}

impl<const N: usize> Unpack for FixedString<N> {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        unpacker.unpack_c_str(&mut self.bytes)?;
        Ok(())
    }
}
