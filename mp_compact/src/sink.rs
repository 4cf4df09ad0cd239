use alloc::vec::Vec;

use crate::{MpError, Result};

/// Byte sink behind a [`Packer`](crate::Packer).
///
/// - `Growable` owns a `Vec<u8>` and never runs out of space
/// - `Fixed` writes into a caller-supplied slice and refuses writes that
///   would not fit
#[derive(Debug)]
pub enum Sink<'a> {
    /// Internally owned, growable buffer
    Growable(Vec<u8>),

    /// Caller-supplied buffer with a write cursor
    Fixed { buf: &'a mut [u8], len: usize },
}

impl<'a> Sink<'a> {
    pub fn growable() -> Self {
        Sink::Growable(Vec::new())
    }

    pub fn fixed(buf: &'a mut [u8]) -> Self {
        Sink::Fixed { buf, len: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        match self {
            Sink::Growable(vec) => vec.len(),
            Sink::Fixed { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total capacity of a fixed sink; `None` when growable.
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Sink::Growable(_) => None,
            Sink::Fixed { buf, .. } => Some(buf.len()),
        }
    }

    /// Append `bytes`. A fixed sink that cannot hold all of them is left
    /// untouched.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            Sink::Growable(vec) => {
                vec.extend_from_slice(bytes);
                Ok(())
            }
            Sink::Fixed { buf, len } => {
                let remaining = buf.len() - *len;
                if remaining < bytes.len() {
                    tracing::debug!(needed = bytes.len(), remaining, "fixed sink full");
                    return Err(MpError::CapacityExceeded {
                        needed: bytes.len(),
                        remaining,
                    });
                }
                buf[*len..*len + bytes.len()].copy_from_slice(bytes);
                *len += bytes.len();
                Ok(())
            }
        }
    }

    /// Drop everything written after the first `new_len` bytes.
    pub fn truncate(&mut self, new_len: usize) {
        match self {
            Sink::Growable(vec) => vec.truncate(new_len),
            Sink::Fixed { len, .. } => *len = (*len).min(new_len),
        }
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// The written bytes.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Sink::Growable(vec) => vec,
            Sink::Fixed { buf, len } => &buf[..*len],
        }
    }
}
