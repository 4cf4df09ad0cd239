//! mp_compact: compact MessagePack-style binary serialization.
//!
//! Values are encoded with a one-byte tag that carries the category and,
//! for small values, the value itself. Integers always take the narrowest
//! encoding that holds them; strings, binary, arrays and maps carry a
//! minimal-width length prefix.
//!
//! ```
//! use mp_compact::{Packer, Unpacker};
//!
//! let mut packer = Packer::new();
//! packer.pack(&200u32).unwrap().pack("hi").unwrap().pack(&[1u16, 2, 3]).unwrap();
//! assert_eq!(packer.data()[..2], [0xcc, 0xc8]);
//!
//! let mut unpacker = Unpacker::new(packer.data());
//! let (mut n, mut s, mut v) = (0u8, String::new(), Vec::<u16>::new());
//! unpacker.unpack(&mut n).unwrap().unpack(&mut s).unwrap().unpack(&mut v).unwrap();
//! assert_eq!((n, s.as_str(), v), (200, "hi", vec![1, 2, 3]));
//! ```
//!
//! Structured types are described by an [`Object`] descriptor, usually
//! generated with `#[derive(MpObject)]`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dump;
pub mod error;
pub mod format;
mod wire;
pub mod sink;
mod packer;
mod pack;
mod unpacker;
mod unpack;
mod fixed_string;
pub mod object;

pub use error::{MpError, Result};
pub use fixed_string::FixedString;
pub use format::Kind;
pub use object::{MpObject, Object};
pub use pack::Pack;
pub use packer::{Packer, to_vec};
pub use sink::Sink;
pub use unpack::Unpack;
pub use unpacker::{Integer, Unpacker, from_slice};

#[cfg(feature = "derive")]
pub use mp_compact_derive::MpObject;

#[doc(hidden)]
pub mod __private {
    pub use alloc::sync::Arc;
}
