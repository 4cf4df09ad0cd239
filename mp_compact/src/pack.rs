use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Packer, Result};

/// A value that can be encoded by a [`Packer`].
///
/// The encoding of a sequence depends on its element type and is resolved
/// statically through [`Pack::pack_slice`]: byte-wide integers (`u8`, `i8`)
/// become a single binary blob, every other element type (including `bool`)
/// becomes an array of individually packed elements.
pub trait Pack {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()>;

    /// Encode a contiguous run of `Self`. Defaults to an array.
    #[doc(hidden)]
    fn pack_slice(items: &[Self], packer: &mut Packer<'_>) -> Result<()>
    where
        Self: Sized,
    {
        packer.pack_array_len(items.len())?;
        for item in items {
            item.pack(packer)?;
        }
        Ok(())
    }
}

macro_rules! pack_unsigned {
    ($($t:ty),*) => {
        $(
            impl Pack for $t {
                #[inline]
                fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
                    packer.pack_u64(*self as u64)
                }
            }
        )*
    };
}

macro_rules! pack_signed {
    ($($t:ty),*) => {
        $(
            impl Pack for $t {
                #[inline]
                fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
                    packer.pack_i64(*self as i64)
                }
            }
        )*
    };
}

pack_unsigned!(u16, u32, u64, usize);
pack_signed!(i16, i32, i64, isize);

impl Pack for u8 {
    #[inline]
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_u64(*self as u64)
    }

    fn pack_slice(items: &[Self], packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_bin(items)
    }
}

impl Pack for i8 {
    #[inline]
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_i64(*self as i64)
    }

    fn pack_slice(items: &[Self], packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_bin(bytemuck::cast_slice(items))
    }
}

impl Pack for bool {
    #[inline]
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_bool(*self)
    }
}

impl Pack for f32 {
    #[inline]
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_f32(*self)
    }
}

impl Pack for f64 {
    #[inline]
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_f64(*self)
    }
}

impl Pack for str {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_str_bytes(self.as_bytes())
    }
}

impl Pack for String {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_str_bytes(self.as_bytes())
    }
}

impl<T: Pack> Pack for [T] {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        T::pack_slice(self, packer)
    }
}

impl<T: Pack, const N: usize> Pack for [T; N] {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        T::pack_slice(self, packer)
    }
}

impl<T: Pack> Pack for Vec<T> {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        T::pack_slice(self, packer)
    }
}

impl<T: Pack + ?Sized> Pack for &T {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        (**self).pack(packer)
    }
}

impl<T: Pack + ?Sized> Pack for Box<T> {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        (**self).pack(packer)
    }
}

/// Pairs go out in iteration order, key first.
fn pack_pairs<'k, K, V, I>(len: usize, pairs: I, packer: &mut Packer<'_>) -> Result<()>
where
    K: Pack + 'k,
    V: Pack + 'k,
    I: Iterator<Item = (&'k K, &'k V)>,
{
    packer.pack_map_len(len)?;
    for (key, value) in pairs {
        key.pack(packer)?;
        value.pack(packer)?;
    }
    Ok(())
}

impl<K: Pack, V: Pack> Pack for BTreeMap<K, V> {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        pack_pairs(self.len(), self.iter(), packer)
    }
}

#[cfg(feature = "std")]
impl<K: Pack, V: Pack, S> Pack for std::collections::HashMap<K, V, S> {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        pack_pairs(self.len(), self.iter(), packer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;
    use crate::to_vec;
    use alloc::vec;

    #[test]
    fn every_integer_width_minimises() {
        assert_eq!(to_vec(&5u8).unwrap(), vec![5]);
        assert_eq!(to_vec(&5u16).unwrap(), vec![5]);
        assert_eq!(to_vec(&5u32).unwrap(), vec![5]);
        assert_eq!(to_vec(&5u64).unwrap(), vec![5]);
        assert_eq!(to_vec(&5usize).unwrap(), vec![5]);
        assert_eq!(to_vec(&-1i8).unwrap(), vec![0xff]);
        assert_eq!(to_vec(&-1i64).unwrap(), vec![0xff]);
        assert_eq!(to_vec(&-100isize).unwrap(), vec![0xd0, 0x9c]);
    }

    #[test]
    fn byte_sequences_are_binary() {
        assert_eq!(to_vec(&[1u8, 2, 3]).unwrap(), vec![format::BIN8, 3, 1, 2, 3]);
        assert_eq!(to_vec(&vec![0xffu8]).unwrap(), vec![format::BIN8, 1, 0xff]);
        assert_eq!(to_vec(&[-1i8, 2]).unwrap(), vec![format::BIN8, 2, 0xff, 2]);
        // no nil shortcut for empty binary
        assert_eq!(to_vec(&Vec::<u8>::new()).unwrap(), vec![format::BIN8, 0]);
    }

    #[test]
    fn wider_sequences_are_arrays() {
        assert_eq!(to_vec(&[1u16, 2, 300]).unwrap()[0], 0x93);
        assert_eq!(to_vec(&[true, false]).unwrap(), vec![0x92, 0xc3, 0xc2]);
        assert_eq!(to_vec(&Vec::<u32>::new()).unwrap(), vec![0x90]);
        let nested = vec![vec![1u32], vec![]];
        assert_eq!(to_vec(&nested).unwrap(), vec![0x92, 0x91, 0x01, 0x90]);
    }

    #[test]
    fn strings() {
        assert_eq!(to_vec("").unwrap(), vec![0xc0]);
        assert_eq!(to_vec(&String::from("hi")).unwrap(), vec![0xa2, b'h', b'i']);
        let owned: Box<str> = "ok".into();
        assert_eq!(to_vec(&owned).unwrap(), vec![0xa2, b'o', b'k']);
    }

    #[test]
    fn maps_pack_key_then_value() {
        let mut map = BTreeMap::new();
        map.insert(2u8, "b");
        map.insert(1u8, "a");
        assert_eq!(
            to_vec(&map).unwrap(),
            vec![0x82, 0x01, 0xa1, b'a', 0x02, 0xa1, b'b']
        );
    }
}
