use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::unpacker::Integer;
use crate::{MpError, Result, Unpacker};

/// A target that can be assigned from one encoded value.
///
/// Decoding checks the tag against the category of `Self` and, for numbers,
/// the decoded value against the numeric limits of `Self`. Sequences mirror
/// [`Pack`](crate::Pack): `u8`/`i8` sequences expect binary, everything else
/// expects an array.
pub trait Unpack {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()>;

    /// Fill a fixed-length run of `Self`; the encoded length must match.
    #[doc(hidden)]
    fn unpack_slice(target: &mut [Self], unpacker: &mut Unpacker<'_>) -> Result<()>
    where
        Self: Sized,
    {
        let count = unpacker.read_array_len()?;
        if count != target.len() {
            return Err(MpError::SizeMismatch {
                expected: target.len(),
                found: count,
            });
        }
        for item in target {
            item.unpack(unpacker)?;
        }
        Ok(())
    }

    /// Resize `target` to the encoded length, then fill it.
    #[doc(hidden)]
    fn unpack_vec(target: &mut Vec<Self>, unpacker: &mut Unpacker<'_>) -> Result<()>
    where
        Self: Sized + Default,
    {
        let count = unpacker.read_array_len()?;
        // every element takes at least one byte
        unpacker.ensure_available(count)?;
        target.resize_with(count, Self::default);
        for item in target.iter_mut() {
            item.unpack(unpacker)?;
        }
        Ok(())
    }
}

/// Narrow a wire integer to `T`, reporting which limit was crossed.
fn narrow<T>(value: Integer, target: &'static str) -> Result<T>
where
    T: TryFrom<u64> + TryFrom<i64>,
{
    match value {
        Integer::Unsigned(v) => {
            <T as TryFrom<u64>>::try_from(v).map_err(|_| MpError::Overflow { target })
        }
        Integer::Signed(v) => <T as TryFrom<i64>>::try_from(v).map_err(|_| {
            if v < 0 {
                MpError::Underflow { target }
            } else {
                MpError::Overflow { target }
            }
        }),
    }
}

macro_rules! unpack_integer {
    ($($t:ty),*) => {
        $(
            impl Unpack for $t {
                fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
                    *self = narrow(unpacker.read_integer()?, stringify!($t))?;
                    Ok(())
                }
            }
        )*
    };
}

unpack_integer!(u16, u32, u64, usize, i16, i32, i64, isize);

/// Binary header whose length must equal `expected`.
fn read_exact_bin<'a>(unpacker: &mut Unpacker<'a>, expected: usize) -> Result<&'a [u8]> {
    let len = unpacker.read_bin_len()?;
    if len != expected {
        return Err(MpError::SizeMismatch {
            expected,
            found: len,
        });
    }
    unpacker.take(len)
}

impl Unpack for u8 {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        *self = narrow(unpacker.read_integer()?, "u8")?;
        Ok(())
    }

    fn unpack_slice(target: &mut [Self], unpacker: &mut Unpacker<'_>) -> Result<()> {
        let bytes = read_exact_bin(unpacker, target.len())?;
        target.copy_from_slice(bytes);
        Ok(())
    }

    fn unpack_vec(target: &mut Vec<Self>, unpacker: &mut Unpacker<'_>) -> Result<()> {
        let bytes = unpacker.read_bin()?;
        target.clear();
        target.extend_from_slice(bytes);
        Ok(())
    }
}

impl Unpack for i8 {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        *self = narrow(unpacker.read_integer()?, "i8")?;
        Ok(())
    }

    fn unpack_slice(target: &mut [Self], unpacker: &mut Unpacker<'_>) -> Result<()> {
        let bytes = read_exact_bin(unpacker, target.len())?;
        bytemuck::cast_slice_mut::<i8, u8>(target).copy_from_slice(bytes);
        Ok(())
    }

    fn unpack_vec(target: &mut Vec<Self>, unpacker: &mut Unpacker<'_>) -> Result<()> {
        let bytes = unpacker.read_bin()?;
        target.clear();
        target.resize(bytes.len(), 0);
        bytemuck::cast_slice_mut::<i8, u8>(target).copy_from_slice(bytes);
        Ok(())
    }
}

impl Unpack for bool {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        *self = unpacker.read_bool()?;
        Ok(())
    }
}

impl Unpack for f32 {
    /// A double is narrowed with a range check; infinities and NaN carry
    /// over unchanged.
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        let (value, was_double) = unpacker.read_float()?;
        if was_double && value.is_finite() {
            if value > f32::MAX as f64 {
                return Err(MpError::Overflow { target: "f32" });
            }
            if value < f32::MIN as f64 {
                return Err(MpError::Underflow { target: "f32" });
            }
        }
        *self = value as f32;
        Ok(())
    }
}

impl Unpack for f64 {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        *self = unpacker.read_f64()?;
        Ok(())
    }
}

impl Unpack for String {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        let bytes = unpacker.read_str_bytes()?;
        let text = core::str::from_utf8(bytes).map_err(|_| MpError::InvalidUtf8)?;
        self.clear();
        self.push_str(text);
        Ok(())
    }
}

impl<T: Unpack> Unpack for [T] {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        T::unpack_slice(self, unpacker)
    }
}

impl<T: Unpack, const N: usize> Unpack for [T; N] {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        T::unpack_slice(self, unpacker)
    }
}

impl<T: Unpack + Default> Unpack for Vec<T> {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        T::unpack_vec(self, unpacker)
    }
}

impl<T: Unpack + ?Sized> Unpack for Box<T> {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        (**self).unpack(unpacker)
    }
}

/// Read `count` pairs, handing each to `insert`. Later duplicates win.
fn unpack_pairs<K, V>(
    unpacker: &mut Unpacker<'_>,
    mut insert: impl FnMut(K, V),
) -> Result<()>
where
    K: Unpack + Default,
    V: Unpack + Default,
{
    let count = unpacker.read_map_len()?;
    unpacker.ensure_available(count.saturating_mul(2))?;
    for _ in 0..count {
        let mut key = K::default();
        key.unpack(unpacker)?;
        let mut value = V::default();
        value.unpack(unpacker)?;
        insert(key, value);
    }
    Ok(())
}

impl<K, V> Unpack for BTreeMap<K, V>
where
    K: Unpack + Default + Ord,
    V: Unpack + Default,
{
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        unpack_pairs(unpacker, |k, v| {
            self.insert(k, v);
        })
    }
}

#[cfg(feature = "std")]
impl<K, V, S> Unpack for std::collections::HashMap<K, V, S>
where
    K: Unpack + Default + Eq + core::hash::Hash,
    V: Unpack + Default,
    S: core::hash::BuildHasher,
{
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        unpack_pairs(unpacker, |k, v| {
            self.insert(k, v);
        })
    }
}
