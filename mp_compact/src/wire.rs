//! Byte order of the fixed-width fields that follow a tag.
//!
//! Fields are big-endian unless the `native-endian` feature is enabled, in
//! which case they are written in host order, byte-for-byte compatible with
//! encoders that copy raw integers into the stream.

pub(crate) trait Wire: Copy {
    const SIZE: usize;

    /// Write `self` into `out`, which is exactly `SIZE` bytes.
    fn put(self, out: &mut [u8]);

    /// Read a value from exactly `SIZE` bytes.
    fn get(bytes: &[u8]) -> Self;
}

macro_rules! impl_wire {
    ($($t:ty),* $(,)?) => {
        $(
            impl Wire for $t {
                const SIZE: usize = core::mem::size_of::<$t>();

                #[cfg(not(feature = "native-endian"))]
                #[inline]
                fn put(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_be_bytes());
                }

                #[cfg(not(feature = "native-endian"))]
                #[inline]
                fn get(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    <$t>::from_be_bytes(raw)
                }

                #[cfg(feature = "native-endian")]
                #[inline]
                fn put(self, out: &mut [u8]) {
                    out.copy_from_slice(bytemuck::bytes_of(&self));
                }

                #[cfg(feature = "native-endian")]
                #[inline]
                fn get(bytes: &[u8]) -> Self {
                    bytemuck::pod_read_unaligned(bytes)
                }
            }
        )*
    };
}

impl_wire!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Wire + PartialEq + core::fmt::Debug>(v: T) {
        let mut buf = [0u8; 8];
        v.put(&mut buf[..T::SIZE]);
        assert_eq!(T::get(&buf[..T::SIZE]), v);
    }

    #[test]
    fn widths() {
        assert_eq!(<u8 as Wire>::SIZE, 1);
        assert_eq!(<i16 as Wire>::SIZE, 2);
        assert_eq!(<f32 as Wire>::SIZE, 4);
        assert_eq!(<u64 as Wire>::SIZE, 8);
    }

    #[test]
    fn values_survive() {
        roundtrip(0xabu8);
        roundtrip(-2i8);
        roundtrip(0x1234u16);
        roundtrip(-30_000i16);
        roundtrip(0xdead_beefu32);
        roundtrip(i64::MIN);
        roundtrip(1.5f32);
        roundtrip(-2.25e300f64);
    }

    #[cfg(not(feature = "native-endian"))]
    #[test]
    fn big_endian_layout() {
        let mut buf = [0u8; 4];
        0x0102_0304u32.put(&mut buf);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[cfg(feature = "native-endian")]
    #[test]
    fn host_layout() {
        let mut buf = [0u8; 4];
        0x0102_0304u32.put(&mut buf);
        assert_eq!(buf, 0x0102_0304u32.to_ne_bytes());
    }
}
