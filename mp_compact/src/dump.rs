//! Human-readable rendering of encoded values.
//!
//! Output is JSON-like: nil is `null`, binary payloads are `<hex>`, map keys
//! are rendered like any other value. Since an empty string travels as nil,
//! it renders as `null` too.

use alloc::string::{String, ToString};

use crate::format::{self, Kind};
use crate::{Integer, MpError, Result, Unpacker};

/// Containers nested deeper than this are rejected instead of recursing.
pub const MAX_NESTING: usize = 128;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Render the next value in `unpacker`, consuming it.
///
/// ```
/// use mp_compact::{Unpacker, dump};
///
/// let bytes = [0x92, 0x01, 0xa2, b'h', b'i'];
/// let text = dump::dump(&mut Unpacker::new(&bytes), false).unwrap();
/// assert_eq!(text, r#"[1,"hi"]"#);
/// ```
pub fn dump(unpacker: &mut Unpacker<'_>, pretty: bool) -> Result<String> {
    let mut renderer = Renderer::new(pretty);
    renderer.value(unpacker, 0)?;
    Ok(renderer.out)
}

/// Render every value in `bytes`, one per line.
pub fn to_text(bytes: &[u8], pretty: bool) -> Result<String> {
    let mut unpacker = Unpacker::new(bytes);
    let mut renderer = Renderer::new(pretty);
    while !unpacker.is_empty() {
        if !renderer.out.is_empty() {
            renderer.out.push('\n');
        }
        renderer.value(&mut unpacker, 0)?;
    }
    Ok(renderer.out)
}

struct Renderer {
    out: String,
    pretty: bool,
}

impl Renderer {
    fn new(pretty: bool) -> Self {
        Renderer {
            out: String::new(),
            pretty,
        }
    }

    fn value(&mut self, u: &mut Unpacker<'_>, depth: usize) -> Result<()> {
        if depth > MAX_NESTING {
            return Err(MpError::NestingTooDeep {
                depth,
                max: MAX_NESTING,
            });
        }

        let tag = u.peek_tag()?;
        match format::classify(tag) {
            Kind::Nil => {
                u.read_nil()?;
                self.out.push_str("null");
            }
            Kind::Bool => {
                let text = if u.read_bool()? { "true" } else { "false" };
                self.out.push_str(text);
            }
            Kind::UInt | Kind::Int => match u.read_integer()? {
                Integer::Unsigned(v) => self.out.push_str(&v.to_string()),
                Integer::Signed(v) => self.out.push_str(&v.to_string()),
            },
            Kind::Float | Kind::Double => {
                let (v, double) = u.read_float()?;
                if double {
                    self.out.push_str(&v.to_string());
                } else {
                    // keep single precision from growing spurious digits
                    self.out.push_str(&(v as f32).to_string());
                }
            }
            Kind::Str => {
                let bytes = u.read_str_bytes()?;
                self.string(&String::from_utf8_lossy(bytes));
            }
            Kind::Bin => {
                let bytes = u.read_bin()?;
                self.out.push('<');
                for b in bytes {
                    self.out.push(HEX[(b >> 4) as usize] as char);
                    self.out.push(HEX[(b & 0xf) as usize] as char);
                }
                self.out.push('>');
            }
            Kind::Array => {
                let count = u.read_array_len()?;
                self.out.push('[');
                for i in 0..count {
                    self.separator(i, depth + 1);
                    self.value(u, depth + 1)?;
                }
                self.close(']', count, depth);
            }
            Kind::Map => {
                let count = u.read_map_len()?;
                self.out.push('{');
                for i in 0..count {
                    self.separator(i, depth + 1);
                    self.value(u, depth + 1)?;
                    self.out.push_str(if self.pretty { ": " } else { ":" });
                    self.value(u, depth + 1)?;
                }
                self.close('}', count, depth);
            }
            Kind::Unsupported => return Err(MpError::invalid_type(tag, "any value")),
        }
        Ok(())
    }

    fn string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if c.is_control() => self.out.extend(c.escape_default()),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn separator(&mut self, index: usize, depth: usize) {
        if index > 0 {
            self.out.push(',');
        }
        if self.pretty {
            self.newline(depth);
        }
    }

    fn close(&mut self, bracket: char, count: usize, depth: usize) {
        if self.pretty && count > 0 {
            self.newline(depth);
        }
        self.out.push(bracket);
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Packer;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use alloc::vec::Vec;

    fn packed<F: FnOnce(&mut Packer<'_>)>(f: F) -> Vec<u8> {
        let mut p = Packer::new();
        f(&mut p);
        p.into_vec()
    }

    #[test]
    fn scalars() {
        let bytes = packed(|p| {
            p.pack(&7u8).unwrap();
            p.pack(&-300i32).unwrap();
            p.pack(&true).unwrap();
            p.pack_nil().unwrap();
            p.pack(&1.5f32).unwrap();
            p.pack(&0.25f64).unwrap();
        });
        assert_eq!(
            to_text(&bytes, false).unwrap(),
            "7\n-300\ntrue\nnull\n1.5\n0.25"
        );
    }

    #[test]
    fn strings_are_escaped() {
        let bytes = crate::to_vec("a\"b\\c\nd").unwrap();
        assert_eq!(to_text(&bytes, false).unwrap(), r#""a\"b\\c\nd""#);
        assert_eq!(to_text(&crate::to_vec("").unwrap(), false).unwrap(), "null");
    }

    #[test]
    fn binary_as_hex() {
        let bytes = crate::to_vec(&[0x00u8, 0xab, 0x10]).unwrap();
        assert_eq!(to_text(&bytes, false).unwrap(), "<00ab10>");
    }

    #[test]
    fn compact_containers() {
        let mut map = BTreeMap::new();
        map.insert("k", vec![1u16, 2]);
        map.insert("e", vec![]);
        let bytes = crate::to_vec(&map).unwrap();
        assert_eq!(to_text(&bytes, false).unwrap(), r#"{"e":[],"k":[1,2]}"#);
    }

    #[test]
    fn pretty_containers() {
        let mut map = BTreeMap::new();
        map.insert("k", vec![1u16, 2]);
        map.insert("e", vec![]);
        let bytes = crate::to_vec(&map).unwrap();
        let expected = "{\n  \"e\": [],\n  \"k\": [\n    1,\n    2\n  ]\n}";
        assert_eq!(to_text(&bytes, true).unwrap(), expected);
    }

    #[test]
    fn dump_consumes_one_value() {
        let bytes = [0x01, 0x02];
        let mut u = Unpacker::new(&bytes);
        assert_eq!(dump(&mut u, true).unwrap(), "1");
        assert_eq!(u.remaining(), 1);
    }

    #[test]
    fn unsupported_tag_fails() {
        let err = to_text(&[0x92, 0x01, 0xc1], false).unwrap_err();
        assert!(matches!(err, MpError::InvalidType { tag: 0xc1, .. }));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let mut bytes = vec![0x91; MAX_NESTING + 1];
        bytes.push(0x00);
        let err = to_text(&bytes, false).unwrap_err();
        assert!(matches!(err, MpError::NestingTooDeep { .. }));

        bytes.remove(0);
        assert!(to_text(&bytes, false).is_ok());
    }
}
