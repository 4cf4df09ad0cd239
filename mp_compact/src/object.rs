//! Field registry for structured types.
//!
//! An [`Object<T>`] describes how to serialize a `T` as a flat sequence of
//! values: the fields of its ancestor chain (outermost first), then its own
//! fields in registration order. Nothing on the wire marks where one struct
//! ends and the next begins; both sides must use the same registration.
//!
//! Fields are reached through projections (`fn(&T) -> &F`) rather than
//! stored references, so the storage is always the instance handed to
//! [`Object::pack`] / [`Object::unpack`] and can never be outlived.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{MpError, Pack, Packer, Result, Unpack, Unpacker};

type PackFn<T> = Box<dyn Fn(&T, &mut Packer<'_>) -> Result<()> + Send + Sync>;
type UnpackFn<T> = Box<dyn Fn(&mut T, &mut Unpacker<'_>) -> Result<()> + Send + Sync>;

/// Another object reached through a projection of `T`: a parent or a
/// nested field.
trait Member<T>: Send + Sync {
    fn pack(&self, value: &T, packer: &mut Packer<'_>) -> Result<()>;
    fn unpack(&self, value: &mut T, unpacker: &mut Unpacker<'_>) -> Result<()>;
    fn depth(&self) -> usize;
    fn collect_names(&self, out: &mut Vec<&'static str>);
}

struct Projected<T, B: 'static> {
    object: Arc<Object<B>>,
    get: fn(&T) -> &B,
    get_mut: fn(&mut T) -> &mut B,
}

impl<T, B: 'static> Member<T> for Projected<T, B> {
    fn pack(&self, value: &T, packer: &mut Packer<'_>) -> Result<()> {
        self.object.pack_fields((self.get)(value), packer)
    }

    fn unpack(&self, value: &mut T, unpacker: &mut Unpacker<'_>) -> Result<()> {
        self.object.unpack((self.get_mut)(value), unpacker)
    }

    fn depth(&self) -> usize {
        self.object.depth()
    }

    fn collect_names(&self, out: &mut Vec<&'static str>) {
        self.object.collect_names(out);
    }
}

enum Field<T> {
    Value {
        name: &'static str,
        pack: PackFn<T>,
        unpack: UnpackFn<T>,
    },
    Nested {
        name: &'static str,
        member: Box<dyn Member<T>>,
    },
}

impl<T> Field<T> {
    fn name(&self) -> &'static str {
        match self {
            Field::Value { name, .. } | Field::Nested { name, .. } => *name,
        }
    }
}

/// Serialization descriptor for `T`.
///
/// Assembled once, then used for any number of `pack`/`unpack` calls. The
/// descriptor holds no per-call state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mp_compact::{Object, Packer, Unpacker};
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Base { id: u32 }
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Ship { base: Base, name: String, speed: f32 }
///
/// let mut base = Object::<Base>::new("Base");
/// base.reg("id", |b| &b.id, |b| &mut b.id);
///
/// let mut ship = Object::<Ship>::new("Ship");
/// ship.inherit(Arc::new(base), |s| &s.base, |s| &mut s.base).unwrap();
/// ship.reg("name", |s| &s.name, |s| &mut s.name)
///     .reg("speed", |s| &s.speed, |s| &mut s.speed);
///
/// let original = Ship { base: Base { id: 7 }, name: "kite".into(), speed: 1.5 };
/// let mut packer = Packer::new();
/// ship.pack(&original, &mut packer).unwrap();
/// assert_eq!(&packer.data()[..2], &[0x07, 0xa4]);
///
/// let mut decoded = Ship::default();
/// ship.unpack(&mut decoded, &mut Unpacker::new(packer.data())).unwrap();
/// assert_eq!(decoded, original);
/// ```
pub struct Object<T> {
    name: &'static str,
    parent: Option<Box<dyn Member<T>>>,
    fields: Vec<Field<T>>,
}

impl<T> Object<T> {
    /// Deepest allowed chain of parents and nested objects, this one included.
    pub const MAX_DEPTH: usize = 32;

    /// An empty, unassembled descriptor.
    pub fn new(name: &'static str) -> Self {
        Object {
            name,
            parent: None,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of fields registered directly on this object.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// True once a field or a parent has been registered.
    pub fn is_assembled(&self) -> bool {
        self.has_parent() || !self.fields.is_empty()
    }

    /// Length of the longest parent/nesting chain starting here.
    pub fn depth(&self) -> usize {
        let parent = self.parent.as_ref().map_or(0, |p| p.depth());
        let nested = self
            .fields
            .iter()
            .filter_map(|f| match f {
                Field::Nested { member, .. } => Some(member.depth()),
                Field::Value { .. } => None,
            })
            .max()
            .unwrap_or(0);
        1 + parent.max(nested)
    }

    /// Field names in wire order, ancestors first. Nested objects appear
    /// under the name they were registered with.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names(&self, out: &mut Vec<&'static str>) {
        if let Some(parent) = &self.parent {
            parent.collect_names(out);
        }
        out.extend(self.fields.iter().map(Field::name));
    }

    /// Pack the ancestor chain's fields, then this object's own, from `value`.
    ///
    /// A failure rolls the packer back to where it was before the call.
    pub fn pack(&self, value: &T, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_with(|p| self.pack_fields(value, p))?;
        Ok(())
    }

    fn pack_fields(&self, value: &T, packer: &mut Packer<'_>) -> Result<()> {
        tracing::trace!(object = self.name, fields = self.fields.len(), "packing object");
        if let Some(parent) = &self.parent {
            parent.pack(value, packer)?;
        }
        for field in &self.fields {
            match field {
                Field::Value { pack, .. } => pack(value, packer)?,
                Field::Nested { member, .. } => member.pack(value, packer)?,
            }
        }
        Ok(())
    }

    /// Unpack into `value` in the same order [`pack`](Self::pack) wrote.
    pub fn unpack(&self, value: &mut T, unpacker: &mut Unpacker<'_>) -> Result<()> {
        tracing::trace!(object = self.name, fields = self.fields.len(), "unpacking object");
        if let Some(parent) = &self.parent {
            parent.unpack(value, unpacker)?;
        }
        for field in &self.fields {
            match field {
                Field::Value { unpack, .. } => unpack(value, unpacker)?,
                Field::Nested { member, .. } => member.unpack(value, unpacker)?,
            }
        }
        Ok(())
    }
}

impl<T: 'static> Object<T> {
    /// Record `parent` as the base whose fields precede this object's own.
    /// Replaces any earlier parent.
    ///
    /// Fails with [`MpError::NestingTooDeep`] when the resulting chain would
    /// exceed [`MAX_DEPTH`](Self::MAX_DEPTH).
    pub fn inherit<B: 'static>(
        &mut self,
        parent: Arc<Object<B>>,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> Result<&mut Self> {
        self.check_depth(parent.depth())?;
        self.parent = Some(Box::new(Projected {
            object: parent,
            get,
            get_mut,
        }));
        Ok(self)
    }

    /// Register a scalar or container field.
    pub fn reg<F>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> &mut Self
    where
        F: Pack + Unpack + 'static,
    {
        self.fields.push(Field::Value {
            name,
            pack: Box::new(move |value: &T, packer: &mut Packer<'_>| get(value).pack(packer)),
            unpack: Box::new(move |value: &mut T, unpacker: &mut Unpacker<'_>| {
                get_mut(value).unpack(unpacker)
            }),
        });
        self
    }

    /// Register a field that is itself described by `object`.
    pub fn reg_object<N: 'static>(
        &mut self,
        name: &'static str,
        object: Arc<Object<N>>,
        get: fn(&T) -> &N,
        get_mut: fn(&mut T) -> &mut N,
    ) -> Result<&mut Self> {
        self.check_depth(object.depth())?;
        self.fields.push(Field::Nested {
            name,
            member: Box::new(Projected {
                object,
                get,
                get_mut,
            }),
        });
        Ok(self)
    }

    fn check_depth(&self, member_depth: usize) -> Result<()> {
        let depth = member_depth + 1;
        if depth > Self::MAX_DEPTH {
            tracing::debug!(object = self.name, depth, "object nesting rejected");
            return Err(MpError::NestingTooDeep {
                depth,
                max: Self::MAX_DEPTH,
            });
        }
        Ok(())
    }
}

impl<T> core::fmt::Debug for Object<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Object")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .finish()
    }
}

/// A type that knows how to assemble its own [`Object`] descriptor.
///
/// Usually derived with `#[derive(MpObject)]`.
pub trait MpObject: Sized + 'static {
    const NAME: &'static str;

    /// Register this type's parent and fields on `object`.
    fn assemble(object: &mut Object<Self>) -> Result<()>;

    /// Build a fresh descriptor.
    fn object() -> Result<Object<Self>> {
        let mut object = Object::new(Self::NAME);
        Self::assemble(&mut object)?;
        Ok(object)
    }
}
