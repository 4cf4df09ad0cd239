//! Object descriptors assembled by hand.

use std::sync::Arc;

use bytemuck_derive::{Pod, Zeroable};
use mp_compact::{
    MpError, MpObject, Object, Pack, Packer, Result, Unpack, Unpacker, dump, format,
};

/// Stored inline as one binary blob.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Pack for Color {
    fn pack(&self, packer: &mut Packer<'_>) -> Result<()> {
        packer.pack_bin(bytemuck::bytes_of(self))
    }
}

impl Unpack for Color {
    fn unpack(&mut self, unpacker: &mut Unpacker<'_>) -> Result<()> {
        let mut raw = [0u8; 4];
        unpacker.unpack(&mut raw)?;
        *self = bytemuck::pod_read_unaligned(&raw);
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq)]
struct Entity {
    id: u32,
    tags: Vec<String>,
}

#[derive(Debug, Default, PartialEq)]
struct Sprite {
    entity: Entity,
    tint: Color,
    scale: f32,
}

#[derive(Debug, Default, PartialEq)]
struct Player {
    sprite: Sprite,
    name: String,
    score: i64,
}

impl MpObject for Entity {
    const NAME: &'static str = "Entity";

    fn assemble(object: &mut Object<Self>) -> Result<()> {
        object
            .reg("id", |e| &e.id, |e| &mut e.id)
            .reg("tags", |e| &e.tags, |e| &mut e.tags);
        Ok(())
    }
}

impl MpObject for Sprite {
    const NAME: &'static str = "Sprite";

    fn assemble(object: &mut Object<Self>) -> Result<()> {
        object
            .inherit(Arc::new(Entity::object()?), |s| &s.entity, |s| &mut s.entity)?
            .reg("tint", |s| &s.tint, |s| &mut s.tint)
            .reg("scale", |s| &s.scale, |s| &mut s.scale);
        Ok(())
    }
}

impl MpObject for Player {
    const NAME: &'static str = "Player";

    fn assemble(object: &mut Object<Self>) -> Result<()> {
        object
            .inherit(Arc::new(Sprite::object()?), |p| &p.sprite, |p| &mut p.sprite)?
            .reg("name", |p| &p.name, |p| &mut p.name)
            .reg("score", |p| &p.score, |p| &mut p.score);
        Ok(())
    }
}

fn player() -> Player {
    Player {
        sprite: Sprite {
            entity: Entity {
                id: 42,
                tags: vec!["hero".into(), String::new()],
            },
            tint: Color { r: 255, g: 128, b: 0, a: 255 },
            scale: 2.0,
        },
        name: "Ada".into(),
        score: -7,
    }
}

#[test]
fn ancestors_are_packed_outermost_first() {
    let object = Player::object().unwrap();
    assert_eq!(object.depth(), 3);
    assert_eq!(
        object.field_names(),
        vec!["id", "tags", "tint", "scale", "name", "score"]
    );

    let mut p = Packer::new();
    object.pack(&player(), &mut p).unwrap();
    let bytes = p.data();

    assert_eq!(bytes[0], 42);
    assert_eq!(&bytes[1..7], &[0x92, 0xa4, b'h', b'e', b'r', b'o']);
    // empty tag travels as nil
    assert_eq!(bytes[7], format::NIL);
    assert_eq!(&bytes[8..14], &[format::BIN8, 4, 255, 128, 0, 255]);
    assert_eq!(bytes[14], format::FLOAT);
    assert_eq!(&bytes[19..], &[0xa3, b'A', b'd', b'a', 0xf9]);
}

#[test]
fn unpack_into_zeroed_storage_restores_every_level() {
    let object = Player::object().unwrap();
    let original = player();

    let mut p = Packer::new();
    object.pack(&original, &mut p).unwrap();

    let mut restored = Player::default();
    let mut u = Unpacker::new(p.data());
    object.unpack(&mut restored, &mut u).unwrap();
    assert!(u.is_empty());
    assert_eq!(restored, original);
}

#[test]
fn object_is_reusable_and_shareable() {
    let object = Arc::new(Player::object().unwrap());
    let mut first = Packer::new();
    object.pack(&player(), &mut first).unwrap();
    object.pack(&player(), &mut first).unwrap();
    let (once, twice) = first.data().split_at(first.size() / 2);
    assert_eq!(once, twice);

    let shared = Arc::clone(&object);
    let from_thread = std::thread::spawn(move || {
        let mut p = Packer::new();
        shared.pack(&player(), &mut p).unwrap();
        p.into_vec()
    })
    .join()
    .unwrap();
    assert_eq!(from_thread, once);
}

#[test]
fn layout_is_flat_and_readable_value_by_value() {
    let object = Sprite::object().unwrap();
    let mut p = Packer::new();
    object.pack(&player().sprite, &mut p).unwrap();

    let text = dump::to_text(p.data(), false).unwrap();
    assert_eq!(text, "42\n[\"hero\",null]\n<ff8000ff>\n2");
}

#[test]
fn wrong_layout_fails_cleanly() {
    let entity = Entity::object().unwrap();
    let mut p = Packer::new();
    p.pack("not an id").unwrap();

    let mut target = Entity::default();
    let err = entity
        .unpack(&mut target, &mut Unpacker::new(p.data()))
        .unwrap_err();
    assert!(matches!(err, MpError::InvalidType { .. }));
}

#[test]
fn nested_member_as_field() {
    #[derive(Debug, Default, PartialEq)]
    struct Team {
        lead: Entity,
        size: u8,
    }

    let mut team = Object::<Team>::new("Team");
    team.reg_object("lead", Arc::new(Entity::object().unwrap()), |t| &t.lead, |t| &mut t.lead)
        .unwrap()
        .reg("size", |t| &t.size, |t| &mut t.size);

    let value = Team {
        lead: Entity { id: 1, tags: vec![] },
        size: 9,
    };
    let mut p = Packer::new();
    team.pack(&value, &mut p).unwrap();
    assert_eq!(p.data(), &[0x01, 0x90, 0x09]);

    let mut back = Team::default();
    team.unpack(&mut back, &mut Unpacker::new(p.data())).unwrap();
    assert_eq!(back, value);
}
