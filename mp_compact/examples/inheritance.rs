use mp_compact::{FixedString, MpObject, Packer, Unpacker, dump};
use std::collections::BTreeMap;

#[derive(MpObject, Debug, Default, PartialEq)]
struct Entity {
    id: u32,
    name: FixedString<16>,
}

#[derive(MpObject, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(MpObject, Debug, Default, PartialEq)]
struct Player {
    #[mp(parent)]
    entity: Entity,
    #[mp(nested)]
    position: Position,
    health: u8,
    inventory: BTreeMap<String, u16>,
    #[mp(skip)]
    dirty: bool,
}

fn main() -> mp_compact::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let object = Player::object()?;
    println!("Descriptor: {object:?}");
    println!("Depth: {}\n", object.depth());

    let mut inventory = BTreeMap::new();
    inventory.insert("arrows".to_string(), 40);
    inventory.insert("potions".to_string(), 3);

    let player = Player {
        entity: Entity {
            id: 7,
            name: FixedString::new("Ada")?,
        },
        position: Position { x: 1.5, y: -3.0 },
        health: 200,
        inventory,
        dirty: true,
    };

    let mut packer = Packer::new();
    object.pack(&player, &mut packer)?;
    println!("Encoded {} bytes: {:02x?}\n", packer.size(), packer.data());

    // the stream is a flat run of values, parent fields first
    println!("{}\n", dump::to_text(packer.data(), true)?);

    let mut restored = Player::default();
    let mut unpacker = Unpacker::new(packer.data());
    object.unpack(&mut restored, &mut unpacker)?;

    println!("Restored: {restored:#?}");
    println!("Unread bytes: {}", unpacker.remaining());
    assert_eq!(restored.entity, player.entity);
    assert!(!restored.dirty);
    Ok(())
}
