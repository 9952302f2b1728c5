use std::{io, sync::Arc, thread};

use bincoder::{
    BitReader, BitWriter, Bincoder, Config, Field, ReadError, TextEncoding, WriteError,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

bincoder::bit_enum! {
    #[doc = "Facing of a unit on the map."]
    pub enum Facing: i16 {
        North = 0,
        East = 90,
        South = 180,
        West = -90,
    }
}

bincoder::bit_enum! {
    pub enum Class: i64 {
        Scout = 1,
        Tank = 1 << 40,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Unit {
    id: u8,
    hp: i16,
    xp: i32,
    gold: i64,
    speed: f32,
    heading: f64,
    alive: bool,
    name: String,
    facing: Facing,
    class: Class,
}

impl Unit {
    fn empty() -> Self {
        Unit {
            id: 0,
            hp: 0,
            xp: 0,
            gold: 0,
            speed: 0.0,
            heading: 0.0,
            alive: false,
            name: String::new(),
            facing: Facing::North,
            class: Class::Scout,
        }
    }

    fn sample() -> Self {
        Unit {
            id: 200,
            hp: -1234,
            xp: 1_000_000,
            gold: -9_876_543_210,
            speed: 3.25,
            heading: -0.125,
            alive: true,
            name: "Ærø".to_string(),
            facing: Facing::West,
            class: Class::Tank,
        }
    }
}

fn unit_fields() -> Vec<Field<Unit>> {
    vec![
        Field::new("id", 0).accessors(|u: &Unit| u.id, |u: &mut Unit, v| u.id = v),
        Field::new("alive", 1)
            .bits(1)
            .accessors(|u: &Unit| u.alive, |u: &mut Unit, v| u.alive = v),
        Field::new("hp", 2).accessors(|u: &Unit| u.hp, |u: &mut Unit, v| u.hp = v),
        Field::new("facing", 3)
            .bits(9)
            .sign_extend()
            .accessors(|u: &Unit| u.facing, |u: &mut Unit, v| u.facing = v),
        Field::new("xp", 4)
            .bits(21)
            .accessors(|u: &Unit| u.xp, |u: &mut Unit, v| u.xp = v),
        Field::new("gold", 5).accessors(|u: &Unit| u.gold, |u: &mut Unit, v| u.gold = v),
        Field::new("speed", 6).accessors(|u: &Unit| u.speed, |u: &mut Unit, v| u.speed = v),
        Field::new("heading", 7)
            .accessors(|u: &Unit| u.heading, |u: &mut Unit, v| u.heading = v),
        Field::new("name", 8)
            .bits(64)
            .accessors(|u: &Unit| u.name.clone(), |u: &mut Unit, v| u.name = v),
        Field::new("class", 9).accessors(|u: &Unit| u.class, |u: &mut Unit, v| u.class = v),
    ]
}

#[test]
fn round_trips_every_type() {
    init_logger();

    let bincoder = Bincoder::compile(unit_fields(), Unit::empty).unwrap();
    let unit = Unit::sample();

    let bytes = bincoder.encode(&unit).unwrap();
    assert_eq!(bytes.len(), bincoder.record_len());
    assert_eq!(bincoder.decode(&bytes).unwrap(), unit);
}

#[test]
fn round_trips_with_latin1() {
    init_logger();

    let bincoder = Bincoder::compile(unit_fields(), Unit::empty)
        .unwrap()
        .with_config(Config::new(TextEncoding::Latin1));
    let unit = Unit::sample();

    let bytes = bincoder.encode(&unit).unwrap();
    assert_eq!(bincoder.decode(&bytes).unwrap(), unit);
}

#[test]
fn ascii_rejects_unit_name() {
    let bincoder = Bincoder::compile(unit_fields(), Unit::empty)
        .unwrap()
        .with_config(Config::new(TextEncoding::Ascii));

    assert!(matches!(
        bincoder.encode(&Unit::sample()),
        Err(WriteError::Unencodable('Æ'))
    ));
}

#[test]
fn packs_to_ceil_of_total_bits() {
    #[derive(Default)]
    struct Flags {
        a: u8,
        b: u8,
        c: i16,
    }

    let fields = vec![
        Field::new("a", 0).bits(3).getter(|f: &Flags| f.a),
        Field::new("b", 1).bits(5).getter(|f: &Flags| f.b),
        Field::new("c", 2).bits(7).getter(|f: &Flags| f.c),
    ];
    let bincoder = Bincoder::compile(fields, Flags::default).unwrap();
    assert_eq!(bincoder.record_bits(), 15);

    let bytes = bincoder
        .encode(&Flags {
            a: 0xFF,
            b: 0xFF,
            c: -1,
        })
        .unwrap();

    // 15 bits of ones; the padding bit stays zero.
    assert_eq!(bytes, vec![0xFF, 0x7F]);
}

#[test]
fn write_only_codec_cannot_decode() {
    #[derive(Default)]
    struct Beacon {
        seq: i32,
    }

    let fields = vec![Field::new("seq", 0).getter(|b: &Beacon| b.seq)];
    let bincoder = Bincoder::compile(fields, Beacon::default).unwrap();

    let bytes = bincoder.encode(&Beacon { seq: 5 }).unwrap();
    assert_eq!(bytes, vec![5, 0, 0, 0]);
    assert!(matches!(
        bincoder.decode(&bytes),
        Err(ReadError::MissingCapability(name)) if name == "seq"
    ));
}

#[test]
fn optional_field_is_null() {
    #[derive(Default)]
    struct Note {
        text: Option<String>,
    }

    let fields = vec![
        Field::new("text", 0)
            .bits(32)
            .accessors(|n: &Note| n.text.clone(), |n: &mut Note, v| n.text = v),
    ];
    let bincoder = Bincoder::compile(fields, Note::default).unwrap();

    assert!(matches!(
        bincoder.encode(&Note::default()),
        Err(WriteError::NullValue(name)) if name == "text"
    ));

    let bytes = bincoder
        .encode(&Note {
            text: Some("hey".to_string()),
        })
        .unwrap();
    assert_eq!(bytes, b"hey\0".to_vec());
    assert_eq!(bincoder.decode(&bytes).unwrap().text.as_deref(), Some("hey"));
}

#[test]
fn cut_utf8_text_still_decodes() {
    #[derive(Debug, Default, PartialEq)]
    struct Tag {
        label: String,
    }

    let fields = vec![
        Field::new("label", 0)
            .bits(16)
            .accessors(|t: &Tag| t.label.clone(), |t: &mut Tag, v| t.label = v),
    ];
    let bincoder = Bincoder::compile(fields, Tag::default).unwrap();

    let bytes = bincoder
        .encode(&Tag {
            label: "hé".to_string(),
        })
        .unwrap();
    assert_eq!(bytes, vec![b'h', 0]);
    assert_eq!(bincoder.decode(&bytes).unwrap().label, "h");
}

#[test]
fn encodes_several_records_into_one_sink() {
    let bincoder = Bincoder::compile(unit_fields(), Unit::empty).unwrap();
    let first = Unit::sample();
    let second = Unit {
        id: 1,
        name: "Bo".to_string(),
        ..Unit::sample()
    };

    let mut sink = Vec::new();
    bincoder.encode_to(&first, &mut sink).unwrap();
    bincoder.encode_to(&second, &mut sink).unwrap();
    assert_eq!(sink.len(), 2 * bincoder.record_len());

    let mut source = io::Cursor::new(sink);
    assert_eq!(bincoder.decode_from(&mut source).unwrap(), first);
    assert_eq!(bincoder.decode_from(&mut source).unwrap(), second);
    assert!(matches!(
        bincoder.decode_from(&mut source),
        Err(ReadError::TruncatedStream { available: 0, .. })
    ));
}

#[test]
fn shared_across_threads() {
    init_logger();

    let bincoder = Arc::new(Bincoder::compile(unit_fields(), Unit::empty).unwrap());

    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let bincoder = Arc::clone(&bincoder);
            thread::spawn(move || {
                for n in 0..50 {
                    let unit = Unit {
                        id: i.wrapping_mul(50).wrapping_add(n),
                        xp: n as i32 * 1000,
                        ..Unit::sample()
                    };
                    let bytes = bincoder.encode(&unit).unwrap();
                    assert_eq!(bincoder.decode(&bytes).unwrap(), unit);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn bit_level_scenarios() {
    let mut reader = BitReader::new(&[5u8][..]);
    assert_eq!(reader.try_read_bit().unwrap(), Some(true));
    assert_eq!(reader.try_read_bit().unwrap(), Some(false));
    assert_eq!(reader.try_read_bit().unwrap(), Some(true));

    let mut out = Vec::new();
    let mut writer = BitWriter::new(&mut out);
    writer.write_bit(true).unwrap();
    writer.write_bytes(&[5, 10]).unwrap();
    writer.flush().unwrap();
    assert_eq!(out, vec![11, 20, 0]);

    let mut empty = BitReader::new(io::empty());
    assert_eq!(empty.try_read_bit().unwrap(), None);

    let mut short = BitReader::new(&[0xAAu8][..]);
    assert!(matches!(
        short.read_i16(12, true),
        Err(ReadError::TruncatedStream {
            requested: 4,
            available: 0
        })
    ));
}

#[test]
fn writer_hands_back_owned_sink() {
    let mut writer = BitWriter::new(io::Cursor::new(Vec::new()));
    writer.write_byte(0b101, 3).unwrap();
    writer.write_i32(-1, 9).unwrap();

    let cursor = writer.into_inner().unwrap();
    assert_eq!(cursor.into_inner(), vec![0xFD, 0x0F]);
}
