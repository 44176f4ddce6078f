use glam::Vec2;
use thiserror::Error;

use crate::map::{MAX_MAP_HEIGHT, MAX_MAP_WIDTH, Map};
use crate::player::HeldKeys;

pub const MAX_PACKET_SIZE: usize = 0x1000;

pub const CLIENT_SEQUENCE_BITS: u32 = 30;
pub const SERVER_SEQUENCE_BITS: u32 = 29;
pub const CLIENT_SEQUENCE_MASK: u32 = (1 << CLIENT_SEQUENCE_BITS) - 1;
pub const SERVER_SEQUENCE_MASK: u32 = (1 << SERVER_SEQUENCE_BITS) - 1;

pub const CLIENT_HEADER_SIZE: usize = 8;
pub const SERVER_HEADER_SIZE: usize = 4;
pub const SPRITE_DESC_SIZE: usize = 4;
pub const TRANSFORM_SIZE: usize = 20;
pub const SPRITE_RECORD_SIZE: usize = SPRITE_DESC_SIZE + TRANSFORM_SIZE;

const READY_SIZE: usize = CLIENT_HEADER_SIZE + 1;
const LEAVE_SIZE: usize = CLIENT_HEADER_SIZE;
const CLIENT_UPDATE_SIZE: usize = CLIENT_HEADER_SIZE + 12;
const FIRE_SIZE: usize = CLIENT_HEADER_SIZE;

/// Fixed part of Hello: header, sprite count, player id, map width and height.
pub const HELLO_SIZE: usize = SERVER_HEADER_SIZE + 10;
const SERVER_UPDATE_SIZE: usize = SERVER_HEADER_SIZE + 5 + TRANSFORM_SIZE;
const CREATE_SIZE: usize = SERVER_HEADER_SIZE + SPRITE_RECORD_SIZE;
const DESTROY_SIZE: usize = SERVER_HEADER_SIZE + SPRITE_DESC_SIZE;
const WAIT_SIZE: usize = SERVER_HEADER_SIZE + 4;
const TERMINATE_SIZE: usize = SERVER_HEADER_SIZE;

const WAIT_FLAG: u32 = 1 << 31;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("packet of {0} bytes exceeds the maximum packet size")]
    TooLarge(usize),
    #[error("packet truncated: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },
    #[error("{packet} packet has size {got}, expected {expected}")]
    SizeMismatch {
        packet: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("unknown packet type {0}")]
    UnknownType(u8),
    #[error("map of {width}x{height} exceeds the maximum size")]
    MapTooLarge { width: u32, height: u32 },
}

/// Sprite identity as sent on the wire. `kind` is left raw so an unknown
/// type can still be destroyed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteDesc {
    pub kind: u8,
    pub id: u8,
    pub owner: u8,
    /// Request-specific extra data, e.g. the killer on destroy.
    pub field: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub rotation: f32,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpriteRecord {
    pub desc: SpriteDesc,
    pub transform: Transform,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Ready(bool),
    Leave,
    Update {
        keys: HeldKeys,
        rotation: f32,
        /// Seconds since the match epoch.
        timestamp: f32,
    },
    Fire,
}

impl ClientMessage {
    pub fn type_id(&self) -> u32 {
        match self {
            Self::Ready(_) => 0,
            Self::Leave => 1,
            Self::Update { .. } => 2,
            Self::Fire => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Leave => "leave",
            Self::Update { .. } => "update",
            Self::Fire => "fire",
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Ready(_) => READY_SIZE,
            Self::Leave => LEAVE_SIZE,
            Self::Update { .. } => CLIENT_UPDATE_SIZE,
            Self::Fire => FIRE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientPacket {
    pub sequence: u32,
    pub token: u32,
    pub message: ClientMessage,
}

impl ClientPacket {
    pub fn new(sequence: u32, token: u32, message: ClientMessage) -> Self {
        Self {
            sequence,
            token,
            message,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.message.encoded_len());
        let word = (self.sequence & CLIENT_SEQUENCE_MASK) | (self.message.type_id() << CLIENT_SEQUENCE_BITS);
        put_u32(&mut buf, word);
        put_u32(&mut buf, self.token);

        match &self.message {
            ClientMessage::Ready(ready) => buf.push(*ready as u8),
            ClientMessage::Update {
                keys,
                rotation,
                timestamp,
            } => {
                put_u32(&mut buf, keys.bits());
                put_f32(&mut buf, *rotation);
                put_f32(&mut buf, *timestamp);
            }
            ClientMessage::Leave | ClientMessage::Fire => {}
        }
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        check_max(bytes)?;
        let mut reader = Reader::new(bytes);
        let word = reader.u32()?;
        let token = reader.u32()?;
        let sequence = word & CLIENT_SEQUENCE_MASK;

        let message = match word >> CLIENT_SEQUENCE_BITS {
            0 => {
                expect_size("ready", READY_SIZE, bytes)?;
                ClientMessage::Ready(reader.u8()? != 0)
            }
            1 => {
                expect_size("leave", LEAVE_SIZE, bytes)?;
                ClientMessage::Leave
            }
            2 => {
                expect_size("update", CLIENT_UPDATE_SIZE, bytes)?;
                ClientMessage::Update {
                    keys: HeldKeys::from_bits_retain(reader.u32()?),
                    rotation: reader.f32()?,
                    timestamp: reader.f32()?,
                }
            }
            _ => {
                expect_size("fire", FIRE_SIZE, bytes)?;
                ClientMessage::Fire
            }
        };

        Ok(Self {
            sequence,
            token,
            message,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPacketType {
    Hello,
    Update,
    Create,
    Destroy,
    Wait,
    Terminate,
}

impl TryFrom<u8> for ServerPacketType {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Hello),
            1 => Ok(Self::Update),
            2 => Ok(Self::Create),
            3 => Ok(Self::Destroy),
            4 => Ok(Self::Wait),
            5 => Ok(Self::Terminate),
            other => Err(PacketError::UnknownType(other)),
        }
    }
}

impl ServerPacketType {
    pub fn id(self) -> u8 {
        match self {
            Self::Hello => 0,
            Self::Update => 1,
            Self::Create => 2,
            Self::Destroy => 3,
            Self::Wait => 4,
            Self::Terminate => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Update => "update",
            Self::Create => "create",
            Self::Destroy => "destroy",
            Self::Wait => "wait",
            Self::Terminate => "terminate",
        }
    }
}

/// First word of every server packet, type still unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerHeader {
    pub sequence: u32,
    pub type_id: u8,
}

impl ServerHeader {
    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        check_max(bytes)?;
        let word = Reader::new(bytes).u32()?;
        Ok(Self {
            sequence: word & SERVER_SEQUENCE_MASK,
            type_id: (word >> SERVER_SEQUENCE_BITS) as u8,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hello {
    pub player_id: u8,
    pub map: Map,
    pub sprites: Vec<SpriteRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteUpdate {
    /// Client-relative time the server state corresponds to.
    pub timestamp: f32,
    pub id: u8,
    pub transform: Transform,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Hello(Hello),
    Update(SpriteUpdate),
    Create(SpriteRecord),
    Destroy(SpriteDesc),
    Wait {
        seconds: u32,
        /// The minimum number of players has not been reached yet.
        waiting_for_players: bool,
    },
    Terminate,
}

impl ServerMessage {
    pub fn packet_type(&self) -> ServerPacketType {
        match self {
            Self::Hello(_) => ServerPacketType::Hello,
            Self::Update(_) => ServerPacketType::Update,
            Self::Create(_) => ServerPacketType::Create,
            Self::Destroy(_) => ServerPacketType::Destroy,
            Self::Wait { .. } => ServerPacketType::Wait,
            Self::Terminate => ServerPacketType::Terminate,
        }
    }

    /// Decodes the body of a whole packet (header included in `bytes`)
    /// whose type is already known.
    pub fn decode_body(packet_type: ServerPacketType, bytes: &[u8]) -> Result<Self, PacketError> {
        let mut reader = Reader::new(bytes);
        reader.skip(SERVER_HEADER_SIZE)?;
        let name = packet_type.name();

        match packet_type {
            ServerPacketType::Hello => {
                if bytes.len() < HELLO_SIZE {
                    return Err(PacketError::SizeMismatch {
                        packet: name,
                        expected: HELLO_SIZE,
                        got: bytes.len(),
                    });
                }
                let sprite_count = reader.u8()? as usize;
                let player_id = reader.u8()?;
                let width = reader.u32()?;
                let height = reader.u32()?;
                if width > MAX_MAP_WIDTH || height > MAX_MAP_HEIGHT {
                    return Err(PacketError::MapTooLarge { width, height });
                }

                let expected = HELLO_SIZE + sprite_count * SPRITE_RECORD_SIZE + Map::packed_len(width, height);
                expect_size(name, expected, bytes)?;

                let sprites = (0..sprite_count)
                    .map(|_| reader.sprite_record())
                    .collect::<Result<Vec<_>, _>>()?;
                let map = Map::unpack_bits(width, height, reader.rest())
                    .ok_or(PacketError::MapTooLarge { width, height })?;

                Ok(Self::Hello(Hello {
                    player_id,
                    map,
                    sprites,
                }))
            }
            ServerPacketType::Update => {
                expect_size(name, SERVER_UPDATE_SIZE, bytes)?;
                Ok(Self::Update(SpriteUpdate {
                    timestamp: reader.f32()?,
                    id: reader.u8()?,
                    transform: reader.transform()?,
                }))
            }
            ServerPacketType::Create => {
                expect_size(name, CREATE_SIZE, bytes)?;
                Ok(Self::Create(reader.sprite_record()?))
            }
            ServerPacketType::Destroy => {
                expect_size(name, DESTROY_SIZE, bytes)?;
                Ok(Self::Destroy(reader.sprite_desc()?))
            }
            ServerPacketType::Wait => {
                expect_size(name, WAIT_SIZE, bytes)?;
                let word = reader.u32()?;
                Ok(Self::Wait {
                    seconds: word & !WAIT_FLAG,
                    waiting_for_players: word & WAIT_FLAG != 0,
                })
            }
            ServerPacketType::Terminate => {
                expect_size(name, TERMINATE_SIZE, bytes)?;
                Ok(Self::Terminate)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerPacket {
    pub sequence: u32,
    pub message: ServerMessage,
}

impl ServerPacket {
    pub fn new(sequence: u32, message: ServerMessage) -> Self {
        Self { sequence, message }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let type_id = self.message.packet_type().id() as u32;
        put_u32(&mut buf, (self.sequence & SERVER_SEQUENCE_MASK) | (type_id << SERVER_SEQUENCE_BITS));

        match &self.message {
            ServerMessage::Hello(hello) => {
                buf.push(hello.sprites.len() as u8);
                buf.push(hello.player_id);
                put_u32(&mut buf, hello.map.width());
                put_u32(&mut buf, hello.map.height());
                for record in &hello.sprites {
                    put_sprite_record(&mut buf, record);
                }
                buf.extend_from_slice(&hello.map.pack_bits());
            }
            ServerMessage::Update(update) => {
                put_f32(&mut buf, update.timestamp);
                buf.push(update.id);
                put_transform(&mut buf, &update.transform);
            }
            ServerMessage::Create(record) => put_sprite_record(&mut buf, record),
            ServerMessage::Destroy(desc) => put_sprite_desc(&mut buf, desc),
            ServerMessage::Wait {
                seconds,
                waiting_for_players,
            } => {
                let flag = if *waiting_for_players { WAIT_FLAG } else { 0 };
                put_u32(&mut buf, (seconds & !WAIT_FLAG) | flag);
            }
            ServerMessage::Terminate => {}
        }
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        let header = ServerHeader::decode(bytes)?;
        let packet_type = ServerPacketType::try_from(header.type_id)?;
        Ok(Self {
            sequence: header.sequence,
            message: ServerMessage::decode_body(packet_type, bytes)?,
        })
    }
}

fn check_max(bytes: &[u8]) -> Result<(), PacketError> {
    if bytes.len() > MAX_PACKET_SIZE {
        return Err(PacketError::TooLarge(bytes.len()));
    }
    Ok(())
}

fn expect_size(packet: &'static str, expected: usize, bytes: &[u8]) -> Result<(), PacketError> {
    if bytes.len() != expected {
        return Err(PacketError::SizeMismatch {
            packet,
            expected,
            got: bytes.len(),
        });
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], PacketError> {
        let end = self.offset + N;
        let chunk = self.bytes.get(self.offset..end).ok_or(PacketError::Truncated {
            needed: end,
            got: self.bytes.len(),
        })?;
        self.offset = end;
        let mut out = [0; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    fn skip(&mut self, count: usize) -> Result<(), PacketError> {
        let end = self.offset + count;
        if end > self.bytes.len() {
            return Err(PacketError::Truncated {
                needed: end,
                got: self.bytes.len(),
            });
        }
        self.offset = end;
        Ok(())
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.offset.min(self.bytes.len())..]
    }

    fn u8(&mut self) -> Result<u8, PacketError> {
        Ok(self.take::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, PacketError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    fn f32(&mut self) -> Result<f32, PacketError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    fn vec2(&mut self) -> Result<Vec2, PacketError> {
        Ok(Vec2::new(self.f32()?, self.f32()?))
    }

    fn sprite_desc(&mut self) -> Result<SpriteDesc, PacketError> {
        let [kind, id, owner, field] = self.take::<4>()?;
        Ok(SpriteDesc {
            kind,
            id,
            owner,
            field,
        })
    }

    fn transform(&mut self) -> Result<Transform, PacketError> {
        Ok(Transform {
            rotation: self.f32()?,
            position: self.vec2()?,
            velocity: self.vec2()?,
        })
    }

    fn sprite_record(&mut self) -> Result<SpriteRecord, PacketError> {
        Ok(SpriteRecord {
            desc: self.sprite_desc()?,
            transform: self.transform()?,
        })
    }
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_sprite_desc(buf: &mut Vec<u8>, desc: &SpriteDesc) {
    buf.extend_from_slice(&[desc.kind, desc.id, desc.owner, desc.field]);
}

fn put_transform(buf: &mut Vec<u8>, transform: &Transform) {
    put_f32(buf, transform.rotation);
    put_f32(buf, transform.position.x);
    put_f32(buf, transform.position.y);
    put_f32(buf, transform.velocity.x);
    put_f32(buf, transform.velocity.y);
}

fn put_sprite_record(buf: &mut Vec<u8>, record: &SpriteRecord) {
    put_sprite_desc(buf, &record.desc);
    put_transform(buf, &record.transform);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_header_packs_sequence_and_type() {
        let packet = ClientPacket::new(0x4000_0005, 0xDEAD_BEEF, ClientMessage::Fire);
        let bytes = packet.encode();
        assert_eq!(bytes.len(), 8);
        // Sequence is masked to 30 bits, type 3 lands in the top two bits
        assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0xC000_0005);
        assert_eq!(&bytes[4..], &0xDEAD_BEEFu32.to_le_bytes());
    }

    #[test]
    fn test_client_update_layout() {
        let packet = ClientPacket::new(
            7,
            1,
            ClientMessage::Update {
                keys: HeldKeys::FORWARD | HeldKeys::LEFT,
                rotation: 1.5,
                timestamp: 2.25,
            },
        );
        let bytes = packet.encode();
        assert_eq!(bytes.len(), 20);
        assert_eq!(&bytes[8..12], &[1, 0, 0, 1]);
        assert_eq!(&bytes[12..16], &1.5f32.to_le_bytes());
        assert_eq!(&bytes[16..20], &2.25f32.to_le_bytes());
        assert_eq!(ClientPacket::decode(&bytes), Ok(packet));
    }

    #[test]
    fn test_ready_is_nine_bytes() {
        let bytes = ClientPacket::new(1, 2, ClientMessage::Ready(true)).encode();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[8], 1);
    }

    #[test]
    fn test_server_header_splits_29_bits() {
        let word: u32 = 123 | (4 << 29);
        let header = ServerHeader::decode(&word.to_le_bytes()).unwrap();
        assert_eq!(header.sequence, 123);
        assert_eq!(header.type_id, 4);
    }

    #[test]
    fn test_wait_flag_is_top_bit() {
        let packet = ServerPacket::new(
            3,
            ServerMessage::Wait {
                seconds: 12,
                waiting_for_players: true,
            },
        );
        let bytes = packet.encode();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[4..], &(12u32 | 1 << 31).to_le_bytes());
        assert_eq!(ServerPacket::decode(&bytes), Ok(packet));
    }

    #[test]
    fn test_update_size_is_checked() {
        let packet = ServerPacket::new(
            1,
            ServerMessage::Update(SpriteUpdate {
                timestamp: 1.0,
                id: 2,
                transform: Transform::default(),
            }),
        );
        let mut bytes = packet.encode();
        assert_eq!(bytes.len(), 29);
        bytes.push(0);
        assert_eq!(
            ServerPacket::decode(&bytes),
            Err(PacketError::SizeMismatch {
                packet: "update",
                expected: 29,
                got: 30
            })
        );
    }

    #[test]
    fn test_hello_with_exact_tail() {
        let map = Map::from_rows(&["####", "#..#"]).unwrap();
        let record = |id| SpriteRecord {
            desc: SpriteDesc {
                kind: 0,
                id,
                owner: id,
                field: 0,
            },
            transform: Transform {
                rotation: 0.5,
                position: Vec2::new(1.5, 1.5),
                velocity: Vec2::ZERO,
            },
        };
        let hello = ServerPacket::new(
            0,
            ServerMessage::Hello(Hello {
                player_id: 1,
                map,
                sprites: vec![record(1), record(2)],
            }),
        );
        let bytes = hello.encode();
        assert_eq!(bytes.len(), HELLO_SIZE + 2 * SPRITE_RECORD_SIZE + 1);
        assert_eq!(ServerPacket::decode(&bytes), Ok(hello));

        assert!(matches!(
            ServerPacket::decode(&bytes[..bytes.len() - 1]),
            Err(PacketError::SizeMismatch { packet: "hello", .. })
        ));
    }

    #[test]
    fn test_hello_rejects_oversized_map() {
        let mut bytes = Vec::new();
        put_u32(&mut bytes, 0);
        bytes.push(0);
        bytes.push(0);
        put_u32(&mut bytes, 65);
        put_u32(&mut bytes, 1);
        bytes.extend_from_slice(&[0; 9]);
        assert_eq!(
            ServerPacket::decode(&bytes),
            Err(PacketError::MapTooLarge { width: 65, height: 1 })
        );
    }

    #[test]
    fn test_rejects_unknown_type_and_oversized_packets() {
        let word: u32 = 6 << 29;
        assert_eq!(ServerPacket::decode(&word.to_le_bytes()), Err(PacketError::UnknownType(6)));
        assert_eq!(
            ServerHeader::decode(&[0; MAX_PACKET_SIZE + 1]),
            Err(PacketError::TooLarge(MAX_PACKET_SIZE + 1))
        );
        assert!(matches!(ServerHeader::decode(&[0; 3]), Err(PacketError::Truncated { .. })));
    }
}
