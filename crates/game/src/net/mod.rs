mod connection;
mod prediction;
mod protocol;
mod session;
mod stats;
mod tracking;
mod transport;

pub use connection::ConnectionState;
pub use prediction::{Anchor, INPUT_RING_SIZE, InputLog, InputRing, reconcile};
pub use protocol::{
    CLIENT_SEQUENCE_MASK, ClientMessage, ClientPacket, HELLO_SIZE, Hello, MAX_PACKET_SIZE, PacketError,
    SERVER_SEQUENCE_MASK, SPRITE_RECORD_SIZE, ServerHeader, ServerMessage, ServerPacket,
    ServerPacketType, SpriteDesc, SpriteRecord, SpriteUpdate, Transform,
};
pub use session::{ReceiveError, SendError, Session, SessionEvent, WaitStatus};
pub use stats::NetworkStats;
pub use tracking::{MAX_PACKET_DROP, SendSequence, SequenceGate};
pub use transport::Transport;
