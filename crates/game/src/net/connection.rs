use std::fmt;

use super::protocol::ServerPacketType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Session initialised, not yet part of a game.
    Connected,
    /// Join requested, waiting for Hello.
    Joining,
    /// In the lobby, waiting for the match to start.
    Waiting,
    /// Live play.
    Updating,
}

impl ConnectionState {
    /// Whether a packet of `packet_type` may be processed in this state.
    pub fn accepts(self, packet_type: ServerPacketType) -> bool {
        match packet_type {
            ServerPacketType::Terminate => true,
            ServerPacketType::Hello => self == Self::Joining,
            ServerPacketType::Wait => self == Self::Waiting,
            ServerPacketType::Update | ServerPacketType::Create | ServerPacketType::Destroy => {
                matches!(self, Self::Waiting | Self::Updating)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Joining => "joining",
            Self::Waiting => "waiting",
            Self::Updating => "updating",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
