use std::io;

use thiserror::Error;

use crate::player::{BULLET_DAMAGE, HeldKeys, PLAYER_MAX_HEALTH, PLAYER_RUN_SPEED, Player};
use crate::sprite::{FIRING_FRAME, Sprite, SpriteType};
use crate::world::World;

use super::connection::ConnectionState;
use super::prediction::{Anchor, InputLog, InputRing, reconcile};
use super::protocol::{
    ClientMessage, ClientPacket, Hello, PacketError, ServerHeader, ServerMessage, ServerPacketType,
    SpriteDesc, SpriteRecord, SpriteUpdate,
};
use super::stats::NetworkStats;
use super::tracking::{SendSequence, SequenceGate};
use super::transport::Transport;

/// Why an inbound packet was dropped.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ReceiveError {
    #[error("malformed packet: {0}")]
    Malformed(#[from] PacketError),
    #[error("sequence {got} outside the window around {expected}")]
    Sequence { expected: u32, got: u32 },
    #[error("{packet} packet not accepted while {state}")]
    WrongState {
        packet: &'static str,
        state: ConnectionState,
    },
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    #[error("short send: {sent} of {expected} bytes")]
    Short { sent: usize, expected: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    /// Match starts in this many seconds.
    Countdown(u32),
    /// Not enough players yet.
    Indefinite,
}

/// Things the presentation layer may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    MatchStarted,
    Wait(WaitStatus),
    /// The local player was destroyed; the camera now follows `killer`.
    LocalPlayerKilled { killer: u8 },
    /// A bullet fired by the local player hit `victim`.
    HitScored { victim: u8 },
    Damaged { health: i32 },
    /// The last remote player sprite was destroyed.
    LastPlayerStanding,
    Terminated,
}

/// Client side of the protocol: owns sequencing, connection state, the
/// input history and the mapping from server packets to world changes.
#[derive(Debug, Default)]
pub struct Session {
    state: ConnectionState,
    game_id: u32,
    token: u32,
    send_sequence: SendSequence,
    gate: SequenceGate,
    local_id: Option<u8>,
    epoch: Option<f32>,
    inputs: InputRing,
    stats: NetworkStats,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session for `game_id`, authenticated by `token`.
    pub fn init(&mut self, game_id: u32, token: u32) {
        self.game_id = game_id;
        self.token = token;
        self.send_sequence.reset();
        self.gate.reset();
        self.inputs.clear();
        self.local_id = None;
        self.epoch = None;
        self.set_state(ConnectionState::Connected);
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            log::info!("switching connection state from {} to {}", self.state, state);
            self.state = state;
        }
    }

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn local_id(&self) -> Option<u8> {
        self.local_id
    }

    pub fn epoch(&self) -> Option<f32> {
        self.epoch
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn inputs(&self) -> &InputRing {
        &self.inputs
    }

    /// Seconds since the match started, or zero before it has.
    pub fn timestamp(&self, now: f32) -> f32 {
        now - self.epoch.unwrap_or(now)
    }

    /// Logs the velocity the player's held keys now produce.
    pub fn record_input(&mut self, player: &Player, keys: HeldKeys, now: f32) {
        let velocity = keys.movement_direction(player.direction) * PLAYER_RUN_SPEED;
        self.inputs.push(InputLog {
            timestamp: self.timestamp(now),
            velocity,
        });
    }

    pub fn join(&mut self, transport: &mut impl Transport) -> Result<(), SendError> {
        self.send(transport, ClientMessage::Ready(false))?;
        self.set_state(ConnectionState::Joining);
        Ok(())
    }

    pub fn set_ready(&mut self, transport: &mut impl Transport, ready: bool) -> Result<(), SendError> {
        self.send(transport, ClientMessage::Ready(ready))
    }

    pub fn leave(&mut self, transport: &mut impl Transport) -> Result<(), SendError> {
        self.set_state(ConnectionState::Connected);
        self.send(transport, ClientMessage::Leave)
    }

    pub fn send_update(
        &mut self,
        transport: &mut impl Transport,
        keys: HeldKeys,
        rotation: f32,
        now: f32,
    ) -> Result<(), SendError> {
        let timestamp = self.timestamp(now);
        self.send(
            transport,
            ClientMessage::Update {
                keys,
                rotation,
                timestamp,
            },
        )
    }

    pub fn fire(&mut self, transport: &mut impl Transport) -> Result<(), SendError> {
        self.send(transport, ClientMessage::Fire)
    }

    /// Encodes and sends one packet. Any failure drops the session to
    /// Disconnected.
    fn send(&mut self, transport: &mut impl Transport, message: ClientMessage) -> Result<(), SendError> {
        let name = message.name();
        let packet = ClientPacket::new(self.send_sequence.next(), self.token, message);
        let bytes = packet.encode();

        let result = match transport.send(&bytes) {
            Ok(sent) if sent == bytes.len() => Ok(()),
            Ok(sent) => Err(SendError::Short {
                sent,
                expected: bytes.len(),
            }),
            Err(err) => Err(SendError::Transport(err)),
        };

        match &result {
            Ok(()) => {
                self.stats.packets_sent += 1;
                self.stats.bytes_sent += bytes.len() as u64;
                log::trace!("sent {} packet ({} bytes)", name, bytes.len());
            }
            Err(err) => {
                self.stats.send_failures += 1;
                log::warn!("failed to send {} packet: {}", name, err);
                self.set_state(ConnectionState::Disconnected);
            }
        }
        result
    }

    /// Validates one inbound packet and applies it to `world`. Dropped
    /// packets are logged and reported as errors; none of them are fatal.
    pub fn receive(
        &mut self,
        world: &mut World,
        packet: &[u8],
        now: f32,
    ) -> Result<Vec<SessionEvent>, ReceiveError> {
        self.stats.packets_received += 1;
        self.stats.bytes_received += packet.len() as u64;

        let result = self.process(world, packet, now);
        if let Err(err) = &result {
            match err {
                ReceiveError::Malformed(_) => self.stats.dropped_malformed += 1,
                ReceiveError::Sequence { .. } => self.stats.dropped_sequence += 1,
                ReceiveError::WrongState { .. } => self.stats.dropped_state += 1,
            }
            log::warn!("dropping packet: {}", err);
        }
        result
    }

    fn process(
        &mut self,
        world: &mut World,
        packet: &[u8],
        now: f32,
    ) -> Result<Vec<SessionEvent>, ReceiveError> {
        let header = ServerHeader::decode(packet)?;
        self.gate.accept(header.sequence).map_err(|expected| ReceiveError::Sequence {
            expected,
            got: header.sequence,
        })?;

        let packet_type = ServerPacketType::try_from(header.type_id)?;
        if !self.state.accepts(packet_type) {
            return Err(ReceiveError::WrongState {
                packet: packet_type.name(),
                state: self.state,
            });
        }
        log::trace!("received {} packet #{}", packet_type.name(), header.sequence);

        let mut events = Vec::new();
        match ServerMessage::decode_body(packet_type, packet)? {
            ServerMessage::Hello(hello) => self.on_hello(world, hello),
            ServerMessage::Update(update) => self.on_update(world, &update, now),
            ServerMessage::Create(record) => self.spawn_sprite(world, &record),
            ServerMessage::Destroy(desc) => self.on_destroy(world, &desc, &mut events),
            ServerMessage::Wait {
                seconds,
                waiting_for_players,
            } => events.push(self.on_wait(seconds, waiting_for_players, now)),
            ServerMessage::Terminate => {
                log::info!("server terminated the session");
                self.set_state(ConnectionState::Disconnected);
                events.push(SessionEvent::Terminated);
            }
        }
        Ok(events)
    }

    fn on_hello(&mut self, world: &mut World, hello: Hello) {
        log::info!(
            "joined game {:08x} as sprite {} on a {}x{} map",
            self.game_id,
            hello.player_id,
            hello.map.width(),
            hello.map.height()
        );
        world.map = hello.map;
        world.sprites.clear();
        world.player.health = PLAYER_MAX_HEALTH;
        self.local_id = Some(hello.player_id);
        self.inputs.clear();

        for record in &hello.sprites {
            self.spawn_sprite(world, record);
        }
        world.camera.position = world.player.position;
        self.set_state(ConnectionState::Waiting);
    }

    fn spawn_sprite(&mut self, world: &mut World, record: &SpriteRecord) {
        let desc = record.desc;
        if Some(desc.id) == self.local_id {
            let transform = &record.transform;
            world.teleport_player(transform.position, transform.rotation);
            return;
        }

        let Some(sprite) = Sprite::from_record(record) else {
            log::warn!("ignoring sprite {} of unknown type {}", desc.id, desc.kind);
            return;
        };
        let kind = sprite.kind;
        if world.sprites.insert(sprite).is_none() {
            log::warn!("sprite list full, dropping sprite {}", desc.id);
            return;
        }
        log::debug!("created {:?} sprite {} (owner {})", kind, desc.id, desc.owner);

        if kind == SpriteType::Bullet {
            if let Some(owner) = world.sprites.get_mut(desc.owner) {
                owner.anim_frame = FIRING_FRAME;
            }
        }
    }

    fn on_update(&mut self, world: &mut World, update: &SpriteUpdate, now: f32) {
        let transform = &update.transform;
        if Some(update.id) != self.local_id {
            if let Some(sprite) = world.sprites.get_mut(update.id) {
                sprite.apply_transform(transform);
            }
            return;
        }

        match self.epoch {
            Some(epoch) => {
                let anchor = Anchor {
                    timestamp: update.timestamp,
                    position: transform.position,
                    velocity: transform.velocity,
                };
                world.player.position = reconcile(&world.map, &mut self.inputs, anchor, now - epoch);
            }
            None => world.player.position = transform.position,
        }
    }

    fn on_destroy(&mut self, world: &mut World, desc: &SpriteDesc, events: &mut Vec<SessionEvent>) {
        if Some(desc.id) == self.local_id {
            log::info!("local player killed by sprite {}", desc.field);
            world.sprites.track(desc.field);
            self.local_id = None;
            events.push(SessionEvent::LocalPlayerKilled { killer: desc.field });
            return;
        }

        if world.sprites.tracked_id() == Some(desc.id) {
            world.sprites.track(desc.field);
        }
        if world.sprites.remove(desc.id).is_some() {
            log::debug!("destroyed sprite {} (field {})", desc.id, desc.field);
        }

        match SpriteType::try_from(desc.kind) {
            Ok(SpriteType::Bullet) if desc.field != 0 => {
                if self.local_id == Some(desc.owner) {
                    events.push(SessionEvent::HitScored { victim: desc.field });
                } else if self.local_id == Some(desc.field) {
                    world.player.take_damage(BULLET_DAMAGE);
                    events.push(SessionEvent::Damaged {
                        health: world.player.health,
                    });
                }
            }
            Ok(SpriteType::Player) if world.sprites.player_count() == 0 => {
                events.push(SessionEvent::LastPlayerStanding);
            }
            _ => {}
        }
    }

    fn on_wait(&mut self, seconds: u32, waiting_for_players: bool, now: f32) -> SessionEvent {
        if !waiting_for_players && seconds == 0 {
            log::info!("match started");
            self.epoch = Some(now);
            self.inputs.clear();
            self.set_state(ConnectionState::Updating);
            return SessionEvent::MatchStarted;
        }

        let status = if waiting_for_players {
            WaitStatus::Indefinite
        } else {
            WaitStatus::Countdown(seconds)
        };
        log::debug!("waiting: {:?}", status);
        SessionEvent::Wait(status)
    }
}
