pub mod map;
pub mod math;
pub mod net;
pub mod physics;
pub mod player;
pub mod render;
pub mod settings;
pub mod simulation;
pub mod sprite;
pub mod world;

pub use map::{MAX_MAP_HEIGHT, MAX_MAP_WIDTH, Map};
pub use net::{
    ClientMessage, ClientPacket, ConnectionState, InputRing, NetworkStats, PacketError, ReceiveError,
    SendError, SequenceGate, ServerMessage, ServerPacket, Session, SessionEvent, Transport, WaitStatus,
};
pub use physics::{RayHit, WallSide, move_and_collide, trace_ray};
pub use player::{HeldKeys, Player};
pub use render::{Camera, Framebuffer, RenderSink, Renderer};
pub use settings::Settings;
pub use simulation::{FixedTimestep, step};
pub use sprite::{Sprite, SpriteType, Sprites};
pub use world::World;
