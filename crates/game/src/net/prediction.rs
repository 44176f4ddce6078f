use glam::Vec2;

use crate::map::Map;
use crate::physics::move_and_collide;
use crate::sprite::PLAYER_RADIUS;

pub const INPUT_RING_SIZE: usize = 128;

/// Velocity the local player switched to at `timestamp` (match-relative seconds).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputLog {
    pub timestamp: f32,
    pub velocity: Vec2,
}

/// Fixed-size history of input changes, oldest first. A full ring
/// overwrites its oldest entry.
#[derive(Debug, Clone)]
pub struct InputRing {
    entries: [InputLog; INPUT_RING_SIZE],
    head: usize,
    tail: usize,
}

impl Default for InputRing {
    fn default() -> Self {
        Self::new()
    }
}

impl InputRing {
    pub fn new() -> Self {
        Self {
            entries: [InputLog::default(); INPUT_RING_SIZE],
            head: 0,
            tail: 0,
        }
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    pub fn len(&self) -> usize {
        (self.head + INPUT_RING_SIZE - self.tail) % INPUT_RING_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn push(&mut self, entry: InputLog) {
        self.entries[self.head] = entry;
        self.head = (self.head + 1) % INPUT_RING_SIZE;
        if self.head == self.tail {
            self.tail = (self.tail + 1) % INPUT_RING_SIZE;
        }
    }

    /// Moves the read cursor past every entry older than `timestamp`.
    pub fn discard_before(&mut self, timestamp: f32) {
        while self.tail != self.head && self.entries[self.tail].timestamp < timestamp {
            self.tail = (self.tail + 1) % INPUT_RING_SIZE;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputLog> {
        let tail = self.tail;
        (0..self.len()).map(move |i| &self.entries[(tail + i) % INPUT_RING_SIZE])
    }
}

/// Authoritative state of the local player at server time `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub timestamp: f32,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Replays the inputs recorded after `anchor` on top of it, through the same
/// collision routine used for prediction, and returns the corrected position
/// at `now`.
pub fn reconcile(map: &Map, inputs: &mut InputRing, anchor: Anchor, now: f32) -> Vec2 {
    inputs.discard_before(anchor.timestamp);

    let mut position = anchor.position;
    let mut velocity = anchor.velocity;
    let mut timestamp = anchor.timestamp;

    for entry in inputs.iter() {
        move_and_collide(map, &mut position, velocity * (entry.timestamp - timestamp), PLAYER_RADIUS);
        velocity = entry.velocity;
        timestamp = entry.timestamp;
    }

    move_and_collide(map, &mut position, velocity * (now - timestamp), PLAYER_RADIUS);
    position
}
