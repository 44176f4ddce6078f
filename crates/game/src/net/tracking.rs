use super::protocol::{CLIENT_SEQUENCE_MASK, SERVER_SEQUENCE_BITS, SERVER_SEQUENCE_MASK};

/// How far (in either direction) an inbound sequence may be from the
/// expected one before the packet is dropped.
pub const MAX_PACKET_DROP: u32 = 10;

/// Accepts inbound server sequences close to the expected one. Anything
/// accepted, even a packet later dropped for another reason, moves the
/// expectation forward.
#[derive(Debug, Clone)]
pub struct SequenceGate {
    expected: u32,
    window: u32,
}

impl Default for SequenceGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceGate {
    pub fn new() -> Self {
        Self {
            expected: 0,
            window: MAX_PACKET_DROP,
        }
    }

    /// Gate positioned as if `sequence` was the last accepted packet.
    pub fn with_last_accepted(sequence: u32) -> Self {
        Self {
            expected: sequence.wrapping_add(1) & SERVER_SEQUENCE_MASK,
            window: MAX_PACKET_DROP,
        }
    }

    pub fn expected(&self) -> u32 {
        self.expected
    }

    pub fn reset(&mut self) {
        self.expected = 0;
    }

    /// Accepts `sequence` if it lies within the window, returning the
    /// expected value on rejection.
    pub fn accept(&mut self, sequence: u32) -> Result<(), u32> {
        if distance(sequence, self.expected).unsigned_abs() >= self.window {
            return Err(self.expected);
        }
        self.expected = sequence.wrapping_add(1) & SERVER_SEQUENCE_MASK;
        Ok(())
    }
}

/// Signed distance from `b` to `a` on the 29-bit sequence circle.
fn distance(a: u32, b: u32) -> i32 {
    let diff = a.wrapping_sub(b) & SERVER_SEQUENCE_MASK;
    if diff >= 1 << (SERVER_SEQUENCE_BITS - 1) {
        diff as i32 - (1 << SERVER_SEQUENCE_BITS)
    } else {
        diff as i32
    }
}

/// Outbound 30-bit sequence counter.
#[derive(Debug, Clone, Default)]
pub struct SendSequence {
    next: u32,
}

impl SendSequence {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    pub fn next(&mut self) -> u32 {
        let sequence = self.next;
        self.next = self.next.wrapping_add(1) & CLIENT_SEQUENCE_MASK;
        sequence
    }
}
