#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub packets_sent: u64,
    pub packets_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub dropped_malformed: u64,
    pub dropped_sequence: u64,
    pub dropped_state: u64,
    pub send_failures: u64,
}

impl NetworkStats {
    pub fn packets_dropped(&self) -> u64 {
        self.dropped_malformed + self.dropped_sequence + self.dropped_state
    }

    /// Share of received packets that were dropped, in percent.
    pub fn drop_percent(&self) -> f32 {
        if self.packets_received == 0 {
            return 0.0;
        }
        self.packets_dropped() as f32 * 100.0 / self.packets_received as f32
    }
}
