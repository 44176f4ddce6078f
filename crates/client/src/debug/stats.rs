use std::collections::VecDeque;

use gloom::NetworkStats;

const SAMPLE_COUNT: usize = 60;

/// Rolling frame rate over the last second or so of frames.
pub struct FrameStats {
    frame_times: VecDeque<f32>,
    fps: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(SAMPLE_COUNT),
            fps: 0.0,
        }
    }

    pub fn record_frame(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        if self.frame_times.len() >= SAMPLE_COUNT {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);

        let avg_dt: f32 = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.fps = 1.0 / avg_dt;
    }

    pub fn log_summary(&self, net: &NetworkStats) {
        log::debug!(
            "{:.1} fps, {} packets sent, {} received, {:.1}% dropped ({} send failures)",
            self.fps,
            net.packets_sent,
            net.packets_received,
            net.drop_percent(),
            net.send_failures
        );
    }
}
