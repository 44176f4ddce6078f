use std::io;
use std::thread;
use std::time::{Duration, Instant};

use gloom::{ConnectionState, FixedTimestep, Framebuffer, Settings, WaitStatus};

use super::config::ClientConfig;
use super::transport::UdpTransport;
use crate::debug::FrameStats;
use crate::game::GameState;

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Owns the socket, the game and the framebuffer, and drives them from a
/// fixed-rate loop.
pub struct NetworkClient {
    transport: UdpTransport,
    game: GameState,
    framebuffer: Framebuffer,
    timestep: FixedTimestep,
    stats: FrameStats,
    config: ClientConfig,
    started: Instant,
}

impl NetworkClient {
    pub fn new(config: ClientConfig, settings: &Settings) -> io::Result<Self> {
        let transport = UdpTransport::connect(config.server)?;
        let mut game = GameState::new(settings, config.auto_ready);
        game.connect(config.game_id, config.token);
        log::info!(
            "connecting to game {:08x} on {}",
            config.game_id,
            transport.remote_addr()
        );

        Ok(Self {
            transport,
            game,
            framebuffer: Framebuffer::new(),
            timestep: FixedTimestep::new(config.frame_rate),
            stats: FrameStats::new(),
            config,
            started: Instant::now(),
        })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    fn clock(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Runs until the session is over or the configured duration passes.
    pub fn run(&mut self) {
        let frame_interval = Duration::from_secs_f32(self.timestep.dt());
        let mut last_frame = Instant::now();
        let mut last_report = last_frame;
        let mut wait_status = None;

        loop {
            let frame_start = Instant::now();
            let delta = frame_start.duration_since(last_frame).as_secs_f32();
            last_frame = frame_start;

            let now = self.clock();
            self.pump_network(now);

            self.timestep.accumulate(delta);
            while self.timestep.consume_tick() {
                let dt = self.timestep.dt();
                self.game
                    .tick(dt, now, &mut self.transport, &mut self.framebuffer);
            }
            self.stats.record_frame(delta);

            if self.game.wait_status() != wait_status {
                wait_status = self.game.wait_status();
                match wait_status {
                    Some(WaitStatus::Countdown(seconds)) => log::info!("match starts in {}s", seconds),
                    Some(WaitStatus::Indefinite) => log::info!("waiting for more players"),
                    None => {}
                }
            }

            if last_report.elapsed() >= REPORT_INTERVAL {
                self.stats.log_summary(self.game.session.stats());
                last_report = Instant::now();
            }

            if self.game.session.state() == ConnectionState::Disconnected
                && self.game.screen().is_final()
            {
                log::info!("session ended on the {} screen", self.game.screen());
                break;
            }
            if self
                .config
                .duration
                .is_some_and(|limit| self.started.elapsed() >= limit)
            {
                log::info!("run duration reached");
                break;
            }

            thread::sleep(frame_interval.saturating_sub(frame_start.elapsed()));
        }
    }

    fn pump_network(&mut self, now: f32) {
        match self.transport.receive() {
            Ok(packets) => {
                for packet in packets {
                    self.game.on_packet(&packet, now);
                }
            }
            Err(e) => {
                log::warn!("receive failed: {}", e);
                self.game.on_transport_closed();
            }
        }
    }

    /// Leaves the game if still connected.
    pub fn shutdown(&mut self) {
        self.game.exit(&mut self.transport);
    }
}
