mod debug;
mod game;
pub mod net;
mod screenshot;
mod settings;

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use net::{ClientConfig, DEFAULT_FRAME_RATE, NetworkClient};

#[derive(Parser)]
#[command(name = "gloom")]
#[command(about = "Gloom raycasting client")]
struct Args {
    #[arg(short, long, help = "Server address to connect to (e.g., 127.0.0.1:27015)")]
    server: String,

    #[arg(short, long, value_parser = parse_hex, help = "Game id, in hex")]
    game: u32,

    #[arg(short, long, help = "Player token issued by the lobby")]
    token: u32,

    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, help = "Ticks per second")]
    frame_rate: u32,

    #[arg(long, default_value = "gloom-settings.json", help = "Settings file")]
    settings: PathBuf,

    #[arg(long, help = "Write the last frame to this PNG on exit")]
    screenshot: Option<PathBuf>,

    #[arg(long, help = "Mark ready as soon as the game accepts us")]
    ready: bool,

    #[arg(long, help = "Stop after this many seconds")]
    duration: Option<f32>,
}

fn parse_hex(value: &str) -> Result<u32, String> {
    let digits = value.trim_start_matches("0x");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid game id {:?}: {}", value, e))
}

fn resolve(addr: &str) -> anyhow::Result<SocketAddr> {
    addr.to_socket_addrs()
        .with_context(|| format!("resolving {}", addr))?
        .next()
        .with_context(|| format!("no address for {}", addr))
}

impl Args {
    fn into_config(self) -> anyhow::Result<ClientConfig> {
        Ok(ClientConfig {
            server: resolve(&self.server)?,
            game_id: self.game,
            token: self.token,
            frame_rate: self.frame_rate,
            settings_path: self.settings,
            screenshot: self.screenshot,
            auto_ready: self.ready,
            duration: self.duration.map(Duration::from_secs_f32),
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;
    let settings = settings::load(&config.settings_path);

    let mut client = NetworkClient::new(config.clone(), &settings)
        .with_context(|| format!("connecting to {}", config.server))?;
    client.run();
    client.shutdown();

    let stats = client.game().session.stats();
    log::info!(
        "{} packets received, {:.1}% dropped, {} sent",
        stats.packets_received,
        stats.drop_percent(),
        stats.packets_sent
    );

    if let Some(path) = &config.screenshot {
        screenshot::save_png(client.framebuffer(), path)?;
    }
    settings::save(&config.settings_path, &settings)?;
    Ok(())
}
