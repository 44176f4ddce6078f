use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 27015;
pub const DEFAULT_FRAME_RATE: u32 = 60;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: SocketAddr,
    pub game_id: u32,
    pub token: u32,
    pub frame_rate: u32,
    pub settings_path: PathBuf,
    pub screenshot: Option<PathBuf>,
    pub auto_ready: bool,
    /// Stop after this long; `None` runs until the session ends.
    pub duration: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            game_id: 0,
            token: 0,
            frame_rate: DEFAULT_FRAME_RATE,
            settings_path: PathBuf::from("gloom-settings.json"),
            screenshot: None,
            auto_ready: false,
            duration: None,
        }
    }
}
