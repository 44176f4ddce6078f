pub mod client;
pub mod config;
pub mod transport;

pub use client::NetworkClient;
pub use config::{ClientConfig, DEFAULT_FRAME_RATE, DEFAULT_PORT};
pub use transport::UdpTransport;
