use std::io;
use std::net::{SocketAddr, UdpSocket};

use gloom::Transport;
use gloom::net::MAX_PACKET_SIZE;

/// Non-blocking UDP socket connected to a single server.
pub struct UdpTransport {
    socket: UdpSocket,
    remote_addr: SocketAddr,
    recv_buffer: [u8; MAX_PACKET_SIZE],
}

impl UdpTransport {
    pub fn connect(remote_addr: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if remote_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(remote_addr)?;
        socket.set_nonblocking(true)?;
        log::info!("bound {} for server {}", socket.local_addr()?, remote_addr);

        Ok(Self {
            socket,
            remote_addr,
            recv_buffer: [0u8; MAX_PACKET_SIZE],
        })
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Drains every datagram waiting on the socket.
    pub fn receive(&mut self) -> io::Result<Vec<Vec<u8>>> {
        let mut packets = Vec::new();
        loop {
            match self.socket.recv(&mut self.recv_buffer) {
                Ok(size) => packets.push(self.recv_buffer[..size].to_vec()),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e),
            }
        }
        Ok(packets)
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.socket.send(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_round_trip() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut transport = UdpTransport::connect(server.local_addr().unwrap()).unwrap();

        assert_eq!(transport.send(&[1, 2, 3, 4]).unwrap(), 4);
        let mut buf = [0u8; 16];
        let (size, client_addr) = server.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..size], &[1, 2, 3, 4]);

        server.send_to(&[9, 8], client_addr).unwrap();
        let mut received = Vec::new();
        for _ in 0..100 {
            received.extend(transport.receive().unwrap());
            if !received.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(received, vec![vec![9, 8]]);
    }
}
