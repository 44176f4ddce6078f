use std::io;

/// Outbound half of the packet channel. Inbound packets are pushed into the
/// session by whoever owns the socket.
pub trait Transport {
    /// Sends one datagram, returning the number of bytes written.
    fn send(&mut self, bytes: &[u8]) -> io::Result<usize>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, bytes: &[u8]) -> io::Result<usize> {
        (**self).send(bytes)
    }
}
