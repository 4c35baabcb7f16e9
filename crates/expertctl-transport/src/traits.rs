use std::net::SocketAddr;

use bytes::Bytes;

use crate::error::Result;

/// One received datagram and where it came from.
#[derive(Debug, Clone)]
pub struct Datagram {
    pub source: SocketAddr,
    pub payload: Bytes,
}

/// Destination for outbound command datagrams.
///
/// Implemented by [`crate::CommandSender`]; tests substitute a recorder.
pub trait CommandSink {
    fn send_datagram(&mut self, datagram: &[u8]) -> Result<()>;
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
    fn send_datagram(&mut self, datagram: &[u8]) -> Result<()> {
        (**self).send_datagram(datagram)
    }
}
