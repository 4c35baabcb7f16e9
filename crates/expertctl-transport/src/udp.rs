use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traits::{CommandSink, Datagram};
use crate::{COMMAND_PORT, DEFAULT_RECV_BUFFER, STATUS_PORT};

/// Ports and buffer sizing for talking to one amplifier.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Port status datagrams are received on. Default: 45454.
    pub status_port: u16,
    /// Port commands are sent to. Default: 45455.
    pub command_port: u16,
    /// Receive buffer size in bytes. Default: 2048.
    pub recv_buffer_size: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            status_port: STATUS_PORT,
            command_port: COMMAND_PORT,
            recv_buffer_size: DEFAULT_RECV_BUFFER,
        }
    }
}

/// Socket bound to the status port.
///
/// Binds with `SO_REUSEADDR` (and `SO_REUSEPORT` on Unix) so it can coexist
/// with other listeners on the same host.
pub struct StatusListener {
    socket: UdpSocket,
    port: u16,
    recv_buffer_size: usize,
}

impl StatusListener {
    /// Bind the status port on all interfaces.
    pub fn bind(port: u16, recv_buffer_size: usize) -> Result<Self> {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
        let bind_err = |source| TransportError::Bind { addr, source };

        let socket =
            Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(bind_err)?;
        socket.set_reuse_address(true).map_err(bind_err)?;
        #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
        socket.set_reuse_port(true).map_err(bind_err)?;
        socket.bind(&addr.into()).map_err(bind_err)?;

        let socket: UdpSocket = socket.into();
        let port = socket.local_addr().map(|a| a.port()).unwrap_or(port);
        debug!(port, "listening for status datagrams");

        Ok(Self {
            socket,
            port,
            recv_buffer_size,
        })
    }

    /// Bind using the status port and buffer size from `config`.
    pub fn bind_with_config(config: &TransportConfig) -> Result<Self> {
        Self::bind(config.status_port, config.recv_buffer_size)
    }

    /// The port this listener is bound to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Receive the next datagram from any source (blocking, bounded by `timeout`).
    pub fn recv(&self, timeout: Duration) -> Result<Datagram> {
        self.recv_matching(timeout, |_| true)
    }

    /// Receive the next datagram sent by `expected`, skipping everything else.
    pub fn recv_from(&self, expected: IpAddr, timeout: Duration) -> Result<Datagram> {
        self.recv_matching(timeout, |source| source.ip() == expected)
    }

    fn recv_matching(
        &self,
        timeout: Duration,
        accept: impl Fn(&SocketAddr) -> bool,
    ) -> Result<Datagram> {
        let deadline = Instant::now() + timeout;
        let mut buf = BytesMut::zeroed(self.recv_buffer_size);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.timed_out(timeout));
            }
            // A zero read timeout means "block forever" to the OS.
            self.socket.set_read_timeout(Some(remaining))?;

            match self.socket.recv_from(&mut buf) {
                Ok((len, source)) if accept(&source) => {
                    debug!(%source, len, "received status datagram");
                    buf.truncate(len);
                    return Ok(Datagram {
                        source,
                        payload: buf.freeze(),
                    });
                }
                Ok((len, source)) => {
                    trace!(%source, len, "ignoring datagram from other sender");
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut =>
                {
                    return Err(self.timed_out(timeout));
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn timed_out(&self, timeout: Duration) -> TransportError {
        TransportError::Timeout {
            port: self.port,
            timeout,
        }
    }
}

/// Socket for sending command datagrams to one amplifier.
pub struct CommandSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl CommandSender {
    /// Open an ephemeral socket aimed at `target`.
    pub fn open(target: SocketAddr) -> Result<Self> {
        let local = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
        let socket = UdpSocket::bind(local).map_err(|source| TransportError::Bind {
            addr: local,
            source,
        })?;
        debug!(%target, "opened command socket");
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl CommandSink for CommandSender {
    fn send_datagram(&mut self, datagram: &[u8]) -> Result<()> {
        let sent = self.socket.send_to(datagram, self.target)?;
        if sent != datagram.len() {
            return Err(TransportError::ShortSend {
                sent,
                expected: datagram.len(),
            });
        }
        trace!(target = %self.target, len = sent, "sent command datagram");
        Ok(())
    }
}

impl std::fmt::Debug for StatusListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusListener")
            .field("port", &self.port)
            .finish()
    }
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender")
            .field("target", &self.target)
            .finish()
    }
}
