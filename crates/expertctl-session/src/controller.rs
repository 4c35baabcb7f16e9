use std::net::{IpAddr, SocketAddr};

use expertctl_codec::volume::clamp_db;
use expertctl_codec::{
    payload_to_db, Command, CommandFrame, CommandKind, StatusSnapshot, VOLUME_MAX_DB,
};
use expertctl_transport::{CommandSender, CommandSink, Datagram, StatusListener, TransportError};
use tracing::{debug, info, warn};

use crate::cache::IpCache;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::repeat::SequenceCounter;

/// One control session with one amplifier.
///
/// Owns the resolved address, the IP cache and the sequence counter. Only
/// one command burst may be in flight per controller; wrap it in a mutex if
/// it has to be shared.
#[derive(Debug)]
pub struct Controller {
    config: SessionConfig,
    address: Option<IpAddr>,
    cache: Option<IpCache>,
    sequence: SequenceCounter,
}

impl Controller {
    pub fn new(config: SessionConfig) -> Self {
        let cache = if config.use_cache && config.address.is_none() {
            match &config.cache_path {
                Some(path) => Some(IpCache::new(path)),
                None => IpCache::default_location(),
            }
        } else {
            None
        };

        Self {
            address: config.address,
            config,
            cache,
            sequence: SequenceCounter::default(),
        }
    }

    /// The amplifier address, once known.
    pub fn address(&self) -> Option<IpAddr> {
        self.address
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sequence value the next transmission will carry.
    pub fn next_sequence(&self) -> u8 {
        self.sequence.peek()
    }

    /// Wait for a broadcast from any amplifier and adopt its address.
    pub fn discover(&mut self) -> Result<StatusSnapshot> {
        let datagram = self.discover_datagram()?;
        Ok(StatusSnapshot::decode(datagram.source.ip(), &datagram.payload))
    }

    /// Like [`Controller::discover`], returning the undecoded datagram.
    pub fn discover_datagram(&mut self) -> Result<Datagram> {
        let datagram = match self.listener()?.recv(self.config.timeout) {
            Ok(datagram) => datagram,
            Err(TransportError::Timeout { .. }) => {
                return Err(SessionError::Discovery {
                    timeout: self.config.timeout,
                })
            }
            Err(err) => return Err(err.into()),
        };

        let addr = datagram.source.ip();
        info!(%addr, "discovered amplifier");
        self.address = Some(addr);
        if let Some(cache) = &self.cache {
            cache.write(addr);
        }
        Ok(datagram)
    }

    /// Current amplifier status.
    pub fn status(&mut self) -> Result<StatusSnapshot> {
        let datagram = self.fetch_datagram()?;
        Ok(StatusSnapshot::decode(datagram.source.ip(), &datagram.payload))
    }

    /// Receive one raw status datagram from the amplifier.
    ///
    /// Uses the known address if there is one, otherwise the cached address,
    /// otherwise discovery. A cached address that stays silent is dropped
    /// in favour of discovery.
    pub fn fetch_datagram(&mut self) -> Result<Datagram> {
        if let Some(addr) = self.address {
            return self.receive_from(addr);
        }

        if let Some(cached) = self.cache.as_ref().and_then(IpCache::read) {
            debug!(%cached, "trying cached amplifier address");
            match self.receive_from(cached) {
                Ok(datagram) => {
                    self.address = Some(cached);
                    return Ok(datagram);
                }
                Err(SessionError::Transport(TransportError::Timeout { .. })) => {
                    info!(%cached, "cached address did not respond, discovering");
                }
                Err(err) => return Err(err),
            }
        }

        self.discover_datagram()
    }

    /// Resolve the amplifier address, fetching a status datagram if needed.
    pub fn resolve_address(&mut self) -> Result<IpAddr> {
        if let Some(addr) = self.address {
            return Ok(addr);
        }
        let datagram = self.fetch_datagram()?;
        Ok(datagram.source.ip())
    }

    pub fn turn_on(&mut self) -> Result<()> {
        self.send(Command::Power(true))
    }

    pub fn turn_off(&mut self) -> Result<()> {
        self.send(Command::Power(false))
    }

    /// Flip power based on a fresh status reading.
    pub fn toggle_power(&mut self) -> Result<bool> {
        let on = self.status()?.power.ok_or(SessionError::UnknownState("power"))?;
        self.send(Command::Power(!on))?;
        Ok(!on)
    }

    pub fn mute(&mut self) -> Result<()> {
        self.send(Command::Mute(true))
    }

    pub fn unmute(&mut self) -> Result<()> {
        self.send(Command::Mute(false))
    }

    /// Flip mute based on a fresh status reading.
    pub fn toggle_mute(&mut self) -> Result<bool> {
        let muted = self.status()?.muted.ok_or(SessionError::UnknownState("mute"))?;
        self.send(Command::Mute(!muted))?;
        Ok(!muted)
    }

    /// Set the volume, capped at 0 dB and floored at -96 dB.
    ///
    /// Returns the value actually sent.
    pub fn set_volume(&mut self, db: f64) -> Result<f64> {
        let (db, capped) = clamp_db(db);
        if capped {
            warn!("limiting volume to {VOLUME_MAX_DB} dB");
        }
        self.send(Command::Volume(db))?;
        Ok(db)
    }

    /// Select an input by its status channel index.
    pub fn set_channel(&mut self, index: u8) -> Result<()> {
        self.send(Command::Channel(index))
    }

    /// Encode `command` and send it to the amplifier's command port.
    pub fn send(&mut self, command: Command) -> Result<()> {
        // Encode before touching the network so bad channels fail fast.
        let frame = command.encode()?;
        let addr = self.resolve_address()?;
        let target = SocketAddr::new(addr, self.config.transport.command_port);
        let mut sender = CommandSender::open(target)?;
        self.send_frame(frame, &mut sender)
    }

    /// Encode `command` and push it through `sink` under the repeat policy.
    pub fn send_via<S: CommandSink>(&mut self, command: Command, sink: &mut S) -> Result<()> {
        let frame = command.encode()?;
        self.send_frame(frame, sink)
    }

    /// Push an already encoded frame through `sink` under the repeat policy.
    pub fn send_frame<S: CommandSink>(
        &mut self,
        mut frame: CommandFrame,
        sink: &mut S,
    ) -> Result<()> {
        if frame.kind_byte() == CommandKind::Volume as u8 {
            let db = payload_to_db(u16::from_be_bytes(frame.payload()));
            debug!(?db, payload = ?frame.payload(), "volume frame");
        }
        let sent = self
            .config
            .repeat
            .transmit(&mut frame, &mut self.sequence, sink)?;
        debug!(kind = frame.kind_byte(), sent, "command burst complete");
        Ok(())
    }

    fn listener(&self) -> Result<StatusListener> {
        Ok(StatusListener::bind_with_config(&self.config.transport)?)
    }

    fn receive_from(&self, addr: IpAddr) -> Result<Datagram> {
        Ok(self.listener()?.recv_from(addr, self.config.timeout)?)
    }
}
