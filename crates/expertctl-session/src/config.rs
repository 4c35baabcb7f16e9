use std::path::PathBuf;
use std::time::Duration;

use expertctl_transport::TransportConfig;

/// Default wait for a status datagram.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Times every command is sent.
pub const DEFAULT_REPEAT_COUNT: usize = 4;

/// Fixed-repeat transmission policy for unacknowledged commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatPolicy {
    /// Number of transmissions per command. Default: 4.
    pub count: usize,
    /// Pause between transmissions. Default: none.
    pub interval: Duration,
}

impl Default for RepeatPolicy {
    fn default() -> Self {
        Self {
            count: DEFAULT_REPEAT_COUNT,
            interval: Duration::ZERO,
        }
    }
}

/// Configuration for a controller session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Amplifier address. `None` means cache lookup, then discovery.
    pub address: Option<std::net::IpAddr>,
    /// How long to wait for a status datagram.
    pub timeout: Duration,
    /// Read and update the IP cache when no address is given.
    pub use_cache: bool,
    /// Cache file location. `None` uses `$HOME/.devialet_expert_ip`.
    pub cache_path: Option<PathBuf>,
    pub transport: TransportConfig,
    pub repeat: RepeatPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: None,
            timeout: DEFAULT_TIMEOUT,
            use_cache: true,
            cache_path: None,
            transport: TransportConfig::default(),
            repeat: RepeatPolicy::default(),
        }
    }
}
