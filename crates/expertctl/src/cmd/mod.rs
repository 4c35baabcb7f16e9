use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use expertctl_session::{Controller, SessionConfig};
use expertctl_transport::{TransportConfig, COMMAND_PORT, STATUS_PORT};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod channel;
pub mod mute;
pub mod power;
pub mod status;
pub mod version;
pub mod volume;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show current status.
    Status,
    /// Listen for a broadcast and report the amplifier that sent it.
    Discover,
    /// Turn on (exit standby).
    On,
    /// Turn off (enter standby).
    Off,
    /// Toggle power state.
    TogglePower,
    /// Set volume in dB (-96 to 0; normal listening level around -20).
    Volume(VolumeArgs),
    /// Mute the amplifier.
    Mute,
    /// Unmute the amplifier.
    Unmute,
    /// Toggle mute state.
    ToggleMute,
    /// Select an input channel by its status index.
    Channel(ChannelArgs),
    /// Print status broadcasts as they arrive.
    Watch(WatchArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Status => status::run(session, format),
        Command::Discover => status::discover(session, format),
        Command::On => power::on(session, format),
        Command::Off => power::off(session, format),
        Command::TogglePower => power::toggle(session, format),
        Command::Volume(args) => volume::run(args, session, format),
        Command::Mute => mute::mute(session, format),
        Command::Unmute => mute::unmute(session, format),
        Command::ToggleMute => mute::toggle(session, format),
        Command::Channel(args) => channel::run(args, session, format),
        Command::Watch(args) => watch::run(args, session, format),
        Command::Version(args) => version::run(args),
    }
}

/// Connection options shared by every subcommand.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// IP address of the amplifier (default: cached address, then discovery).
    #[arg(long, env = "EXPERTCTL_IP", global = true)]
    pub ip: Option<IpAddr>,
    /// How long to wait for a status broadcast (e.g. 2s, 500ms).
    #[arg(long, default_value = "2s", global = true)]
    pub timeout: String,
    /// Disable IP address caching.
    #[arg(long, global = true)]
    pub no_cache: bool,
    /// IP cache file (default: ~/.devialet_expert_ip).
    #[arg(long, value_name = "PATH", env = "EXPERTCTL_CACHE_FILE", global = true)]
    pub cache_file: Option<PathBuf>,
    /// UDP port status broadcasts arrive on.
    #[arg(long, default_value_t = STATUS_PORT, global = true)]
    pub status_port: u16,
    /// UDP port commands are sent to.
    #[arg(long, default_value_t = COMMAND_PORT, global = true)]
    pub command_port: u16,
}

impl SessionArgs {
    pub fn config(&self) -> CliResult<SessionConfig> {
        Ok(SessionConfig {
            address: self.ip,
            timeout: parse_duration(&self.timeout)?,
            use_cache: !self.no_cache,
            cache_path: self.cache_file.clone(),
            transport: TransportConfig {
                status_port: self.status_port,
                command_port: self.command_port,
                ..TransportConfig::default()
            },
            ..SessionConfig::default()
        })
    }

    pub fn controller(&self) -> CliResult<Controller> {
        Ok(Controller::new(self.config()?))
    }
}

#[derive(Args, Debug)]
pub struct VolumeArgs {
    /// Volume in dB; values above 0 are capped, values below -96 floored.
    #[arg(allow_negative_numbers = true)]
    pub db: f64,
}

#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// Channel number as listed by `status`.
    pub number: u8,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Exit after printing N broadcasts.
    #[arg(long)]
    pub count: Option<NonZeroUsize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    match unit {
        "ms" => {
            let millis: u64 = number
                .parse()
                .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
            if millis == 0 {
                return Err(CliError::new(USAGE, "duration must be greater than zero"));
            }
            Ok(Duration::from_millis(millis))
        }
        "s" => {
            let secs: f64 = number
                .parse()
                .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(CliError::new(USAGE, "duration must be greater than zero"));
            }
            Duration::try_from_secs_f64(secs)
                .map_err(|_| CliError::new(USAGE, format!("duration out of range: {input}")))
        }
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("1.5").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
