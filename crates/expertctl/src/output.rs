use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use expertctl_codec::{is_accessible, StatusSnapshot};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ChannelOutput<'a> {
    index: u8,
    name: &'a str,
    active: bool,
    accessible: bool,
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    schema_id: &'a str,
    ip: String,
    device_name: &'a str,
    power: Option<bool>,
    muted: Option<bool>,
    channel: Option<u8>,
    channel_name: Option<&'a str>,
    volume_db: Option<f64>,
    volume_raw: Option<u8>,
    channels: Vec<ChannelOutput<'a>>,
    crc_ok: bool,
}

#[derive(Serialize)]
struct AckOutput<'a> {
    schema_id: &'a str,
    command: &'a str,
    message: &'a str,
    target: String,
}

fn channel_rows(status: &StatusSnapshot) -> Vec<ChannelOutput<'_>> {
    status
        .channels
        .iter()
        .map(|(&index, name)| ChannelOutput {
            index,
            name,
            active: status.channel == Some(index),
            accessible: is_accessible(index),
        })
        .collect()
}

/// Print a decoded status snapshot. `raw` is the datagram it came from.
pub fn print_status(status: &StatusSnapshot, raw: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = StatusOutput {
                schema_id: "expertctl/v1/status",
                ip: status.source.to_string(),
                device_name: &status.device_name,
                power: status.power,
                muted: status.muted,
                channel: status.channel,
                channel_name: status.channel_name(),
                volume_db: status.volume_db,
                volume_raw: status.volume_raw,
                channels: channel_rows(status),
                crc_ok: status.checksum_ok,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            print_summary(status);
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CH", "NAME", "ACTIVE", "NETWORK"]);
            for row in channel_rows(status) {
                table.add_row(vec![
                    row.index.to_string(),
                    row.name.to_string(),
                    if row.active { "*" } else { "" }.to_string(),
                    if row.accessible { "yes" } else { "no" }.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            print_summary(status);
            if !status.channels.is_empty() {
                println!("Available channels:");
                for row in channel_rows(status) {
                    let current = if row.active { " *" } else { "" };
                    let reach = if row.accessible {
                        ""
                    } else {
                        " (not network accessible)"
                    };
                    println!("  {}: {}{current}{reach}", row.index, row.name);
                }
            }
        }
        OutputFormat::Raw => print_raw(raw),
    }
}

fn print_summary(status: &StatusSnapshot) {
    println!("Device:  {}", status.device_name);
    println!("IP:      {}", status.source);
    println!("Power:   {}", describe(status.power, "ON", "STANDBY"));
    match status.volume_db {
        Some(db) => println!("Volume:  {db:.1} dB"),
        None => println!("Volume:  unknown (datagram too short)"),
    }
    println!("Muted:   {}", describe(status.muted, "YES", "NO"));
    match (status.channel, status.channel_name()) {
        (Some(_), Some(name)) => println!("Channel: {name}"),
        (Some(index), None) => println!("Channel: {index}"),
        (None, _) => println!("Channel: unknown"),
    }
    println!("CRC:     {}", if status.checksum_ok { "OK" } else { "ERROR" });
}

fn describe(flag: Option<bool>, yes: &'static str, no: &'static str) -> &'static str {
    match flag {
        Some(true) => yes,
        Some(false) => no,
        None => "unknown",
    }
}

/// Confirm that a command burst went out.
pub fn print_ack(
    command: &str,
    message: &str,
    target: Option<std::net::IpAddr>,
    format: OutputFormat,
) {
    let target = target.map(|ip| ip.to_string()).unwrap_or_default();
    match format {
        OutputFormat::Json => {
            let out = AckOutput {
                schema_id: "expertctl/v1/command-sent",
                command,
                message,
                target,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{message}"),
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
