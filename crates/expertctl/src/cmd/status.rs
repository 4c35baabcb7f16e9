use expertctl_codec::StatusSnapshot;
use expertctl_transport::Datagram;

use crate::cmd::SessionArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_status, OutputFormat};

pub fn run(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    let datagram = controller
        .fetch_datagram()
        .map_err(|err| session_error("status failed", err))?;
    show(&datagram, format);
    Ok(SUCCESS)
}

/// Ignores `--ip` and the cache: reports whichever amplifier broadcasts first.
pub fn discover(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut config = session.config()?;
    config.address = None;
    let mut controller = expertctl_session::Controller::new(config);
    let datagram = controller
        .discover_datagram()
        .map_err(|err| session_error("discovery failed", err))?;
    show(&datagram, format);
    Ok(SUCCESS)
}

fn show(datagram: &Datagram, format: OutputFormat) {
    let status = StatusSnapshot::decode(datagram.source.ip(), &datagram.payload);
    print_status(&status, &datagram.payload, format);
}
