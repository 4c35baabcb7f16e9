use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use expertctl_codec::StatusSnapshot;
use expertctl_transport::{StatusListener, TransportError};

use crate::cmd::{SessionArgs, WatchArgs};
use crate::exit::{transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_status, OutputFormat};

/// How often the Ctrl-C flag is checked while no broadcast arrives.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(args: WatchArgs, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let config = session.config()?;
    let listener = StatusListener::bind_with_config(&config.transport)
        .map_err(|err| transport_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let received = match config.address {
            Some(addr) => listener.recv_from(addr, POLL_INTERVAL),
            None => listener.recv(POLL_INTERVAL),
        };
        let datagram = match received {
            Ok(datagram) => datagram,
            Err(TransportError::Timeout { .. }) => continue,
            Err(err) => return Err(transport_error("receive failed", err)),
        };

        let status = StatusSnapshot::decode(datagram.source.ip(), &datagram.payload);
        print_status(&status, &datagram.payload, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count.get() {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
