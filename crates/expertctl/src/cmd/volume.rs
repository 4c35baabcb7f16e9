use crate::cmd::{SessionArgs, VolumeArgs};
use crate::exit::{session_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_ack, OutputFormat};

pub fn run(args: VolumeArgs, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.db.is_finite() {
        return Err(CliError::new(USAGE, "volume must be a finite number of dB"));
    }

    let mut controller = session.controller()?;
    let sent = controller
        .set_volume(args.db)
        .map_err(|err| session_error("volume failed", err))?;
    print_ack(
        "volume",
        &format!("Volume set to {sent:.1} dB"),
        controller.address(),
        format,
    );
    Ok(SUCCESS)
}
