use crate::cmd::{ChannelArgs, SessionArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_ack, OutputFormat};

pub fn run(args: ChannelArgs, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    controller
        .set_channel(args.number)
        .map_err(|err| session_error("channel failed", err))?;
    print_ack(
        "channel",
        &format!("Switching to channel {}", args.number),
        controller.address(),
        format,
    );
    Ok(SUCCESS)
}
