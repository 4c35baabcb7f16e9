use crate::cmd::SessionArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_ack, OutputFormat};

pub fn mute(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    controller
        .mute()
        .map_err(|err| session_error("mute failed", err))?;
    print_ack("mute", "Muting...", controller.address(), format);
    Ok(SUCCESS)
}

pub fn unmute(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    controller
        .unmute()
        .map_err(|err| session_error("unmute failed", err))?;
    print_ack("mute", "Unmuting...", controller.address(), format);
    Ok(SUCCESS)
}

pub fn toggle(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    let muted = controller
        .toggle_mute()
        .map_err(|err| session_error("mute toggle failed", err))?;
    let message = if muted { "Muting..." } else { "Unmuting..." };
    print_ack("mute", message, controller.address(), format);
    Ok(SUCCESS)
}
