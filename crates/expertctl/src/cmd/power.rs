use crate::cmd::SessionArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_ack, OutputFormat};

pub fn on(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    controller
        .turn_on()
        .map_err(|err| session_error("power on failed", err))?;
    print_ack("power", "Turning on...", controller.address(), format);
    Ok(SUCCESS)
}

pub fn off(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    controller
        .turn_off()
        .map_err(|err| session_error("power off failed", err))?;
    print_ack("power", "Turning off...", controller.address(), format);
    Ok(SUCCESS)
}

pub fn toggle(session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = session.controller()?;
    let on = controller
        .toggle_power()
        .map_err(|err| session_error("power toggle failed", err))?;
    let message = if on { "Turning on..." } else { "Turning off..." };
    print_ack("power", message, controller.address(), format);
    Ok(SUCCESS)
}
