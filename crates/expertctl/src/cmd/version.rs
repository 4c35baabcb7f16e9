use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("expertctl {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: expertctl");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("EXPERTCTL_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "ports: status={} command={}",
        expertctl_transport::STATUS_PORT,
        expertctl_transport::COMMAND_PORT
    );
    println!(
        "accessible_channels: {:?}",
        expertctl_codec::accessible_channels()
    );

    Ok(SUCCESS)
}
