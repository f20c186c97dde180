use tracing::info;

use crate::cmd::{connect, OffArgs};
use crate::exit::{proto_error, CliResult, SUCCESS};

pub fn run(args: OffArgs) -> CliResult<i32> {
    let mut robot = connect(&args.link)?;
    robot
        .servos_off()
        .map_err(|err| proto_error("servo power-off failed", err))?;
    info!("all servos powered off");
    Ok(SUCCESS)
}
