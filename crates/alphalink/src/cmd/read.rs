use alphalink_proto::ServoId;

use crate::cmd::{connect, ReadArgs};
use crate::exit::{proto_error, CliResult, SUCCESS};
use crate::output::{print_position, OutputFormat};

pub fn run(args: ReadArgs, format: OutputFormat) -> CliResult<i32> {
    let id = ServoId::new(args.id).map_err(|err| proto_error("invalid servo id", err))?;
    let mut robot = connect(&args.link)?;
    let position = robot
        .servo_read(id)
        .map_err(|err| proto_error("servo read failed", err))?;
    print_position(args.id, position, format);
    Ok(SUCCESS)
}
