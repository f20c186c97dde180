use alphalink_proto::{Angle, ServoId};

use crate::cmd::{connect, WriteArgs};
use crate::exit::{proto_error, CliResult, SUCCESS};
use crate::output::{print_write_status, OutputFormat};

pub fn run(args: WriteArgs, format: OutputFormat) -> CliResult<i32> {
    let id = ServoId::new(args.id).map_err(|err| proto_error("invalid servo id", err))?;
    let angle = Angle::new(args.angle).map_err(|err| proto_error("invalid angle", err))?;
    let mut robot = connect(&args.link)?;
    let status = robot
        .servo_write_timed(id, angle, args.travel)
        .map_err(|err| proto_error("servo write failed", err))?;
    print_write_status(args.id, status, format);
    Ok(SUCCESS)
}
