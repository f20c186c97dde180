use alphalink_proto::Angle;

use crate::cmd::{connect, WriteAllArgs};
use crate::exit::{proto_error, CliResult, SUCCESS};
use crate::output::{print_write_statuses, OutputFormat};

pub fn run(args: WriteAllArgs, format: OutputFormat) -> CliResult<i32> {
    let angles = args
        .angles
        .iter()
        .map(|&degrees| Angle::new(degrees))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| proto_error("invalid angle", err))?;

    let mut robot = connect(&args.link)?;
    let statuses = robot
        .servo_write_all_timed(&angles, args.travel)
        .map_err(|err| proto_error("bulk servo write failed", err))?;
    print_write_statuses(&statuses, format);
    Ok(SUCCESS)
}
