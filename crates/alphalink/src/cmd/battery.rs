use crate::cmd::{connect, BatteryArgs};
use crate::exit::{proto_error, CliResult, SUCCESS};
use crate::output::{print_battery, OutputFormat};

pub fn run(args: BatteryArgs, format: OutputFormat) -> CliResult<i32> {
    let mut robot = connect(&args.link)?;
    let status = robot
        .battery()
        .map_err(|err| proto_error("battery query failed", err))?;
    print_battery(&status, format);
    Ok(SUCCESS)
}
