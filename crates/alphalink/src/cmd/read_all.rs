use crate::cmd::{connect, ReadAllArgs};
use crate::exit::{proto_error, CliResult, SUCCESS};
use crate::output::{print_positions, OutputFormat};

pub fn run(args: ReadAllArgs, format: OutputFormat) -> CliResult<i32> {
    let mut robot = connect(&args.link)?;
    let positions = robot
        .servo_read_all()
        .map_err(|err| proto_error("bulk servo read failed", err))?;
    print_positions(&positions, format);
    Ok(SUCCESS)
}
