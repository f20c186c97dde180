use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use alphalink_proto::{BatteryStatus, ChargeState, WriteStatus};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct BatteryOutput {
    millivolts: u16,
    state: &'static str,
    percent: u8,
}

pub fn print_battery(status: &BatteryStatus, format: OutputFormat) {
    let state = charge_state_name(status.state);
    match format {
        OutputFormat::Json => {
            print_json(&BatteryOutput {
                millivolts: status.millivolts,
                state,
                percent: status.percent,
            });
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["VOLTAGE (mV)", "STATE", "PERCENT"]);
            table.add_row(vec![
                status.millivolts.to_string(),
                state.to_string(),
                status.percent.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} mV, {}, {}% remaining",
                status.millivolts, state, status.percent
            );
        }
    }
}

#[derive(Serialize)]
struct PositionOutput {
    servo: u8,
    position: u8,
}

pub fn print_position(servo: u8, position: u8, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&PositionOutput { servo, position }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SERVO", "POSITION"]);
            table.add_row(vec![servo.to_string(), position.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("servo {servo}: {position}"),
    }
}

#[derive(Serialize)]
struct PositionsOutput<'a> {
    positions: &'a [u8],
}

pub fn print_positions(positions: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&PositionsOutput { positions }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SERVO", "POSITION"]);
            for (servo, position) in positions.iter().enumerate() {
                table.add_row(vec![servo.to_string(), position.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (servo, position) in positions.iter().enumerate() {
                println!("servo {servo}: {position}");
            }
        }
    }
}

#[derive(Serialize)]
struct StatusOutput {
    servo: u8,
    status: &'static str,
}

pub fn print_write_status(servo: u8, status: WriteStatus, format: OutputFormat) {
    let status = write_status_name(status);
    match format {
        OutputFormat::Json => print_json(&StatusOutput { servo, status }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SERVO", "STATUS"]);
            table.add_row(vec![servo.to_string(), status.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("servo {servo}: {status}"),
    }
}

#[derive(Serialize)]
struct StatusesOutput {
    statuses: Vec<&'static str>,
}

pub fn print_write_statuses(statuses: &[WriteStatus], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&StatusesOutput {
            statuses: statuses.iter().map(|s| write_status_name(*s)).collect(),
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["SERVO", "STATUS"]);
            for (servo, status) in statuses.iter().enumerate() {
                table.add_row(vec![
                    servo.to_string(),
                    write_status_name(*status).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (servo, status) in statuses.iter().enumerate() {
                println!("servo {servo}: {}", write_status_name(*status));
            }
        }
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn charge_state_name(state: ChargeState) -> &'static str {
    match state {
        ChargeState::NotCharging => "not-charging",
        ChargeState::Charging => "charging",
        ChargeState::Absent => "absent",
    }
}

pub fn write_status_name(status: WriteStatus) -> &'static str {
    match status {
        WriteStatus::Ok => "ok",
        WriteStatus::WrongId => "wrong-id",
        WriteStatus::AngleExcess => "angle-excess",
        WriteStatus::NoReply => "no-reply",
    }
}
