mod cmd;
mod exit;
mod interrupt;
mod logging;
mod output;
mod shell;

use std::time::Duration;

use clap::{CommandFactory, Parser};
use cusi_engine::DeviceConfig;
use cusi_transport::{SerialConfig, DEFAULT_BAUD_RATE};

use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::interrupt::Interrupt;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;
use crate::shell::{connect, Shell};

#[derive(Parser, Debug)]
#[command(
    name = "cusi",
    about = "Command line file manager for M5Stack MicroPython devices",
    disable_version_flag = true
)]
struct Cli {
    /// Serial port the device is attached to (e.g. /dev/ttyUSB0, COM3).
    port: Option<String>,

    /// List available serial ports and exit.
    #[arg(short = 'l', long)]
    list: bool,

    /// Print version and exit.
    #[arg(short = 'v', long)]
    version: bool,

    /// Line speed in bits per second.
    #[arg(long, env = "CUSI_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Idle time that ends a device reply (e.g. 200ms, 1s).
    #[arg(long, env = "CUSI_TIMEOUT", default_value = "200ms")]
    timeout: String,

    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "plain")]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: Cli) -> CliResult<i32> {
    if cli.version {
        println!("cusi {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }
    if cli.list {
        return cmd::ports::run(cli.format);
    }

    let read_timeout = parse_duration(&cli.timeout)?;
    let Some(port) = cli.port else {
        let _ = Cli::command().write_help(&mut std::io::stderr());
        return Ok(USAGE);
    };

    let serial = SerialConfig {
        baud_rate: cli.baud,
        read_timeout,
    };
    let device = connect(&port, &serial, DeviceConfig::default())?;

    let interrupt = Interrupt::new();
    interrupt.install()?;

    let mut shell = Shell::new(device, cli.format, interrupt);
    shell.banner();
    shell.run(std::io::stdin().lock())
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(match unit {
        "s" => Duration::from_secs(value),
        _ => Duration::from_millis(value),
    })
}
