use std::io::{BufRead, Read, Write};

use cusi_engine::{Device, DeviceConfig};
use cusi_transport::{open, DeviceStream, SerialConfig};
use tracing::{debug, warn};

use crate::cmd::{self, ShellCommand};
use crate::exit::{engine_error, transport_error, CliResult, SUCCESS};
use crate::interrupt::Interrupt;
use crate::output::OutputFormat;

const PROMPT: &str = "> ";

/// Whether the prompt loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Open the port and get the device ready for commands.
pub fn connect(
    port: &str,
    serial: &SerialConfig,
    config: DeviceConfig,
) -> CliResult<Device<DeviceStream>> {
    print!("Connecting to {port} ... ");
    let _ = std::io::stdout().flush();

    let stream = match open(port, serial) {
        Ok(stream) => stream,
        Err(err) => {
            println!();
            return Err(transport_error("open failed", err));
        }
    };
    println!("connected");

    let mut device = Device::with_config(stream, config);
    device
        .clear_input()
        .map_err(|err| engine_error("connect", err))?;
    Ok(device)
}

pub struct Shell<T> {
    device: Device<T>,
    format: OutputFormat,
    interrupt: Interrupt,
}

impl<T: Read + Write> Shell<T> {
    pub fn new(device: Device<T>, format: OutputFormat, interrupt: Interrupt) -> Self {
        Self {
            device,
            format,
            interrupt,
        }
    }

    pub fn banner(&self) {
        println!("Type \"help\" for help.");
        println!("Type \"exit\" or Ctrl-C to exit.");
    }

    /// Read lines until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> CliResult<i32> {
        let mut line = String::new();
        loop {
            print!("{PROMPT}");
            let _ = std::io::stdout().flush();

            line.clear();
            match input.read_line(&mut line) {
                Ok(0) => {
                    println!();
                    return Ok(SUCCESS);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "failed to read input");
                    eprintln!("error: failed to read input: {err}");
                    continue;
                }
            }

            if self.execute(&line) == Flow::Exit {
                return Ok(SUCCESS);
            }
        }
    }

    /// Run one prompt line. Command errors are printed, never returned.
    pub fn execute(&mut self, line: &str) -> Flow {
        let command = match ShellCommand::parse(line) {
            Ok(Some(ShellCommand::Exit)) => return Flow::Exit,
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(err) => {
                eprintln!("error: {err}");
                return Flow::Continue;
            }
        };

        debug!(?command, "running shell command");
        if let Err(err) = cmd::run(command, &mut self.device, self.format, &self.interrupt) {
            eprintln!("error: {err}");
        }
        Flow::Continue
    }

    #[cfg(test)]
    fn device(&self) -> &Device<T> {
        &self.device
    }
}
