use std::io::{Read, Write};

use cusi_engine::Device;

use crate::exit::{CliError, CliResult};
use crate::interrupt::Interrupt;
use crate::output::OutputFormat;

pub mod get;
pub mod help;
pub mod ls;
pub mod ports;
pub mod put;
pub mod rm;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Ls { path: Option<String> },
    Put { local: String, remote: String },
    Get { remote: String, local: Option<String> },
    Rm { path: String },
    Help,
    Exit,
}

impl ShellCommand {
    /// Parse a prompt line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> CliResult<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<String> = words.map(str::to_string).collect();

        let command = match name {
            "ls" => {
                let mut args = args.into_iter();
                match (args.next(), args.next()) {
                    (path, None) => Self::Ls { path },
                    (_, Some(_)) => return Err(CliError::usage("too many arguments")),
                }
            }
            "put" => match <[String; 2]>::try_from(args) {
                Ok([local, remote]) => Self::Put { local, remote },
                Err(args) if args.len() > 2 => return Err(CliError::usage("too many arguments")),
                Err(_) => {
                    return Err(CliError::usage(
                        "LOCAL and REMOTE path arguments are required",
                    ))
                }
            },
            "get" => {
                let mut args = args.into_iter();
                match (args.next(), args.next(), args.next()) {
                    (Some(remote), local, None) => Self::Get { remote, local },
                    (None, _, _) => return Err(CliError::usage("REMOTE path is required")),
                    (Some(_), _, Some(_)) => return Err(CliError::usage("too many arguments")),
                }
            }
            "rm" => match <[String; 1]>::try_from(args) {
                Ok([path]) => Self::Rm { path },
                Err(args) if args.is_empty() => return Err(CliError::usage("PATH is required")),
                Err(_) => return Err(CliError::usage("too many arguments")),
            },
            "help" => Self::Help,
            "exit" => Self::Exit,
            other => return Err(CliError::usage(format!("{other}: command not found"))),
        };
        Ok(Some(command))
    }
}

pub fn run<T: Read + Write>(
    command: ShellCommand,
    device: &mut Device<T>,
    format: OutputFormat,
    interrupt: &Interrupt,
) -> CliResult<()> {
    match command {
        ShellCommand::Ls { path } => ls::run(device, path.as_deref(), format),
        ShellCommand::Put { local, remote } => put::run(device, &local, &remote, format, interrupt),
        ShellCommand::Get { remote, local } => get::run(device, &remote, local.as_deref(), format),
        ShellCommand::Rm { path } => rm::run(device, &path),
        ShellCommand::Help => {
            help::run();
            Ok(())
        }
        ShellCommand::Exit => Ok(()),
    }
}
