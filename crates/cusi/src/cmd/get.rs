use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

use cusi_engine::Device;

use crate::exit::{engine_error, io_error, CliError, CliResult, FAILURE};
use crate::output::{print_saved, print_text, OutputFormat};

pub fn run<T: Read + Write>(
    device: &mut Device<T>,
    remote: &str,
    local: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    match local {
        Some(local) => save(device, remote, local, format),
        None => {
            let text = device
                .download_text(remote)
                .map_err(|err| engine_error("get", err))?;
            print_text(remote, &text, format);
            Ok(())
        }
    }
}

/// Download into a new local file. An existing file is never overwritten.
fn save<T: Read + Write>(
    device: &mut Device<T>,
    remote: &str,
    local: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let target = Path::new(local);
    if target.exists() {
        return Err(CliError::new(
            FAILURE,
            format!("get: local file already exists: {local}"),
        ));
    }

    let body = device
        .download(remote)
        .map_err(|err| engine_error("get", err))?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .map_err(|err| io_error("get: failed to create local file", err))?;
    file.write_all(&body)
        .and_then(|()| file.flush())
        .map_err(|err| io_error("get: failed to write local file", err))?;

    print_saved(local, body.len() as u64, format);
    Ok(())
}
