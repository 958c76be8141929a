use std::io::{Read, Write};
use std::path::Path;

use cusi_engine::Device;

use crate::exit::{engine_error, CliResult};
use crate::interrupt::Interrupt;
use crate::output::{print_progress, print_upload_done, OutputFormat};

pub fn run<T: Read + Write>(
    device: &mut Device<T>,
    local: &str,
    remote: &str,
    format: OutputFormat,
    interrupt: &Interrupt,
) -> CliResult<()> {
    if format != OutputFormat::Json {
        println!("Uploading...");
    }

    let mut reported = false;
    let result = {
        let _busy = interrupt.begin();
        device.upload_file(Path::new(local), remote, interrupt.token(), |progress| {
            reported = true;
            print_progress(&progress, format);
        })
    };

    match result {
        Ok(summary) => {
            print_upload_done(&summary, format);
            Ok(())
        }
        Err(err) => {
            // Finish the progress line before the error goes to stderr.
            if reported && format != OutputFormat::Json {
                println!();
            }
            Err(engine_error("put", err))
        }
    }
}
