use std::io::{Read, Write};

use cusi_engine::Device;

use crate::exit::{engine_error, CliResult};

pub fn run<T: Read + Write>(device: &mut Device<T>, path: &str) -> CliResult<()> {
    device.remove(path).map_err(|err| engine_error("rm", err))
}
