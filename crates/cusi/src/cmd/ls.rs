use std::io::{Read, Write};

use cusi_engine::Device;
use tracing::debug;

use crate::exit::{engine_error, CliResult};
use crate::output::{print_listing, OutputFormat};

pub fn run<T: Read + Write>(
    device: &mut Device<T>,
    path: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    if let Some((shown, entries)) = listing(device, path)? {
        print_listing(&shown, &entries, format);
    }
    Ok(())
}

/// Fetch a listing. A path outside the sandbox yields `None`: nothing is
/// sent and nothing is printed.
fn listing<T: Read + Write>(
    device: &mut Device<T>,
    path: Option<&str>,
) -> CliResult<Option<(String, Vec<String>)>> {
    let shown = match path {
        None => device.config().root.clone(),
        Some(path) => match device.sandbox(path) {
            Ok(_) => path.to_string(),
            Err(err) => {
                debug!(%err, "not listing rejected path");
                return Ok(None);
            }
        },
    };

    let entries = device.list_dir(path).map_err(|err| engine_error("ls", err))?;
    Ok(Some((shown, entries)))
}

#[cfg(test)]
mod tests {
    use cusi_engine::testing::MockDevice;

    use super::*;

    #[test]
    fn rejected_path_produces_no_listing() {
        let mut device = Device::new(MockDevice::new().reply_ok(b"boot.py,"));

        assert_eq!(listing(&mut device, Some("../")).expect("silent"), None);
        assert_eq!(listing(&mut device, Some("/etc")).expect("silent"), None);
        assert!(device.get_ref().frames().is_empty());
    }

    #[test]
    fn listing_shows_requested_path() {
        let mut device = Device::new(
            MockDevice::new()
                .reply_ok(b"boot.py,main.py,")
                .reply_ok(b"umqtt,"),
        );

        assert_eq!(
            listing(&mut device, None).expect("root listing"),
            Some((
                "/flash".to_string(),
                vec!["boot.py".to_string(), "main.py".to_string()]
            ))
        );
        assert_eq!(
            listing(&mut device, Some("lib")).expect("subdirectory listing"),
            Some(("lib".to_string(), vec!["umqtt".to_string()]))
        );
    }
}
