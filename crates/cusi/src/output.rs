use std::io::Write;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use cusi_engine::{UploadProgress, UploadSummary};
use cusi_transport::PortInfo;
use serde::Serialize;

#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    #[default]
    Plain,
}

#[derive(Serialize)]
struct ListingOutput<'a> {
    path: &'a str,
    entries: &'a [String],
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
}

#[derive(Serialize)]
struct TextOutput<'a> {
    path: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct TransferOutput<'a> {
    operation: &'a str,
    path: &'a str,
    bytes: u64,
}

pub fn print_listing(path: &str, entries: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ListingOutput { path, entries };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![path]);
            for entry in entries {
                table.add_row(vec![entry.as_str()]);
            }
            println!("{table}");
        }
        OutputFormat::Plain => {
            for entry in entries {
                println!("{entry}");
            }
        }
    }
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<PortOutput<'_>> = ports
                .iter()
                .map(|port| PortOutput {
                    name: &port.name,
                    kind: &port.kind,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE"]);
            for port in ports {
                table.add_row(vec![port.name.as_str(), port.kind.as_str()]);
            }
            println!("{table}");
        }
        OutputFormat::Plain => {
            for port in ports {
                println!("{}", port.name);
            }
        }
    }
}

/// Progress line, redrawn in place after every chunk.
pub fn print_progress(progress: &UploadProgress, format: OutputFormat) {
    if format == OutputFormat::Json {
        return;
    }
    let mut out = std::io::stdout();
    let _ = write!(out, "\r{} / {} bytes", progress.sent, progress.total);
    let _ = out.flush();
}

pub fn print_upload_done(summary: &UploadSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_transfer("put", summary.remote_path.as_str(), summary.bytes_sent),
        OutputFormat::Table | OutputFormat::Plain => println!(),
    }
}

pub fn print_saved(local: &str, bytes: u64, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_transfer("get", local, bytes),
        OutputFormat::Table | OutputFormat::Plain => println!("{bytes} bytes"),
    }
}

fn print_transfer(operation: &str, path: &str, bytes: u64) {
    let out = TransferOutput {
        operation,
        path,
        bytes,
    };
    println!(
        "{}",
        serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Remote file content shown at the prompt.
pub fn print_text(path: &str, content: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = TextOutput { path, content };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let _ = write_content(&mut std::io::stdout(), content);
        }
    }
}

/// File content is written byte for byte, without a trailing newline of our own.
fn write_content<W: Write>(out: &mut W, content: &str) -> std::io::Result<()> {
    out.write_all(content.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_written_verbatim() {
        let mut out = Vec::new();
        write_content(&mut out, "print(1)").unwrap();
        assert_eq!(out, b"print(1)");

        let mut out = Vec::new();
        write_content(&mut out, "a\r\nb\n").unwrap();
        assert_eq!(out, b"a\r\nb\n");
    }
}
