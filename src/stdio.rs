//! Newline-delimited JSON-RPC transport
//!
//! One line is one message. Each line is fully handled and its response written
//! and flushed before the next line is read, so responses leave in request order.

use std::{
    io::{self, BufRead, Write},
    time::Instant,
};

use serde_json::Value;
use tracing::info;

use crate::{logging, mcp::server::handle_json_rpc_line, AppState};

/// Serves requests until `reader` reaches end of input.
///
/// Malformed requests never stop the loop; only I/O failures on either stream
/// are returned.
pub fn serve<R: BufRead, W: Write>(state: &AppState, mut reader: R, mut writer: W) -> io::Result<()> {
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            info!("end of input, shutting down");
            return Ok(());
        }

        let line = trim_line_ending(&buffer);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let started_at = Instant::now();
        let response = handle_json_rpc_line(state, line);
        let responded = response.is_some();
        if let Some(response) = response {
            write_response(&mut writer, &response)?;
        }

        logging::request_summary(line.len(), responded, started_at);
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn write_response<W: Write>(writer: &mut W, response: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writer.write_all(b"\n")?;
    writer.flush()
}
