//! Serializing a finished [`ResponseWriter`] back onto the connection.

use std::io::{self, Write};

use http::StatusCode;

use crate::handler::ResponseWriter;

fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

/// Write `response` as an HTTP/1.1 message. Content-Length is filled in
/// from the body unless the handler set it; `Connection: close` is added
/// when the connection will not be reused.
pub fn write_response<W: Write>(
    writer: &mut W,
    response: &ResponseWriter,
    keep_alive: bool,
) -> io::Result<()> {
    let mut out = Vec::with_capacity(256 + response.body().len());

    write!(
        out,
        "HTTP/1.1 {} {}\r\n",
        response.status(),
        status_reason(response.status())
    )?;
    for (name, value) in response.headers() {
        write!(out, "{name}: {value}\r\n")?;
    }
    if response.get_header("Content-Length").is_none() {
        write!(out, "Content-Length: {}\r\n", response.body().len())?;
    }
    if !keep_alive {
        out.extend_from_slice(b"Connection: close\r\n");
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(response.body());

    writer.write_all(&out)
}
