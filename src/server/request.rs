//! Reading and parsing HTTP/1.1 requests off a connection.

use std::collections::HashMap;
use std::io::{self, Read};

use http::Method;

use crate::handler::Request;

const READ_CHUNK: usize = 4096;
const MAX_HEADERS: usize = 64;

/// One parsed request plus the connection disposition derived from the
/// request version and its Connection header.
#[derive(Debug)]
pub struct ParsedRequest {
    pub request: Request,
    pub keep_alive: bool,
}

/// Read one request from `reader`, buffering into `buf`.
///
/// `buf` carries unconsumed bytes between calls on a keep-alive
/// connection; the consumed request is drained from it before returning.
/// Returns `Ok(None)` on a clean end of stream between requests.
pub fn read_request<R: Read>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<ParsedRequest>> {
    let mut chunk = [0u8; READ_CHUNK];

    let (method, path, headers, keep_alive, header_len, content_length) = loop {
        let complete = {
            let mut header_storage = [httparse::EMPTY_HEADER; MAX_HEADERS];
            let mut parsed = httparse::Request::new(&mut header_storage);
            match parsed.parse(buf) {
                Ok(httparse::Status::Complete(header_len)) => {
                    let method = Method::from_bytes(parsed.method.unwrap_or("GET").as_bytes())
                        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
                    let raw_path = parsed.path.unwrap_or("/");
                    // Query strings are not routed on; drop them here.
                    let path = raw_path.split('?').next().unwrap_or("/").to_string();

                    let mut headers = HashMap::with_capacity(parsed.headers.len());
                    let mut content_length = 0usize;
                    for header in parsed.headers.iter() {
                        let name = header.name.to_ascii_lowercase();
                        let value = String::from_utf8_lossy(header.value).to_string();
                        if name == "content-length" {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                        headers.insert(name, value);
                    }

                    let connection = headers
                        .get("connection")
                        .map(|v| v.to_ascii_lowercase())
                        .unwrap_or_default();
                    let keep_alive = match parsed.version {
                        Some(0) => connection == "keep-alive",
                        _ => connection != "close",
                    };

                    Some((method, path, headers, keep_alive, header_len, content_length))
                }
                Ok(httparse::Status::Partial) => None,
                Err(err) => {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
                }
            }
        };
        if let Some(parts) = complete {
            break parts;
        }

        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return if buf.is_empty() {
                Ok(None)
            } else {
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed mid-request",
                ))
            };
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    while buf.len() < header_len + content_length {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-body",
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = buf[header_len..header_len + content_length].to_vec();
    buf.drain(..header_len + content_length);

    Ok(Some(ParsedRequest {
        request: Request {
            method,
            path,
            headers,
            body,
        },
        keep_alive,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_a_simple_get() {
        let mut cursor = Cursor::new(b"GET /pets/1?watch=true HTTP/1.1\r\nHost: x\r\n\r\n".to_vec());
        let mut buf = Vec::new();
        let parsed = read_request(&mut cursor, &mut buf).unwrap().unwrap();

        assert_eq!(parsed.request.method, Method::GET);
        assert_eq!(parsed.request.path, "/pets/1");
        assert_eq!(parsed.request.header("host"), Some("x"));
        assert!(parsed.keep_alive);
        assert!(buf.is_empty());
    }

    #[test]
    fn reads_the_body_by_content_length() {
        let raw = b"POST /items HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello".to_vec();
        let mut cursor = Cursor::new(raw);
        let mut buf = Vec::new();
        let parsed = read_request(&mut cursor, &mut buf).unwrap().unwrap();

        assert_eq!(parsed.request.method, Method::POST);
        assert_eq!(parsed.request.body, b"hello");
    }

    #[test]
    fn connection_close_disables_keep_alive() {
        let raw = b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n".to_vec();
        let mut cursor = Cursor::new(raw);
        let mut buf = Vec::new();
        let parsed = read_request(&mut cursor, &mut buf).unwrap().unwrap();
        assert!(!parsed.keep_alive);
    }

    #[test]
    fn keeps_pipelined_bytes_for_the_next_call() {
        let raw = b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n".to_vec();
        let mut cursor = Cursor::new(raw);
        let mut buf = Vec::new();

        let first = read_request(&mut cursor, &mut buf).unwrap().unwrap();
        assert_eq!(first.request.path, "/a");

        let second = read_request(&mut cursor, &mut buf).unwrap().unwrap();
        assert_eq!(second.request.path, "/b");

        assert!(read_request(&mut cursor, &mut buf).unwrap().is_none());
    }

    #[test]
    fn clean_end_of_stream_returns_none() {
        let mut cursor = Cursor::new(Vec::new());
        let mut buf = Vec::new();
        assert!(read_request(&mut cursor, &mut buf).unwrap().is_none());
    }
}
