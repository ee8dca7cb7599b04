//! # HTTP request parsing
//! src/http/request.rs
//!
//! Streaming parser for one HTTP/1.x request read off a connection.
//!
//! ## Request format
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! Host: localhost:8008\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! The parser works incrementally over any [`BufRead`] source, so the body
//! can follow the headers in the same stream without the whole request
//! having to fit one read. Lines grow on demand but are capped by an
//! explicit maximum length; an over-long line is a clean parse failure
//! rather than a truncation.

use std::io::{BufRead, Read};

/// A parsed HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    /// Method token as received (e.g. "GET", "post")
    method: String,

    /// Path token from the request line
    path: String,

    /// Headers in the order received; duplicates preserved
    headers: Vec<(String, String)>,

    /// Declared body length (0 when absent or unparseable)
    content_length: usize,

    /// Body bytes, present iff `content_length > 0`
    body: Option<Vec<u8>>,
}

/// Errors produced while parsing a request
#[derive(Debug)]
pub enum ParseError {
    /// No request line was available, or it could not be split into
    /// method and path
    MalformedRequestLine,

    /// A header line without a colon, with invalid encoding, or a stream
    /// that ended before the blank line terminating the header section
    MalformedHeader(String),

    /// The stream ended before `Content-Length` bytes of body arrived
    TruncatedBody { expected: usize, read: usize },

    /// A request or header line exceeded the configured maximum length
    LineTooLong(usize),

    /// Transport error surfaced mid-parse
    Io(std::io::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MalformedRequestLine => write!(f, "Malformed request line"),
            ParseError::MalformedHeader(h) => write!(f, "Malformed header: {}", h),
            ParseError::TruncatedBody { expected, read } => {
                write!(f, "Truncated body: expected {} bytes, got {}", expected, read)
            }
            ParseError::LineTooLong(limit) => {
                write!(f, "Line exceeds maximum length of {} bytes", limit)
            }
            ParseError::Io(e) => write!(f, "I/O error while reading request: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl Request {
    /// Parses one request from a buffered byte source.
    ///
    /// Reads the request line, the header section up to its terminating
    /// blank line, and — when a positive `Content-Length` is declared —
    /// exactly that many body bytes. Nothing past the request is consumed.
    ///
    /// # Example
    ///
    /// ```
    /// use rshttpd::http::Request;
    ///
    /// let raw: &[u8] = b"GET /index.html HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(&mut &raw[..], 8192).unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.path(), "/index.html");
    /// ```
    pub fn parse<R: BufRead>(reader: &mut R, max_line_length: usize) -> Result<Self, ParseError> {
        // 1. Request line
        let line = read_line(reader, max_line_length)?.ok_or(ParseError::MalformedRequestLine)?;
        let line = String::from_utf8(line).map_err(|_| ParseError::MalformedRequestLine)?;
        let (method, path) = Self::parse_request_line(&line)?;

        // 2. Headers, until the blank line
        let headers = Self::parse_headers(reader, max_line_length)?;

        // 3. Body, iff a positive Content-Length was declared
        let content_length = lookup(&headers, "Content-Length")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let body = if content_length > 0 {
            Some(Self::read_body(reader, content_length)?)
        } else {
            None
        };

        Ok(Request {
            method,
            path,
            headers,
            content_length,
            body,
        })
    }

    /// Splits the request line into method and path tokens.
    ///
    /// `GET /index.html HTTP/1.1` → (`GET`, `/index.html`). Anything after
    /// the second space (the version token) is ignored.
    fn parse_request_line(line: &str) -> Result<(String, String), ParseError> {
        let (method, rest) = line.split_once(' ').ok_or(ParseError::MalformedRequestLine)?;
        let path = match rest.split_once(' ') {
            Some((path, _version)) => path,
            None => rest,
        };

        if method.is_empty() || path.is_empty() {
            return Err(ParseError::MalformedRequestLine);
        }

        Ok((method.to_string(), path.to_string()))
    }

    /// Reads header lines until the blank line that ends the section.
    ///
    /// Each line splits on its first colon; the value loses exactly one
    /// leading space if present. Order and duplicate keys are preserved.
    fn parse_headers<R: BufRead>(
        reader: &mut R,
        max_line_length: usize,
    ) -> Result<Vec<(String, String)>, ParseError> {
        let mut headers = Vec::new();

        loop {
            let line = read_line(reader, max_line_length)?
                .ok_or_else(|| ParseError::MalformedHeader("unexpected end of stream".to_string()))?;
            if line.is_empty() {
                break;
            }

            let line = String::from_utf8(line)
                .map_err(|_| ParseError::MalformedHeader("invalid encoding".to_string()))?;
            match line.split_once(':') {
                Some((key, value)) => {
                    let value = value.strip_prefix(' ').unwrap_or(value);
                    headers.push((key.to_string(), value.to_string()));
                }
                None => return Err(ParseError::MalformedHeader(line)),
            }
        }

        Ok(headers)
    }

    /// Reads exactly `length` body bytes.
    fn read_body<R: BufRead>(reader: &mut R, length: usize) -> Result<Vec<u8>, ParseError> {
        let mut body = vec![0u8; length];
        let mut read = 0;
        while read < length {
            let n = reader.read(&mut body[read..])?;
            if n == 0 {
                return Err(ParseError::TruncatedBody {
                    expected: length,
                    read,
                });
            }
            read += n;
        }
        Ok(body)
    }

    /// Method token as received.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path from the request line.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Headers in received order, duplicates included.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup; first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }

    /// Declared body length; 0 when absent.
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    /// Body bytes, present iff the declared length was positive.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Case-insensitive first-match lookup in an ordered header list.
fn lookup<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Reads one LF-terminated line, stripping the terminator and an optional
/// preceding CR.
///
/// Returns `Ok(None)` when the stream is already at EOF. A line that ends
/// at EOF without a terminator is returned as-is. Lines longer than
/// `max_length` fail with [`ParseError::LineTooLong`] before the buffer can
/// grow further.
fn read_line<R: BufRead>(reader: &mut R, max_length: usize) -> Result<Option<Vec<u8>>, ParseError> {
    let mut line: Vec<u8> = Vec::new();

    loop {
        let (consumed, done) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                (0, true)
            } else if let Some(pos) = available.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&available[..pos]);
                (pos + 1, true)
            } else {
                line.extend_from_slice(available);
                (available.len(), false)
            }
        };
        reader.consume(consumed);

        if line.len() > max_length {
            return Err(ParseError::LineTooLong(max_length));
        }
        if done {
            if consumed == 0 && line.is_empty() {
                return Ok(None);
            }
            break;
        }
    }

    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_LINE: usize = 8192;

    fn parse(raw: &[u8]) -> Result<Request, ParseError> {
        Request::parse(&mut &raw[..], MAX_LINE)
    }

    #[test]
    fn test_parse_simple_get() {
        let request = parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/");
        assert!(request.headers().is_empty());
        assert_eq!(request.content_length(), 0);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_parse_with_path() {
        let request = parse(b"GET /index.html HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.path(), "/index.html");
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_parse_with_headers() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:8008\r\nUser-Agent: test\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:8008"));
        assert_eq!(request.header("User-Agent"), Some("test"));
        assert_eq!(request.headers().len(), 2);
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let raw = b"GET / HTTP/1.1\r\nContent-Length: 0\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("content-length"), Some("0"));
        assert_eq!(request.header("CONTENT-LENGTH"), Some("0"));
    }

    #[test]
    fn test_duplicate_headers_first_match_wins() {
        let raw = b"GET / HTTP/1.1\r\nX-Tag: first\r\nX-Tag: second\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("X-Tag"), Some("first"));
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.headers()[1].1, "second");
    }

    #[test]
    fn test_header_order_preserved() {
        let raw = b"GET / HTTP/1.1\r\nB: 2\r\nA: 1\r\nC: 3\r\n\r\n";
        let request = parse(raw).unwrap();

        let keys: Vec<&str> = request.headers().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_header_value_single_leading_space_stripped() {
        // Exactly one leading space goes; further spaces belong to the value.
        let raw = b"GET / HTTP/1.1\r\nX-Padded:  two spaces\r\nX-Bare:none\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.header("X-Padded"), Some(" two spaces"));
        assert_eq!(request.header("X-Bare"), Some("none"));
    }

    #[test]
    fn test_body_round_trip() {
        let raw = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = parse(raw).unwrap();

        assert_eq!(request.content_length(), 5);
        assert_eq!(request.body(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_body_stops_at_declared_length() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA";
        let mut source: &[u8] = raw;
        let request = Request::parse(&mut source, MAX_LINE).unwrap();

        assert_eq!(request.body(), Some(&b"hello"[..]));
        // The surplus stays in the stream.
        assert_eq!(source, b"EXTRA");
    }

    #[test]
    fn test_truncated_body() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
        let result = parse(raw);

        assert!(matches!(
            result,
            Err(ParseError::TruncatedBody {
                expected: 10,
                read: 5
            })
        ));
    }

    #[test]
    fn test_unparseable_content_length_means_no_body() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: banana\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.content_length(), 0);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_zero_content_length_means_no_body() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.content_length(), 0);
        assert!(request.body().is_none());
    }

    #[test]
    fn test_empty_stream_is_malformed_request_line() {
        // An immediately-closed connection, not a silent empty request.
        let result = parse(b"");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
    }

    #[test]
    fn test_request_line_without_space_rejected() {
        let result = parse(b"GET\r\n\r\n");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
    }

    #[test]
    fn test_header_without_colon_rejected() {
        let raw = b"GET / HTTP/1.1\r\nNoColonHere\r\n\r\n";
        let result = parse(raw);

        assert!(matches!(result, Err(ParseError::MalformedHeader(_))));
    }

    #[test]
    fn test_eof_before_blank_line_rejected() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\n";
        let result = parse(raw);

        assert!(matches!(result, Err(ParseError::MalformedHeader(_))));
    }

    #[test]
    fn test_line_too_long_rejected() {
        let mut raw = Vec::from(&b"GET /"[..]);
        raw.extend(std::iter::repeat(b'a').take(100));
        raw.extend_from_slice(b" HTTP/1.1\r\n\r\n");

        let result = Request::parse(&mut &raw[..], 32);
        assert!(matches!(result, Err(ParseError::LineTooLong(32))));
    }

    #[test]
    fn test_bare_lf_line_endings_accepted() {
        let raw = b"GET /index.html HTTP/1.1\nHost: localhost\n\n";
        let request = parse(raw).unwrap();

        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.header("Host"), Some("localhost"));
    }

    #[test]
    fn test_method_case_preserved() {
        let request = parse(b"post /anything HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), "post");
    }
}
