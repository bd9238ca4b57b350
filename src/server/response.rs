use std::fmt;
use std::io::{self, Write};

use tracing::{debug, warn};

/// Content type used when a handler never sets one
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// One response header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLine {
    /// `Name: value`
    Field { name: String, value: String },
    /// A line emitted verbatim, e.g. `HTTP/1.1 403 Access Forbidden`
    Bare(String),
}

impl fmt::Display for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderLine::Field { name, value } => write!(f, "{}: {}", name, value),
            HeaderLine::Bare(line) => f.write_str(line),
        }
    }
}

/// Response sink handed to handlers and middleware.
///
/// Headers keep insertion order. Setting a header that already exists
/// replaces its value in place. The response is emitted once, by [`send`].
///
/// [`send`]: Response::send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    content_type: String,
    headers: Vec<HeaderLine>,
    body: Option<String>,
    sent: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            headers: Vec::new(),
            body: None,
            sent: false,
        }
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: u16) -> &mut Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Add a header.
    ///
    /// With a value this behaves like [`set_header`](Self::set_header). Without
    /// one, `name` is appended as a bare line.
    pub fn add_header(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) => self.set_header(name, value),
            None => self.add_raw_header(name),
        }
    }

    /// Set `name: value`, replacing an existing header of the same name in place.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        let existing = self.headers.iter_mut().find_map(|h| match h {
            HeaderLine::Field { name: n, value: v } if *n == name => Some(v),
            _ => None,
        });
        match existing {
            Some(v) => *v = value,
            None => self.headers.push(HeaderLine::Field { name, value }),
        }
        self
    }

    /// Append a header line verbatim
    pub fn add_raw_header(&mut self, line: impl Into<String>) -> &mut Self {
        self.headers.push(HeaderLine::Bare(line.into()));
        self
    }

    /// Remove the header called `name`, or else a bare line equal to `name`.
    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        let idx = self
            .headers
            .iter()
            .position(|h| matches!(h, HeaderLine::Field { name: n, .. } if n == name))
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|h| matches!(h, HeaderLine::Bare(line) if line == name))
            });
        if let Some(idx) = idx {
            self.headers.remove(idx);
        }
        self
    }

    /// Value of the header called `name`
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    #[must_use]
    pub fn headers(&self) -> &[HeaderLine] {
        &self.headers
    }

    pub fn set_body(&mut self, body: Option<String>) -> &mut Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Finalize the response.
    ///
    /// The first call writes `Content-Type` into the header list (in place if a
    /// handler already set it, otherwise last) and returns what goes on the
    /// wire. Every later call returns `None`.
    pub fn send(&mut self) -> Option<SentResponse> {
        if self.sent {
            debug!(status = self.status, "Response already sent");
            return None;
        }
        let content_type = self.content_type.clone();
        self.set_header("Content-Type", content_type);
        self.sent = true;

        Some(SentResponse {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
        })
    }

    /// [`send`](Self::send) and write the wire form to `out`.
    ///
    /// Returns `false` without writing when the response was already sent.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn write_to<W: Write>(&mut self, out: &mut W) -> io::Result<bool> {
        let Some(sent) = self.send() else {
            warn!(status = self.status, "Ignoring second write of a sent response");
            return Ok(false);
        };
        out.write_all(sent.to_wire().as_bytes())?;
        out.flush()?;
        Ok(true)
    }
}

fn header_value<'a>(headers: &'a [HeaderLine], name: &str) -> Option<&'a str> {
    headers.iter().find_map(|h| match h {
        HeaderLine::Field { name: n, value } if n == name => Some(value.as_str()),
        _ => None,
    })
}

/// A finalized response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentResponse {
    pub status: u16,
    pub headers: Vec<HeaderLine>,
    pub body: Option<String>,
}

impl SentResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    #[must_use]
    pub fn has_raw_header(&self, line: &str) -> bool {
        self.headers
            .iter()
            .any(|h| matches!(h, HeaderLine::Bare(l) if l == line))
    }

    /// HTTP/1.1 wire text: status line, header lines, blank line, body
    #[must_use]
    pub fn to_wire(&self) -> String {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status, status_reason(self.status));
        for header in &self.headers {
            out.push_str(&header.to_string());
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        if let Some(body) = &self.body {
            out.push_str(body);
        }
        out
    }
}
