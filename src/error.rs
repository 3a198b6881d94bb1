//! Reporter errors

use std::fmt;

/// The kind of reporter error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the event log or writing to the sink failed
    Io,
    /// An event log line is not a valid event
    Parse,
}

/// A reporter error, with the event log line when known
#[derive(Debug)]
pub struct ReportError {
    pub kind: ErrorKind,
    pub message: String,
    pub source_name: Option<String>,
    pub line: Option<usize>,
}

impl ReportError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source_name: None,
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, msg)
    }

    pub fn is_io(&self) -> bool {
        self.kind == ErrorKind::Io
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ErrorKind::Parse
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref name) = self.source_name {
            write!(f, "{}:", name)?;
        }
        if let Some(line) = self.line {
            write!(f, "{}:", line)?;
        }
        if self.source_name.is_some() || self.line.is_some() {
            write!(f, " ")?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ReportError {}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::Parse, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_plain() {
        let e = ReportError::new(ErrorKind::Io, "boom");
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn test_display_with_location() {
        let e = ReportError::parse("expected value").with_line(3).with_source_name("events.ndjson");
        assert_eq!(e.to_string(), "events.ndjson:3: expected value");
        assert!(e.is_parse());
    }

    #[test]
    fn test_display_line_only() {
        let e = ReportError::parse("bad").with_line(7);
        assert_eq!(e.to_string(), "7: bad");
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let e = ReportError::from(io);
        assert!(e.is_io());
        assert_eq!(e.message, "pipe closed");
    }

    #[test]
    fn test_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(ReportError::from(err).is_parse());
    }
}
