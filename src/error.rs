use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input rejected by `parse`.
    Parse,
    /// A pre-validated span failed to re-scan or decode.
    Internal,
    /// The node arena or an allocation ran out of room.
    ResourceExhausted,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Resolve a byte offset into a 1-based line/column pair.
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let mut line = 1;
        let mut line_start = 0;
        for idx in memchr::memchr_iter(b'\n', &input[..offset]) {
            line += 1;
            line_start = idx + 1;
        }
        Self {
            offset,
            line,
            column: offset - line_start + 1,
        }
    }
}

#[derive(Debug, Clone, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Parse,
            message: message.into(),
            location: None,
        }
    }

    pub fn parse_at(input: &[u8], offset: usize, message: impl Into<String>) -> Self {
        let location = Location::from_offset(input, offset);
        let message = format!(
            "{} at line {} column {}",
            message.into(),
            location.line,
            location.column
        );
        Self {
            kind: ErrorKind::Parse,
            message,
            location: Some(location),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: format!("internal invariant violated: {}", message.into()),
            location: None,
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ResourceExhausted,
            message: message.into(),
            location: None,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: message.into(),
            location: None,
        }
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ErrorKind::Parse
    }

    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::Internal
    }
}
