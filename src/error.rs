use std::fmt;

/// Errors produced while parsing or building paths and transforms
#[derive(Debug)]
pub enum Error {
    /// Failed to parse path data or transform string
    Parse { reason: String, offset: usize },
    /// Command letter that does not name any path command
    UnknownCommand(char),
    /// Command received wrong number of parameters
    InvalidArity {
        cmd: char,
        expected: usize,
        found: usize,
    },
    /// Path data does not start with a move-to command
    MissingMoveTo,
    /// Sub-path at the given index contains no nodes
    EmptySubPath(usize),
    /// Sub-path or node index does not exist
    IndexOutOfRange { subpath: usize, node: usize },
    /// JSON error
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { reason, offset } => write!(f, "{} at offset {}", reason, offset),
            Error::UnknownCommand(cmd) => write!(f, "unknown path command '{}'", cmd),
            Error::InvalidArity {
                cmd,
                expected,
                found,
            } => write!(
                f,
                "command '{}' expects {} parameters, found {}",
                cmd, expected, found
            ),
            Error::MissingMoveTo => write!(f, "path data must start with a move-to command"),
            Error::EmptySubPath(index) => write!(f, "sub-path {} is empty", index),
            Error::IndexOutOfRange { subpath, node } => {
                write!(f, "no node {} in sub-path {}", node, subpath)
            }
            #[cfg(feature = "serde")]
            Error::Json(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            Error::Json(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        Self::new(std::io::ErrorKind::InvalidData, error)
    }
}
