use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The inventory source could not be opened or read.
    InventoryUnreadable,
    /// The inventory source is not a well-formed table.
    InventoryMalformed,
    /// An appointment could not be written to its storage location.
    StorageFailed,
    /// A record could not be serialized.
    Serialization,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InventoryUnreadable => {
                write!(f, "Inventory is unreadable")
            }
            ErrorKind::InventoryMalformed => {
                write!(f, "Inventory is malformed")
            }
            ErrorKind::StorageFailed => write!(f, "Storage failed"),
            ErrorKind::Serialization => write!(f, "Serialization failed"),
        }
    }
}

/// Describes a failure of the inventory or appointment machinery.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error of the given kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, reason: None }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", self.kind, reason),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {}
