//! Console error taxonomy.

/// Why a line, lookup, or handler step was rejected.
///
/// Every variant is a report-and-continue condition: the session keeps
/// running and the next line is read normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// Token 0 does not name a registered command.
    UnknownCommand,
    /// A variable command named an unregistered variable.
    UnknownVariable,
    /// Fewer parameters than the command's minimum arity.
    TooFewParameters,
    /// A parameter failed to parse as the variable's type.
    InvalidValue,
    /// The backing store rejected a read or write.
    StorageFailed,
}

impl ConsoleError {
    /// Get error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::UnknownVariable => "E02",
            Self::TooFewParameters => "E03",
            Self::InvalidValue => "E04",
            Self::StorageFailed => "E05",
        }
    }

    /// Get error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "not a command",
            Self::UnknownVariable => "not a variable",
            Self::TooFewParameters => "too few parameters",
            Self::InvalidValue => "invalid value",
            Self::StorageFailed => "storage error",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
