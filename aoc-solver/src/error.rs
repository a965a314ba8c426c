//! Error types for the solver library

use std::fmt::Display;
use thiserror::Error;

/// Input that could not be turned into a solver's shared data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// One line of the input breaks the expected grammar
    #[error("line {line}: {message}")]
    Line {
        /// 1-based line number
        line: usize,
        message: String,
    },
    /// Input as a whole doesn't match the expected structure
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl ParseError {
    /// Error for the line at 0-based `index`, as produced by `lines().enumerate()`
    pub fn at_line(index: usize, message: impl Display) -> Self {
        Self::Line {
            line: index + 1,
            message: format!("{message:#}"),
        }
    }
}

/// Error type for solving a specific part
#[derive(Debug, Error)]
pub enum SolveError {
    /// The requested part number is not implemented
    #[error("Part {0} is not implemented")]
    PartNotImplemented(u8),
    /// The requested part number is out of range (exceeds max_parts)
    #[error("Part {0} is out of range")]
    PartOutOfRange(u8),
    /// An intermediate value no longer fits its integer type
    #[error("{0} overflowed")]
    Overflow(String),
    /// An error occurred while solving the part
    #[error("Solve failed: {0}")]
    SolveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Error type for solver operations
#[derive(Debug, Error)]
pub enum SolverError {
    /// No solver registered for the given year and day
    #[error("No solver registered for {0}/{1:02}")]
    NotFound(u16, u8),
    /// Year or day outside the supported storage range
    #[error("{0}/{1:02} is outside the supported years and days")]
    InvalidYearDay(u16, u8),
    /// Error occurred during parsing
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    /// Error occurred during solving
    #[error("Solve error: {0}")]
    SolveError(#[from] SolveError),
}

/// Error type for registration failures
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// A solver is already registered for this year/day
    #[error("Duplicate solver registration for {0}/{1:02}")]
    DuplicateSolver(u16, u8),
    /// Year or day outside the supported storage range
    #[error("{0}/{1:02} is outside the supported years and days")]
    InvalidYearDay(u16, u8),
}
