//! Core solver traits
//!
//! A puzzle solver is split into a loader ([`AocParser`]) that turns the raw
//! input into shared data once, and one [`PartSolver`] per answer. [`Solver`]
//! ties the parts together behind a runtime part number.

use crate::error::{ParseError, SolveError};

/// Loads puzzle input into the data shared by every part.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError};
///
/// struct Calibration;
///
/// impl AocParser for Calibration {
///     type SharedData<'a> = Vec<&'a str>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(input.lines().collect())
///     }
/// }
///
/// let lines = Calibration::parse("1abc2\npqr3stu8vwx").unwrap();
/// assert_eq!(lines.len(), 2);
/// ```
pub trait AocParser {
    /// Parsed input plus anything the parts want to memoize between calls.
    ///
    /// Borrowing from the input (`&'a str`) is fine when no transformation is
    /// needed; owned structs work when a part caches intermediate results.
    type SharedData<'a>;

    /// Parse the input string into the shared data structure.
    ///
    /// Malformed input must be reported as a [`ParseError`], never skipped.
    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError>;
}

/// Solves part `N` of a puzzle.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
///
/// struct Calibration;
///
/// impl AocParser for Calibration {
///     type SharedData<'a> = Vec<&'a str>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(input.lines().collect())
///     }
/// }
///
/// impl PartSolver<1> for Calibration {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         let digits = shared
///             .iter()
///             .flat_map(|line| line.bytes().filter(u8::is_ascii_digit))
///             .count();
///         Ok(digits.to_string())
///     }
/// }
///
/// let mut lines = Calibration::parse("1abc2\npqr3stu8vwx").unwrap();
/// assert_eq!(<Calibration as PartSolver<1>>::solve(&mut lines).unwrap(), "4");
/// ```
pub trait PartSolver<const N: u8>: AocParser {
    /// Compute the answer for part `N`, rendered as a string.
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError>;
}

/// A full solver: a parser plus a runtime dispatch over its parts.
///
/// Usually generated by `#[derive(AocSolver)]`, which routes part `k` to
/// `PartSolver<k>`.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError, SolveError, Solver};
///
/// struct Totals;
///
/// impl AocParser for Totals {
///     type SharedData<'a> = Vec<u64>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|line| {
///                 line.parse()
///                     .map_err(|_| ParseError::InvalidFormat(format!("not a number: {line}")))
///             })
///             .collect()
///     }
/// }
///
/// impl Solver for Totals {
///     const PARTS: u8 = 2;
///
///     fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
///         match part {
///             1 => Ok(shared.iter().sum::<u64>().to_string()),
///             2 => Ok(shared.iter().max().copied().unwrap_or(0).to_string()),
///             _ => Err(SolveError::PartNotImplemented(part)),
///         }
///     }
/// }
///
/// let mut shared = Totals::parse("12\n38\n15").unwrap();
/// assert_eq!(Totals::solve_part(&mut shared, 1).unwrap(), "65");
/// assert_eq!(Totals::solve_part(&mut shared, 2).unwrap(), "38");
/// ```
pub trait Solver: AocParser {
    /// Number of parts this solver implements
    const PARTS: u8;

    /// Solve a specific part of the problem
    ///
    /// # Returns
    /// * `Ok(String)` - The answer for this part
    /// * `Err(SolveError::PartNotImplemented)` - The part is not implemented
    /// * `Err(SolveError::SolveFailed)` - An error occurred while solving
    fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError>;
}

/// Range-checked entry point used by [`crate::SolverInstance`].
pub trait SolverExt: Solver {
    /// Solve `part`, rejecting anything outside `1..=PARTS` with
    /// [`SolveError::PartOutOfRange`].
    fn solve_part_checked_range(
        shared: &mut Self::SharedData<'_>,
        part: u8,
    ) -> Result<String, SolveError> {
        if (1..=Self::PARTS).contains(&part) {
            Self::solve_part(shared, part)
        } else {
            Err(SolveError::PartOutOfRange(part))
        }
    }
}

impl<T: Solver + ?Sized> SolverExt for T {}
