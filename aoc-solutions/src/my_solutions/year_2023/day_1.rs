use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 1, tags = ["strings"])]
pub struct Solver;

const SPELLED_DIGITS: [(&[u8], u32); 9] = [
    (b"one", 1),
    (b"two", 2),
    (b"three", 3),
    (b"four", 4),
    (b"five", 5),
    (b"six", 6),
    (b"seven", 7),
    (b"eight", 8),
    (b"nine", 9),
];

impl AocParser for Solver {
    type SharedData<'a> = Vec<&'a str>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(input.lines().collect())
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_calibration_values(shared, false).map(|sum| sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_calibration_values(shared, true).map(|sum| sum.to_string())
    }
}

/// Lines are only checked here: a words-only line is malformed for the
/// digit variant but valid for the spelled one, and both share one parse.
fn sum_calibration_values(lines: &[&str], spelled: bool) -> Result<u64, SolveError> {
    lines
        .iter()
        .enumerate()
        .try_fold(0u64, |sum, (line_idx, line)| {
            let value = calibration_value(line, spelled).ok_or_else(|| {
                let wanted = if spelled { "digit or spelled digit" } else { "digit" };
                SolveError::SolveFailed(Box::new(ParseError::at_line(
                    line_idx,
                    format!("no {} in {:?}", wanted, line),
                )))
            })?;
            sum.checked_add(u64::from(value))
                .ok_or_else(|| SolveError::Overflow("calibration total".to_string()))
        })
}

/// First and last digit of `line` as a two digit number.
///
/// Both ends are searched independently, so overlapping words such as
/// `twone` give 2 from the left and 1 from the right.
fn calibration_value(line: &str, spelled: bool) -> Option<u32> {
    let bytes = line.as_bytes();
    let first = (0..bytes.len()).find_map(|i| digit_at(bytes, i, spelled))?;
    let last = (0..bytes.len())
        .rev()
        .find_map(|i| digit_at(bytes, i, spelled))?;
    Some(first * 10 + last)
}

fn digit_at(bytes: &[u8], idx: usize, spelled: bool) -> Option<u32> {
    let b = bytes[idx];
    if b.is_ascii_digit() {
        return Some(u32::from(b - b'0'));
    }
    if !spelled {
        return None;
    }
    SPELLED_DIGITS
        .iter()
        .find(|(word, _)| bytes[idx..].starts_with(word))
        .map(|&(_, value)| value)
}
