use std::collections::HashMap;
use std::collections::hash_map::Entry;

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::checked::checked_total;
use crate::utils::grid::{DigitRun, RaggedGrid};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 3, tags = ["grid"])]
pub struct Solver;

const EMPTY: u8 = b'.';
const GEAR: u8 = b'*';

#[derive(Debug)]
pub struct SharedData<'a> {
    grid: RaggedGrid<'a>,
    part_numbers: Vec<PartNumber>,
}

#[derive(Debug, Clone, Copy)]
struct PartNumber {
    run: DigitRun,
    value: u64,
}

/// Numbers seen next to one gear so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearRecord {
    pub has_pair: bool,
    pub product: u64,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = RaggedGrid::new(input);
        let part_numbers = grid
            .digit_runs()
            .into_iter()
            .map(|run| {
                let digits = grid.run_bytes(&run);
                digits
                    .iter()
                    .try_fold(0u64, |acc, &d| {
                        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
                    })
                    .map(|value| PartNumber { run, value })
                    .ok_or_else(|| {
                        ParseError::at_line(
                            run.row,
                            format!("number at column {} does not fit in 64 bits", run.start + 1),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SharedData { grid, part_numbers })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let part_numbers = shared
            .part_numbers
            .iter()
            .filter(|number| touches_symbol(&shared.grid, number.run))
            .map(|number| number.value);
        Ok(checked_total(part_numbers, "sum of part numbers")?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let gears = gear_records(shared)?;
        let ratios = gears
            .values()
            .filter(|record| record.has_pair)
            .map(|record| record.product);
        Ok(checked_total(ratios, "sum of gear ratios")?.to_string())
    }
}

/// Any non-`.` cell around the run marks it as a part number.
fn touches_symbol(grid: &RaggedGrid<'_>, run: DigitRun) -> bool {
    grid.run_border(run).any(|(_, _, b)| b != EMPTY)
}

/// Folds every number into the records of the gears next to any of its digits.
///
/// Numbers are visited in reading order. A gear touching three or more
/// numbers keeps multiplying them in.
fn gear_records(shared: &SharedData<'_>) -> Result<HashMap<(usize, usize), GearRecord>, SolveError> {
    let mut gears: HashMap<(usize, usize), GearRecord> = HashMap::new();

    for number in &shared.part_numbers {
        let mut adjacent: Vec<(usize, usize)> = Vec::new();
        for (r, c, b) in shared.grid.run_border(number.run) {
            if b == GEAR && !adjacent.contains(&(r, c)) {
                adjacent.push((r, c));
            }
        }

        for coord in adjacent {
            match gears.entry(coord) {
                Entry::Vacant(slot) => {
                    slot.insert(GearRecord {
                        has_pair: false,
                        product: number.value,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let record = slot.get_mut();
                    record.has_pair = true;
                    record.product = record.product.checked_mul(number.value).ok_or_else(|| {
                        SolveError::Overflow(format!(
                            "gear ratio at row {} column {}",
                            coord.0 + 1,
                            coord.1 + 1
                        ))
                    })?;
                }
            }
        }
    }

    Ok(gears)
}
