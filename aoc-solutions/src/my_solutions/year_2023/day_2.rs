use anyhow::{Context, anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::checked::checked_total;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 2, tags = ["parsing"])]
pub struct Solver;

/// Cube counts per color. Used both for a single round and for bag limits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CubeSet {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

/// Limits the part 1 question is asked against.
pub const BAG: CubeSet = CubeSet {
    red: 12,
    green: 13,
    blue: 14,
};

impl CubeSet {
    pub fn fits_within(&self, bag: &CubeSet) -> bool {
        self.red <= bag.red && self.green <= bag.green && self.blue <= bag.blue
    }

    /// Per-color maximum of two sets.
    pub fn union(self, other: CubeSet) -> CubeSet {
        CubeSet {
            red: self.red.max(other.red),
            green: self.green.max(other.green),
            blue: self.blue.max(other.blue),
        }
    }

    /// `None` once the product no longer fits in a `u64`.
    pub fn power(&self) -> Option<u64> {
        u64::from(self.red)
            .checked_mul(u64::from(self.green))?
            .checked_mul(u64::from(self.blue))
    }
}

#[derive(Debug)]
pub struct Game {
    id: u32,
    rounds: Vec<CubeSet>,
}

impl Game {
    pub fn is_possible(&self, bag: &CubeSet) -> bool {
        self.rounds.iter().all(|round| round.fits_within(bag))
    }

    /// Fewest cubes of each color that make every round possible.
    pub fn minimum_bag(&self) -> CubeSet {
        self.rounds
            .iter()
            .fold(CubeSet::default(), |bag, round| bag.union(*round))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Game>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .enumerate()
            .map(|(line_idx, line)| parse_game(line).map_err(|e| ParseError::at_line(line_idx, e)))
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(possible_id_sum(shared, &BAG)?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let powers = shared
            .iter()
            .map(|game| {
                game.minimum_bag()
                    .power()
                    .ok_or_else(|| SolveError::Overflow(format!("power of game {}", game.id)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(checked_total(powers, "sum of game powers")?.to_string())
    }
}

pub fn possible_id_sum(games: &[Game], bag: &CubeSet) -> Result<u64, SolveError> {
    checked_total(
        games
            .iter()
            .filter(|game| game.is_possible(bag))
            .map(|game| u64::from(game.id)),
        "sum of possible game ids",
    )
}

fn parse_game(line: &str) -> anyhow::Result<Game> {
    let (header, record) = line
        .split_once(':')
        .ok_or_else(|| anyhow!("missing ':' after game id"))?;

    let id = header
        .trim()
        .strip_prefix("Game")
        .ok_or_else(|| anyhow!("line must start with \"Game\""))?
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid game id in {:?}", header.trim()))?;

    let rounds = if record.trim().is_empty() {
        Vec::new()
    } else {
        record
            .split(';')
            .map(parse_round)
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    Ok(Game { id, rounds })
}

/// A color repeated within one round keeps its largest count.
fn parse_round(round: &str) -> anyhow::Result<CubeSet> {
    round.split(',').try_fold(CubeSet::default(), |mut set, draw| {
        let mut words = draw.split_whitespace();
        let (Some(count), Some(color), None) = (words.next(), words.next(), words.next()) else {
            bail!("expected \"<count> <color>\", got {:?}", draw.trim());
        };
        let count: u32 = count
            .parse()
            .with_context(|| format!("invalid cube count {:?}", count))?;
        let slot = match color {
            "red" => &mut set.red,
            "green" => &mut set.green,
            "blue" => &mut set.blue,
            other => bail!("unknown color {:?}", other),
        };
        *slot = (*slot).max(count);
        Ok(set)
    })
}
