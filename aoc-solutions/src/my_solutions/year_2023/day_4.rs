use std::collections::{HashMap, HashSet};

use anyhow::{Context, anyhow};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::checked::checked_total;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 4, tags = ["parsing", "propagation"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    cards: Vec<Card>,
    match_counts: Option<Vec<usize>>,
}

#[derive(Debug)]
struct Card {
    id: u32,
    winning: HashSet<u32>,
    have: Vec<u32>,
}

impl Card {
    /// How many of the numbers we have are winning numbers.
    fn matches(&self) -> usize {
        self.have.iter().filter(|n| self.winning.contains(n)).count()
    }
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut seen = HashSet::new();
        let cards = input
            .lines()
            .enumerate()
            .map(|(line_idx, line)| {
                let card = parse_card(line).map_err(|e| ParseError::at_line(line_idx, e))?;
                if !seen.insert(card.id) {
                    return Err(ParseError::at_line(
                        line_idx,
                        format!("card {} appears more than once", card.id),
                    ));
                }
                Ok(card)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SharedData {
            cards,
            match_counts: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total = match_counts(shared)
            .iter()
            .try_fold(0u64, |total, &matches| {
                let points = match matches {
                    0 => 0,
                    m => 2u64.checked_pow(u32::try_from(m - 1).ok()?)?,
                };
                total.checked_add(points)
            })
            .ok_or_else(|| SolveError::Overflow("card points".to_string()))?;
        Ok(total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let counts = match_counts(shared).clone();
        let copies = propagate_copies(&shared.cards, &counts)?;
        Ok(checked_total(copies.into_values(), "total scratchcards")?.to_string())
    }
}

fn match_counts(shared: &mut SharedData) -> &Vec<usize> {
    shared
        .match_counts
        .get_or_insert_with(|| shared.cards.iter().map(Card::matches).collect())
}

/// Copies held of every card once all winnings have cascaded.
///
/// Only ids that exist in the input are tracked: winnings that would point
/// past the last card are dropped.
fn propagate_copies(
    cards: &[Card],
    match_counts: &[usize],
) -> Result<HashMap<u32, u64>, SolveError> {
    let mut copies: HashMap<u32, u64> = cards.iter().map(|card| (card.id, 0)).collect();

    for (card, &matches) in cards.iter().zip(match_counts) {
        let held = {
            let own = copies.entry(card.id).or_insert(0);
            *own += 1;
            *own
        };
        for offset in 1..=matches {
            let Some(next_id) = u32::try_from(offset)
                .ok()
                .and_then(|offset| card.id.checked_add(offset))
            else {
                break;
            };
            if let Some(count) = copies.get_mut(&next_id) {
                *count = count
                    .checked_add(held)
                    .ok_or_else(|| SolveError::Overflow(format!("copies of card {}", next_id)))?;
            }
        }
    }

    Ok(copies)
}

fn parse_card(line: &str) -> anyhow::Result<Card> {
    let (header, numbers) = line
        .split_once(':')
        .ok_or_else(|| anyhow!("missing ':' after card id"))?;

    let id = header
        .trim()
        .strip_prefix("Card")
        .ok_or_else(|| anyhow!("line must start with \"Card\""))?
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid card id in {:?}", header.trim()))?;

    let (winning, have) = numbers
        .split_once('|')
        .ok_or_else(|| anyhow!("missing '|' between winning numbers and numbers you have"))?;

    Ok(Card {
        id,
        winning: parse_numbers(winning)?.into_iter().collect(),
        have: parse_numbers(have)?,
    })
}

fn parse_numbers(list: &str) -> anyhow::Result<Vec<u32>> {
    list.split_whitespace()
        .map(|n| {
            n.parse::<u32>()
                .with_context(|| format!("invalid number {:?}", n))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;
    use proptest::prelude::*;

    const EXAMPLE: &str = "\
Card 1: 41 48 83 86 17 | 83 86  6 31 17  9 48 53
Card 2: 13 32 20 16 61 | 61 30 68 82 17 32 24 19
Card 3:  1 21 53 59 44 | 69 82 63 72 16 21 14  1
Card 4: 41 92 73 84 69 | 59 84 76 51 58  5 54 83
Card 5: 87 83 26 28 32 | 88 30 70 12 93 22 82 36
Card 6: 31 18 13 56 72 | 74 77 10 23 35 67 36 11
";

    fn solve(input: &str, part: u8) -> String {
        let mut shared = Solver::parse(input).unwrap();
        Solver::solve_part(&mut shared, part).unwrap()
    }

    #[test]
    fn test_example_answers() {
        assert_eq!(solve(EXAMPLE, 1), "13");
        assert_eq!(solve(EXAMPLE, 2), "30");
    }

    #[test]
    fn test_example_copies_per_card() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        let counts = match_counts(&mut shared).clone();
        assert_eq!(counts, vec![4, 2, 2, 1, 0, 0]);

        let copies = propagate_copies(&shared.cards, &counts).unwrap();
        let per_card: Vec<u64> = (1..=6).map(|id| copies[&id]).collect();
        assert_eq!(per_card, vec![1, 2, 4, 8, 14, 1]);
    }

    #[test]
    fn test_zero_match_card_only_counts_itself() {
        let input = "Card 1: 1 2 | 3 4\nCard 2: 5 | 6\n";
        assert_eq!(solve(input, 1), "0");
        assert_eq!(solve(input, 2), "2");
    }

    #[test]
    fn test_winnings_past_last_card_are_dropped() {
        let input = "Card 1: 1 2 3 | 1 2 3\nCard 2: 9 | 8\n";
        let mut shared = Solver::parse(input).unwrap();
        let counts = match_counts(&mut shared).clone();
        let copies = propagate_copies(&shared.cards, &counts).unwrap();

        assert_eq!(copies.len(), 2);
        assert_eq!(copies[&2], 2);
        assert_eq!(solve(input, 2), "3");
    }

    #[test]
    fn test_part1_doubles_per_match() {
        assert_eq!(solve("Card 1: 1 2 3 4 | 1 2 3 4", 1), "8");
        assert_eq!(solve("Card 1: 7 | 7", 1), "1");
    }

    #[test]
    fn test_malformed_cards_are_rejected() {
        for input in [
            "Card 1 41 48 | 83 86",
            "Card 1: 41 48 83 86",
            "Card x: 41 | 83",
            "Card 1: 41 | 8a",
            "Card 1: 41 | 83 | 86",
            "Game 1: 41 | 83",
        ] {
            assert!(
                matches!(Solver::parse(input), Err(ParseError::Line { line: 1, .. })),
                "{input:?} should be rejected"
            );
        }
    }

    /// Card `i` wins exactly `matches[i - 1]` matches.
    fn cascade(matches: &[usize]) -> String {
        matches
            .iter()
            .enumerate()
            .map(|(idx, &m)| {
                let winning: Vec<String> = (1..=m).map(|n| n.to_string()).collect();
                let winning = winning.join(" ");
                format!("Card {}: {winning} 1000 | {winning} 2000", idx + 1)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_copies_of_one_card_overflow() {
        // every card wins all the cards after it, so card k holds 2^(k-1) copies
        let matches: Vec<usize> = (1..=66).map(|i| 66 - i).collect();
        let mut shared = Solver::parse(&cascade(&matches)).unwrap();
        assert!(matches!(
            Solver::solve_part(&mut shared, 2),
            Err(SolveError::Overflow(what)) if what == "copies of card 65"
        ));
    }

    #[test]
    fn test_total_copies_overflow() {
        // cards 1..=64 double up to 2^63 copies of card 64, which then pushes
        // 2^63 + 1 copies onto each of cards 65 and 66
        let mut matches: Vec<usize> = (1..=63).map(|i| 64 - i).collect();
        matches.extend([2, 0, 0]);
        let mut shared = Solver::parse(&cascade(&matches)).unwrap();

        let counts = match_counts(&mut shared).clone();
        let copies = propagate_copies(&shared.cards, &counts).unwrap();
        assert_eq!(copies[&64], 1 << 63);
        assert_eq!(copies[&66], (1 << 63) + 1);

        assert!(matches!(
            Solver::solve_part(&mut shared, 2),
            Err(SolveError::Overflow(what)) if what == "total scratchcards"
        ));
    }

    #[test]
    fn test_duplicate_card_id_is_rejected() {
        let err = Solver::parse("Card 1: 1 | 1\nCard 1: 2 | 2").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(solve("", 1), "0");
        assert_eq!(solve("", 2), "0");
    }

    proptest! {
        #[test]
        fn prop_every_card_keeps_its_original(matches in prop::collection::vec(0usize..4, 1..12)) {
            let input = matches
                .iter()
                .enumerate()
                .map(|(idx, &m)| {
                    let winning: Vec<String> = (1..=m).map(|n| n.to_string()).collect();
                    format!("Card {}: {} 90 | {} 99", idx + 1, winning.join(" "), winning.join(" "))
                })
                .collect::<Vec<_>>()
                .join("\n");

            let mut shared = Solver::parse(&input).unwrap();
            let counts = match_counts(&mut shared).clone();
            prop_assert_eq!(&counts, &matches);

            let copies = propagate_copies(&shared.cards, &counts).unwrap();
            prop_assert_eq!(copies.len(), matches.len());
            prop_assert!(copies.values().all(|&c| c >= 1));

            let first = Solver::solve_part(&mut shared, 2).unwrap();
            let second = Solver::solve_part(&mut shared, 2).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
