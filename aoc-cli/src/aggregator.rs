//! Reorders results arriving from worker threads
//!
//! Workers finish in any order; output must follow year, day, part. Results
//! are held back until every key before them has been emitted.

use crate::executor::{SolverResult, WorkItem};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

/// Key for ordering results (year, day, part) - ordered ascending
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

impl ResultKey {
    /// Every key a list of work items will produce
    pub fn expected_from(work_items: &[WorkItem]) -> Vec<ResultKey> {
        work_items
            .iter()
            .flat_map(|w| {
                w.parts.clone().map(move |part| ResultKey {
                    year: w.year,
                    day: w.day,
                    part,
                })
            })
            .collect()
    }
}

/// Buffers results and emits them in sorted order
pub struct ResultAggregator {
    /// Min-heap of keys not yet emitted
    expected: BinaryHeap<Reverse<ResultKey>>,
    /// Received results waiting for their turn
    pending: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    pub fn new(expected_keys: Vec<ResultKey>) -> Self {
        Self {
            expected: expected_keys.into_iter().map(Reverse).collect(),
            pending: BTreeMap::new(),
        }
    }

    /// Add a result and return any results ready for output (in order)
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(&Reverse(next)) = self.expected.peek() {
            let Some(result) = self.pending.remove(&next) else {
                break;
            };
            self.expected.pop();
            ready.push(result);
        }
        ready
    }

    /// Whatever is still buffered, in key order
    pub fn drain(&mut self) -> Vec<SolverResult> {
        std::mem::take(&mut self.pending).into_values().collect()
    }

    /// Check if all expected results have been received
    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn make_result(year: u16, day: u8, part: u8) -> SolverResult {
        SolverResult {
            year,
            day,
            part,
            answer: Ok(format!("{}_{}_{}", year, day, part)),
            solve_duration: TimeDelta::milliseconds(10),
            parse_duration: (part == 1).then(|| TimeDelta::milliseconds(5)),
        }
    }

    fn keys(items: &[(u16, u8, u8)]) -> Vec<ResultKey> {
        items
            .iter()
            .map(|&(year, day, part)| ResultKey { year, day, part })
            .collect()
    }

    #[test]
    fn test_expected_keys_from_work_items() {
        let items = vec![
            WorkItem { year: 2023, day: 1, parts: 1..=2 },
            WorkItem { year: 2023, day: 3, parts: 2..=2 },
        ];
        assert_eq!(
            ResultKey::expected_from(&items),
            keys(&[(2023, 1, 1), (2023, 1, 2), (2023, 3, 2)])
        );
    }

    #[test]
    fn test_in_order_results() {
        let mut agg = ResultAggregator::new(keys(&[(2023, 1, 1), (2023, 1, 2)]));

        let ready = agg.add(make_result(2023, 1, 1));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 1);

        let ready = agg.add(make_result(2023, 1, 2));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].part, 2);

        assert!(agg.is_complete());
    }

    #[test]
    fn test_out_of_order_results() {
        let mut agg =
            ResultAggregator::new(keys(&[(2023, 2, 1), (2023, 1, 2), (2023, 1, 1)]));

        assert!(agg.add(make_result(2023, 1, 2)).is_empty());
        assert!(agg.add(make_result(2023, 2, 1)).is_empty());

        let ready = agg.add(make_result(2023, 1, 1));
        let order: Vec<_> = ready.iter().map(|r| (r.day, r.part)).collect();
        assert_eq!(order, vec![(1, 1), (1, 2), (2, 1)]);
        assert!(agg.is_complete());
    }

    /// Two years of four days with two parts each, already in output order
    fn all_keys() -> Vec<ResultKey> {
        let mut keys = Vec::new();
        for year in 2022..=2023 {
            for day in 1..=4 {
                for part in 1..=2 {
                    keys.push(ResultKey { year, day, part });
                }
            }
        }
        keys
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_is_emitted_sorted(arrival in Just(all_keys()).prop_shuffle()) {
            let mut agg = ResultAggregator::new(all_keys());
            let mut emitted = Vec::new();
            for key in arrival {
                let ready = agg.add(make_result(key.year, key.day, key.part));
                emitted.extend(ready.iter().map(ResultKey::from));
            }

            prop_assert!(agg.is_complete());
            prop_assert!(agg.drain().is_empty());
            prop_assert_eq!(emitted, all_keys());
        }
    }

    #[test]
    fn test_drain_remaining() {
        let mut agg = ResultAggregator::new(keys(&[(2023, 4, 1), (2023, 4, 2)]));

        agg.add(make_result(2023, 4, 2));

        let remaining = agg.drain();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].part, 2);
        assert!(!agg.is_complete());
    }
}
