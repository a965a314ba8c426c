//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::input::InputStore;
use aoc_solver::{DynSolver, SolverRegistry};
use chrono::TimeDelta;
use itertools::Itertools;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;
use tracing::{debug, warn};

/// Result from a single solver execution
#[derive(Debug)]
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, ArcExecutorError>,
    /// Set on the first part solved from a freshly parsed input
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

/// Work item representing a solver to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    shared: SharedState,
    thread_pool: rayon::ThreadPool,
}

/// Everything a worker thread needs, borrowed by reference across the pool
struct SharedState {
    registry: SolverRegistry,
    inputs: InputStore,
    parallelize_by: ParallelizeBy,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            shared: SharedState {
                registry,
                inputs: InputStore::new(config.input_source.clone()),
                parallelize_by: config.parallelize_by,
                year_filter: config.year_filter,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        })
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let cfg = &self.shared;
        cfg.registry
            .storage()
            .iter_info()
            .filter(|info| cfg.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| cfg.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: filter_parts(cfg.part_filter, info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Year/days whose input is not on disk
    pub fn missing_inputs(&self, work_items: &[WorkItem]) -> Vec<(u16, u8)> {
        work_items
            .iter()
            .filter(|w| !self.shared.inputs.contains(w.year, w.day))
            .map(|w| (w.year, w.day))
            .collect()
    }

    /// Execute all work items and send results to channel
    ///
    /// Per-part failures travel inside [`SolverResult::answer`]; only
    /// failures of the execution machinery itself are returned here.
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        debug!(
            solvers = work_items.len(),
            mode = ?self.shared.parallelize_by,
            "executing"
        );

        match self.shared.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in &work_items {
                    if let Err(e) = run_work_item(work, &tx, &self.shared) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.execute_parallel(by_year, &tx)
            }
            // Part additionally fans out inside each work item
            ParallelizeBy::Day | ParallelizeBy::Part => {
                let singles = work_items.into_iter().map(|w| vec![w]).collect();
                self.execute_parallel(singles, &tx)
            }
        }
    }

    /// Run groups in parallel; items within a group run in order
    fn execute_parallel(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let shared = &self.shared;

        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .map(|items| {
                    items.iter().fold(None, |err, work| {
                        match run_work_item(work, tx, shared) {
                            Ok(()) => err,
                            Err(e) => Some(ArcExecutorError::combine_opt(err, e)),
                        }
                    })
                })
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(e1), e2) => Some(ArcExecutorError::combine_opt(e2, e1)),
                    (None, e2) => e2,
                })
                .flatten()
                .map_or(Ok(()), Err)
        })
    }
}

/// Clamp the requested part to what the solver supports
#[allow(clippy::reversed_empty_ranges)]
fn filter_parts(part_filter: Option<u8>, max_parts: u8) -> RangeInclusive<u8> {
    match part_filter {
        Some(p) if p <= max_parts => p..=p,
        Some(_) => 1..=0,
        None => 1..=max_parts,
    }
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ExecutorError::ChannelSend.into())
}

/// One failed result per requested part, all sharing the same error
fn send_failure(
    work: &WorkItem,
    error: ArcExecutorError,
    tx: &Sender<SolverResult>,
) -> Result<(), ArcExecutorError> {
    for part in work.parts.clone() {
        send(
            tx,
            SolverResult {
                year: work.year,
                day: work.day,
                part,
                answer: Err(error.clone()),
                parse_duration: None,
                solve_duration: TimeDelta::zero(),
            },
        )?;
    }
    Ok(())
}

/// Load input for one work item and solve its parts
fn run_work_item(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    shared: &SharedState,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);

    let input = match shared.inputs.load(year, day) {
        Ok(input) => input,
        Err(source) => {
            warn!(year, day, error = %source, "input unavailable");
            let error = ExecutorError::MissingInput { year, day, source };
            return send_failure(work, error.into(), tx);
        }
    };

    debug!(year, day, bytes = input.len(), "loaded input");

    if matches!(shared.parallelize_by, ParallelizeBy::Part) {
        run_parts_parallel(work, &input, tx, &shared.registry)
    } else {
        run_parts_sequential(work, &input, tx, &shared.registry)
    }
}

/// Parse once and solve every part in order against the same parsed data
fn run_parts_sequential(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    registry: &SolverRegistry,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);
    let mut solver = match registry.create_solver(year, day, input) {
        Ok(solver) => solver,
        Err(e) => {
            warn!(year, day, error = %e, "parse failed");
            return send_failure(work, ExecutorError::from(e).into(), tx);
        }
    };

    let mut parse_duration = Some(solver.parse_duration());
    for part in work.parts.clone() {
        let mut result = solve_part(year, day, part, &mut *solver);
        result.parse_duration = parse_duration.take();
        send(tx, result)?;
    }
    Ok(())
}

/// Solve parts concurrently, each on its own parse, and emit them in part order
fn run_parts_parallel(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    registry: &SolverRegistry,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);

    let mut results: Vec<SolverResult> = work
        .parts
        .clone()
        .into_par_iter()
        .map(|part| match registry.create_solver(year, day, input) {
            Ok(mut solver) => {
                let mut result = solve_part(year, day, part, &mut *solver);
                result.parse_duration = Some(solver.parse_duration());
                result
            }
            Err(e) => {
                warn!(year, day, part, error = %e, "parse failed");
                SolverResult {
                    year,
                    day,
                    part,
                    answer: Err(ExecutorError::from(e).into()),
                    parse_duration: None,
                    solve_duration: TimeDelta::zero(),
                }
            }
        })
        .collect();

    results.sort_by_key(|r| r.part);
    results.into_iter().try_for_each(|r| send(tx, r))
}

/// Solve a single part and time it
fn solve_part(year: u16, day: u8, part: u8, solver: &mut dyn DynSolver) -> SolverResult {
    match solver.solve(part) {
        Ok(solved) => {
            debug!(year, day, part, elapsed = %solved.elapsed, "solved");
            SolverResult {
                year,
                day,
                part,
                solve_duration: solved.elapsed,
                answer: Ok(solved.answer),
                parse_duration: None,
            }
        }
        Err(e) => {
            warn!(year, day, part, error = %e, "solve failed");
            SolverResult {
                year,
                day,
                part,
                answer: Err(ExecutorError::Solver(e.into()).into()),
                parse_duration: None,
                solve_duration: TimeDelta::zero(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSource;
    use aoc_solver::{
        AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder,
    };
    use std::fs;
    use std::path::Path;
    use std::sync::mpsc;
    use tempfile::TempDir;

    /// Part 1 sums the numbers, part 2 multiplies them
    #[derive(AocSolver)]
    #[aoc_solver(max_parts = 2)]
    struct Arith;

    impl AocParser for Arith {
        type SharedData<'a> = Vec<u64>;

        fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
            input
                .split_whitespace()
                .map(|n| {
                    n.parse()
                        .map_err(|_| ParseError::InvalidFormat(format!("not a number: {n}")))
                })
                .collect()
        }
    }

    impl PartSolver<1> for Arith {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().sum::<u64>().to_string())
        }
    }

    impl PartSolver<2> for Arith {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().product::<u64>().to_string())
        }
    }

    fn config(dir: &Path, parallelize_by: ParallelizeBy, part: Option<u8>) -> Config {
        Config {
            year_filter: None,
            day_filter: None,
            part_filter: part,
            tags: Vec::new(),
            input_source: InputSource::Dir(dir.to_path_buf()),
            thread_count: 2,
            parallelize_by,
            quiet: true,
        }
    }

    fn executor(config: &Config) -> Executor {
        let registry = SolverRegistryBuilder::new()
            .register::<Arith>(2023, 1)
            .unwrap()
            .register::<Arith>(2023, 2)
            .unwrap()
            .register::<Arith>(2022, 5)
            .unwrap()
            .build();
        Executor::new(registry, config).unwrap()
    }

    fn run(executor: &Executor) -> Vec<SolverResult> {
        let (tx, rx) = mpsc::channel();
        executor.execute(tx).unwrap();
        let mut results: Vec<_> = rx.into_iter().collect();
        results.sort_by_key(|r| (r.year, r.day, r.part));
        results
    }

    fn write_inputs(dir: &Path) {
        fs::write(dir.join("2022_day05.txt"), "1 2 3").unwrap();
        fs::write(dir.join("2023_day01.txt"), "2 5").unwrap();
        fs::write(dir.join("2023_day02.txt"), "4 4\n").unwrap();
    }

    #[test]
    fn test_work_items_follow_filters() {
        let temp = TempDir::new().unwrap();
        let mut cfg = config(temp.path(), ParallelizeBy::Day, Some(2));
        cfg.year_filter = Some(2023);
        let items = executor(&cfg).collect_work_items();

        assert_eq!(
            items,
            vec![
                WorkItem { year: 2023, day: 1, parts: 2..=2 },
                WorkItem { year: 2023, day: 2, parts: 2..=2 },
            ]
        );
    }

    #[test]
    fn test_part_beyond_solver_is_skipped() {
        assert!(filter_parts(Some(3), 2).is_empty());
        assert_eq!(filter_parts(None, 2), 1..=2);
    }

    #[test]
    fn test_every_mode_gives_same_answers() {
        let temp = TempDir::new().unwrap();
        write_inputs(temp.path());

        for mode in [
            ParallelizeBy::Sequential,
            ParallelizeBy::Year,
            ParallelizeBy::Day,
            ParallelizeBy::Part,
        ] {
            let results = run(&executor(&config(temp.path(), mode, None)));
            let answers: Vec<_> = results
                .iter()
                .map(|r| r.answer.as_ref().unwrap().as_str())
                .collect();
            assert_eq!(answers, vec!["6", "6", "7", "10", "8", "16"], "{mode:?}");
        }
    }

    #[test]
    fn test_parse_time_reported_once_per_parse() {
        let temp = TempDir::new().unwrap();
        write_inputs(temp.path());
        let results = run(&executor(&config(temp.path(), ParallelizeBy::Day, None)));

        let with_parse = results.iter().filter(|r| r.parse_duration.is_some()).count();
        assert_eq!(with_parse, 3);
    }

    #[test]
    fn test_missing_input_fails_each_part() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2023_day01.txt"), "2 5").unwrap();
        let exec = executor(&config(temp.path(), ParallelizeBy::Sequential, None));

        let items = exec.collect_work_items();
        assert_eq!(exec.missing_inputs(&items), vec![(2022, 5), (2023, 2)]);

        let results = run(&exec);
        assert_eq!(results.len(), 6);
        let failed: Vec<_> = results
            .iter()
            .filter(|r| r.answer.is_err())
            .map(|r| (r.year, r.day, r.part))
            .collect();
        assert_eq!(failed, vec![(2022, 5, 1), (2022, 5, 2), (2023, 2, 1), (2023, 2, 2)]);
        assert!(matches!(
            results[0].answer.as_ref().unwrap_err().inner(),
            ExecutorError::MissingInput { year: 2022, day: 5, .. }
        ));
    }

    #[test]
    fn test_malformed_input_fails_without_stopping_others() {
        let temp = TempDir::new().unwrap();
        write_inputs(temp.path());
        fs::write(temp.path().join("2023_day01.txt"), "2 five").unwrap();

        let results = run(&executor(&config(temp.path(), ParallelizeBy::Part, None)));
        let ok = results.iter().filter(|r| r.answer.is_ok()).count();
        assert_eq!(ok, 4);
        assert!(matches!(
            results[2].answer.as_ref().unwrap_err().inner(),
            ExecutorError::Solver(aoc_solver::SolverError::ParseError(_))
        ));
    }
}
