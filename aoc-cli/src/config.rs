//! Configuration resolution from CLI args

use crate::cli::{Args, ParallelizeBy};
use crate::error::CliError;
use crate::input::InputSource;
use std::path::{Path, PathBuf};

/// Resolved runtime configuration
#[derive(Debug)]
pub struct Config {
    /// Year filter (None = all years)
    pub year_filter: Option<u16>,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Where puzzle inputs are read from
    pub input_source: InputSource,
    /// Number of threads for parallel execution
    pub thread_count: usize,
    /// Parallelization level
    pub parallelize_by: ParallelizeBy,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let input_source = match args.input {
            Some(path) => {
                // one file can only feed one solver
                if args.year.is_none() || args.day.is_none() {
                    return Err(CliError::Config(
                        "--input needs both --year and --day".to_string(),
                    ));
                }
                InputSource::File(expand_tilde(&path))
            }
            None => InputSource::Dir(expand_tilde(&args.input_dir)),
        };

        let thread_count = match args.threads {
            Some(0) => {
                return Err(CliError::Config(
                    "--threads must be at least 1".to_string(),
                ));
            }
            Some(n) => n,
            None => num_cpus(),
        };

        Ok(Config {
            year_filter: args.year,
            day_filter: args.day,
            part_filter: args.part,
            tags: args.tags,
            input_source,
            thread_count,
            parallelize_by: args.parallelize_by,
            quiet: args.quiet,
        })
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}

/// Get number of CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> Result<Config, CliError> {
        let args = Args::try_parse_from(std::iter::once("aoc").chain(argv.iter().copied())).unwrap();
        Config::from_args(args)
    }

    #[test]
    fn test_input_file_requires_year_and_day() {
        assert!(matches!(
            config(&["--input", "in.txt", "--year", "2023"]),
            Err(CliError::Config(_))
        ));

        let cfg = config(&["--input", "in.txt", "--year", "2023", "--day", "1"]).unwrap();
        assert!(matches!(cfg.input_source, InputSource::File(ref p) if p == Path::new("in.txt")));
    }

    #[test]
    fn test_default_uses_input_directory() {
        let cfg = config(&["--input-dir", "/srv/inputs"]).unwrap();
        assert!(matches!(cfg.input_source, InputSource::Dir(ref p) if p == Path::new("/srv/inputs")));
        assert!(cfg.thread_count >= 1);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(
            config(&["--threads", "0"]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_tilde_expansion() {
        let plain = Path::new("/abs/path");
        assert_eq!(expand_tilde(plain), PathBuf::from("/abs/path"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/inputs")), home.join("inputs"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
    }
}
