//! Advent of Code puzzle solutions with automatic registration
//!
//! Solutions are organized by year. Each one derives `AocSolver` and
//! `AutoRegisterSolver`, so linking this crate is enough for the CLI to
//! discover them.

#[cfg(feature = "my-solutions")]
pub mod my_solutions;

pub mod utils;
