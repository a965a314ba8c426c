//! Helpers shared by solutions

pub mod checked;
pub mod grid;
