//! Puzzle input loading

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Where puzzle inputs come from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// `{dir}/{year}_day{day:02}.txt` per solver
    Dir(PathBuf),
    /// One explicit file, used for whichever solver is run
    File(PathBuf),
}

/// Read-only view over the puzzle inputs on disk
pub struct InputStore {
    source: InputSource,
}

impl InputStore {
    pub fn new(source: InputSource) -> Self {
        Self { source }
    }

    /// Path the input for a specific year/day is read from
    pub fn input_path(&self, year: u16, day: u8) -> PathBuf {
        match &self.source {
            InputSource::Dir(dir) => dir.join(format!("{}_day{:02}.txt", year, day)),
            InputSource::File(path) => path.clone(),
        }
    }

    /// Check if an input file exists
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.input_path(year, day).is_file()
    }

    /// Read the whole input for a year/day
    pub fn load(&self, year: u16, day: u8) -> Result<String, InputError> {
        let path = self.input_path(year, day);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => InputError::Missing(path),
            _ => InputError::Read { path, source },
        })
    }
}
