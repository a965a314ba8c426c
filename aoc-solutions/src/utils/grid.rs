//! Ragged character grid over borrowed input lines

/// Offsets of the 8 cells around a position, row-major.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Lines of input addressed as `(row, col)` byte cells.
///
/// Rows keep their own length; a column that is valid in one row may be out
/// of bounds in the next, so every lookup checks the row it lands on.
#[derive(Debug, Clone)]
pub struct RaggedGrid<'a> {
    rows: Vec<&'a [u8]>,
}

/// A maximal run of ASCII digits within one row, `start..end` in columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitRun {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

impl<'a> RaggedGrid<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            rows: input.lines().map(str::as_bytes).collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> Option<&'a [u8]> {
        self.rows.get(row).copied()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.rows.get(row)?.get(col).copied()
    }

    /// In-bounds neighbours of `(row, col)` as `(row, col, byte)`.
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            self.get(r, c).map(|b| (r, c, b))
        })
    }

    /// Every digit run in the grid, top to bottom then left to right.
    pub fn digit_runs(&self) -> Vec<DigitRun> {
        let mut runs = Vec::new();
        for (row, line) in self.rows.iter().enumerate() {
            let mut col = 0;
            while col < line.len() {
                if !line[col].is_ascii_digit() {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < line.len() && line[col].is_ascii_digit() {
                    col += 1;
                }
                runs.push(DigitRun {
                    row,
                    start,
                    end: col,
                });
            }
        }
        runs
    }

    /// Bytes covered by `run`.
    pub fn run_bytes(&self, run: &DigitRun) -> &'a [u8] {
        self.row(run.row)
            .and_then(|line| line.get(run.start..run.end))
            .unwrap_or_default()
    }

    /// Cells touching `run` from outside: the ring around its bounding box,
    /// clipped to each row's length.
    pub fn run_border(&self, run: DigitRun) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        (run.start..run.end)
            .flat_map(move |col| self.neighbors(run.row, col))
            .filter(move |&(r, c, _)| !(r == run.row && (run.start..run.end).contains(&c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_runs_are_maximal() {
        let grid = RaggedGrid::new("12.3\n..456\n7");
        let runs = grid.digit_runs();
        assert_eq!(
            runs,
            vec![
                DigitRun { row: 0, start: 0, end: 2 },
                DigitRun { row: 0, start: 3, end: 4 },
                DigitRun { row: 1, start: 2, end: 5 },
                DigitRun { row: 2, start: 0, end: 1 },
            ]
        );
        assert_eq!(grid.run_bytes(&runs[2]), b"456");
    }

    #[test]
    fn test_neighbors_respect_ragged_rows() {
        let grid = RaggedGrid::new("ab\nabcd\na");
        let around: Vec<(usize, usize)> = grid.neighbors(1, 2).map(|(r, c, _)| (r, c)).collect();
        // row 0 and row 2 are too short for column 3 and beyond
        assert_eq!(around, vec![(0, 1), (1, 1), (1, 3)]);
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let grid = RaggedGrid::new("abc\ndef\nghi");
        assert_eq!(grid.neighbors(0, 0).count(), 3);
        assert_eq!(grid.neighbors(1, 1).count(), 8);
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn test_run_border_excludes_the_run() {
        let grid = RaggedGrid::new(".....\n.123.\n.....");
        let run = grid.digit_runs()[0];
        let border: Vec<_> = grid.run_border(run).collect();
        assert!(border.iter().all(|&(_, _, b)| b == b'.'));
        assert!(border.iter().any(|&(r, c, _)| (r, c) == (1, 0)));
        assert!(border.iter().any(|&(r, c, _)| (r, c) == (1, 4)));
    }
}
