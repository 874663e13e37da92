use std::io::{self, Write};
use std::ops::Index;

/// Elapsed times over growing input sizes.
///
/// Shape is `(step + 1, rd + 1)`. Column 0 holds the input length used for
/// the row, columns `1..=rd` the elapsed seconds of each repetition. Row 0 is
/// the zero-length baseline and stays all zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl TimingMatrix {
    /// All-zero matrix for `step` size steps and `rd` repetitions.
    pub fn new(step: usize, rd: usize) -> Self {
        let rows = step + 1;
        let cols = rd + 1;
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Build from parsed rows. Returns `None` on an empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first()?.len();
        if cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let n_rows = rows.len();
        Some(Self {
            rows: n_rows,
            cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn steps(&self) -> usize {
        self.rows - 1
    }

    pub fn repetitions(&self) -> usize {
        self.cols - 1
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.cols)
    }

    /// Input length recorded for row `i`.
    pub fn length(&self, i: usize) -> usize {
        self.row(i)[0] as usize
    }

    pub fn lengths(&self) -> Vec<usize> {
        (0..self.rows).map(|i| self.length(i)).collect()
    }

    /// Per-repetition elapsed seconds for row `i`.
    pub fn timings(&self, i: usize) -> &[f64] {
        &self.row(i)[1..]
    }

    pub(crate) fn set_length(&mut self, i: usize, len: usize) {
        self.values[i * self.cols] = len as f64;
    }

    pub(crate) fn set_elapsed(&mut self, i: usize, rep: usize, secs: f64) {
        self.values[i * self.cols + 1 + rep] = secs;
    }

    /// One line per row: the length as an integer, then each elapsed time
    /// in shortest round-trip scientific notation.
    pub fn write_delimited<W: Write>(&self, mut w: W, delimiter: char) -> io::Result<()> {
        for row in self.rows() {
            write!(w, "{}", row[0] as usize)?;
            for t in &row[1..] {
                write!(w, "{delimiter}{t:e}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

impl Index<usize> for TimingMatrix {
    type Output = [f64];

    fn index(&self, i: usize) -> &[f64] {
        self.row(i)
    }
}

impl Index<(usize, usize)> for TimingMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.values[i * self.cols + j]
    }
}
