use crate::error::Result;
use crate::grid::{AccuracyGrid, GridCell};
use crate::report::Report;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// One row per cell: `lambda,tau,accuracy,status`. Accuracy is empty for
/// cells that were not scored.
pub fn write_grid_csv(path: &Path, grid: &AccuracyGrid) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_grid(&mut w, grid)?;
    w.flush()
}

pub fn write_grid<W: Write>(w: &mut W, grid: &AccuracyGrid) -> io::Result<()> {
    writeln!(w, "lambda,tau,accuracy,status")?;
    for (_, _, lambda, tau, cell) in grid.iter() {
        match cell {
            GridCell::Accuracy(a) => writeln!(w, "{},{},{},ok", lambda, tau, a)?,
            GridCell::Failed(_) => writeln!(w, "{},{},,failed", lambda, tau)?,
            GridCell::Unset => writeln!(w, "{},{},,unset", lambda, tau)?,
        }
    }
    Ok(())
}

pub fn write_report_json(path: &Path, report: &Report) -> Result<()> {
    let w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(w, report)?;
    Ok(())
}
