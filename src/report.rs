//! Leaderboard reporting.
//!
//! Console rendering and CSV persistence of a run's results. Entries are
//! shown 1-indexed with the NMSE in fixed scientific notation.

use crate::leaderboard::Leaderboard;
use comfy_table::Table;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Plain-text summary, lowest-NMSE first.
pub fn write_summary<W: Write>(out: &mut W, board: &Leaderboard) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "-------------")?;
    writeln!(out, "Summary:")?;
    writeln!(out, "-------------")?;
    writeln!(out)?;
    writeln!(out, "{} entries, lowest-nmse first:", board.len())?;
    for (i, entry) in board.entries().iter().enumerate() {
        writeln!(
            out,
            "#{:2}. NMSE: {:.3e}, from: {}, artifact: {}",
            i + 1,
            entry.score,
            entry.contestant_address,
            entry.artifact_id
        )?;
    }
    Ok(())
}

/// Render the leaderboard as a table for terminal display.
pub fn render_table(board: &Leaderboard) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "NMSE", "Contestant", "Artifact"]);
    for (i, entry) in board.entries().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            format!("{:.3e}", entry.score),
            entry.contestant_address.clone(),
            entry.artifact_id.clone(),
        ]);
    }
    table
}

/// Persist the leaderboard as `challenge_data.csv` under `dir`.
///
/// Columns: contestant address, artifact id, NMSE. Rows keep leaderboard
/// order so the file is itself sorted lowest-NMSE first.
pub fn write_csv(board: &Leaderboard, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join("challenge_data.csv");
    let mut file = File::create(&path)?;
    writeln!(file, "contestant_address,artifact_id,nmse")?;
    for entry in board.entries() {
        writeln!(
            file,
            "{},{},{:.3e}",
            entry.contestant_address, entry.artifact_id, entry.score
        )?;
    }
    Ok(path)
}
