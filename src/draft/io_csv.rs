// Primitives for writing the result workbook: one CSV file per sheet.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::draft::{io_common::unique_file_name, *};

pub fn write_sheet(dir: &Path, file_name: &str, rows: &[Vec<String>]) -> DrResult<PathBuf> {
    let p = dir.join(file_name);
    let path = p.display().to_string();
    debug!("write_sheet: {:?}: {} rows", path, rows.len());
    // No headers, as in the input. Rows may have different lengths.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&p)
        .context(WritingCsvSnafu { path: path.clone() })?;
    for row in rows.iter() {
        wtr.write_record(row)
            .context(WritingCsvSnafu { path: path.clone() })?;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    Ok(p)
}

/// Writes the sheet of the remaining auditionees, then one sheet per team.
/// Returns the paths of the files written.
pub fn write_results(
    dir: &Path,
    mode: DraftMode,
    roster: &ParsedSheet,
    outcome: &DraftOutcome,
) -> DrResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).context(WritingOutputSnafu {
        path: dir.display().to_string(),
    })?;
    let mut res: Vec<PathBuf> = Vec::new();
    // Sheets never overwrite each other, even when their names clash once cleaned.
    let mut used: HashSet<String> = HashSet::new();
    let remaining = remaining_rows(roster, outcome);
    let file_name = unique_file_name(&mut used, mode.remaining_sheet_name());
    res.push(write_sheet(dir, &file_name, &remaining)?);
    for team in outcome.teams.iter() {
        let file_name = unique_file_name(&mut used, &team.name);
        let rows = roster_rows(roster, &team.members());
        res.push(write_sheet(dir, &file_name, &rows)?);
    }
    Ok(res)
}
