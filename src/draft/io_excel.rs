// Primitives for reading the input workbook.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::draft::{io_common::cell_to_string, *};

/// Reads all the sheets of the workbook, in order.
pub fn read_workbook(path: &str) -> DrResult<Vec<ParsedSheet>> {
    info!("Attempting to read workbook {:?}", path);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let names: Vec<String> = workbook.sheet_names().to_vec();
    debug!("read_workbook: sheets: {:?}", names);
    let mut res: Vec<ParsedSheet> = Vec::new();
    for name in names.iter() {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingSheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?;
        res.push(parse_sheet(name, &wrange));
    }
    Ok(res)
}

/// There are no column headers: every row is a record.
/// Completely empty rows are skipped.
///
/// The range may start below the first row or right of the first column: the
/// identifier is always read from the first column of the spreadsheet.
pub fn parse_sheet(name: &str, wrange: &Range<DataType>) -> ParsedSheet {
    let (start_row, start_col) = wrange.start().unwrap_or((0, 0));
    let mut ids: Vec<RawEntry> = Vec::new();
    let mut row_numbers: Vec<usize> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let row_number = start_row as usize + idx + 1;
        if row.iter().all(|c| *c == DataType::Empty) {
            debug!("parse_sheet: {:?}: skipping empty row {}", name, row_number);
            continue;
        }
        let id = if start_col == 0 {
            read_id(row.first().unwrap_or(&DataType::Empty))
        } else {
            RawEntry::Blank
        };
        ids.push(id);
        row_numbers.push(row_number);
        let mut cells: Vec<String> = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }
    debug!("parse_sheet: {:?}: {} rows", name, rows.len());
    ParsedSheet {
        name: name.to_string(),
        ids,
        row_numbers,
        rows,
    }
}

// Spreadsheets store most numbers as floating point values.
fn read_id(cell: &DataType) -> RawEntry {
    match cell {
        DataType::Int(i) => RawEntry::Id(*i),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => RawEntry::Id(*f as i64),
        DataType::Float(f) => RawEntry::Number(*f),
        DataType::String(s) => RawEntry::Text(s.clone()),
        DataType::Empty => RawEntry::Blank,
        other => RawEntry::Text(format!("{:?}", other)),
    }
}
