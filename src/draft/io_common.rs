use calamine::DataType;
use log::warn;
use std::collections::HashSet;
use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The content of a cell, as it should appear in the output.
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Int(i) => i.to_string(),
        // Whole numbers are displayed without decimals.
        DataType::Float(f) => f.to_string(),
        DataType::String(s) => s.clone(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(serial) => match cell.as_datetime() {
            Some(dt) if serial.fract() == 0.0 => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => serial.to_string(),
        },
        DataType::Error(e) => e.to_string(),
        DataType::Empty => "".to_string(),
        other => format!("{:?}", other),
    }
}

/// The name of the file holding a sheet of the result workbook.
/// Characters that are not allowed in file names are replaced.
pub fn sheet_file_name(sheet_name: &str) -> String {
    let cleaned: String = sheet_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "sheet.csv".to_string()
    } else {
        format!("{}.csv", cleaned)
    }
}

/// The name of the file holding a sheet, distinct from all the names in `used`.
///
/// Names are compared without case, as some file systems do.
pub fn unique_file_name(used: &mut HashSet<String>, sheet_name: &str) -> String {
    let base = sheet_file_name(sheet_name);
    let stem = base.trim_end_matches(".csv").to_string();
    let mut candidate = base;
    let mut counter = 2;
    while used.contains(&candidate.to_lowercase()) {
        candidate = format!("{}_{}.csv", stem, counter);
        counter += 1;
    }
    if counter > 2 {
        warn!(
            "unique_file_name: sheet {:?} clashes with another sheet, writing it to {:?}",
            sheet_name, candidate
        );
    }
    used.insert(candidate.to_lowercase());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/data/fall/prefs.xlsx"), "prefs.xlsx");
        assert_eq!(sheet_file_name("Hip Hop"), "Hip Hop.csv");
        assert_eq!(sheet_file_name("Tap/Jazz?"), "Tap_Jazz_.csv");
        assert_eq!(sheet_file_name("  "), "sheet.csv");
    }

    #[test]
    fn clashing_names() {
        let mut used: HashSet<String> = HashSet::new();
        assert_eq!(unique_file_name(&mut used, "remaining_roster"), "remaining_roster.csv");
        assert_eq!(unique_file_name(&mut used, "Tap\""), "Tap_.csv");
        assert_eq!(unique_file_name(&mut used, "Tap<"), "Tap__2.csv");
        assert_eq!(unique_file_name(&mut used, "tap_"), "tap__3.csv");
        assert_eq!(unique_file_name(&mut used, "Remaining_Roster"), "Remaining_Roster_2.csv");
        assert_eq!(unique_file_name(&mut used, "Jazz"), "Jazz.csv");
    }

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Float(12.0)), "12");
        assert_eq!(cell_to_string(&DataType::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&DataType::Int(7)), "7");
        assert_eq!(cell_to_string(&DataType::String("Ana".to_string())), "Ana");
        assert_eq!(cell_to_string(&DataType::Empty), "");
        // 45000 is 2023-03-15 in the 1900 date system.
        assert_eq!(cell_to_string(&DataType::DateTime(45000.0)), "2023-03-15");
        assert_eq!(
            cell_to_string(&DataType::DateTime(45000.5)),
            "2023-03-15 12:00:00"
        );
    }
}
