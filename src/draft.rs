use log::{debug, info, warn};

use ranked_draft::builder::Builder;
use ranked_draft::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::draft::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum DraftError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} does not contain any sheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Sheet {name} could not be read from {path}"))]
    MissingSheet { path: String, name: String },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a number for the option {name}"))]
    ParsingJsonNumber { name: String },
    #[snafu(display("Error writing sheet {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The draft could not be completed"))]
    Drafting { source: DraftErrors },
    #[snafu(display(
        "Missing {name}: it must be provided on the command line or in the configuration file"
    ))]
    MissingArgument { name: String },
    #[snafu(display("Difference detected between the summary and the reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DrResult<T> = Result<T, DraftError>;

/// A sheet of the input workbook, as parsed by the reader.
/// This is before checking the identifiers.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedSheet {
    pub name: String,
    /// The first cell of every row.
    pub ids: Vec<RawEntry>,
    /// The row of every entry in the spreadsheet, starting from 1.
    pub row_numbers: Vec<usize>,
    /// The full content of every row, as displayed.
    pub rows: Vec<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DraftMode {
    /// Every member is picked from the preferences.
    Project,
    /// Some members are picked from the preferences, the rest is drawn at random.
    Training,
}

impl ParsedSheet {
    /// The identifiers with their row in the spreadsheet.
    pub fn numbered_ids(&self) -> Vec<(usize, RawEntry)> {
        self.row_numbers
            .iter()
            .copied()
            .zip(self.ids.iter().cloned())
            .collect()
    }
}

impl DraftMode {
    /// The name of the sheet listing the auditionees without a team.
    pub fn remaining_sheet_name(&self) -> &'static str {
        match self {
            DraftMode::Project => "remaining_roster",
            DraftMode::Training => "waitlist_roster",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DraftMode::Project => "project",
            DraftMode::Training => "training",
        }
    }
}

/// Everything needed to run a draft, after merging the command line and the configuration file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DraftSettings {
    pub draft_name: String,
    pub input_path: String,
    pub output_dir: String,
    pub summary_out: Option<String>,
    pub reference: Option<String>,
    pub mode: DraftMode,
    pub rules: DraftRules,
}

fn resolve_path(root: &Option<PathBuf>, p: &str) -> String {
    match root {
        Some(r) if Path::new(p).is_relative() => r.join(p).display().to_string(),
        _ => p.to_string(),
    }
}

fn validate_sizes(select_size: u32, team_size: Option<u32>) -> (DraftMode, u32, u32) {
    match team_size {
        None => (DraftMode::Project, select_size, 0),
        Some(ts) => {
            if ts < select_size {
                warn!(
                    "validate_sizes: team size {} is smaller than the select size {}: \
                     no member will be drawn at random",
                    ts, select_size
                );
            }
            (DraftMode::Training, select_size, ts.saturating_sub(select_size))
        }
    }
}

fn validate_tiebreak(mode: &str, seed: u64) -> DrResult<TieBreakMode> {
    match mode {
        "random" => Ok(TieBreakMode::Random(seed)),
        "digest" => match u32::try_from(seed) {
            Ok(s) => Ok(TieBreakMode::Digest(s)),
            Err(_) => whatever!("The seed {} is too large for the digest tiebreak mode", seed),
        },
        x => whatever!(
            "Cannot use tiebreak mode {:?}: expected 'random' or 'digest'",
            x
        ),
    }
}

/// Merges the command line arguments with the configuration file, if any.
/// The command line takes precedence.
pub fn build_settings(args: &Args) -> DrResult<DraftSettings> {
    let config: Option<DraftConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    // Paths in the configuration are relative to the configuration file.
    let root: Option<PathBuf> = args
        .config
        .as_ref()
        .and_then(|p| Path::new(p).parent().map(|x| x.to_path_buf()));
    let output_settings = config.as_ref().and_then(|c| c.output_settings.clone());
    let rules_config = config.as_ref().and_then(|c| c.rules.clone());

    let input_file = config.as_ref().and_then(|c| c.input_file.clone());
    let input_path = match (&args.input, input_file) {
        (Some(p), _) => p.clone(),
        (None, Some(f)) => resolve_path(&root, &f.file_path),
        (None, None) => {
            return MissingArgumentSnafu { name: "input file" }.fail();
        }
    };

    let (mode, rounds, lottery_rounds) = match args.size {
        Some(s) => validate_sizes(s, args.team_size),
        None => {
            let rc = rules_config
                .as_ref()
                .context(MissingArgumentSnafu { name: "team size" })?;
            let team_size = rc
                .team_size()?
                .context(MissingArgumentSnafu { name: "team size" })?;
            match rc.select_size()? {
                Some(select_size) => validate_sizes(select_size, Some(team_size)),
                None => validate_sizes(team_size, None),
            }
        }
    };
    if rounds == 0 {
        whatever!("The number of members picked by each team must be positive");
    }

    let seed: u64 = match (args.seed, &rules_config) {
        (Some(s), _) => s,
        (None, Some(rc)) => rc.random_seed()?.unwrap_or(DraftRules::DEFAULT_SEED),
        (None, None) => DraftRules::DEFAULT_SEED,
    };
    let tiebreak = args
        .tiebreak
        .clone()
        .or_else(|| rules_config.as_ref().and_then(|rc| rc.tiebreak_mode.clone()))
        .unwrap_or_else(|| "random".to_string());
    let tiebreak_mode = validate_tiebreak(&tiebreak, seed)?;

    let output_directory = output_settings
        .as_ref()
        .and_then(|os| os.output_directory.clone());
    let output_dir = match (&args.output_dir, output_directory) {
        (Some(d), _) => d.clone(),
        (None, Some(d)) => resolve_path(&root, &d),
        (None, None) => "output".to_string(),
    };
    let summary_file = output_settings
        .as_ref()
        .and_then(|os| os.summary_file.clone());
    let summary_out = match (&args.out, summary_file) {
        (Some(o), _) => Some(o.clone()),
        (None, Some(o)) if o == "stdout" => Some(o),
        (None, Some(o)) => Some(resolve_path(&root, &o)),
        (None, None) => None,
    };
    let draft_name = output_settings
        .and_then(|os| os.draft_name)
        .unwrap_or_else(|| io_common::simplify_file_name(&input_path));

    Ok(DraftSettings {
        draft_name,
        input_path,
        output_dir,
        summary_out,
        reference: args.reference.clone(),
        mode,
        rules: DraftRules {
            rounds,
            lottery_rounds,
            tiebreak_mode,
        },
    })
}

fn resolution_label(r: Resolution) -> &'static str {
    match r {
        Resolution::Paired => "paired",
        Resolution::Drawn => "drawn",
    }
}

fn round_stats_to_json(outcome: &DraftOutcome) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in outcome.round_stats.iter() {
        let picks: Vec<JSValue> = round_stat
            .picks
            .iter()
            .map(|p| {
                json!({
                    "team": p.team,
                    "pick": p.candidate,
                    "resolution": resolution_label(p.resolution),
                    "skipped": p.skipped,
                })
            })
            .collect();
        l.push(json!({"round": round_stat.round, "picks": picks}));
    }
    l
}

fn build_summary_js(settings: &DraftSettings, outcome: &DraftOutcome) -> JSValue {
    let (tiebreak, seed) = match settings.rules.tiebreak_mode {
        TieBreakMode::Random(s) => ("random", s.to_string()),
        TieBreakMode::Digest(s) => ("digest", s.to_string()),
    };
    let teams: Vec<JSValue> = outcome
        .teams
        .iter()
        .map(|t| json!({"team": t.name, "picks": t.picks, "lotteryPicks": t.lottery_picks}))
        .collect();
    json!({
        "config": {
            "draft": settings.draft_name,
            "input": io_common::simplify_file_name(&settings.input_path),
            "mode": settings.mode.label(),
            "rounds": settings.rules.rounds,
            "lotteryRounds": settings.rules.lottery_rounds,
            "tiebreakMode": tiebreak,
            "randomSeed": seed,
        },
        "results": {
            "teams": teams,
            "remaining": outcome.remaining,
            "rounds": round_stats_to_json(outcome),
        }
    })
}

/// Runs the draft on the parsed sheets: the first sheet is the roster, every other sheet
/// holds the preferences of one team.
pub fn draft_sheets(sheets: &[ParsedSheet], rules: &DraftRules) -> DrResult<DraftOutcome> {
    let (roster, teams) = match sheets.split_first() {
        Some(x) => x,
        None => whatever!("No roster sheet found"),
    };
    if teams.is_empty() {
        warn!("draft_sheets: no team preferences found after the roster sheet");
    }
    let mut builder = Builder::new(rules)
        .context(DraftingSnafu {})?
        .roster_at(&roster.name, &roster.numbered_ids())
        .context(DraftingSnafu {})?;
    for sheet in teams.iter() {
        builder
            .add_team_at(&sheet.name, &sheet.numbered_ids())
            .context(DraftingSnafu {})?;
    }
    builder.run().context(DraftingSnafu {})
}

/// The roster rows of the given candidates, in the given order.
pub fn roster_rows(roster: &ParsedSheet, cids: &[CandidateId]) -> Vec<Vec<String>> {
    let by_id: HashMap<CandidateId, &Vec<String>> = roster
        .ids
        .iter()
        .zip(roster.rows.iter())
        .filter_map(|(e, row)| e.as_id().map(|cid| (cid, row)))
        .collect();
    cids.iter()
        .filter_map(|cid| by_id.get(cid).map(|row| row.to_vec()))
        .collect()
}

/// The roster rows of the candidates left without a team, in roster order.
pub fn remaining_rows(roster: &ParsedSheet, outcome: &DraftOutcome) -> Vec<Vec<String>> {
    roster
        .ids
        .iter()
        .zip(roster.rows.iter())
        .filter_map(|(e, row)| match e.as_id() {
            Some(cid) if outcome.remaining.binary_search(&cid).is_ok() => Some(row.clone()),
            _ => None,
        })
        .collect()
}

fn write_summary(out: &str, pretty_js: &str) -> DrResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js).context(WritingOutputSnafu { path: out })?;
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> DrResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("check_reference: summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_assignment(args: &Args) -> DrResult<()> {
    let settings = build_settings(args)?;
    info!("settings: {:?}", settings);

    let sheets = io_excel::read_workbook(&settings.input_path)?;
    if sheets.is_empty() {
        return EmptyExcelSnafu {
            path: settings.input_path.clone(),
        }
        .fail();
    }
    let outcome = draft_sheets(&sheets, &settings.rules)?;
    debug!("outcome: {:?}", outcome);

    let written = io_csv::write_results(
        Path::new(&settings.output_dir),
        settings.mode,
        &sheets[0],
        &outcome,
    )?;
    for p in written.iter() {
        info!("Wrote {}", p.display());
    }

    let result_js = build_summary_js(&settings, &outcome);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    if let Some(out) = &settings.summary_out {
        write_summary(out, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &settings.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn sheet(name: &str, rows: &[(CandidateId, &str)]) -> ParsedSheet {
        ParsedSheet {
            name: name.to_string(),
            ids: rows.iter().map(|(cid, _)| RawEntry::Id(*cid)).collect(),
            row_numbers: (1..=rows.len()).collect(),
            rows: rows
                .iter()
                .map(|(cid, n)| vec![cid.to_string(), n.to_string()])
                .collect(),
        }
    }

    fn roster() -> ParsedSheet {
        sheet("Roster", &[(1, "Ana"), (2, "Ben"), (3, "Cleo"), (4, "Dev")])
    }

    #[test]
    fn project_sizes() {
        let args = Args::parse_from(["rdraft", "prefs.xlsx", "3"]);
        let s = build_settings(&args).unwrap();
        assert_eq!(s.mode, DraftMode::Project);
        assert_eq!(s.rules.rounds, 3);
        assert_eq!(s.rules.lottery_rounds, 0);
        assert_eq!(s.rules.tiebreak_mode, TieBreakMode::Random(42));
        assert_eq!(s.output_dir, "output");
        assert_eq!(s.draft_name, "prefs.xlsx");
    }

    #[test]
    fn training_sizes() {
        let args = Args::parse_from([
            "rdraft",
            "prefs.xlsx",
            "2",
            "5",
            "--seed",
            "7",
            "--tiebreak",
            "digest",
        ]);
        let s = build_settings(&args).unwrap();
        assert_eq!(s.mode, DraftMode::Training);
        assert_eq!(s.rules.rounds, 2);
        assert_eq!(s.rules.lottery_rounds, 3);
        assert_eq!(s.rules.tiebreak_mode, TieBreakMode::Digest(7));
    }

    #[test]
    fn missing_sizes() {
        let args = Args::parse_from(["rdraft", "prefs.xlsx"]);
        let res = build_settings(&args);
        assert!(matches!(res, Err(DraftError::MissingArgument { .. })));
    }

    #[test]
    fn unknown_tiebreak() {
        let args = Args::parse_from(["rdraft", "prefs.xlsx", "2", "--tiebreak", "coin"]);
        assert!(build_settings(&args).is_err());
    }

    #[test]
    fn zero_size_is_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["rdraft", "prefs.xlsx", "0"]).is_err());
    }

    #[test]
    fn draft_and_rows() {
        let sheets = vec![
            roster(),
            sheet("Tap", &[(2, "Ben"), (1, "Ana")]),
            sheet("Jazz", &[(2, "Ben"), (3, "Cleo")]),
        ];
        let rules = DraftRules {
            rounds: 1,
            ..DraftRules::DEFAULT_RULES
        };
        let outcome = draft_sheets(&sheets, &rules).unwrap();
        // 2 is shared by exactly two teams: it goes to the first one.
        assert_eq!(outcome.teams[0].picks, vec![2]);
        assert_eq!(outcome.teams[1].picks, vec![3]);
        assert_eq!(
            roster_rows(&sheets[0], &outcome.teams[1].picks),
            vec![vec!["3".to_string(), "Cleo".to_string()]]
        );
        assert_eq!(
            remaining_rows(&sheets[0], &outcome),
            vec![
                vec!["1".to_string(), "Ana".to_string()],
                vec!["4".to_string(), "Dev".to_string()]
            ]
        );
    }

    #[test]
    fn malformed_sheet_is_reported() {
        let mut tap = sheet("Tap", &[(2, "Ben")]);
        tap.ids.push(RawEntry::Text("Ana".to_string()));
        tap.row_numbers.push(4);
        tap.rows.push(vec!["Ana".to_string()]);
        let res = draft_sheets(&[roster(), tap], &DraftRules::DEFAULT_RULES);
        match res {
            Err(DraftError::Drafting {
                source: DraftErrors::MalformedInput { table, row, .. },
            }) => {
                assert_eq!(table, "Tap");
                assert_eq!(row, 4);
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn summary_is_stable() {
        let sheets = vec![roster(), sheet("Tap", &[(4, "Dev")])];
        let args = Args::parse_from(["rdraft", "prefs.xlsx", "1"]);
        let settings = build_settings(&args).unwrap();
        let outcome = draft_sheets(&sheets, &settings.rules).unwrap();
        let js = build_summary_js(&settings, &outcome);
        assert_eq!(js["results"]["teams"][0]["picks"], json!([4]));
        assert_eq!(js["results"]["remaining"], json!([1, 2, 3]));
        assert_eq!(
            js["results"]["rounds"][0]["picks"][0]["resolution"],
            json!("drawn")
        );
        assert_eq!(js["config"]["mode"], json!("project"));
        assert_eq!(js, build_summary_js(&settings, &outcome));
    }

    const SMALL_DRAFT: &str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/small_draft.xlsx");

    fn out_dir(name: &str) -> String {
        let d = std::env::temp_dir().join(format!("rdraft-run-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&d);
        d.display().to_string()
    }

    fn read_ids(p: &Path) -> Vec<String> {
        fs::read_to_string(p)
            .unwrap()
            .lines()
            .map(|l| l.split(',').next().unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn project_draft_from_workbook() {
        let dir = out_dir("project");
        let summary = format!("{}/summary.json", dir);
        let args = Args::parse_from([
            "rdraft",
            SMALL_DRAFT,
            "2",
            "--output-dir",
            dir.as_str(),
            "--out",
            summary.as_str(),
        ]);
        run_assignment(&args).unwrap();
        let d = Path::new(&dir);
        assert_eq!(read_ids(&d.join("Tap.csv")), vec!["101", "102"]);
        assert_eq!(read_ids(&d.join("Jazz.csv")), vec!["104", "105"]);
        assert_eq!(read_ids(&d.join("remaining_roster.csv")), vec!["103", "106"]);
        assert!(!d.join("waitlist_roster.csv").exists());

        let js: JSValue = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(js["config"]["input"], json!("small_draft.xlsx"));
        assert_eq!(js["results"]["remaining"], json!([103, 106]));
        assert_eq!(
            js["results"]["rounds"][0]["picks"][0]["resolution"],
            json!("paired")
        );

        // The summary is its own reference.
        let args = Args::parse_from([
            "rdraft",
            SMALL_DRAFT,
            "2",
            "--output-dir",
            dir.as_str(),
            "--reference",
            summary.as_str(),
        ]);
        run_assignment(&args).unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn training_draft_from_workbook() {
        let dir = out_dir("training");
        let args = Args::parse_from([
            "rdraft",
            SMALL_DRAFT,
            "2",
            "3",
            "--output-dir",
            dir.as_str(),
        ]);
        run_assignment(&args).unwrap();
        let d = Path::new(&dir);
        let tap = read_ids(&d.join("Tap.csv"));
        let jazz = read_ids(&d.join("Jazz.csv"));
        assert_eq!(&tap[..2], &["101".to_string(), "102".to_string()]);
        assert_eq!(&jazz[..2], &["104".to_string(), "105".to_string()]);
        // The lottery hands out the two auditionees left.
        let mut drawn = vec![tap[2].clone(), jazz[2].clone()];
        drawn.sort();
        assert_eq!(drawn, vec!["103".to_string(), "106".to_string()]);
        assert!(read_ids(&d.join("waitlist_roster.csv")).is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_workbook_fails() {
        let dir = out_dir("missing");
        let args = Args::parse_from([
            "rdraft",
            "/nonexistent/prefs.xlsx",
            "2",
            "--output-dir",
            dir.as_str(),
        ]);
        assert!(matches!(
            run_assignment(&args),
            Err(DraftError::OpeningExcel { .. })
        ));
        assert!(!Path::new(&dir).exists());
    }
}
