pub use crate::config::*;

use log::debug;
use std::collections::HashSet;

/// A builder for assembling a draft from raw tables.
///
/// The builder validates the identifiers as they are added: a roster or
/// preference record whose identifier is not an integer, or a roster with
/// duplicate identifiers, is rejected immediately.
///
/// ```
/// pub use ranked_draft::builder::Builder;
/// pub use ranked_draft::{DraftRules, RawEntry};
/// # use ranked_draft::DraftErrors;
///
/// let mut builder = Builder::new(&DraftRules::DEFAULT_RULES)?
///     .roster("Roster", &[RawEntry::Id(1), RawEntry::Id(2)])?;
///
/// builder.add_team("Tap", &[RawEntry::Id(2), RawEntry::Id(1)])?;
/// builder.add_team("Hip hop", &[RawEntry::Id(2), RawEntry::Id(1)])?;
///
/// let outcome = builder.run()?;
/// assert_eq!(outcome.teams.len(), 2);
/// # Ok::<(), DraftErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: DraftRules,
    pub(crate) _roster: Vec<CandidateId>,
    pub(crate) _teams: Vec<(String, Vec<CandidateId>)>,
}

impl Builder {
    pub fn new(rules: &DraftRules) -> Result<Builder, DraftErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _roster: Vec::new(),
            _teams: Vec::new(),
        })
    }

    /// Sets the roster, replacing the teams added so far.
    ///
    /// table: the name of the table the entries come from, used in error messages.
    /// The entries are numbered from 1 in error messages.
    pub fn roster(self, table: &str, entries: &[RawEntry]) -> Result<Builder, DraftErrors> {
        self.roster_at(table, &numbered(entries))
    }

    /// Same as [Builder::roster], with the row number of each entry in its table.
    pub fn roster_at(
        self,
        table: &str,
        entries: &[(usize, RawEntry)],
    ) -> Result<Builder, DraftErrors> {
        let ids = check_ids(table, entries)?;
        let mut seen: HashSet<CandidateId> = HashSet::new();
        for id in ids.iter() {
            if !seen.insert(*id) {
                return Err(DraftErrors::DuplicateRosterEntry { id: *id });
            }
        }
        debug!("Builder::roster: {} entries from {:?}", ids.len(), table);
        Ok(Builder {
            _rules: self._rules,
            _roster: ids,
            _teams: Vec::new(),
        })
    }

    /// Adds the preferences of a team, most preferred first.
    ///
    /// Teams are drafted in the order they are added.
    pub fn add_team(&mut self, name: &str, entries: &[RawEntry]) -> Result<(), DraftErrors> {
        self.add_team_at(name, &numbered(entries))
    }

    /// Same as [Builder::add_team], with the row number of each entry in its table.
    pub fn add_team_at(
        &mut self,
        name: &str,
        entries: &[(usize, RawEntry)],
    ) -> Result<(), DraftErrors> {
        let ids = check_ids(name, entries)?;
        debug!("Builder::add_team: {:?}: {} preferences", name, ids.len());
        self._teams.push((name.to_string(), ids));
        Ok(())
    }

    pub fn team_names(&self) -> Vec<String> {
        self._teams.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn run(&self) -> Result<DraftOutcome, DraftErrors> {
        crate::run_draft(&self._roster, &self._teams, &self._rules)
    }

    pub fn run_with_source(
        &self,
        source: &mut dyn crate::TieBreakSource,
    ) -> Result<DraftOutcome, DraftErrors> {
        crate::run_draft_with_source(&self._roster, &self._teams, &self._rules, source)
    }
}

fn numbered(entries: &[RawEntry]) -> Vec<(usize, RawEntry)> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, e)| (idx + 1, e.clone()))
        .collect()
}

fn check_ids(table: &str, entries: &[(usize, RawEntry)]) -> Result<Vec<CandidateId>, DraftErrors> {
    let mut res: Vec<CandidateId> = Vec::new();
    for (row, e) in entries.iter() {
        match e.as_id() {
            Some(id) => res.push(id),
            None => {
                return Err(DraftErrors::MalformedInput {
                    table: table.to_string(),
                    row: *row,
                    content: e.to_string(),
                })
            }
        }
    }
    Ok(res)
}
