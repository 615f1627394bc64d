// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The identifier of an auditionee. Unique across the roster.
pub type CandidateId = i64;

/// The first field of an input record, before validation.
///
/// In most cases, it is enough to use the higher-level builder API, which
/// rejects everything that is not an integer.
#[derive(PartialEq, Debug, Clone)]
pub enum RawEntry {
    /// A valid integer identifier.
    Id(CandidateId),
    /// A number that is not an integer (e.g. `12.5`).
    Number(f64),
    /// Some text that could not be read as an identifier.
    Text(String),
    /// A missing value.
    Blank,
}

impl RawEntry {
    pub fn as_id(&self) -> Option<CandidateId> {
        match self {
            RawEntry::Id(id) => Some(*id),
            _ => None,
        }
    }
}

impl Display for RawEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawEntry::Id(id) => write!(f, "{}", id),
            RawEntry::Number(x) => write!(f, "{}", x),
            RawEntry::Text(s) => write!(f, "{:?}", s),
            RawEntry::Blank => write!(f, "<blank>"),
        }
    }
}

// ******** Output data structures *********

/// How a pick got confirmed during a round.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Resolution {
    /// Confirmed before the draws: the candidate was the top pick of exactly
    /// two teams and this team came first in team order.
    Paired,
    /// Confirmed after the team was drawn at random among the unresolved teams.
    Drawn,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TeamRoundPick {
    pub team: String,
    pub candidate: CandidateId,
    pub resolution: Resolution,
    /// The number of times the preference queue of this team was advanced
    /// during the round because its top pick was already taken.
    pub skipped: u32,
}

/// Statistics for one round
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    /// One entry per team, in team order.
    pub picks: Vec<TeamRoundPick>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TeamAssignment {
    pub name: String,
    /// The confirmed picks, one per ranked round, in round order.
    pub picks: Vec<CandidateId>,
    /// The candidates handed out at random after the ranked rounds.
    pub lottery_picks: Vec<CandidateId>,
}

impl TeamAssignment {
    /// All the members of this team: ranked picks first, then lottery picks.
    pub fn members(&self) -> Vec<CandidateId> {
        let mut res = self.picks.clone();
        res.extend(self.lottery_picks.iter().cloned());
        res
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DraftOutcome {
    /// The teams, in the order they were provided.
    pub teams: Vec<TeamAssignment>,
    /// The candidates that were never assigned to a team, in increasing order.
    pub remaining: Vec<CandidateId>,
    pub round_stats: Vec<RoundStats>,
}

/// Errors that prevent the draft from completing.
///
/// None of them can be recovered from: they all point to a problem with the
/// input data.
#[derive(PartialEq, Debug, Clone)]
pub enum DraftErrors {
    /// The identifier field of a record is not an integer.
    MalformedInput {
        table: String,
        /// 1-based, as displayed in a spreadsheet.
        row: usize,
        content: String,
    },
    /// The same identifier appears twice in the roster.
    DuplicateRosterEntry { id: CandidateId },
    /// A team ran out of preferences.
    QueueExhausted { team: String, round: u32 },
}

impl Error for DraftErrors {}

impl Display for DraftErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftErrors::MalformedInput {
                table,
                row,
                content,
            } => write!(
                f,
                "audition numbers are not all integers: table {:?}, row {}: {}",
                table, row, content
            ),
            DraftErrors::DuplicateRosterEntry { id } => {
                write!(f, "audition numbers are not unique: {} appears more than once in the roster", id)
            }
            DraftErrors::QueueExhausted { team, round } => write!(
                f,
                "team {:?} ran out of preferences in round {}: insufficient team picks or too much overlap between teams, request additional preferences",
                team, round
            ),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// Draws from a pseudorandom generator seeded with the given value.
    Random(u64),
    /// Draws derived from a SHA-256 hash of the seed and the draw number.
    /// Slower, but the sequence does not depend on the version of any
    /// random number library.
    Digest(u32),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DraftRules {
    /// The number of ranked rounds. Every team gets one pick per round.
    pub rounds: u32,
    /// The number of rounds in which the remaining candidates are handed out
    /// at random after the ranked rounds.
    pub lottery_rounds: u32,
    pub tiebreak_mode: TieBreakMode,
}

impl DraftRules {
    pub const DEFAULT_SEED: u64 = 42;

    pub const DEFAULT_RULES: DraftRules = DraftRules {
        rounds: 1,
        lottery_rounds: 0,
        tiebreak_mode: TieBreakMode::Random(DraftRules::DEFAULT_SEED),
    };
}
