/*!

Round-by-round team draft over ranked preference lists.

Every team submits an ordered list of the auditionees it wants. The draft
runs a fixed number of rounds; in every round each team ends up with exactly
one new member:

1. every team looks at its current top pick;
2. a top pick shared by exactly two teams, and still available, goes right
   away to the first of these teams (in team order);
3. then, until every team has a pick for this round, an unresolved team is
   drawn at random: it gets its top pick if that auditionee is still
   available, or moves on to the next name on its list otherwise.

This is a greedy heuristic. It does not produce a stable matching.

```
use ranked_draft::*;

let teams = vec![
    ("Alpha".to_string(), vec![10, 20]),
    ("Beta".to_string(), vec![20, 10]),
];
let outcome = run_draft(&[10, 20, 30], &teams, &DraftRules::DEFAULT_RULES)?;
assert_eq!(outcome.teams[0].picks, vec![10]);
assert_eq!(outcome.teams[1].picks, vec![20]);
assert_eq!(outcome.remaining, vec![30]);
# Ok::<(), DraftErrors>(())
```

See the [manual] for the input conventions of the command line tool.
*/

pub mod builder;
mod config;
pub mod manual;
mod tiebreak;

use log::{debug, info, warn};

use std::collections::{HashMap, HashSet, VecDeque};

pub use crate::config::*;
pub use crate::tiebreak::{source_for, DigestSource, SeededSource, TieBreakSource};

// **** Private structures ****

type RoundId = u32;

// The state of a team during the ranked rounds.
// The queue is only ever drained.
#[derive(Eq, PartialEq, Debug, Clone)]
struct TeamQueue {
    name: String,
    queue: VecDeque<CandidateId>,
    top_pick: CandidateId,
    picks: Vec<CandidateId>,
}

impl TeamQueue {
    fn new(name: &str, prefs: &[CandidateId]) -> Result<TeamQueue, DraftErrors> {
        let mut queue: VecDeque<CandidateId> = prefs.iter().cloned().collect();
        let top_pick = queue
            .pop_front()
            .ok_or_else(|| DraftErrors::QueueExhausted {
                team: name.to_string(),
                round: 1,
            })?;
        Ok(TeamQueue {
            name: name.to_string(),
            queue,
            top_pick,
            picks: Vec::new(),
        })
    }

    /// Moves to the next preference. Running out of preferences is fatal.
    fn advance(&mut self, round: RoundId) -> Result<(), DraftErrors> {
        self.top_pick = self
            .queue
            .pop_front()
            .ok_or_else(|| DraftErrors::QueueExhausted {
                team: self.name.clone(),
                round,
            })?;
        Ok(())
    }
}

/// Runs the draft with the given rules.
///
/// Arguments:
/// * `roster` the identifiers of all the auditionees. They must be unique.
/// * `teams` for each team, its name and its preferences, most preferred first.
/// Preferences may mention identifiers that are not in the roster: such
/// preferences can never be fulfilled and are skipped during the draws.
/// * `rules` the rules of the draft, including the random seed.
pub fn run_draft(
    roster: &[CandidateId],
    teams: &[(String, Vec<CandidateId>)],
    rules: &DraftRules,
) -> Result<DraftOutcome, DraftErrors> {
    let mut source = source_for(rules.tiebreak_mode);
    run_draft_with_source(roster, teams, rules, source.as_mut())
}

/// Runs the draft, taking all the random draws from `source`.
///
/// The tiebreak mode of the rules is ignored.
pub fn run_draft_with_source(
    roster: &[CandidateId],
    teams: &[(String, Vec<CandidateId>)],
    rules: &DraftRules,
    source: &mut dyn TieBreakSource,
) -> Result<DraftOutcome, DraftErrors> {
    info!(
        "run_draft: {:?} candidates, {:?} teams, rules: {:?}",
        roster.len(),
        teams.len(),
        rules
    );

    let mut remaining: HashSet<CandidateId> = HashSet::new();
    for cid in roster.iter() {
        if !remaining.insert(*cid) {
            return Err(DraftErrors::DuplicateRosterEntry { id: *cid });
        }
    }

    for (name, prefs) in teams.iter() {
        let unknown: Vec<&CandidateId> = prefs
            .iter()
            .filter(|c| !remaining.contains(*c))
            .collect();
        if !unknown.is_empty() {
            warn!(
                "run_draft: team {:?} lists candidates that are not in the roster: {:?}",
                name, unknown
            );
        }
    }

    let mut queues: Vec<TeamQueue> = Vec::new();
    for (name, prefs) in teams.iter() {
        queues.push(TeamQueue::new(name, prefs)?);
    }

    let mut round_stats: Vec<RoundStats> = Vec::new();
    for round_id in 1..=rules.rounds {
        let stats = run_one_round(&mut queues, &mut remaining, round_id, source)?;
        log_round(&stats);
        for (tq, p) in queues.iter_mut().zip(stats.picks.iter()) {
            tq.picks.push(p.candidate);
        }
        round_stats.push(stats);
        // Seed the next round, if there is one.
        if round_id < rules.rounds {
            for tq in queues.iter_mut() {
                tq.advance(round_id + 1)?;
            }
        }
    }

    let mut assignments: Vec<TeamAssignment> = queues
        .into_iter()
        .map(|tq| TeamAssignment {
            name: tq.name,
            picks: tq.picks,
            lottery_picks: Vec::new(),
        })
        .collect();

    let mut pool: Vec<CandidateId> = remaining.into_iter().collect();
    pool.sort_unstable();
    if rules.lottery_rounds > 0 {
        run_lottery(&mut assignments, &mut pool, rules.lottery_rounds, source);
    }

    Ok(DraftOutcome {
        teams: assignments,
        remaining: pool,
        round_stats,
    })
}

// The top picks that are shared by exactly two teams.
fn paired_top_picks(teams: &[TeamQueue]) -> HashSet<CandidateId> {
    let mut counts: HashMap<CandidateId, usize> = HashMap::new();
    for tq in teams.iter() {
        *counts.entry(tq.top_pick).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter_map(|(cid, count)| if count == 2 { Some(cid) } else { None })
        .collect()
}

/// Resolves one pick for every team.
fn run_one_round(
    teams: &mut [TeamQueue],
    remaining: &mut HashSet<CandidateId>,
    round_id: RoundId,
    source: &mut dyn TieBreakSource,
) -> Result<RoundStats, DraftErrors> {
    let mut final_picks: Vec<Option<(CandidateId, Resolution)>> = vec![None; teams.len()];
    let mut skipped: Vec<u32> = vec![0; teams.len()];

    // A pick shared by exactly two teams goes to the first of them.
    // The second one will find it taken during the draws.
    let paired = paired_top_picks(teams);
    debug!("run_one_round: round {}: paired top picks: {:?}", round_id, paired);
    for (idx, tq) in teams.iter().enumerate() {
        if paired.contains(&tq.top_pick) && remaining.remove(&tq.top_pick) {
            final_picks[idx] = Some((tq.top_pick, Resolution::Paired));
        }
    }

    loop {
        let unresolved: Vec<usize> = final_picks
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| if p.is_none() { Some(idx) } else { None })
            .collect();
        if unresolved.is_empty() {
            break;
        }
        let selected = unresolved[source.pick(unresolved.len())];
        let tq = &mut teams[selected];
        if remaining.remove(&tq.top_pick) {
            debug!(
                "run_one_round: round {}: {:?} takes {}",
                round_id, tq.name, tq.top_pick
            );
            final_picks[selected] = Some((tq.top_pick, Resolution::Drawn));
        } else {
            debug!(
                "run_one_round: round {}: {} is not available for {:?}",
                round_id, tq.top_pick, tq.name
            );
            skipped[selected] += 1;
            tq.advance(round_id)?;
        }
    }

    let mut picks: Vec<TeamRoundPick> = Vec::new();
    for ((tq, fp), skip) in teams.iter().zip(final_picks.iter()).zip(skipped.iter()) {
        // All the teams are resolved when leaving the loop.
        if let Some((candidate, resolution)) = fp {
            picks.push(TeamRoundPick {
                team: tq.name.clone(),
                candidate: *candidate,
                resolution: *resolution,
                skipped: *skip,
            });
        }
    }
    Ok(RoundStats {
        round: round_id,
        picks,
    })
}

fn log_round(stats: &RoundStats) {
    info!("Round {}", stats.round);
    for p in stats.picks.iter() {
        let how = match p.resolution {
            Resolution::Paired => "paired",
            Resolution::Drawn => "drawn",
        };
        info!(
            "{:>8} -> {} ({}, {} skipped)",
            p.candidate, p.team, how, p.skipped
        );
    }
}

/// Hands out the remaining candidates at random, one per team and per round,
/// until the rounds or the candidates run out.
fn run_lottery(
    teams: &mut [TeamAssignment],
    pool: &mut Vec<CandidateId>,
    lottery_rounds: u32,
    source: &mut dyn TieBreakSource,
) {
    let mut lottery_round = 0;
    while lottery_round < lottery_rounds && !pool.is_empty() {
        for ta in teams.iter_mut() {
            if pool.is_empty() {
                break;
            }
            let cid = pool.remove(source.pick(pool.len()));
            debug!("run_lottery: {} -> {:?}", cid, ta.name);
            ta.lottery_picks.push(cid);
        }
        lottery_round += 1;
    }
    info!(
        "run_lottery: {} lottery rounds, {} candidates left",
        lottery_round,
        pool.len()
    );
}
