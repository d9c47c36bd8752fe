use std::cmp::Ordering;

use crate::models::{Club, FinalScore, Match, Outcome, ResultEntry, ResultKind};

/// Picks the definitive full-time score of a match.
///
/// Precedence: a current-schema final entry, then a legacy final entry, then a lone entry that
/// is not a half-time score. Anything else (no entries, only half-time, or several ambiguous
/// entries) has no final result.
pub fn final_result(match_data: &Match) -> Option<FinalScore> {
    final_from_entries(&match_data.results)
}

fn final_from_entries(results: &[ResultEntry]) -> Option<FinalScore> {
    let pick = results
        .iter()
        .find(|r| r.kind == ResultKind::Final)
        .or_else(|| results.iter().find(|r| r.kind == ResultKind::FinalLegacy))
        .or_else(|| {
            let mut candidates = results.iter().filter(|r| r.kind != ResultKind::HalfTime);
            match (candidates.next(), candidates.next()) {
                (Some(only), None) => Some(only),
                _ => None,
            }
        })?;

    Some(FinalScore {
        home: pick.score_home,
        away: pick.score_away,
    })
}

/// Win/draw/loss for the reference team.
pub fn classify(score: FinalScore, reference_home: bool) -> Outcome {
    let (ours, theirs) = score.for_reference(reference_home);
    match ours.cmp(&theirs) {
        Ordering::Greater => Outcome::Win,
        Ordering::Equal => Outcome::Draw,
        Ordering::Less => Outcome::Loss,
    }
}

/// Outcome of a played match from the club's side; `None` when there is no final result.
pub fn match_outcome(match_data: &Match, club: &Club) -> Option<Outcome> {
    final_result(match_data).map(|score| classify(score, match_data.is_home_for(club)))
}

/// Maps an OpenLigaDB result descriptor onto a result kind.
pub fn kind_from_source(result_type_id: Option<u32>, result_name: Option<&str>) -> ResultKind {
    let name = result_name.map(|n| n.trim().to_lowercase()).unwrap_or_default();

    if result_type_id == Some(2) {
        return ResultKind::Final;
    }
    if name == "endergebnis" {
        return ResultKind::FinalLegacy;
    }
    if result_type_id == Some(1) || name.contains("halbzeit") {
        return ResultKind::HalfTime;
    }
    ResultKind::Other(result_type_id.unwrap_or(0))
}
