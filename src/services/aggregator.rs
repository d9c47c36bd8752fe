use std::collections::BTreeSet;

use crate::models::{
    AggregateResult, Archive, Club, MapView, Match, Outcome, StadiumMarker, StadiumToOpponentMap,
};
use crate::services::result_classifier::{classify, final_result};
use crate::services::stadium_resolver::{find_coordinates, opponent_for_stadium, resolve_stadium};

/// Played/won/drawn/lost and goals for the club over `matches`.
///
/// Matches without a final result are skipped. No filtering happens here.
pub fn aggregate<'a, I>(matches: I, club: &Club) -> AggregateResult
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut summary = AggregateResult::default();

    for match_data in matches {
        let Some(score) = final_result(match_data) else {
            continue;
        };
        let reference_home = match_data.is_home_for(club);
        let (ours, theirs) = score.for_reference(reference_home);

        summary.played += 1;
        summary.goals_for += u64::from(ours);
        summary.goals_against += u64::from(theirs);
        match classify(score, reference_home) {
            Outcome::Win => summary.won += 1,
            Outcome::Draw => summary.drawn += 1,
            Outcome::Loss => summary.lost += 1,
        }
    }

    summary
}

/// Same as [`aggregate`], restricted to matches whose resolved stadium is `stadium`.
pub fn aggregate_by_stadium<'a, I>(
    matches: I,
    stadium: &str,
    club: &Club,
    stadium_teams: &StadiumToOpponentMap,
) -> AggregateResult
where
    I: IntoIterator<Item = &'a Match>,
{
    let at_stadium = matches
        .into_iter()
        .filter(|m| resolve_stadium(m, club, stadium_teams).as_deref() == Some(stadium));
    aggregate(at_stadium, club)
}

/// Markers for the stadium map: the home ground first, then each distinct away ground in
/// name order, each carrying the club's record there.
pub fn stadium_map(matches: &[&Match], archive: &Archive) -> MapView {
    let club = &archive.club;
    let mut view = MapView::default();
    let mut away_grounds = BTreeSet::new();

    for match_data in matches {
        match resolve_stadium(match_data, club, &archive.stadium_teams) {
            Some(stadium) if stadium != club.home_stadium => {
                away_grounds.insert(stadium);
            }
            Some(_) => {}
            None => {
                tracing::warn!(
                    "No stadium for {} vs {} ({}), add it to the stadium table",
                    match_data.home_team_name,
                    match_data.away_team_name,
                    match_data.date_time.format("%Y-%m-%d")
                );
                view.unresolved.push(format!(
                    "{} vs {}",
                    match_data.home_team_name, match_data.away_team_name
                ));
            }
        }
    }

    let home = std::iter::once((club.home_stadium.clone(), true));
    let away = away_grounds.into_iter().map(|name| (name, false));

    for (stadium, is_home) in home.chain(away) {
        let Some(coordinates) = find_coordinates(&stadium, &archive.directory) else {
            tracing::warn!("Coordinates not found for \"{}\"", stadium);
            view.missing_coordinates.push(stadium);
            continue;
        };

        let summary = aggregate_by_stadium(
            matches.iter().copied(),
            &stadium,
            club,
            &archive.stadium_teams,
        );
        let opponent = if is_home {
            None
        } else {
            opponent_for_stadium(&stadium, &archive.stadium_teams).map(str::to_string)
        };

        view.markers.push(StadiumMarker {
            stadium,
            coordinates,
            is_home,
            opponent,
            summary,
        });
    }

    view
}
