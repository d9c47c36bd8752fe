use crate::models::{
    Club, Coordinates, Match, StadiumDirectory, StadiumToOpponentMap, UNKNOWN_STADIUM,
};

/// Stadium a match was played at.
///
/// Uses the raw field when it carries a name. Otherwise home matches are placed at the club's
/// ground and away matches at the ground owned by the home-listed team. Returns `None` rather
/// than guessing when neither works.
pub fn resolve_stadium(
    match_data: &Match,
    club: &Club,
    stadium_teams: &StadiumToOpponentMap,
) -> Option<String> {
    if let Some(raw) = match_data.stadium_name_raw.as_deref() {
        let raw = raw.trim();
        if !raw.is_empty() && !raw.eq_ignore_ascii_case(UNKNOWN_STADIUM) {
            return Some(raw.to_string());
        }
    }

    if match_data.is_home_for(club) {
        return Some(club.home_stadium.clone());
    }

    stadium_of_team(&match_data.home_team_name, stadium_teams).map(str::to_string)
}

/// Reverse scan: the first stadium (sorted by name) whose owner is `team`.
pub fn stadium_of_team<'a>(team: &str, stadium_teams: &'a StadiumToOpponentMap) -> Option<&'a str> {
    stadium_teams
        .0
        .iter()
        .find(|(_, owner)| owner.as_str() == team)
        .map(|(stadium, _)| stadium.as_str())
}

/// The team that plays at `stadium`, if known.
pub fn opponent_for_stadium<'a>(
    stadium: &str,
    stadium_teams: &'a StadiumToOpponentMap,
) -> Option<&'a str> {
    stadium_teams.0.get(stadium.trim()).map(String::as_str)
}

/// Exact key first, then the first key (in sorted order) contained in `stadium`.
pub fn find_coordinates(stadium: &str, directory: &StadiumDirectory) -> Option<Coordinates> {
    if let Some(coords) = directory.0.get(stadium) {
        return Some(*coords);
    }

    directory
        .0
        .iter()
        .find(|(key, _)| !key.is_empty() && stadium.contains(key.as_str()))
        .map(|(_, coords)| *coords)
}
