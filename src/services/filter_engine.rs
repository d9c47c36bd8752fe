use std::collections::BTreeSet;

use crate::models::{Club, FilterSpec, Match, SeasonDataset};
use crate::services::result_classifier::match_outcome;

/// Selects matches from the dataset, ascending by season and in source order within a season.
/// The result is never re-sorted; display ordering is up to the caller.
pub fn filter_matches<'a>(
    dataset: &'a SeasonDataset,
    club: &Club,
    spec: &FilterSpec,
) -> Vec<&'a Match> {
    let selected: Vec<&Match> = dataset
        .range(spec.season_from, spec.season_to)
        .flat_map(|(_, matches)| matches.iter())
        .filter(|m| keeps(m, club, spec))
        .collect();

    tracing::debug!(
        "Filter {}..={} rival={:?} location={:?} outcome={:?} kept {} matches",
        spec.season_from,
        spec.season_to,
        spec.rival,
        spec.location,
        spec.outcome,
        selected.len()
    );

    selected
}

/// Applies the same criteria to an already materialized list, keeping its order.
pub fn refilter<'a>(matches: &[&'a Match], club: &Club, spec: &FilterSpec) -> Vec<&'a Match> {
    matches
        .iter()
        .copied()
        .filter(|m| in_season_range(m, spec) && keeps(m, club, spec))
        .collect()
}

/// Head-to-head list against one rival over every loaded season.
pub fn head_to_head<'a>(dataset: &'a SeasonDataset, club: &Club, rival: &str) -> Vec<&'a Match> {
    let spec = FilterSpec::unrestricted(dataset).with_rival(rival);
    filter_matches(dataset, club, &spec)
}

/// Every opponent faced, alphabetically.
pub fn rivals(dataset: &SeasonDataset, club: &Club) -> Vec<String> {
    dataset
        .iter()
        .flat_map(|(_, matches)| matches.iter())
        .filter_map(|m| m.opponent(club))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn in_season_range(match_data: &Match, spec: &FilterSpec) -> bool {
    (spec.season_from..=spec.season_to).contains(&match_data.season)
}

fn keeps(match_data: &Match, club: &Club, spec: &FilterSpec) -> bool {
    if let Some(rival) = spec.rival.as_deref() {
        if match_data.opponent(club) != Some(rival) {
            return false;
        }
    }

    if !spec.location.admits(match_data.venue(club)) {
        return false;
    }

    match spec.outcome.required() {
        None => true,
        Some(wanted) => match_outcome(match_data, club) == Some(wanted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationFilter, OutcomeFilter, ResultEntry, ResultKind};
    use chrono::NaiveDate;

    const KOELN: &str = "1. FC Köln";

    fn club() -> Club {
        Club::new(KOELN, "RheinEnergieSTADION")
    }

    fn fixture(season: i32, day: u32, home: &str, away: &str, score: Option<(u32, u32)>) -> Match {
        Match {
            date_time: NaiveDate::from_ymd_opt(season, 9, day)
                .and_then(|d| d.and_hms_opt(15, 30, 0))
                .unwrap(),
            season,
            home_team_name: home.to_string(),
            away_team_name: away.to_string(),
            stadium_name_raw: None,
            matchday_label: format!("{}. Spieltag", day),
            results: score
                .map(|(h, a)| {
                    vec![ResultEntry {
                        kind: ResultKind::Final,
                        score_home: h,
                        score_away: a,
                    }]
                })
                .unwrap_or_default(),
            goals: vec![],
        }
    }

    fn dataset() -> SeasonDataset {
        [
            (
                2021,
                vec![
                    fixture(2021, 20, KOELN, "Rival X", Some((1, 1))),
                    fixture(2021, 3, "Hertha BSC", KOELN, Some((2, 0))),
                ],
            ),
            (
                2022,
                vec![
                    fixture(2022, 6, KOELN, "Rival X", Some((3, 1))),
                    fixture(2022, 13, "Rival X", KOELN, Some((0, 0))),
                    fixture(2022, 27, KOELN, "Hertha BSC", None),
                ],
            ),
            (2023, vec![fixture(2023, 2, "Rival X", KOELN, Some((0, 2)))]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_unrestricted_returns_everything_in_order() {
        let data = dataset();
        let spec = FilterSpec::unrestricted(&data);
        let all = filter_matches(&data, &club(), &spec);
        let expected: Vec<&Match> = data.iter().flat_map(|(_, ms)| ms.iter()).collect();
        assert_eq!(all, expected);
        // Source order within 2021 is kept even though day 3 precedes day 20.
        assert_eq!(all[0].matchday_label, "20. Spieltag");
    }

    #[test]
    fn test_rival_and_location() {
        let data = dataset();
        let spec = FilterSpec::season(2022)
            .with_rival("Rival X")
            .at(LocationFilter::Home);
        let kept = filter_matches(&data, &club(), &spec);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].matchday_label, "6. Spieltag");
    }

    #[test]
    fn test_outcome_excludes_unplayed() {
        let data = dataset();
        let any = filter_matches(&data, &club(), &FilterSpec::season(2022));
        assert_eq!(any.len(), 3);

        let draws = filter_matches(
            &data,
            &club(),
            &FilterSpec::season(2022).with_outcome(OutcomeFilter::Draw),
        );
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].home_team_name, "Rival X");

        let wins = filter_matches(
            &data,
            &club(),
            &FilterSpec::seasons(2021, 2023).with_outcome(OutcomeFilter::Win),
        );
        assert_eq!(wins.len(), 2);
    }

    #[test]
    fn test_missing_and_inverted_ranges() {
        let data = dataset();
        assert!(filter_matches(&data, &club(), &FilterSpec::seasons(1990, 1999)).is_empty());
        assert!(filter_matches(&data, &club(), &FilterSpec::seasons(2023, 2021)).is_empty());
        assert_eq!(
            filter_matches(&data, &club(), &FilterSpec::seasons(2019, 2021)).len(),
            2
        );
    }

    #[test]
    fn test_refilter_is_idempotent() {
        let data = dataset();
        let spec = FilterSpec::seasons(2021, 2023)
            .at(LocationFilter::Away)
            .with_outcome(OutcomeFilter::Loss);
        let once = filter_matches(&data, &club(), &spec);
        let twice = refilter(&once, &club(), &spec);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_record_without_reference_team_has_no_rival() {
        let mut data = dataset();
        data.insert(2024, vec![fixture(2024, 1, "Rival X", "Hertha BSC", Some((1, 0)))]);
        let spec = FilterSpec::season(2024).with_rival("Rival X");
        assert!(filter_matches(&data, &club(), &spec).is_empty());
        assert_eq!(filter_matches(&data, &club(), &FilterSpec::season(2024)).len(), 1);
    }

    #[test]
    fn test_head_to_head_and_rivals() {
        let data = dataset();
        assert_eq!(head_to_head(&data, &club(), "Rival X").len(), 4);
        assert_eq!(rivals(&data, &club()), vec!["Hertha BSC", "Rival X"]);
    }
}
