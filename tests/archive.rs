use std::path::PathBuf;

use clubledger::config::AppConfig;
use clubledger::models::{
    AggregateResult, Archive, FilterSpec, LocationFilter, Match, OutcomeFilter,
};
use clubledger::services::{
    aggregate, aggregate_by_stadium, filter_matches, final_result, head_to_head, load_archive,
    refilter, resolve_stadium, rivals, stadium_map,
};

fn fixture_config() -> AppConfig {
    let mut root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.push("tests");
    root.push("fixtures");
    AppConfig {
        data_root: root.display().to_string(),
        first_season: 2021,
        last_season: 2024,
        ..AppConfig::default()
    }
}

async fn archive() -> Archive {
    load_archive(&fixture_config())
        .await
        .expect("fixture archive should load")
}

#[tokio::test]
async fn loads_available_seasons_only() {
    let archive = archive().await;
    // 2021 has no file and 2024 is empty.
    assert_eq!(archive.dataset.first_season(), Some(2022));
    assert_eq!(archive.dataset.last_season(), Some(2023));
    assert_eq!(archive.dataset.match_count(), 4);
}

#[tokio::test]
async fn season_2022_summary_and_stadiums() {
    let archive = archive().await;
    let season = archive.dataset.get(2022).expect("2022 should be loaded");
    let (a, b) = (&season[0], &season[1]);

    assert_eq!(
        aggregate(season, &archive.club),
        AggregateResult {
            played: 2,
            won: 1,
            drawn: 1,
            lost: 0,
            goals_for: 3,
            goals_against: 1,
        }
    );
    assert_eq!(
        resolve_stadium(a, &archive.club, &archive.stadium_teams).as_deref(),
        Some("RheinEnergieSTADION")
    );
    assert_eq!(
        resolve_stadium(b, &archive.club, &archive.stadium_teams).as_deref(),
        Some("Rival Arena")
    );
    assert_eq!(a.goals.len(), 4);
}

#[tokio::test]
async fn home_matches_against_rival() {
    let archive = archive().await;
    let spec = FilterSpec::season(2022)
        .with_rival("Rival X")
        .at(LocationFilter::Home);
    let kept = filter_matches(&archive.dataset, &archive.club, &spec);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].matchday_label, "1. Spieltag");
}

#[tokio::test]
async fn halftime_only_match_is_pending() {
    let archive = archive().await;
    let hertha = &archive.dataset.get(2023).expect("2023 should be loaded")[0];
    assert_eq!(final_result(hertha), None);

    for outcome in [OutcomeFilter::Win, OutcomeFilter::Draw, OutcomeFilter::Loss] {
        let spec = FilterSpec::season(2023).with_outcome(outcome);
        let kept = filter_matches(&archive.dataset, &archive.club, &spec);
        assert!(kept.iter().all(|m| m.home_team_name != "Hertha BSC"));
    }

    let season = aggregate(archive.dataset.get(2023).unwrap(), &archive.club);
    assert_eq!((season.played, season.lost), (1, 1));
    assert_eq!(season.played, season.won + season.drawn + season.lost);
}

#[tokio::test]
async fn unrestricted_filter_is_identity_and_idempotent() {
    let archive = archive().await;
    let spec = FilterSpec::unrestricted(&archive.dataset);
    let all = filter_matches(&archive.dataset, &archive.club, &spec);
    let concatenated: Vec<&Match> = archive
        .dataset
        .iter()
        .flat_map(|(_, matches)| matches.iter())
        .collect();
    assert_eq!(all, concatenated);
    assert_eq!(refilter(&all, &archive.club, &spec), all);

    let losses = FilterSpec::unrestricted(&archive.dataset).with_outcome(OutcomeFilter::Loss);
    let once = filter_matches(&archive.dataset, &archive.club, &losses);
    assert_eq!(refilter(&once, &archive.club, &losses), once);
}

#[tokio::test]
async fn rival_history_and_map() {
    let archive = archive().await;
    assert_eq!(rivals(&archive.dataset, &archive.club), vec!["Hertha BSC", "Rival X"]);

    let h2h = head_to_head(&archive.dataset, &archive.club, "Rival X");
    let summary = aggregate(h2h.iter().copied(), &archive.club);
    assert_eq!((summary.played, summary.won, summary.drawn, summary.lost), (3, 1, 1, 1));

    let home = aggregate_by_stadium(
        h2h.iter().copied(),
        "RheinEnergieSTADION",
        &archive.club,
        &archive.stadium_teams,
    );
    assert_eq!((home.played, home.goals_for, home.goals_against), (2, 3, 3));

    let season = filter_matches(&archive.dataset, &archive.club, &FilterSpec::season(2023));
    let view = stadium_map(&season, &archive);
    let names: Vec<&str> = view.markers.iter().map(|m| m.stadium.as_str()).collect();
    assert_eq!(names, vec!["RheinEnergieSTADION", "Olympiastadion"]);
    assert_eq!(view.markers[1].opponent.as_deref(), Some("Hertha BSC"));
    assert_eq!(view.markers[1].summary, AggregateResult::default());
}
