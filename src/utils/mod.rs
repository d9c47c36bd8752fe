use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

use crate::models::{AggregateResult, Archive, FilterSpec, Match, MatchRow, SeasonDataset};
use crate::services::{final_result, match_outcome, resolve_stadium};

pub const PENDING_SCORE: &str = "pending";
pub const UNKNOWN_STADIUM_LABEL: &str = "unknown";

/// Format a kickoff as dd/mm/yyyy
pub fn format_date(date_time: &NaiveDateTime) -> String {
    date_time.format("%d/%m/%Y").to_string()
}

/// "2023/2024" for season 2023
pub fn season_label(season: i32) -> String {
    format!("{}/{}", season, season + 1)
}

/// Loaded seasons, newest first
pub fn seasons_newest_first(dataset: &SeasonDataset) -> Vec<i32> {
    let mut seasons: Vec<i32> = dataset.iter().map(|(season, _)| season).collect();
    seasons.reverse();
    seasons
}

/// Oldest kickoff first (season tables)
pub fn sorted_by_date_asc<'a>(matches: &[&'a Match]) -> Vec<&'a Match> {
    let mut sorted = matches.to_vec();
    sorted.sort_by(|a, b| a.date_time.cmp(&b.date_time));
    sorted
}

/// Most recent kickoff first (head-to-head tables)
pub fn sorted_by_date_desc<'a>(matches: &[&'a Match]) -> Vec<&'a Match> {
    let mut sorted = matches.to_vec();
    sorted.sort_by(|a, b| b.date_time.cmp(&a.date_time));
    sorted
}

/// Table rows in the order given.
pub fn match_rows(matches: &[&Match], archive: &Archive) -> Vec<MatchRow> {
    matches
        .iter()
        .map(|m| {
            let stadium = resolve_stadium(m, &archive.club, &archive.stadium_teams)
                .unwrap_or_else(|| {
                    tracing::warn!(
                        "Unknown stadium for {} vs {} on {}",
                        m.home_team_name,
                        m.away_team_name,
                        format_date(&m.date_time)
                    );
                    UNKNOWN_STADIUM_LABEL.to_string()
                });

            MatchRow {
                season: m.season,
                date: format_date(&m.date_time),
                matchday: m.matchday_label.clone(),
                home_team: m.home_team_name.clone(),
                away_team: m.away_team_name.clone(),
                score: final_result(m)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| PENDING_SCORE.to_string()),
                stadium,
                outcome: match_outcome(m, &archive.club),
            }
        })
        .collect()
}

/// Closest names to `query`, best first, for "did you mean" hints.
pub fn suggest_names<'a>(query: &str, candidates: &'a [String], limit: usize) -> Vec<&'a str> {
    let query = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .iter()
        .map(|c| (strsim::jaro_winkler(&query, &c.to_lowercase()), c.as_str()))
        .filter(|(score, _)| *score >= 0.7)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().take(limit).map(|(_, name)| name).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported format '{}', use csv or json", other)),
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    filter: &'a FilterSpec,
    summary: &'a AggregateResult,
    matches: &'a [MatchRow],
}

/// Writes `rows` as CSV (one line per row, with a header) or as a JSON document that also
/// carries the filter and its summary.
pub fn write_rows<W: Write>(
    rows: &[MatchRow],
    summary: &AggregateResult,
    filter: &FilterSpec,
    format: ExportFormat,
    writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            let document = ExportDocument {
                filter,
                summary,
                matches: rows,
            };
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &document)?;
            writer.flush()?;
        }
    }
    Ok(())
}
