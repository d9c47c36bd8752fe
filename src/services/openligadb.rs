use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{Goal, Match, ResultEntry};
use crate::services::result_classifier::kind_from_source;

pub const OPENLIGADB_BASE_URL: &str = "https://api.openligadb.de";

// ── OpenLigaDB structures ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLigaMatch {
    pub match_date_time: Option<String>,
    #[serde(rename = "matchDateTimeUTC")]
    pub match_date_time_utc: Option<String>,
    pub league_season: Option<i32>,
    pub group: Option<OpenLigaGroup>,
    pub team1: OpenLigaTeam,
    pub team2: OpenLigaTeam,
    pub match_results: Option<Vec<OpenLigaResult>>,
    pub location: Option<OpenLigaLocation>,
    pub goals: Option<Vec<OpenLigaGoal>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLigaTeam {
    pub team_id: Option<u32>,
    #[serde(default)]
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLigaGroup {
    pub group_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLigaResult {
    #[serde(rename = "resultTypeID")]
    pub result_type_id: Option<u32>,
    pub result_name: Option<String>,
    pub points_team1: Option<i64>,
    pub points_team2: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLigaLocation {
    pub location_stadium: Option<String>,
    pub location_city: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLigaGoal {
    pub goal_getter_name: Option<String>,
    pub match_minute: Option<u32>,
    pub score_team1: Option<u32>,
    pub score_team2: Option<u32>,
}

impl OpenLigaMatch {
    /// Normalizes the record into `season`. Records without a usable kickoff time are dropped.
    pub fn into_match(self, season: i32) -> Option<Match> {
        let date_time = self
            .match_date_time
            .as_deref()
            .and_then(parse_kickoff)
            .or_else(|| self.match_date_time_utc.as_deref().and_then(parse_kickoff));

        let Some(date_time) = date_time else {
            tracing::warn!(
                "Skipping {} vs {} in {}: no readable kickoff time",
                self.team1.team_name,
                self.team2.team_name,
                season
            );
            return None;
        };

        if let Some(listed) = self.league_season {
            if listed != season {
                tracing::debug!("Record lists season {} but was filed under {}", listed, season);
            }
        }

        let results = self
            .match_results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| {
                let scores = (
                    r.points_team1.and_then(|p| u32::try_from(p).ok()),
                    r.points_team2.and_then(|p| u32::try_from(p).ok()),
                );
                let (Some(score_home), Some(score_away)) = scores else {
                    tracing::warn!(
                        "Dropping malformed result {:?} ({:?}-{:?}) for {} vs {}",
                        r.result_name,
                        r.points_team1,
                        r.points_team2,
                        self.team1.team_name,
                        self.team2.team_name
                    );
                    return None;
                };
                Some(ResultEntry {
                    kind: kind_from_source(r.result_type_id, r.result_name.as_deref()),
                    score_home,
                    score_away,
                })
            })
            .collect();

        let goals = self
            .goals
            .unwrap_or_default()
            .into_iter()
            .map(|g| Goal {
                scorer: g.goal_getter_name.filter(|n| !n.trim().is_empty()),
                minute: g.match_minute,
                score_home: g.score_team1.unwrap_or(0),
                score_away: g.score_team2.unwrap_or(0),
            })
            .collect();

        Some(Match {
            date_time,
            season,
            home_team_name: self.team1.team_name,
            away_team_name: self.team2.team_name,
            stadium_name_raw: self.location.and_then(|l| l.location_stadium),
            matchday_label: self
                .group
                .and_then(|g| g.group_name)
                .unwrap_or_default(),
            results,
            goals,
        })
    }
}

/// Parses the season file body into matches, in file order.
pub fn parse_season(raw: &str, season: i32) -> serde_json::Result<Vec<Match>> {
    let records: Option<Vec<OpenLigaMatch>> = serde_json::from_str(raw)?;
    Ok(records
        .unwrap_or_default()
        .into_iter()
        .filter_map(|r| r.into_match(season))
        .collect())
}

fn parse_kickoff(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_local()))
}

// ── Sync ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SyncSummary {
    pub saved: Vec<(i32, String, usize)>,
    pub empty: Vec<i32>,
}

pub struct OpenLigaClient {
    client: Client,
    base_url: String,
}

impl OpenLigaClient {
    pub fn new() -> Self {
        Self::with_base_url(OPENLIGADB_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Every match of one league season, untouched.
    pub async fn fetch_league_season(&self, league: &str, season: i32) -> Result<Vec<Value>> {
        let url = format!("{}/getmatchdata/{}/{}", self.base_url, league, season);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("OpenLigaDB error {} for {}: {}", status, url, body));
        }

        let data: Option<Vec<Value>> = response.json().await?;
        Ok(data.unwrap_or_default())
    }

    /// Matches involving `team_id` from the first league in `leagues` that has any.
    pub async fn team_season(
        &self,
        leagues: &[String],
        season: i32,
        team_id: u32,
    ) -> Result<Option<(String, Vec<Value>)>> {
        for league in leagues {
            let matches = match self.fetch_league_season(league, season).await {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("Season {} in {}: {}", season, league, e);
                    continue;
                }
            };
            let involved = involving_team(matches, team_id);
            if !involved.is_empty() {
                return Ok(Some((league.clone(), involved)));
            }
        }
        Ok(None)
    }
}

impl Default for OpenLigaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps raw records where either side has `team_id`.
pub fn involving_team(matches: Vec<Value>, team_id: u32) -> Vec<Value> {
    let side_is = |m: &Value, side: &str| {
        m.get(side)
            .and_then(|t| t.get("teamId"))
            .and_then(Value::as_u64)
            == Some(team_id as u64)
    };
    matches
        .into_iter()
        .filter(|m| side_is(m, "team1") || side_is(m, "team2"))
        .collect()
}

/// Downloads each season in `[from, to]` and writes it under the local data root.
pub async fn sync_seasons(
    client: &OpenLigaClient,
    config: &AppConfig,
    from: i32,
    to: i32,
) -> Result<SyncSummary> {
    if config.is_remote() {
        return Err(anyhow!(
            "sync needs a local data root, got {}",
            config.data_root
        ));
    }

    let mut summary = SyncSummary::default();
    for season in from..=to {
        tracing::info!("Processing season {}…", season);
        match client
            .team_season(&config.leagues, season, config.team_id)
            .await?
        {
            Some((league, matches)) => {
                let relative = config.season_resource(season);
                let path = Path::new(&config.data_root).join(&relative);
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                let body = serde_json::to_string_pretty(&matches)?;
                tokio::fs::write(&path, body)
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(
                    "Saved {} matches of {} ({}) to {}",
                    matches.len(),
                    season,
                    league,
                    path.display()
                );
                summary.saved.push((season, league, matches.len()));
            }
            None => {
                tracing::warn!("No matches for team {} in season {}", config.team_id, season);
                summary.empty.push(season);
            }
        }
    }

    Ok(summary)
}
