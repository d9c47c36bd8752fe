use reqwest::Client;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::task::JoinSet;

use crate::config::AppConfig;
use crate::error::LoadError;
use crate::models::{Archive, Match, SeasonDataset, StadiumDirectory, StadiumToOpponentMap};
use crate::services::openligadb::parse_season;

/// Where season files and lookup tables live.
#[derive(Debug, Clone)]
pub enum DataSource {
    Directory(PathBuf),
    Http { client: Client, base_url: String },
}

impl DataSource {
    pub fn from_config(config: &AppConfig) -> Self {
        if config.is_remote() {
            DataSource::Http {
                client: Client::new(),
                base_url: config.data_root.trim_end_matches('/').to_string(),
            }
        } else {
            DataSource::Directory(PathBuf::from(&config.data_root))
        }
    }

    fn root(&self) -> String {
        match self {
            DataSource::Directory(dir) => dir.display().to_string(),
            DataSource::Http { base_url, .. } => base_url.clone(),
        }
    }

    pub async fn read(&self, resource: &str) -> Result<String, LoadError> {
        match self {
            DataSource::Directory(dir) => {
                let path = dir.join(resource);
                tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
                    ErrorKind::NotFound => LoadError::NotFound {
                        resource: resource.to_string(),
                        root: self.root(),
                    },
                    _ => LoadError::Unavailable {
                        resource: resource.to_string(),
                        reason: e.to_string(),
                    },
                })
            }
            DataSource::Http { client, base_url } => {
                let url = format!("{}/{}", base_url, resource.trim_start_matches('/'));
                let unavailable = |e: reqwest::Error| LoadError::Unavailable {
                    resource: resource.to_string(),
                    reason: e.to_string(),
                };

                let response = client.get(&url).send().await.map_err(unavailable)?;
                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(LoadError::NotFound {
                        resource: resource.to_string(),
                        root: self.root(),
                    });
                }
                if !status.is_success() {
                    return Err(LoadError::Http {
                        resource: resource.to_string(),
                        status: status.as_u16(),
                    });
                }
                response.text().await.map_err(unavailable)
            }
        }
    }
}

/// Loads every season and both lookup tables concurrently.
///
/// Seasons that are missing or unreadable are left out of the dataset. Either lookup table
/// failing fails the whole load, but only after every request has settled.
pub async fn load_archive(config: &AppConfig) -> Result<Archive, LoadError> {
    let source = DataSource::from_config(config);
    tracing::info!(
        "Loading seasons {}-{} for {} from {}",
        config.first_season,
        config.last_season,
        config.team_name,
        source.root()
    );

    let (dataset, stadium_teams, directory) = tokio::join!(
        load_seasons(&source, config),
        load_table::<StadiumToOpponentMap>(&source, &config.stadium_teams),
        load_table::<StadiumDirectory>(&source, &config.stadium_locations),
    );

    let stadium_teams = stadium_teams?;
    let directory = directory?;

    tracing::info!(
        "Loaded {} matches across {} seasons, {} stadium owners, {} stadium locations",
        dataset.match_count(),
        dataset.season_count(),
        stadium_teams.0.len(),
        directory.0.len()
    );

    Ok(Archive {
        club: config.club(),
        dataset,
        directory,
        stadium_teams,
    })
}

async fn load_seasons(source: &DataSource, config: &AppConfig) -> SeasonDataset {
    let mut tasks = JoinSet::new();
    for season in config.first_season..=config.last_season {
        let source = source.clone();
        let resource = config.season_resource(season);
        tasks.spawn(async move {
            let matches = load_season(&source, &resource, season).await;
            (season, matches)
        });
    }

    let mut dataset = SeasonDataset::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((season, Ok(matches))) if matches.is_empty() => {
                tracing::debug!("Season {} has no matches", season);
            }
            Ok((season, Ok(matches))) => dataset.insert(season, matches),
            Ok((season, Err(e))) => tracing::warn!("Skipping season {}: {}", season, e),
            Err(e) => tracing::warn!("Season task failed: {}", e),
        }
    }
    dataset
}

async fn load_season(
    source: &DataSource,
    resource: &str,
    season: i32,
) -> Result<Vec<Match>, LoadError> {
    let raw = source.read(resource).await?;
    parse_season(&raw, season).map_err(|e| LoadError::Malformed {
        resource: resource.to_string(),
        source: e,
    })
}

async fn load_table<T: DeserializeOwned>(
    source: &DataSource,
    resource: &str,
) -> Result<T, LoadError> {
    let raw = source.read(resource).await?;
    serde_json::from_str(&raw).map_err(|e| LoadError::Malformed {
        resource: resource.to_string(),
        source: e,
    })
}
