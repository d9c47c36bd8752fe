use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::models::Club;

pub const DEFAULT_TEAM: &str = "1. FC Köln";
pub const DEFAULT_HOME_STADIUM: &str = "RheinEnergieSTADION";
pub const DEFAULT_TEAM_ID: u32 = 65;
pub const DEFAULT_SEASON_TEMPLATE: &str = "partidos_koln/koln_{season}.json";
pub const DEFAULT_STADIUM_TEAMS: &str = "data/stadium_teams.json";
pub const DEFAULT_STADIUM_LOCATIONS: &str = "data/stadium_locations.json";

/// Runtime settings, read from the environment (and `.env`, loaded by the binary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Local directory or http(s) base URL holding every resource.
    pub data_root: String,
    pub team_name: String,
    pub home_stadium: String,
    /// OpenLigaDB team id, used by `sync`.
    pub team_id: u32,
    pub first_season: i32,
    pub last_season: i32,
    /// Relative path of a season file; `{season}` is replaced by the year.
    pub season_template: String,
    pub stadium_teams: String,
    pub stadium_locations: String,
    pub leagues: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: ".".to_string(),
            team_name: DEFAULT_TEAM.to_string(),
            home_stadium: DEFAULT_HOME_STADIUM.to_string(),
            team_id: DEFAULT_TEAM_ID,
            first_season: 2000,
            last_season: 2024,
            season_template: DEFAULT_SEASON_TEMPLATE.to_string(),
            stadium_teams: DEFAULT_STADIUM_TEAMS.to_string(),
            stadium_locations: DEFAULT_STADIUM_LOCATIONS.to_string(),
            leagues: vec!["bl1".to_string(), "bl2".to_string()],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparsable values keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        let leagues = lookup("CLUBLEDGER_LEAGUES")
            .map(|v| {
                v.split(',')
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|l| !l.is_empty())
            .unwrap_or(defaults.leagues);

        Self {
            data_root: text("CLUBLEDGER_DATA_ROOT", defaults.data_root),
            team_name: text("CLUBLEDGER_TEAM", defaults.team_name),
            home_stadium: text("CLUBLEDGER_HOME_STADIUM", defaults.home_stadium),
            team_id: number(&lookup, "CLUBLEDGER_TEAM_ID", defaults.team_id),
            first_season: number(&lookup, "CLUBLEDGER_FIRST_SEASON", defaults.first_season),
            last_season: number(&lookup, "CLUBLEDGER_LAST_SEASON", defaults.last_season),
            season_template: text("CLUBLEDGER_SEASON_TEMPLATE", defaults.season_template),
            stadium_teams: text("CLUBLEDGER_STADIUM_TEAMS", defaults.stadium_teams),
            stadium_locations: text("CLUBLEDGER_STADIUM_LOCATIONS", defaults.stadium_locations),
            leagues,
        }
    }

    pub fn club(&self) -> Club {
        Club::new(&self.team_name, &self.home_stadium)
    }

    pub fn is_remote(&self) -> bool {
        self.data_root.starts_with("http://") || self.data_root.starts_with("https://")
    }

    pub fn season_resource(&self, season: i32) -> String {
        self.season_template.replace("{season}", &season.to_string())
    }
}

/// Parses `key` into the target type; values that do not fit keep `fallback`.
fn number<T, F>(lookup: &F, key: &str, fallback: T) -> T
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            tracing::warn!("Ignoring {}: {}", key, e);
            fallback
        }
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.season_resource(2019), "partidos_koln/koln_2019.json");
        assert!(!config.is_remote());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CLUBLEDGER_DATA_ROOT", "https://example.org/ledger/"),
            ("CLUBLEDGER_TEAM", "Hamburger SV"),
            ("CLUBLEDGER_FIRST_SEASON", "2010"),
            ("CLUBLEDGER_LAST_SEASON", "twenty"),
            ("CLUBLEDGER_LEAGUES", "bl2, bl1 ,"),
            ("CLUBLEDGER_SEASON_TEMPLATE", "seasons/{season}.json"),
        ]);
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert!(config.is_remote());
        assert_eq!(config.club().name, "Hamburger SV");
        assert_eq!(config.club().home_stadium, DEFAULT_HOME_STADIUM);
        assert_eq!(config.first_season, 2010);
        assert_eq!(config.last_season, 2024);
        assert_eq!(config.leagues, vec!["bl2", "bl1"]);
        assert_eq!(config.season_resource(2011), "seasons/2011.json");
    }

    #[test]
    fn test_out_of_range_numbers_keep_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CLUBLEDGER_FIRST_SEASON", "4294969296"),
            ("CLUBLEDGER_LAST_SEASON", "-9999999999"),
            ("CLUBLEDGER_TEAM_ID", "-65"),
        ]);
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.first_season, 2000);
        assert_eq!(config.last_season, 2024);
        assert_eq!(config.team_id, DEFAULT_TEAM_ID);
    }
}
