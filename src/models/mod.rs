use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw stadium value that carries no information.
pub const UNKNOWN_STADIUM: &str = "unknown";

/// The reference team: every "for/against" and "home/away" is seen from its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    pub home_stadium: String,
}

impl Club {
    pub fn new(name: impl Into<String>, home_stadium: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home_stadium: home_stadium.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    Final,
    FinalLegacy,
    HalfTime,
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub kind: ResultKind,
    pub score_home: u32,
    pub score_away: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub scorer: Option<String>,
    pub minute: Option<u32>,
    pub score_home: u32,
    pub score_away: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub date_time: NaiveDateTime,
    pub season: i32,
    pub home_team_name: String,
    pub away_team_name: String,
    pub stadium_name_raw: Option<String>, // may be empty or "unknown"
    pub matchday_label: String,
    pub results: Vec<ResultEntry>,
    pub goals: Vec<Goal>,
}

impl Match {
    /// The reference team is the home-listed side.
    pub fn is_home_for(&self, club: &Club) -> bool {
        self.home_team_name == club.name
    }

    /// The other participant, provided exactly one side is the reference team.
    pub fn opponent(&self, club: &Club) -> Option<&str> {
        let home = self.home_team_name == club.name;
        let away = self.away_team_name == club.name;
        match (home, away) {
            (true, false) => Some(&self.away_team_name),
            (false, true) => Some(&self.home_team_name),
            _ => None,
        }
    }

    pub fn venue(&self, club: &Club) -> Venue {
        if self.is_home_for(club) {
            Venue::Home
        } else {
            Venue::Away
        }
    }
}

/// Full-time score as listed in the record (home-listed side first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub home: u32,
    pub away: u32,
}

impl FinalScore {
    /// `(reference goals, opponent goals)`.
    pub fn for_reference(&self, reference_home: bool) -> (u32, u32) {
        if reference_home {
            (self.home, self.away)
        } else {
            (self.away, self.home)
        }
    }
}

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.home, self.away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn letter(&self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Win => "win",
            Outcome::Draw => "draw",
            Outcome::Loss => "loss",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationFilter {
    #[default]
    Any,
    Home,
    Away,
}

impl LocationFilter {
    pub fn admits(&self, venue: Venue) -> bool {
        match self {
            LocationFilter::Any => true,
            LocationFilter::Home => venue == Venue::Home,
            LocationFilter::Away => venue == Venue::Away,
        }
    }
}

impl FromStr for LocationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "all" => Ok(LocationFilter::Any),
            "home" => Ok(LocationFilter::Home),
            "away" => Ok(LocationFilter::Away),
            other => Err(format!("unknown location '{}', use any, home or away", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeFilter {
    #[default]
    Any,
    Win,
    Draw,
    Loss,
}

impl OutcomeFilter {
    /// The outcome a match must have, or `None` when any match passes.
    pub fn required(&self) -> Option<Outcome> {
        match self {
            OutcomeFilter::Any => None,
            OutcomeFilter::Win => Some(Outcome::Win),
            OutcomeFilter::Draw => Some(Outcome::Draw),
            OutcomeFilter::Loss => Some(Outcome::Loss),
        }
    }
}

impl FromStr for OutcomeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "all" => Ok(OutcomeFilter::Any),
            "win" | "w" => Ok(OutcomeFilter::Win),
            "draw" | "d" => Ok(OutcomeFilter::Draw),
            "loss" | "l" => Ok(OutcomeFilter::Loss),
            other => Err(format!("unknown outcome '{}', use any, win, draw or loss", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub season_from: i32,
    pub season_to: i32,
    pub rival: Option<String>,
    pub location: LocationFilter,
    pub outcome: OutcomeFilter,
}

impl FilterSpec {
    /// Inclusive season range with every other criterion open.
    pub fn seasons(season_from: i32, season_to: i32) -> Self {
        Self {
            season_from,
            season_to,
            rival: None,
            location: LocationFilter::Any,
            outcome: OutcomeFilter::Any,
        }
    }

    pub fn season(season: i32) -> Self {
        Self::seasons(season, season)
    }

    /// Covers every season present in the dataset.
    pub fn unrestricted(dataset: &SeasonDataset) -> Self {
        match (dataset.first_season(), dataset.last_season()) {
            (Some(first), Some(last)) => Self::seasons(first, last),
            _ => Self::seasons(0, -1),
        }
    }

    pub fn with_rival(mut self, rival: impl Into<String>) -> Self {
        self.rival = Some(rival.into());
        self
    }

    pub fn at(mut self, location: LocationFilter) -> Self {
        self.location = location;
        self
    }

    pub fn with_outcome(mut self, outcome: OutcomeFilter) -> Self {
        self.outcome = outcome;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u64,
    pub goals_against: u64,
}

impl AggregateResult {
    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Season year -> matches in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonDataset {
    seasons: BTreeMap<i32, Vec<Match>>,
}

impl SeasonDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty seasons are not stored.
    pub fn insert(&mut self, season: i32, matches: Vec<Match>) {
        if matches.is_empty() {
            return;
        }
        self.seasons.insert(season, matches);
    }

    pub fn get(&self, season: i32) -> Option<&[Match]> {
        self.seasons.get(&season).map(Vec::as_slice)
    }

    /// Seasons in `[from, to]`, ascending. Empty when `from > to`.
    pub fn range(&self, from: i32, to: i32) -> impl Iterator<Item = (i32, &[Match])> {
        let bounds = if from <= to { Some(from..=to) } else { None };
        bounds
            .into_iter()
            .flat_map(move |r| self.seasons.range(r))
            .map(|(season, matches)| (*season, matches.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[Match])> {
        self.seasons
            .iter()
            .map(|(season, matches)| (*season, matches.as_slice()))
    }

    pub fn first_season(&self) -> Option<i32> {
        self.seasons.keys().next().copied()
    }

    pub fn last_season(&self) -> Option<i32> {
        self.seasons.keys().next_back().copied()
    }

    pub fn season_count(&self) -> usize {
        self.seasons.len()
    }

    pub fn match_count(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }
}

impl FromIterator<(i32, Vec<Match>)> for SeasonDataset {
    fn from_iter<T: IntoIterator<Item = (i32, Vec<Match>)>>(iter: T) -> Self {
        let mut dataset = SeasonDataset::new();
        for (season, matches) in iter {
            dataset.insert(season, matches);
        }
        dataset
    }
}

/// Stadium name -> coordinates. Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StadiumDirectory(pub BTreeMap<String, Coordinates>);

/// Stadium name -> the team whose home ground it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StadiumToOpponentMap(pub BTreeMap<String, String>);

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for StadiumToOpponentMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<S: Into<String>> FromIterator<(S, Coordinates)> for StadiumDirectory {
    fn from_iter<I: IntoIterator<Item = (S, Coordinates)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Everything loaded at startup. Read-only afterwards.
#[derive(Debug, Clone)]
pub struct Archive {
    pub club: Club,
    pub dataset: SeasonDataset,
    pub directory: StadiumDirectory,
    pub stadium_teams: StadiumToOpponentMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub season: i32,
    pub date: String,
    pub matchday: String,
    pub home_team: String,
    pub away_team: String,
    pub score: String,
    pub stadium: String,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StadiumMarker {
    pub stadium: String,
    pub coordinates: Coordinates,
    pub is_home: bool,
    pub opponent: Option<String>,
    pub summary: AggregateResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapView {
    pub markers: Vec<StadiumMarker>,
    /// Resolved stadiums with no directory entry.
    pub missing_coordinates: Vec<String>,
    /// Matches whose stadium could not be resolved, as "home vs away".
    pub unresolved: Vec<String>,
}
