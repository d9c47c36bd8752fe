use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use clubledger::config::AppConfig;
use clubledger::models::{
    AggregateResult, Archive, FilterSpec, LocationFilter, Match, MatchRow, OutcomeFilter,
};
use clubledger::services::{
    aggregate, filter_matches, head_to_head, load_archive, openligadb, rivals, stadium_map,
    OpenLigaClient,
};
use clubledger::utils::{
    match_rows, season_label, seasons_newest_first, sorted_by_date_asc, sorted_by_date_desc,
    suggest_names, write_rows, ExportFormat,
};

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// First season (inclusive); defaults to the oldest loaded season
    #[arg(long)]
    pub from: Option<i32>,
    /// Last season (inclusive); defaults to the newest loaded season
    #[arg(long)]
    pub to: Option<i32>,
    /// Only matches against this rival
    #[arg(long)]
    pub rival: Option<String>,
    /// any, home or away
    #[arg(long, default_value = "any")]
    pub location: LocationFilter,
    /// any, win, draw or loss
    #[arg(long, default_value = "any")]
    pub outcome: OutcomeFilter,
}

impl FilterArgs {
    fn to_spec(&self, archive: &Archive) -> FilterSpec {
        let full = FilterSpec::unrestricted(&archive.dataset);
        FilterSpec {
            season_from: self.from.unwrap_or(full.season_from),
            season_to: self.to.unwrap_or(full.season_to),
            rival: self.rival.clone(),
            location: self.location,
            outcome: self.outcome,
        }
    }
}

pub async fn open_archive(config: &AppConfig) -> Result<Archive> {
    load_archive(config).await.with_context(|| {
        format!(
            "could not load match data from {}; check that the season files and stadium tables exist",
            config.data_root
        )
    })
}

pub fn show_seasons(archive: &Archive) -> Result<()> {
    let seasons = seasons_newest_first(&archive.dataset);
    if seasons.is_empty() {
        println!("📭 No seasons loaded. Try: clubledger sync");
        return Ok(());
    }

    println!("📅 Seasons for {}:\n", archive.club.name);
    for season in seasons {
        let matches = archive.dataset.get(season).unwrap_or_default();
        let summary = aggregate(matches, &archive.club);
        println!(
            "   • {}  {} played, {}W {}D {}L, goals {}:{}",
            season_label(season),
            summary.played,
            summary.won,
            summary.drawn,
            summary.lost,
            summary.goals_for,
            summary.goals_against
        );
    }
    Ok(())
}

pub fn show_season(archive: &Archive, season: i32, with_goals: bool) -> Result<()> {
    let matches = filter_matches(&archive.dataset, &archive.club, &FilterSpec::season(season));
    println!("⚽ {} in {}\n", archive.club.name, season_label(season));

    if matches.is_empty() {
        println!("📭 No matches recorded for this season.");
        return Ok(());
    }

    print_summary(&aggregate(matches.iter().copied(), &archive.club), None);
    let ordered = sorted_by_date_asc(&matches);
    print_table(&match_rows(&ordered, archive));
    if with_goals {
        print_goals(&ordered);
    }
    Ok(())
}

pub fn show_rival(archive: &Archive, rival: &str) -> Result<()> {
    let known = rivals(&archive.dataset, &archive.club);
    if !known.iter().any(|r| r == rival) {
        println!("❌ No matches found against '{}'", rival);
        let hints = suggest_names(rival, &known, 3);
        if !hints.is_empty() {
            println!("\n💡 Did you mean:");
            for hint in hints {
                println!("   • {}", hint);
            }
        }
        return Ok(());
    }

    let matches = head_to_head(&archive.dataset, &archive.club, rival);
    println!("🤝 {} vs {}\n", archive.club.name, rival);
    print_summary(&aggregate(matches.iter().copied(), &archive.club), Some(&archive.club.name));
    print_table(&match_rows(&sorted_by_date_desc(&matches), archive));
    Ok(())
}

pub fn show_rivals(archive: &Archive) -> Result<()> {
    let names = rivals(&archive.dataset, &archive.club);
    println!("📋 {} opponents:\n", names.len());
    for name in names {
        println!("   • {}", name);
    }
    Ok(())
}

pub fn show_stadiums(archive: &Archive, season: i32) -> Result<()> {
    let matches = filter_matches(&archive.dataset, &archive.club, &FilterSpec::season(season));
    let view = stadium_map(&matches, archive);

    println!("🗺️  Stadiums in {}\n", season_label(season));
    for marker in &view.markers {
        let title = if marker.is_home { "home" } else { "away" };
        let owner = marker
            .opponent
            .as_deref()
            .map(|o| format!(" ({})", o))
            .unwrap_or_default();
        println!(
            "   📍 {}{} [{:.4}, {:.4}] {}: {} played, {}W {}D {}L",
            marker.stadium,
            owner,
            marker.coordinates.lat,
            marker.coordinates.lon,
            title,
            marker.summary.played,
            marker.summary.won,
            marker.summary.drawn,
            marker.summary.lost
        );
    }

    if !view.missing_coordinates.is_empty() {
        println!("\n⚠️  No coordinates for (add them to the stadium locations table):");
        for stadium in &view.missing_coordinates {
            println!("   • {}", stadium);
        }
    }
    if !view.unresolved.is_empty() {
        println!("\n⚠️  Stadium unknown for:");
        for fixture in &view.unresolved {
            println!("   • {}", fixture);
        }
    }
    Ok(())
}

pub fn show_filtered(archive: &Archive, args: &FilterArgs) -> Result<()> {
    let spec = args.to_spec(archive);
    let matches = filter_matches(&archive.dataset, &archive.club, &spec);

    println!(
        "🔍 {}-{} rival: {} location: {:?} outcome: {:?}\n",
        spec.season_from,
        spec.season_to,
        spec.rival.as_deref().unwrap_or("any"),
        spec.location,
        spec.outcome
    );
    if matches.is_empty() {
        println!("📭 No matches fit these filters.");
        return Ok(());
    }

    print_summary(&aggregate(matches.iter().copied(), &archive.club), None);
    print_table(&match_rows(&sorted_by_date_asc(&matches), archive));
    Ok(())
}

pub fn export(
    archive: &Archive,
    args: &FilterArgs,
    format: ExportFormat,
    output: &Path,
) -> Result<()> {
    let spec = args.to_spec(archive);
    let matches = filter_matches(&archive.dataset, &archive.club, &spec);
    let rows = match_rows(&matches, archive);
    let summary = aggregate(matches.iter().copied(), &archive.club);

    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    write_rows(&rows, &summary, &spec, format, BufWriter::new(file))
        .with_context(|| format!("writing {}", output.display()))?;

    println!("✅ Exported {} matches to {}", rows.len(), output.display());
    Ok(())
}

pub async fn sync(config: &AppConfig, from: Option<i32>, to: Option<i32>) -> Result<()> {
    let from = from.unwrap_or(config.first_season);
    let to = to.unwrap_or(config.last_season);
    println!("📥 Downloading seasons {}-{} for team {}…", from, to, config.team_id);

    let client = OpenLigaClient::new();
    let summary = openligadb::sync_seasons(&client, config, from, to).await?;

    for (season, league, count) in &summary.saved {
        println!("   ✅ {} ({}): {} matches", season_label(*season), league, count);
    }
    for season in &summary.empty {
        println!("   ➖ {}: no matches found", season_label(*season));
    }
    Ok(())
}

fn print_summary(summary: &AggregateResult, side: Option<&str>) {
    let suffix = side.map(|s| format!(" ({})", s)).unwrap_or_default();
    println!("📊 Played: {}", summary.played);
    println!("   Won{}: {}", suffix, summary.won);
    println!("   Drawn: {}", summary.drawn);
    println!("   Lost{}: {}", suffix, summary.lost);
    println!(
        "   Goals: {} for, {} against ({:+})\n",
        summary.goals_for,
        summary.goals_against,
        summary.goal_difference()
    );
}

fn print_table(rows: &[MatchRow]) {
    for row in rows {
        let mark = row.outcome.map(|o| o.letter()).unwrap_or('-');
        println!(
            "   {} {} | {:<28} {:>7}  {:<28} | {}",
            mark, row.date, row.home_team, row.score, row.away_team, row.stadium
        );
    }
}

fn print_goals(matches: &[&Match]) {
    println!("\n🥅 Goals:");
    for m in matches {
        if m.goals.is_empty() {
            continue;
        }
        println!("   {} vs {}", m.home_team_name, m.away_team_name);
        for goal in &m.goals {
            let minute = goal.minute.map(|x| format!("{}'", x)).unwrap_or_default();
            println!(
                "     - {} {} ({}-{})",
                goal.scorer.as_deref().unwrap_or("unknown"),
                minute,
                goal.score_home,
                goal.score_away
            );
        }
    }
}
