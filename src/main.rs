// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use power_rankings::{logging, Config, League, RankedTeam};

fn usage() -> ! {
    eprintln!("Usage: power-rankings [table|json|tui] <league-dir>");
    eprintln!("   <league-dir> defaults to $POWER_RANKINGS_DATA_DIR/<id> when given a bare id");
    std::process::exit(2);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Table,
    Json,
    Tui,
}

impl Mode {
    fn parse(arg: &str) -> Option<Mode> {
        match arg {
            "table" => Some(Mode::Table),
            "json" => Some(Mode::Json),
            "tui" => Some(Mode::Tui),
            _ => None,
        }
    }
}

/// `[mode] <league>`; None means print usage before touching any files
fn parse_args(args: &[String]) -> Option<(Mode, &str)> {
    match args {
        [_, target] => Some((Mode::Tui, target.as_str())),
        [_, mode, target] => Some((Mode::parse(mode)?, target.as_str())),
        _ => None,
    }
}

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter);

    let args: Vec<String> = env::args().collect();
    let (mode, target) = parse_args(&args).unwrap_or_else(|| usage());

    let dir = resolve_league_dir(&config, target);
    let sources = config.load_league(&dir)?;
    let league = League::rank(&sources);
    info!("{}", league.summary());

    match mode {
        Mode::Table => run_table(&league),
        Mode::Json => run_json(&league)?,
        Mode::Tui => run_ui_mode(league)?,
    }

    Ok(())
}

/// A path that exists is used as-is, anything else is treated as a league id
fn resolve_league_dir(config: &Config, target: &str) -> PathBuf {
    let path = Path::new(target);
    if path.is_dir() {
        path.to_path_buf()
    } else {
        config.league_dir(target)
    }
}

fn run_table(league: &League) {
    println!("🏈 {}", league.display_name());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{:>4}  {:<30} {:<8} {:>7} {:>6} {:>4} {:>4} {:>5}",
        "#", "Team", "Record", "Score", "Rec", "Pts", "ECR", "Δ"
    );

    for team in &league.rankings {
        println!("{}", table_row(team));
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", league.quality().summary());
}

fn table_row(team: &RankedTeam) -> String {
    let dash = || "-".to_string();
    format!(
        "{:>4}  {:<30} {:<8} {:>7} {:>6} {:>4} {:>4} {:>5}",
        team.rank,
        team.name,
        team.record.clone().unwrap_or_else(dash),
        team.score.map(|s| format!("{:.2}", s)).unwrap_or_else(dash),
        team.record_score.map(|s| format!("{:.2}", s)).unwrap_or_else(dash),
        team.points_score.map(|s| s.to_string()).unwrap_or_else(dash),
        team.ecr_score.map(|s| s.to_string()).unwrap_or_else(dash),
        team.change.map(|c| c.as_text()).unwrap_or_else(dash),
    )
}

fn run_json(league: &League) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(league)?);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(league: League) -> Result<()> {
    let mut app = ui::App::new(league);
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_league: League) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: power-rankings table <league-dir>");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_modes() {
        let a = args(&["power-rankings", "table", "fixtures/league"]);
        assert_eq!(parse_args(&a), Some((Mode::Table, "fixtures/league")));

        let a = args(&["power-rankings", "888433"]);
        assert_eq!(parse_args(&a), Some((Mode::Tui, "888433")));
    }

    #[test]
    fn test_parse_args_rejects_unknown_mode() {
        assert_eq!(parse_args(&args(&["power-rankings", "bogus", "fixtures/league"])), None);
        assert_eq!(parse_args(&args(&["power-rankings"])), None);
    }
}
