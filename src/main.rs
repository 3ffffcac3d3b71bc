//! # Moon Phase Diary Entry Point
//!
//! Prints the Moon's phase and the Sun and Moon rise/set times for a run of
//! days at the configured location, either as a terminal table or as JSON.
//!
//! ```text
//! moon-phase-diary [--date YYYY-MM-DD] [--days N] [--config PATH] [--json]
//! ```

use anyhow::{bail, Context};
use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use log::debug;
use moon_phase_lib::config::Config;
use moon_phase_lib::renderer::{draw_ascii, render_position};
use moon_phase_lib::{compute_daily_almanac, position_at, Body, DailyPhaseReport};
use std::env;
use std::path::PathBuf;

const USAGE: &str =
    "usage: moon-phase-diary [--date YYYY-MM-DD] [--days N] [--config PATH] [--json]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    date: Option<NaiveDate>,
    days: Option<u32>,
    config: Option<PathBuf>,
    json: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--date" => {
                let value = args.next().context("--date needs a value")?;
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .with_context(|| format!("invalid --date {:?}, expected YYYY-MM-DD", value))?;
                parsed.date = Some(date);
            }
            "--days" => {
                let value = args.next().context("--days needs a value")?;
                let days: u32 = value
                    .parse()
                    .with_context(|| format!("invalid --days {:?}", value))?;
                if days == 0 {
                    bail!("--days must be at least 1");
                }
                parsed.days = Some(days);
            }
            "--config" => {
                let value = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--json" => parsed.json = true,
            other => bail!("unknown argument {:?}\n{}", other, USAGE),
        }
    }

    Ok(parsed)
}

/// Midnight at the start of `date` in `offset`.
fn local_midnight(date: NaiveDate, offset: FixedOffset) -> anyhow::Result<DateTime<FixedOffset>> {
    offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .with_context(|| format!("no local midnight for {}", date))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args(env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => Config::try_load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load(),
    };
    let observer = config.observer().context("invalid observer in configuration")?;
    let offset = config.utc_offset().context("invalid UTC offset in configuration")?;

    let now = Utc::now().with_timezone(&offset);
    let today = now.date_naive();
    let start = args.date.unwrap_or(today);
    let days = args.days.unwrap_or(config.report.days);
    debug!("Reporting {} day(s) from {} at UTC{}", days, start, offset);

    let mut almanacs = Vec::with_capacity(days as usize);
    for i in 0..days {
        let date = start
            .checked_add_days(Days::new(u64::from(i)))
            .context("date out of range")?;
        let instant = local_midnight(date, offset)?;
        almanacs.push(compute_daily_almanac(&instant, &observer));
    }

    if args.json {
        let reports: Vec<DailyPhaseReport> = almanacs.iter().map(|a| a.to_report()).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let title = format!(
        "{} ({:.2}°, {:.2}°, UTC{})",
        config.observer.name,
        observer.latitude(),
        observer.longitude(),
        offset
    );
    draw_ascii(&title, &almanacs, config.report.show_transits);

    if almanacs.iter().any(|almanac| almanac.date == today) {
        println!();
        println!("Now {}", now.format("%-m/%-d %H:%M"));
        println!("{}", render_position("Sun", &position_at(Body::Sun, &now, &observer)));
        println!("{}", render_position("Moon", &position_at(Body::Moon, &now, &observer)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse_args(args(&[])).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_all_arguments() {
        let parsed = parse_args(args(&[
            "--date",
            "2024-01-01",
            "--days",
            "3",
            "--config",
            "/tmp/almanac.toml",
            "--json",
        ]))
        .unwrap();

        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(parsed.days, Some(3));
        assert_eq!(parsed.config, Some(PathBuf::from("/tmp/almanac.toml")));
        assert!(parsed.json);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(args(&["--date", "2024-13-01"])).is_err());
        assert!(parse_args(args(&["--date"])).is_err());
        assert!(parse_args(args(&["--days", "0"])).is_err());
        assert!(parse_args(args(&["--days", "many"])).is_err());
        assert!(parse_args(args(&["--stdout"])).is_err());
    }

    #[test]
    fn test_local_midnight() {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let midnight = local_midnight(date, jst).unwrap();

        assert_eq!(midnight.date_naive(), date);
        assert_eq!(midnight.naive_utc().to_string(), "2023-12-31 15:00:00");
    }
}
