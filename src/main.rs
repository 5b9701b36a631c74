use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use katameros::celebrations::CelebrationTable;
use katameros::context::LiturgicalContext;
use katameros::corpus::{Bible, Corpus};
use katameros::lectionary::{self, LectionaryTable};
use katameros::resolver::{self, ResolvedReading};
use katameros::synaxarium::SynaxariumTable;
use katameros::{coptic::CopticDate, feasts, seasons, MissingVerseError};

mod cli;

use cli::{Cli, Commands};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadingView {
    reference: String,
    text: String,
    #[serde(flatten)]
    reading: ResolvedReading,
}

impl From<ResolvedReading> for ReadingView {
    fn from(reading: ResolvedReading) -> Self {
        Self {
            reference: reading.reference(),
            text: reading.text(),
            reading,
        }
    }
}

/// Output of `resolve`: the readings that resolved and those that did not.
#[derive(Serialize)]
struct ResolveView {
    readings: Vec<ReadingView>,
    gaps: Vec<MissingVerseError>,
}

impl ResolveView {
    fn new(reference: &str, corpus: &impl Corpus) -> Self {
        let mut view = Self {
            readings: Vec::new(),
            gaps: Vec::new(),
        };
        for result in resolver::resolve_all(reference, corpus) {
            match result {
                Ok(reading) => view.readings.push(ReadingView::from(reading)),
                Err(gap) => view.gaps.push(gap),
            }
        }
        view
    }

    fn is_empty(&self) -> bool {
        self.readings.is_empty() && self.gaps.is_empty()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn required(path: Option<PathBuf>, what: &str, env: &str) -> Result<PathBuf> {
    path.with_context(|| format!("no {what} given; pass --{} or set {env}", what.replace(' ', "-")))
}

fn load_bible(path: Option<PathBuf>) -> Result<Bible> {
    let path = required(path, "bible", "KATAMEROS_BIBLE")?;
    Bible::open(&path).with_context(|| format!("loading bible from {}", path.display()))
}

fn load_celebrations(path: Option<PathBuf>) -> Result<Option<CelebrationTable>> {
    path.map(|path| {
        CelebrationTable::open(&path)
            .with_context(|| format!("loading celebrations from {}", path.display()))
    })
    .transpose()
}

fn load_synaxarium(path: Option<PathBuf>) -> Result<Option<SynaxariumTable>> {
    path.map(|path| {
        SynaxariumTable::open(&path)
            .with_context(|| format!("loading synaxarium from {}", path.display()))
    })
    .transpose()
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Coptic { date } => print_json(&CopticDate::from_date(date)),
        Commands::Easter { year } => print_json(&feasts::easter(year)?),
        Commands::Feasts { year } => print_json(&feasts::moveable_feasts(year)?),
        Commands::Seasons { year, fasting } => {
            let periods = if fasting {
                seasons::fasting_periods(year)?
            } else {
                seasons::seasons(year)?
            };
            print_json(&periods)
        }
        Commands::FastingCalendar { year } => print_json(&seasons::fasting_calendar(year)?),
        Commands::Context { date, text } => {
            let table = load_celebrations(cli.celebrations)?;
            let mut ctx = LiturgicalContext::for_date(date, table.as_ref())?;
            if let Some(synaxarium) = load_synaxarium(cli.synaxarium)? {
                ctx = ctx.with_synaxarium(&synaxarium, text);
            }
            print_json(&ctx)
        }
        Commands::Upcoming { date, days } => {
            let table = load_celebrations(cli.celebrations)?.unwrap_or_default();
            print_json(&table.upcoming(date, days)?)
        }
        Commands::Synaxarium { date, search, limit, text } => {
            let path = required(cli.synaxarium, "synaxarium", "KATAMEROS_SYNAXARIUM")?;
            let table = SynaxariumTable::open(&path)
                .with_context(|| format!("loading synaxarium from {}", path.display()))?;
            match (date, search) {
                (_, Some(term)) => print_json(&table.search(&term, limit)),
                (Some(date), None) => {
                    print_json(&table.for_date(&CopticDate::from_date(date), text))
                }
                (None, None) => anyhow::bail!("either a date or --search is required"),
            }
        }
        Commands::Readings { date, key } => {
            let day_readings =
                required(cli.day_readings, "day readings", "KATAMEROS_DAY_READINGS")?;
            let unique_readings =
                required(cli.unique_readings, "unique readings", "KATAMEROS_UNIQUE_READINGS")?;
            let table = LectionaryTable::open(&day_readings, &unique_readings)
                .context("loading lectionary")?;
            let bible = load_bible(cli.bible)?;
            let set = match (date, key) {
                (_, Some(key)) => lectionary::readings_for_key(&key, &table, &bible),
                (Some(date), None) => {
                    lectionary::readings_for(&CopticDate::from_date(date), &table, &bible)
                }
                (None, None) => anyhow::bail!("either a date or --key is required"),
            };
            if !set.is_complete() {
                info!(gaps = set.gaps.len(), "some readings could not be resolved");
            }
            print_json(&set)
        }
        Commands::Resolve { reference } => {
            let bible = load_bible(cli.bible)?;
            let view = ResolveView::new(&reference, &bible);
            if view.is_empty() {
                anyhow::bail!("`{reference}` is not a scripture reference");
            }
            if !view.gaps.is_empty() {
                info!(gaps = view.gaps.len(), "some references could not be resolved");
            }
            print_json(&view)
        }
    }
}
