use clap::{Parser, Subcommand};
use katameros::Date;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "katameros")]
#[command(author, version, about = "Coptic calendar, feasts, fasts and daily readings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Bible JSON used to resolve readings
    #[arg(long, global = true, env = "KATAMEROS_BIBLE")]
    pub bible: Option<PathBuf>,

    /// Reading ids of every Coptic day
    #[arg(long, global = true, env = "KATAMEROS_DAY_READINGS")]
    pub day_readings: Option<PathBuf>,

    /// References behind every reading id
    #[arg(long, global = true, env = "KATAMEROS_UNIQUE_READINGS")]
    pub unique_readings: Option<PathBuf>,

    /// Fixed celebrations keyed by Gregorian month and day
    #[arg(long, global = true, env = "KATAMEROS_CELEBRATIONS")]
    pub celebrations: Option<PathBuf>,

    /// Synaxarium commemorations keyed by Coptic day ("6 Toba")
    #[arg(long, global = true, env = "KATAMEROS_SYNAXARIUM")]
    pub synaxarium: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a Gregorian date (YYYY-MM-DD) to the Coptic calendar
    Coptic { date: Date },

    /// Date of Easter
    Easter { year: i32 },

    /// Moveable feasts and fasts of a year
    Feasts { year: i32 },

    /// Liturgical seasons beginning in a year
    Seasons {
        year: i32,

        /// Only list fasting periods
        #[arg(long)]
        fasting: bool,
    },

    /// Every fasting day of a Gregorian year
    FastingCalendar { year: i32 },

    /// Season, feasts and fasting of a day
    Context {
        date: Date,

        /// Include the full Synaxarium text (needs --synaxarium)
        #[arg(long)]
        text: bool,
    },

    /// Feasts and celebrations in the days starting at a date
    Upcoming {
        date: Date,

        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Synaxarium of a day, or a search over the commemorated names
    Synaxarium {
        #[arg(required_unless_present = "search")]
        date: Option<Date>,

        /// Case-insensitive part of a name
        #[arg(long, conflicts_with = "date")]
        search: Option<String>,

        /// Maximum number of search results
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Include the full text of each entry
        #[arg(long)]
        text: bool,
    },

    /// Resolved readings of a day
    Readings {
        /// Gregorian date (YYYY-MM-DD)
        #[arg(required_unless_present = "key")]
        date: Option<Date>,

        /// Coptic day key instead of a date, e.g. "Day 134" or "6 Toba"
        #[arg(long, conflicts_with = "date")]
        key: Option<String>,
    },

    /// Resolve a scripture reference, e.g. "Psalms 119:96-97;John 3:16"
    Resolve { reference: String },
}
