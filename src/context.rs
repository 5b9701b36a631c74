//! Everything the calendar knows about a single day.

use serde::Serialize;

use crate::celebrations::{Celebration, CelebrationTable};
use crate::coptic::CopticDate;
use crate::date::Date;
use crate::error::CalendarError;
use crate::feasts::{self, MoveableFeast};
use crate::seasons::{self, FastingLevel, Period};
use crate::synaxarium::{SynaxariumEntry, SynaxariumTable};

/// Liturgical summary of a day.
///
/// # Example
///
/// ```
/// use katameros::Date;
/// use katameros::context::LiturgicalContext;
/// use katameros::seasons::{FastingLevel, Season};
///
/// let date = Date::from_gregorian(2025, 4, 18).unwrap();
/// let ctx = LiturgicalContext::for_date(date, None).unwrap();
///
/// assert_eq!("Good Friday", ctx.moveable_feasts[0].name());
/// assert_eq!(Some(Season::HolyWeek), ctx.season.map(|p| p.season));
/// assert_eq!(FastingLevel::Complete, ctx.fasting_level);
/// assert!(ctx.is_fasting);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiturgicalContext {
    pub date: Date,
    pub coptic_date: CopticDate,
    /// ISO day of week, 1 = Monday.
    pub day_of_week: i32,
    pub season: Option<Period>,
    pub moveable_feasts: Vec<MoveableFeast>,
    pub celebrations: Vec<Celebration>,
    pub is_fasting: bool,
    pub fasting_level: FastingLevel,
    /// Filled in by [`LiturgicalContext::with_synaxarium`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synaxarium: Vec<SynaxariumEntry>,
}

impl LiturgicalContext {
    /// Gathers the context of `date`. Fixed celebrations are only included
    /// when a table is given.
    pub fn for_date(
        date: Date,
        celebrations: Option<&CelebrationTable>,
    ) -> Result<Self, CalendarError> {
        let celebrations: Vec<Celebration> = celebrations
            .map(|table| table.on(date).to_vec())
            .unwrap_or_default();
        let mut fasting_level = seasons::fasting_level(date)?;
        if fasting_level == FastingLevel::None && celebrations.iter().any(Celebration::is_fast) {
            fasting_level = FastingLevel::Regular;
        }
        Ok(Self {
            date,
            coptic_date: CopticDate::from_date(date),
            day_of_week: date.day_of_week(),
            season: seasons::season_for(date)?,
            moveable_feasts: feasts::feasts_on(date)?,
            celebrations,
            is_fasting: fasting_level != FastingLevel::None,
            fasting_level,
            synaxarium: Vec::new(),
        })
    }

    /// Adds the commemorations of the day, with their text if
    /// `include_text`.
    pub fn with_synaxarium(mut self, table: &SynaxariumTable, include_text: bool) -> Self {
        self.synaxarium = table.for_date(&self.coptic_date, include_text);
        self
    }
}
