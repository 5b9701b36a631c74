//! Liturgical seasons and fasting periods.
//!
//! Most periods hang off the moveable feasts of [`crate::feasts`]; the
//! Nativity Fast is fixed on the Gregorian calendar and runs into the next
//! year.

use serde::Serialize;

use crate::coptic::CopticDate;
use crate::date::Date;
use crate::error::CalendarError;
use crate::feasts::{self, Feast};

/// Named seasons. Everything but the Paschal Season is a fast.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum Season {
    FastOfNineveh,
    GreatLent,
    HolyWeek,
    PaschalSeason,
    ApostlesFast,
    NativityFast,
}

impl Season {
    pub fn name(&self) -> &'static str {
        match self {
            Season::FastOfNineveh => "Fast of Nineveh",
            Season::GreatLent => "Great Lent",
            Season::HolyWeek => "Holy Week",
            Season::PaschalSeason => "Paschal Season",
            Season::ApostlesFast => "Apostles' Fast",
            Season::NativityFast => "Nativity Fast",
        }
    }
    pub fn is_fasting(&self) -> bool {
        !matches!(self, Season::PaschalSeason)
    }
    /// Lower wins when periods overlap.
    fn priority(&self) -> u8 {
        match self {
            Season::HolyWeek => 1,
            Season::GreatLent => 2,
            Season::FastOfNineveh => 3,
            Season::ApostlesFast => 4,
            Season::NativityFast => 5,
            Season::PaschalSeason => 6,
        }
    }
}

/// Where the bounds of a period come from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    Moveable,
    Fixed,
}

/// A season with inclusive bounds, `start <= end`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Period {
    pub season: Season,
    pub start: Date,
    pub end: Date,
    pub source: Source,
}

impl Period {
    fn new(season: Season, start: Date, end: Date, source: Source) -> Self {
        debug_assert!(start <= end, "{} {start}..={end}", season.name());
        Self {
            season,
            start,
            end,
            source,
        }
    }
    pub fn name(&self) -> &'static str {
        self.season.name()
    }
    pub fn contains(&self, date: Date) -> bool {
        (self.start..=self.end).contains(&date)
    }
    /// Length in days, both ends included.
    pub fn days(&self) -> i32 {
        self.end - self.start + 1
    }
    pub fn coptic_start(&self) -> CopticDate {
        CopticDate::from_date(self.start)
    }
    pub fn coptic_end(&self) -> CopticDate {
        CopticDate::from_date(self.end)
    }
}

fn gregorian(year: i32, month: i32, day: i32) -> Result<Date, CalendarError> {
    Date::from_gregorian(year, month, day)
        .ok_or_else(|| CalendarError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
}

/// Easter-dependent seasons of `year`, chronologically.
pub fn moveable_periods(year: i32) -> Result<Vec<Period>, CalendarError> {
    use Season::*;
    use Source::Moveable;

    let easter = feasts::easter(year)?;
    let at = |feast: Feast| easter + feast.offset();
    // the Apostles' Fast always ends on the feast of the Apostles, 12 July
    let apostles_end = gregorian(year, 7, 12)?;

    Ok(vec![
        Period::new(
            FastOfNineveh,
            at(Feast::FastOfNineveh),
            at(Feast::FastOfNineveh) + 2,
            Moveable,
        ),
        Period::new(GreatLent, at(Feast::GreatLent), easter - 1, Moveable),
        Period::new(HolyWeek, at(Feast::PalmSunday), easter - 1, Moveable),
        Period::new(PaschalSeason, easter, at(Feast::Pentecost), Moveable),
        Period::new(ApostlesFast, at(Feast::ApostlesFast), apostles_end, Moveable),
    ])
}

/// Seasons fixed on the Gregorian calendar that begin in `year`.
///
/// ```
/// use katameros::seasons::fixed_periods;
///
/// let nativity = &fixed_periods(2025).unwrap()[0];
/// assert_eq!("2025-11-25", nativity.start.iso_gregorian());
/// assert_eq!("2026-01-06", nativity.end.iso_gregorian());
/// ```
pub fn fixed_periods(year: i32) -> Result<Vec<Period>, CalendarError> {
    Ok(vec![Period::new(
        Season::NativityFast,
        gregorian(year, 11, 25)?,
        gregorian(year + 1, 1, 6)?,
        Source::Fixed,
    )])
}

/// All seasons beginning in `year`, ordered by start date.
///
/// # Example
///
/// ```
/// use katameros::seasons::{seasons, Season};
///
/// let all = seasons(2025).unwrap();
/// let lent = all.iter().find(|p| p.season == Season::GreatLent).unwrap();
/// assert_eq!("2025-02-24", lent.start.iso_gregorian());
/// assert_eq!("2025-04-19", lent.end.iso_gregorian());
/// ```
pub fn seasons(year: i32) -> Result<Vec<Period>, CalendarError> {
    let mut all = moveable_periods(year)?;
    all.extend(fixed_periods(year)?);
    all.sort_by_key(|p| p.start);
    Ok(all)
}

/// Fasting periods beginning in `year`, ordered by start date.
pub fn fasting_periods(year: i32) -> Result<Vec<Period>, CalendarError> {
    Ok(seasons(year)?
        .into_iter()
        .filter(|p| p.season.is_fasting())
        .collect())
}

/// Periods that can contain a day of `year`: the seasons beginning in it and
/// the previous year's Nativity Fast.
fn candidates(year: i32) -> Result<Vec<Period>, CalendarError> {
    let mut candidates = fixed_periods(year - 1)?;
    candidates.extend(seasons(year)?);
    Ok(candidates)
}

/// All periods containing `date`, including the tail of the previous
/// year's Nativity Fast.
pub fn periods_on(date: Date) -> Result<Vec<Period>, CalendarError> {
    let (year, _, _) = date.gregorian();
    Ok(candidates(year)?
        .into_iter()
        .filter(|p| p.contains(date))
        .collect())
}

fn highest(date: Date, periods: &[Period]) -> Option<Period> {
    periods
        .iter()
        .filter(|p| p.contains(date))
        .min_by_key(|p| p.season.priority())
        .copied()
}

/// The season `date` belongs to, highest priority first when periods
/// overlap (Holy Week inside Great Lent).
///
/// ```
/// use katameros::Date;
/// use katameros::seasons::{season_for, Season};
///
/// let date = Date::from_gregorian(2025, 4, 15).unwrap();
/// assert_eq!(Some(Season::HolyWeek), season_for(date).unwrap().map(|p| p.season));
/// ```
pub fn season_for(date: Date) -> Result<Option<Period>, CalendarError> {
    let (year, _, _) = date.gregorian();
    Ok(highest(date, &candidates(year)?))
}

/// How strictly a day is kept.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FastingLevel {
    None,
    Regular,
    Strict,
    Complete,
}

fn weekly_fast(date: Date, periods: &[Period]) -> bool {
    matches!(date.day_of_week(), 3 | 5)
        && !periods
            .iter()
            .any(|p| p.season == Season::PaschalSeason && p.contains(date))
}

/// Wednesdays and Fridays are fasts, except in the fifty days after Easter.
pub fn is_weekly_fast(date: Date) -> Result<bool, CalendarError> {
    if !matches!(date.day_of_week(), 3 | 5) {
        return Ok(false);
    }
    let (year, _, _) = date.gregorian();
    Ok(weekly_fast(date, &candidates(year)?))
}

/// `periods` are the candidates of the year of `date`.
fn level_among(date: Date, periods: &[Period], good_friday: Date) -> FastingLevel {
    if date == good_friday {
        return FastingLevel::Complete;
    }
    match highest(date, periods).map(|p| p.season) {
        Some(Season::GreatLent | Season::HolyWeek) => FastingLevel::Strict,
        Some(season) if season.is_fasting() => FastingLevel::Regular,
        _ if weekly_fast(date, periods) => FastingLevel::Regular,
        _ => FastingLevel::None,
    }
}

/// Fasting level of `date` from seasons and the weekly fasts.
pub fn fasting_level(date: Date) -> Result<FastingLevel, CalendarError> {
    let (year, _, _) = date.gregorian();
    let good_friday = feasts::date_of(Feast::GoodFriday, year)?;
    Ok(level_among(date, &candidates(year)?, good_friday))
}

/// A fasting day in [`fasting_calendar`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingDay {
    pub date: Date,
    pub coptic_date: CopticDate,
    pub level: FastingLevel,
    /// The fasting season, `None` for a weekly Wednesday or Friday fast.
    pub season: Option<Season>,
}

/// Every fasting day from January 1 to December 31 of `year`.
///
/// # Example
///
/// ```
/// use katameros::seasons::{fasting_calendar, FastingLevel, Season};
///
/// let days = fasting_calendar(2025).unwrap();
/// // the Nativity Fast begun in 2024 opens the year
/// assert_eq!("2025-01-01", days[0].date.to_string());
/// assert_eq!(Some(Season::NativityFast), days[0].season);
/// assert!(days.iter().any(|d| d.level == FastingLevel::Complete));
/// ```
pub fn fasting_calendar(year: i32) -> Result<Vec<FastingDay>, CalendarError> {
    let periods = candidates(year)?;
    let good_friday = feasts::date_of(Feast::GoodFriday, year)?;
    let first = gregorian(year, 1, 1)?;
    let last = gregorian(year, 12, 31)?;

    let mut days = Vec::new();
    let mut date = first;
    while date <= last {
        let level = level_among(date, &periods, good_friday);
        if level != FastingLevel::None {
            days.push(FastingDay {
                date,
                coptic_date: CopticDate::from_date(date),
                level,
                season: highest(date, &periods)
                    .map(|p| p.season)
                    .filter(Season::is_fasting),
            });
        }
        date = date + 1;
    }
    Ok(days)
}
