//! Coptic calendar (Anno Martyrum).
//!
//! Twelve months of 30 days followed by Nasie, which has 5 days, or 6 in a
//! Coptic leap year. Conversion works on Julian day numbers, so the
//! Gregorian century rule needs no special casing here.

use std::fmt as sfmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::date::{Date, YearType};
use crate::error::CalendarError;

pub mod fmt;

/// JDN of 1 Tout, 1 AM, as counted by the published tables this crate is
/// checked against (2025-01-15 is Toba 6, 1741).
pub const EPOCH_JDN: i64 = 1_825_031;

/// Coptic months. `Nasie` is the short thirteenth month.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Month {
    Tout = 1,
    Baba,
    Hator,
    Kiahk,
    Toba,
    Amshir,
    Baramhat,
    Baramouda,
    Bashans,
    Paona,
    Epep,
    Mesra,
    Nasie,
}

impl Month {
    pub const ALL: [Month; 13] = [
        Month::Tout,
        Month::Baba,
        Month::Hator,
        Month::Kiahk,
        Month::Toba,
        Month::Amshir,
        Month::Baramhat,
        Month::Baramouda,
        Month::Bashans,
        Month::Paona,
        Month::Epep,
        Month::Mesra,
        Month::Nasie,
    ];

    /// Month number, `1..=13`.
    pub fn num(&self) -> u32 {
        *self as u32
    }
    /// Inverse of [`Month::num`].
    pub fn from_num(num: u32) -> Option<Self> {
        Self::ALL.get((num as usize).checked_sub(1)?).copied()
    }
    /// English month name, see [`fmt::month`].
    pub fn name(&self) -> &'static str {
        fmt::month(*self)
    }
    /// Number of days of the month in Coptic `year`.
    pub fn days_in(&self, year: i32) -> u32 {
        match self {
            Month::Nasie => 5 + YearType::from_coptic(year).is_leap() as u32,
            _ => 30,
        }
    }
}

/// A day in the Coptic calendar.
///
/// # Example
///
/// ```
/// use katameros::Date;
/// use katameros::coptic::{CopticDate, Month};
///
/// let date = Date::from_gregorian(2025, 1, 15).unwrap();
/// let coptic = CopticDate::from_date(date);
///
/// assert_eq!((1741, Month::Toba, 6), (coptic.year, coptic.month, coptic.day));
/// assert_eq!("Toba 6, 1741", coptic.date_string());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct CopticDate {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl CopticDate {
    /// Creates a `CopticDate`, checking the day against the month length.
    ///
    /// ```
    /// use katameros::coptic::{CopticDate, Month};
    ///
    /// assert!(CopticDate::new(1739, Month::Nasie, 6).is_some());
    /// assert!(CopticDate::new(1740, Month::Nasie, 6).is_none());
    /// assert!(CopticDate::new(1741, Month::Toba, 31).is_none());
    /// ```
    pub fn new(year: i32, month: Month, day: u32) -> Option<Self> {
        (1..=month.days_in(year))
            .contains(&day)
            .then_some(Self { year, month, day })
    }

    /// Converts a date into Coptic calendar. Total for every [`Date`].
    pub fn from_date(date: Date) -> Self {
        let jdn = date.jdn() as i64;
        let year = (4 * (jdn - EPOCH_JDN) + 1463).div_euclid(1461);
        let offset = jdn - new_year_jdn(year);
        let month = offset / 30 + 1;
        let day = offset - 30 * (month - 1) + 1;
        Self {
            year: year as i32,
            // `offset` is in 0..366, so `month` is in 1..=13
            month: Month::ALL[(month - 1) as usize],
            day: day as u32,
        }
    }
    /// Converts back into a [`Date`].
    ///
    /// Returns `None` if the day lies before the supported range of `Date`.
    pub fn to_date(&self) -> Option<Date> {
        let jdn = new_year_jdn(self.year as i64) + self.day_of_year() as i64 - 1;
        u32::try_from(jdn).ok().map(Date::from_jdn)
    }

    /// Ordinal day in the Coptic year, 1 Tout being day 1.
    pub fn day_of_year(&self) -> u32 {
        30 * (self.month.num() - 1) + self.day
    }
    /// `"<month> <day>, <year>"`, e.g. `"Toba 6, 1741"`.
    pub fn date_string(&self) -> String {
        fmt::date(self)
    }
    /// `"<day> <month>"`, the key of per-day tables such as the synaxarium.
    pub fn day_key(&self) -> String {
        fmt::day_key(self)
    }
    /// `"Day <n>"`, the key of the lectionary table.
    pub fn lectionary_key(&self) -> String {
        format!("Day {}", self.day_of_year())
    }
    /// `"<day> <month> <year> AM"`.
    pub fn long_form(&self) -> String {
        fmt::long(self)
    }
}

fn new_year_jdn(year: i64) -> i64 {
    EPOCH_JDN + 365 * (year - 1) + year.div_euclid(4)
}

impl From<Date> for CopticDate {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}

impl sfmt::Display for CopticDate {
    fn fmt(&self, f: &mut sfmt::Formatter<'_>) -> sfmt::Result {
        f.write_str(&self.date_string())
    }
}

impl Serialize for CopticDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CopticDate", 5)?;
        s.serialize_field("dateString", &self.date_string())?;
        s.serialize_field("day", &self.day)?;
        s.serialize_field("month", &self.month.num())?;
        s.serialize_field("year", &self.year)?;
        s.serialize_field("monthString", self.month.name())?;
        s.end()
    }
}

/// Converts Gregorian fields into a Coptic date, rejecting days that do not
/// exist.
///
/// ```
/// use katameros::coptic::{to_coptic, Month};
///
/// let coptic = to_coptic(2024, 12, 25).unwrap();
/// assert_eq!((1741, Month::Kiahk), (coptic.year, coptic.month));
/// assert!(to_coptic(2025, 2, 29).is_err());
/// ```
pub fn to_coptic(year: i32, month: i32, day: i32) -> Result<CopticDate, CalendarError> {
    Date::from_gregorian(year, month, day)
        .map(CopticDate::from_date)
        .ok_or_else(|| CalendarError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
}
