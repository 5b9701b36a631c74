//! Easter computus and the feasts anchored on it.
//!
//! The Coptic Church reckons Easter on the Julian calendar. The Julian date
//! is found with Meeus' algorithm and then carried over to the Gregorian
//! calendar through its Julian day number, which accounts for the 13 days
//! difference before March 2100 and 14 days after.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::date::Date;
use crate::error::CalendarError;

/// Years for which the computus has been validated against published
/// calendars. Other years fail with [`CalendarError::UnsupportedYear`].
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2199;

/// Date of Easter in `year`.
///
/// # Example
///
/// ```
/// use katameros::feasts::easter;
///
/// assert_eq!("2025-04-20", easter(2025).unwrap().iso_gregorian());
/// assert!(easter(1899).is_err());
/// ```
pub fn easter(year: i32) -> Result<Date, CalendarError> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(CalendarError::UnsupportedYear(year));
    }
    let a = year % 4;
    let b = year % 7;
    let c = year % 19;
    let d = (19 * c + 15) % 30;
    let e = (2 * a + 4 * b - d + 34) % 7;
    let f = d + e + 114;
    Date::from_julian(year, f / 31, f % 31 + 1).ok_or(CalendarError::UnsupportedYear(year))
}

/// Importance of a moveable entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeastKind {
    MajorFeast,
    MinorFeast,
    Fast,
}

/// The Easter-anchored entries of the calendar, in chronological order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub enum Feast {
    FastOfNineveh,
    GreatLent,
    PalmSunday,
    HolyThursday,
    GoodFriday,
    Easter,
    ThomasSunday,
    Ascension,
    Pentecost,
    ApostlesFast,
}

struct Entry {
    feast: Feast,
    id: u32,
    name: &'static str,
    kind: FeastKind,
    offset: i32,
}

const fn entry(feast: Feast, id: u32, name: &'static str, kind: FeastKind, offset: i32) -> Entry {
    Entry {
        feast,
        id,
        name,
        kind,
        offset,
    }
}

/// Days from Easter of every moveable entry.
const TABLE: [Entry; 10] = {
    use Feast::*;
    use FeastKind::*;
    [
        entry(FastOfNineveh, 1002, "Fast of Nineveh", Fast, -69),
        entry(GreatLent, 1001, "Great Lent", Fast, -55),
        entry(PalmSunday, 1003, "Palm Sunday", MajorFeast, -7),
        entry(HolyThursday, 1004, "Holy Thursday", MinorFeast, -3),
        entry(GoodFriday, 1005, "Good Friday", Fast, -2),
        entry(Easter, 1006, "Easter", MajorFeast, 0),
        entry(ThomasSunday, 1007, "Thomas Sunday", MinorFeast, 7),
        entry(Ascension, 1008, "Ascension", MajorFeast, 39),
        entry(Pentecost, 1009, "Pentecost", MajorFeast, 49),
        entry(ApostlesFast, 1010, "Apostles' Fast", Fast, 50),
    ]
};

impl Feast {
    pub const ALL: [Feast; 10] = [
        Feast::FastOfNineveh,
        Feast::GreatLent,
        Feast::PalmSunday,
        Feast::HolyThursday,
        Feast::GoodFriday,
        Feast::Easter,
        Feast::ThomasSunday,
        Feast::Ascension,
        Feast::Pentecost,
        Feast::ApostlesFast,
    ];

    fn entry(&self) -> &'static Entry {
        &TABLE[*self as usize]
    }
    /// Days relative to Easter, negative before it.
    pub fn offset(&self) -> i32 {
        self.entry().offset
    }
    pub fn kind(&self) -> FeastKind {
        self.entry().kind
    }
    /// English name, e.g. `"Apostles' Fast"`.
    pub fn name(&self) -> &'static str {
        self.entry().name
    }
    /// Stable identifier shared with the fixed celebrations table.
    pub fn id(&self) -> u32 {
        self.entry().id
    }
}

/// A moveable feast resolved for a particular year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct MoveableFeast {
    pub feast: Feast,
    pub date: Date,
}

impl MoveableFeast {
    pub fn name(&self) -> &'static str {
        self.feast.name()
    }
    pub fn offset(&self) -> i32 {
        self.feast.offset()
    }
}

/// All ten moveable feasts of `year`, chronologically.
///
/// # Example
///
/// ```
/// use katameros::feasts::{moveable_feasts, Feast};
///
/// let feasts = moveable_feasts(2025).unwrap();
/// assert_eq!(10, feasts.len());
/// assert_eq!(Feast::FastOfNineveh, feasts[0].feast);
/// assert_eq!("2025-02-10", feasts[0].date.iso_gregorian());
/// ```
pub fn moveable_feasts(year: i32) -> Result<Vec<MoveableFeast>, CalendarError> {
    let easter = easter(year)?;
    Ok(Feast::ALL
        .iter()
        .map(|&feast| MoveableFeast {
            feast,
            date: easter + feast.offset(),
        })
        .collect())
}

/// Date of a single moveable feast in `year`.
pub fn date_of(feast: Feast, year: i32) -> Result<Date, CalendarError> {
    Ok(easter(year)? + feast.offset())
}

/// Moveable feasts falling on `date` (usually none or one).
pub fn feasts_on(date: Date) -> Result<Vec<MoveableFeast>, CalendarError> {
    let (year, _, _) = date.gregorian();
    Ok(moveable_feasts(year)?
        .into_iter()
        .filter(|f| f.date == date)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(date: Date) -> (i32, i32, i32) {
        date.gregorian()
    }

    #[test]
    fn known_easters() {
        for (year, expected) in [
            (2018, (2018, 4, 8)),
            (2020, (2020, 4, 19)),
            (2021, (2021, 5, 2)),
            (2022, (2022, 4, 24)),
            (2023, (2023, 4, 16)),
            (2024, (2024, 5, 5)),
            (2025, (2025, 4, 20)),
            (2026, (2026, 4, 12)),
        ] {
            assert_eq!(expected, ymd(easter(year).unwrap()), "{year}");
        }
    }

    #[test]
    fn easter_in_april_or_may() {
        for year in SUPPORTED_YEARS {
            let date = easter(year).unwrap();
            let (y, m, _) = date.gregorian();
            assert_eq!(year, y);
            assert!(m == 4 || m == 5, "{year}: {date}");
            assert!(date.is_sunday(), "{year}: {date}");
            assert_eq!(date, easter(year).unwrap());
        }
    }

    #[test]
    fn unsupported_years() {
        for year in [1000, 1899, 2200, 3000] {
            assert_eq!(Err(CalendarError::UnsupportedYear(year)), easter(year));
            assert_eq!(Err(CalendarError::UnsupportedYear(year)), moveable_feasts(year));
        }
        assert!(easter(1900).is_ok());
        assert!(easter(2199).is_ok());
    }

    #[test]
    fn official_2025() {
        let expected = [
            (Feast::FastOfNineveh, (2025, 2, 10)),
            (Feast::GreatLent, (2025, 2, 24)),
            (Feast::PalmSunday, (2025, 4, 13)),
            (Feast::HolyThursday, (2025, 4, 17)),
            (Feast::GoodFriday, (2025, 4, 18)),
            (Feast::Easter, (2025, 4, 20)),
            (Feast::ThomasSunday, (2025, 4, 27)),
            (Feast::Ascension, (2025, 5, 29)),
            (Feast::Pentecost, (2025, 6, 8)),
            (Feast::ApostlesFast, (2025, 6, 9)),
        ];
        let feasts = moveable_feasts(2025).unwrap();
        assert_eq!(expected.len(), feasts.len());
        for ((feast, date), got) in expected.iter().zip(&feasts) {
            assert_eq!((*feast, *date), (got.feast, ymd(got.date)));
        }
    }

    #[test]
    fn offsets_are_constant_across_years() {
        for year in SUPPORTED_YEARS {
            let easter = easter(year).unwrap();
            let feasts = moveable_feasts(year).unwrap();
            assert_eq!(10, feasts.len());
            for f in &feasts {
                assert_eq!(f.offset(), f.date - easter, "{year} {}", f.name());
            }
            assert!(feasts.windows(2).all(|w| w[0].date < w[1].date));
        }
    }

    #[test]
    fn table_matches_enum() {
        for (i, feast) in Feast::ALL.iter().enumerate() {
            assert_eq!(*feast, TABLE[i].feast);
        }
        assert_eq!(-55, Feast::GreatLent.offset());
        assert_eq!(Feast::Pentecost.offset() + 1, Feast::ApostlesFast.offset());
        assert_eq!(FeastKind::Fast, Feast::GoodFriday.kind());
    }

    #[test]
    fn on_date() {
        let date = Date::from_gregorian(2025, 4, 20).unwrap();
        let feasts = feasts_on(date).unwrap();
        assert_eq!(vec![Feast::Easter], feasts.iter().map(|f| f.feast).collect::<Vec<_>>());
        assert!(feasts_on(date + 1).unwrap().is_empty());
        assert_eq!(
            Date::from_gregorian(2025, 6, 8),
            date_of(Feast::Pentecost, 2025).ok()
        );
    }
}
