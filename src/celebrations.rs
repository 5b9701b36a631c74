//! Fixed (non-moveable) commemorations.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coptic::CopticDate;
use crate::date::Date;
use crate::error::{CalendarError, DataError};
use crate::feasts::{self, MoveableFeast};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Celebration {
    pub id: u32,
    pub name: String,
    /// Free-form category such as `"majorFeast"` or `"fast"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Celebration {
    pub fn is_fast(&self) -> bool {
        self.kind.to_ascii_lowercase().contains("fast")
    }
}

/// A day in [`CelebrationTable::upcoming`] with at least one observance.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDay {
    pub date: Date,
    pub coptic_date: CopticDate,
    pub celebrations: Vec<Celebration>,
    pub moveable_feasts: Vec<MoveableFeast>,
}

#[derive(Deserialize)]
struct RawEntry {
    month: u32,
    day: u32,
    #[serde(flatten)]
    celebration: Celebration,
}

/// Celebrations keyed by Gregorian month and day, the same every year.
///
/// Loaded from `[{ "month", "day", "id", "name", "type" }]`.
///
/// # Example
///
/// ```
/// use katameros::Date;
/// use katameros::celebrations::CelebrationTable;
///
/// let table = CelebrationTable::from_json_str(
///     r#"[{"month": 1, "day": 7, "id": 1, "name": "Nativity", "type": "majorFeast"}]"#,
/// ).unwrap();
///
/// let nativity = Date::from_gregorian(2025, 1, 7).unwrap();
/// assert_eq!("Nativity", table.on(nativity)[0].name);
/// assert!(table.on(nativity + 1).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CelebrationTable {
    days: BTreeMap<(u32, u32), Vec<Celebration>>,
}

impl CelebrationTable {
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Self::build(serde_json::from_str(json)?)
    }
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        Self::build(serde_json::from_reader(reader)?)
    }
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading celebrations");
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    fn build(entries: Vec<RawEntry>) -> Result<Self, DataError> {
        let mut days: BTreeMap<(u32, u32), Vec<Celebration>> = BTreeMap::new();
        for RawEntry { month, day, celebration } in entries {
            // 2000 is a leap year, so Feb 29 is accepted
            if Date::from_gregorian(2000, month as i32, day as i32).is_none() {
                return Err(DataError::InvalidDay { month, day });
            }
            days.entry((month, day)).or_default().push(celebration);
        }
        debug!(days = days.len(), "celebrations loaded");
        Ok(Self { days })
    }

    /// Celebrations on the month and day of `date`.
    pub fn on(&self, date: Date) -> &[Celebration] {
        let (_, m, d) = date.gregorian();
        self.days
            .get(&(m as u32, d as u32))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Fixed celebrations on `date` that are fasts.
    pub fn fasts_on(&self, date: Date) -> Vec<&Celebration> {
        self.on(date).iter().filter(|c| c.is_fast()).collect()
    }

    /// Days in `from .. from + days` with a fixed celebration or a moveable
    /// feast, in date order. The window may cross a year end.
    pub fn upcoming(&self, from: Date, days: u32) -> Result<Vec<UpcomingDay>, CalendarError> {
        let mut upcoming = Vec::new();
        for offset in 0..days {
            let date = from + offset as i32;
            let celebrations = self.on(date).to_vec();
            let moveable_feasts = feasts::feasts_on(date)?;
            if celebrations.is_empty() && moveable_feasts.is_empty() {
                continue;
            }
            upcoming.push(UpcomingDay {
                date,
                coptic_date: CopticDate::from_date(date),
                celebrations,
                moveable_feasts,
            });
        }
        Ok(upcoming)
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
