//! The Katameros: reading references assigned to each day of the Coptic
//! year, and their resolution into a day's readings.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coptic::{self, CopticDate, Month};
use crate::corpus::Corpus;
use crate::error::{DataError, MissingVerseError};
use crate::resolver::{self, ResolvedReading};

/// Reading slots of a liturgical day, in service order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    VespersPsalm,
    VespersGospel,
    MatinsPsalm,
    MatinsGospel,
    Pauline,
    Catholic,
    Acts,
    LiturgyPsalm,
    LiturgyGospel,
}

impl Slot {
    pub const ALL: [Slot; 9] = [
        Slot::VespersPsalm,
        Slot::VespersGospel,
        Slot::MatinsPsalm,
        Slot::MatinsGospel,
        Slot::Pauline,
        Slot::Catholic,
        Slot::Acts,
        Slot::LiturgyPsalm,
        Slot::LiturgyGospel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::VespersPsalm => "Vespers Psalm",
            Slot::VespersGospel => "Vespers Gospel",
            Slot::MatinsPsalm => "Matins Psalm",
            Slot::MatinsGospel => "Matins Gospel",
            Slot::Pauline => "Pauline Epistle",
            Slot::Catholic => "Catholic Epistle",
            Slot::Acts => "Acts",
            Slot::LiturgyPsalm => "Liturgy Psalm",
            Slot::LiturgyGospel => "Liturgy Gospel",
        }
    }
}

/// Raw reference strings of one day, by slot. A slot string may hold a
/// semicolon list.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct DayReferences {
    /// Free-form label of the entry, e.g. the commemoration it belongs to.
    pub label: Option<String>,
    pub slots: BTreeMap<Slot, String>,
}

impl DayReferences {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }
}

/// Source of the raw references for a day.
pub trait Lectionary: Sync {
    fn references(&self, date: &CopticDate) -> Option<&DayReferences>;

    /// Lookup by a precomputed key: `"Day 134"` (day of the Coptic year) or
    /// `"6 Toba"`. Keys carry no year, so the 6th of Nasie is always
    /// accepted.
    fn references_by_key(&self, key: &str) -> Option<&DayReferences> {
        let (month, day) = parse_key(key)?;
        // 1739 is a leap year, so every (month, day) pair exists in it
        let date = CopticDate::new(1739, month, day)?;
        self.references(&date)
    }
}

/// Parses `"Day 134"` or `"6 Toba"` without checking the day against the
/// month.
pub(crate) fn parse_key(key: &str) -> Option<(Month, u32)> {
    let key = key.trim();
    if let Some(n) = key.strip_prefix("Day ") {
        let n: u32 = n.trim().parse().ok()?;
        let month = Month::from_num((n.checked_sub(1)?) / 30 + 1)?;
        return Some((month, (n - 1) % 30 + 1));
    }
    let (day, month) = key.split_once(' ')?;
    Some((coptic::fmt::parse_month(month)?, day.parse().ok()?))
}

#[derive(Deserialize)]
struct RawMonth {
    #[serde(default)]
    readings: Vec<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Num(i64),
}

#[derive(Deserialize)]
struct RawReading {
    id: u32,
    #[serde(rename = "Day", default)]
    day: Option<RawLabel>,
    #[serde(rename = "VPsalm", default)]
    vespers_psalm: Option<String>,
    #[serde(rename = "VGospel", default)]
    vespers_gospel: Option<String>,
    #[serde(rename = "MPsalm", default)]
    matins_psalm: Option<String>,
    #[serde(rename = "MGospel", default)]
    matins_gospel: Option<String>,
    #[serde(rename = "Pauline", default)]
    pauline: Option<String>,
    #[serde(rename = "Catholic", default)]
    catholic: Option<String>,
    #[serde(rename = "Acts", default)]
    acts: Option<String>,
    #[serde(rename = "LPsalm", default)]
    liturgy_psalm: Option<String>,
    #[serde(rename = "LGospel", default)]
    liturgy_gospel: Option<String>,
}

impl RawReading {
    fn into_references(self) -> (u32, DayReferences) {
        let slots = [
            (Slot::VespersPsalm, self.vespers_psalm),
            (Slot::VespersGospel, self.vespers_gospel),
            (Slot::MatinsPsalm, self.matins_psalm),
            (Slot::MatinsGospel, self.matins_gospel),
            (Slot::Pauline, self.pauline),
            (Slot::Catholic, self.catholic),
            (Slot::Acts, self.acts),
            (Slot::LiturgyPsalm, self.liturgy_psalm),
            (Slot::LiturgyGospel, self.liturgy_gospel),
        ]
        .into_iter()
        .filter_map(|(slot, text)| Some((slot, text.filter(|t| !t.trim().is_empty())?)))
        .collect();
        let label = self.day.map(|label| match label {
            RawLabel::Text(s) => s,
            RawLabel::Num(n) => n.to_string(),
        });
        (self.id, DayReferences { label, slots })
    }
}

/// In-memory lectionary: per month, the reading id of each day, and the
/// references behind every id.
///
/// # Example
///
/// ```
/// use katameros::coptic::to_coptic;
/// use katameros::lectionary::{Lectionary, LectionaryTable, Slot};
///
/// let table = LectionaryTable::from_json_strs(
///     r#"[{"readings": [1, 1, 1, 1, 1, 2]}]"#,
///     r#"[{"id": 1, "Day": "Tout", "LGospel": "Luke 4:14-30"},
///         {"id": 2, "Day": "Tout 6", "LGospel": "John 3:16", "LPsalm": "Psalms 119:96-97"}]"#,
/// ).unwrap();
///
/// let day = table.references_by_key("Day 6").unwrap();
/// assert_eq!(Some("John 3:16"), day.get(Slot::LiturgyGospel));
/// assert_eq!(None, day.get(Slot::Acts));
/// assert!(table.references(&to_coptic(2025, 1, 15).unwrap()).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LectionaryTable {
    /// `days[month - 1][day - 1]`; 0 marks a day without readings.
    days: Vec<Vec<u32>>,
    readings: HashMap<u32, DayReferences>,
}

impl LectionaryTable {
    /// Builds the table from the day-readings and unique-readings JSON.
    ///
    /// Fails with [`DataError::UnknownReading`] if a day refers to an id the
    /// unique readings do not define.
    pub fn from_json_strs(day_readings: &str, unique_readings: &str) -> Result<Self, DataError> {
        Self::build(
            serde_json::from_str(day_readings)?,
            serde_json::from_str(unique_readings)?,
        )
    }
    pub fn from_readers<R1: Read, R2: Read>(
        day_readings: R1,
        unique_readings: R2,
    ) -> Result<Self, DataError> {
        Self::build(
            serde_json::from_reader(day_readings)?,
            serde_json::from_reader(unique_readings)?,
        )
    }
    pub fn open(
        day_readings: impl AsRef<Path>,
        unique_readings: impl AsRef<Path>,
    ) -> Result<Self, DataError> {
        let (day_readings, unique_readings) = (day_readings.as_ref(), unique_readings.as_ref());
        debug!(
            day_readings = %day_readings.display(),
            unique_readings = %unique_readings.display(),
            "loading lectionary"
        );
        Self::from_readers(
            BufReader::new(File::open(day_readings)?),
            BufReader::new(File::open(unique_readings)?),
        )
    }

    fn build(months: Vec<RawMonth>, unique: Vec<RawReading>) -> Result<Self, DataError> {
        let readings: HashMap<u32, DayReferences> =
            unique.into_iter().map(RawReading::into_references).collect();
        let days: Vec<Vec<u32>> = months.into_iter().map(|m| m.readings).collect();
        for (m, month) in days.iter().enumerate() {
            for (d, &id) in month.iter().enumerate() {
                if id != 0 && !readings.contains_key(&id) {
                    return Err(DataError::UnknownReading {
                        month: m + 1,
                        day: d + 1,
                        id,
                    });
                }
            }
        }
        debug!(months = days.len(), readings = readings.len(), "lectionary loaded");
        Ok(Self { days, readings })
    }

    /// Reading id of a day, if it has one.
    pub fn reading_id(&self, date: &CopticDate) -> Option<u32> {
        let month = self.days.get(date.month.num() as usize - 1)?;
        month
            .get((date.day as usize).checked_sub(1)?)
            .copied()
            .filter(|&id| id != 0)
    }
}

impl Lectionary for LectionaryTable {
    fn references(&self, date: &CopticDate) -> Option<&DayReferences> {
        self.readings.get(&self.reading_id(date)?)
    }
}

/// A reading that could not be resolved.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Gap {
    pub slot: Slot,
    pub error: MissingVerseError,
}

/// The resolved readings of one day.
///
/// Slots without an entry, or whose references do not classify, are absent.
/// References naming text the corpus lacks are kept in `gaps`; other
/// readings of the day are unaffected.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct DailyReadingSet {
    pub label: Option<String>,
    pub slots: BTreeMap<Slot, Vec<ResolvedReading>>,
    pub gaps: Vec<Gap>,
}

impl DailyReadingSet {
    pub fn get(&self, slot: Slot) -> Option<&[ResolvedReading]> {
        self.slots.get(&slot).map(Vec::as_slice)
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.gaps.is_empty()
    }
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Resolves the readings of a day.
pub fn readings_for<L, C>(date: &CopticDate, lectionary: &L, corpus: &C) -> DailyReadingSet
where
    L: Lectionary + ?Sized,
    C: Corpus + ?Sized,
{
    match lectionary.references(date) {
        Some(refs) => resolve_day(refs, corpus),
        None => {
            debug!(date = %date, "no lectionary entry");
            DailyReadingSet::default()
        }
    }
}

/// As [`readings_for`], with the day given by a key such as `"Day 134"`.
pub fn readings_for_key<L, C>(key: &str, lectionary: &L, corpus: &C) -> DailyReadingSet
where
    L: Lectionary + ?Sized,
    C: Corpus + ?Sized,
{
    match lectionary.references_by_key(key) {
        Some(refs) => resolve_day(refs, corpus),
        None => {
            debug!(key, "no lectionary entry");
            DailyReadingSet::default()
        }
    }
}

fn resolve_day<C: Corpus + ?Sized>(refs: &DayReferences, corpus: &C) -> DailyReadingSet {
    let mut set = DailyReadingSet {
        label: refs.label.clone(),
        ..Default::default()
    };
    for (&slot, text) in &refs.slots {
        let mut readings = Vec::new();
        for result in resolver::resolve_all(text, corpus) {
            match result {
                Ok(reading) => readings.push(reading),
                Err(error) => {
                    warn!(slot = slot.name(), %error, "reading not resolved");
                    set.gaps.push(Gap { slot, error });
                }
            }
        }
        if !readings.is_empty() {
            set.slots.insert(slot, readings);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Bible;
    use crate::error::Missing;

    const DAYS: &str = r#"[
        {"readings": [1, 2, 0]},
        {"readings": [3]}
    ]"#;
    const UNIQUE: &str = r#"[
        {"id": 1, "Day": 1, "VGospel": "John 3:16", "LPsalm": "Psalms 119:96-97", "Acts": ""},
        {"id": 2, "Day": "second", "LGospel": "John 3:16;John 3:99", "Pauline": "not a reference"},
        {"id": 3, "MGospel": "Jude 1:1-2, 5"}
    ]"#;
    const BIBLE: &str = r#"{"books": [
        {"name": "John", "chapters": [{"num": 3, "verses": [
            {"num": 16, "text": "For God so loved"}
        ]}]},
        {"name": "Psalms", "chapters": [{"num": 119, "verses": [
            {"num": 96, "text": "I have seen"}, {"num": 97, "text": "O how love I"}
        ]}]},
        {"name": "Jude", "chapters": [{"num": 1, "verses": [
            {"num": 1, "text": "Jude"}, {"num": 2, "text": "Mercy"}
        ]}]}
    ]}"#;

    fn fixtures() -> (LectionaryTable, Bible) {
        (
            LectionaryTable::from_json_strs(DAYS, UNIQUE).unwrap(),
            Bible::from_json_str(BIBLE).unwrap(),
        )
    }

    fn tout(day: u32) -> CopticDate {
        CopticDate::new(1741, Month::Tout, day).unwrap()
    }

    #[test]
    fn keys() {
        let dataset = [
            ("Day 1", Some((Month::Tout, 1))),
            ("Day 30", Some((Month::Tout, 30))),
            ("Day 31", Some((Month::Baba, 1))),
            ("Day 126", Some((Month::Toba, 6))),
            ("Day 366", Some((Month::Nasie, 6))),
            ("6 Toba", Some((Month::Toba, 6))),
            ("6 toba", Some((Month::Toba, 6))),
            ("Day 0", None),
            ("Day x", None),
            ("Toba", None),
            ("6 Thermidor", None),
        ];
        for (key, expected) in dataset {
            assert_eq!(expected, parse_key(key), "{key}");
        }
    }

    #[test]
    fn lookup() {
        let (table, _) = fixtures();
        assert_eq!(Some(1), table.reading_id(&tout(1)));
        assert_eq!(None, table.reading_id(&tout(3)));
        assert_eq!(None, table.reading_id(&tout(4)));
        let day = table.references(&tout(1)).unwrap();
        assert_eq!(Some("1"), day.label.as_deref());
        assert_eq!(None, day.get(Slot::Acts));
        assert_eq!(2, day.slots.len());
        assert_eq!(Some(day), table.references_by_key("Day 1"));
        assert_eq!(Some(day), table.references_by_key("1 Tout"));
    }

    #[test]
    fn unknown_reading() {
        let err = LectionaryTable::from_json_strs(r#"[{"readings": [1, 7]}]"#, UNIQUE).unwrap_err();
        assert!(matches!(err, DataError::UnknownReading { month: 1, day: 2, id: 7 }), "{err}");
    }

    #[test]
    fn resolves_day() {
        let (table, bible) = fixtures();
        let set = readings_for(&tout(1), &table, &bible);
        assert!(set.is_complete());
        assert_eq!(2, set.slots.len());
        assert_eq!("For God so loved", set.get(Slot::VespersGospel).unwrap()[0].text());
        assert_eq!("I have seen O how love I", set.get(Slot::LiturgyPsalm).unwrap()[0].text());
        assert_eq!(None, set.get(Slot::Acts));
    }

    #[test]
    fn gaps_do_not_block_siblings() {
        let (table, bible) = fixtures();
        let set = readings_for_key("Day 2", &table, &bible);
        assert_eq!(Some("second"), set.label.as_deref());
        // unclassifiable text is absent, not a gap
        assert_eq!(None, set.get(Slot::Pauline));
        assert_eq!(1, set.get(Slot::LiturgyGospel).unwrap().len());
        assert_eq!(1, set.gaps.len());
        assert_eq!(Slot::LiturgyGospel, set.gaps[0].slot);
        assert_eq!(Missing::Verse { chapter: 3, verse: 99 }, set.gaps[0].error.missing);

        // a comma list fails as a whole
        let set = readings_for_key("Day 31", &table, &bible);
        assert!(set.slots.is_empty());
        assert_eq!(Slot::MatinsGospel, set.gaps[0].slot);
    }

    #[test]
    fn no_entry() {
        let (table, bible) = fixtures();
        assert!(readings_for(&tout(3), &table, &bible).is_empty());
        assert!(readings_for_key("Day 200", &table, &bible).is_empty());
        assert!(readings_for_key("nonsense", &table, &bible).is_empty());
    }
}
