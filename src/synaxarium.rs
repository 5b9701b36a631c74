//! Commemorations of the saints (the Synaxarium), by Coptic day.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coptic::{self, CopticDate, Month};
use crate::error::DataError;
use crate::lectionary::parse_key;

/// A commemoration. `text` is the full story and can be long.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SynaxariumEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The Coptic day of a search hit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDay {
    /// `"6 Toba"`
    pub date_string: String,
    pub day: u32,
    pub month_string: &'static str,
}

/// An entry matched by [`SynaxariumTable::search`], without its text.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub date: String,
    pub coptic_date: HitDay,
    pub entry: SynaxariumEntry,
}

/// Synaxarium entries keyed by Coptic month and day, the same every year.
///
/// Loaded from `{ "6 Toba": [{ "name", "url", "text" }], ... }`.
///
/// # Example
///
/// ```
/// use katameros::{CopticDate, Date};
/// use katameros::synaxarium::SynaxariumTable;
///
/// let table = SynaxariumTable::from_json_str(
///     r#"{"6 Toba": [{"name": "Circumcision of our Lord", "text": "On this day..."}]}"#,
/// ).unwrap();
///
/// let coptic = CopticDate::from_date(Date::from_gregorian(2025, 1, 15).unwrap());
/// let entries = table.for_date(&coptic, false);
/// assert_eq!("Circumcision of our Lord", entries[0].name);
/// assert_eq!(None, entries[0].text);
/// assert!(table.for_date(&coptic, true)[0].text.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SynaxariumTable {
    days: BTreeMap<(Month, u32), Vec<SynaxariumEntry>>,
}

impl SynaxariumTable {
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Self::build(serde_json::from_str(json)?)
    }
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        Self::build(serde_json::from_reader(reader)?)
    }
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading synaxarium");
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    fn build(raw: BTreeMap<String, Vec<SynaxariumEntry>>) -> Result<Self, DataError> {
        let mut days: BTreeMap<(Month, u32), Vec<SynaxariumEntry>> = BTreeMap::new();
        for (key, entries) in raw {
            let (month, day) = parse_key(&key)
                // 1739 is a leap year, so Nasie 6 passes
                .filter(|&(month, day)| CopticDate::new(1739, month, day).is_some())
                .ok_or(DataError::InvalidKey(key))?;
            days.entry((month, day)).or_default().extend(entries);
        }
        debug!(days = days.len(), "synaxarium loaded");
        Ok(Self { days })
    }

    /// Entries of a `"6 Toba"` key.
    pub fn by_key(&self, key: &str) -> &[SynaxariumEntry] {
        parse_key(key)
            .and_then(|k| self.days.get(&k))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Entries of the day of `date`, with their text only if `include_text`.
    pub fn for_date(&self, date: &CopticDate, include_text: bool) -> Vec<SynaxariumEntry> {
        self.days
            .get(&(date.month, date.day))
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|entry| {
                let mut entry = entry.clone();
                if !include_text {
                    entry.text = None;
                }
                entry
            })
            .collect()
    }

    /// Entries whose name contains `term`, ignoring case, in calendar order.
    /// At most `limit` hits are returned.
    pub fn search(&self, term: &str, limit: usize) -> Vec<SearchHit> {
        let term = term.to_lowercase();
        self.days
            .iter()
            .flat_map(|(&(month, day), entries)| entries.iter().map(move |e| (month, day, e)))
            .filter(|(_, _, entry)| entry.name.to_lowercase().contains(&term))
            .take(limit)
            .map(|(month, day, entry)| {
                let key = format!("{day} {}", coptic::fmt::month(month));
                SearchHit {
                    date: key.clone(),
                    coptic_date: HitDay {
                        date_string: key,
                        day,
                        month_string: coptic::fmt::month(month),
                    },
                    entry: SynaxariumEntry {
                        text: None,
                        ..entry.clone()
                    },
                }
            })
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "6 Toba": [
            {"name": "Circumcision of our Lord", "url": "/6-toba/1", "text": "On this day..."},
            {"name": "Ascension of Elijah the Prophet", "text": "Also on this day..."}
        ],
        "1 Tout": [{"name": "Martyrdom of St. Bartholomew", "url": "/1-tout/1", "text": "..."}],
        "6 Nasie": [{"name": "Commemoration of all martyrs"}],
        "22 Kiahk": [{"name": "Archangel Gabriel"}]
    }"#;

    #[test]
    fn lookup_by_date() {
        let table = SynaxariumTable::from_json_str(TABLE).unwrap();
        assert_eq!(5, table.len());

        let toba6 = ["Circumcision of our Lord", "Ascension of Elijah the Prophet"];
        for (month, day, include_text, names, with_text) in [
            (Month::Toba, 6, false, &toba6[..], false),
            (Month::Toba, 6, true, &toba6[..], true),
            (Month::Tout, 1, true, &["Martyrdom of St. Bartholomew"][..], true),
            (Month::Nasie, 6, true, &["Commemoration of all martyrs"][..], false),
            (Month::Toba, 7, true, &[][..], false),
        ] {
            let date = CopticDate::new(1739, month, day).unwrap();
            let entries = table.for_date(&date, include_text);
            let found: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, found, "{}", date.day_key());
            assert!(entries.iter().all(|e| e.text.is_some() == with_text), "{}", date.day_key());
        }

        assert_eq!(Some("/6-toba/1"), table.by_key("6 Toba")[0].url.as_deref());
        assert_eq!(table.by_key("6 toba"), table.by_key("Day 126"));
        assert!(table.by_key("6").is_empty());
    }

    #[test]
    fn search() {
        let table = SynaxariumTable::from_json_str(TABLE).unwrap();
        for (term, limit, expected) in [
            ("ON OF", 50, vec!["6 Toba", "6 Toba", "6 Nasie"]),
            ("on of", 2, vec!["6 Toba", "6 Toba"]),
            ("gabriel", 50, vec!["22 Kiahk"]),
            ("martyr", 50, vec!["1 Tout", "6 Nasie"]),
            ("athanasius", 50, vec![]),
            ("of", 0, vec![]),
        ] {
            let hits: Vec<_> = table.search(term, limit).into_iter().map(|h| h.date).collect();
            assert_eq!(expected, hits, "{term:?} {limit}");
        }

        let hit = &table.search("circumcision", 1)[0];
        assert_eq!((6, "Toba"), (hit.coptic_date.day, hit.coptic_date.month_string));
        assert_eq!(None, hit.entry.text);
        let json = serde_json::to_value(hit).unwrap();
        assert_eq!("6 Toba", json["copticDate"]["dateString"]);
        assert_eq!("/6-toba/1", json["entry"]["url"]);
        assert!(json["entry"].get("text").is_none());
    }

    #[test]
    fn invalid_keys() {
        for json in [
            r#"{"31 Toba": []}"#,
            r#"{"7 Nasie": []}"#,
            r#"{"Toba": []}"#,
            r#"{"6 Tobi": []}"#,
        ] {
            assert!(
                matches!(SynaxariumTable::from_json_str(json), Err(DataError::InvalidKey(_))),
                "{json}"
            );
        }
        assert!(matches!(SynaxariumTable::from_json_str("[]"), Err(DataError::Json(_))));
    }
}
