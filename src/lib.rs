//! Coptic Orthodox liturgical calendar and lectionary.
//!
//! Converts Gregorian dates into the Coptic calendar, computes Easter and
//! the feasts and fasts anchored on it, and resolves the day's scripture
//! references into verse text from a Bible corpus.
//!
//! # Examples
//!
//! Coptic calendar:
//!
//! ```
//! use katameros::Date;
//! use katameros::coptic::{CopticDate, Month};
//!
//! let date = Date::from_gregorian(2025, 1, 15).unwrap();
//! let coptic = CopticDate::from_date(date);
//!
//! assert_eq!(Month::Toba, coptic.month);
//! assert_eq!("Toba 6, 1741", coptic.to_string());
//! ```
//!
//! Feasts and fasts:
//!
//! ```
//! use katameros::Date;
//! use katameros::feasts;
//! use katameros::seasons::{self, Season};
//!
//! assert_eq!("2025-04-20", feasts::easter(2025).unwrap().to_string());
//!
//! let date = Date::from_gregorian(2025, 3, 1).unwrap();
//! let season = seasons::season_for(date).unwrap().unwrap();
//! assert_eq!(Season::GreatLent, season.season);
//! ```
//!
//! Readings:
//!
//! ```
//! use katameros::corpus::Bible;
//! use katameros::resolver::resolve_all;
//!
//! let bible = Bible::from_json_str(r#"{"books": [{"name": "Psalms", "chapters": [
//!     {"num": 119, "verses": [{"num": 96, "text": "I have seen an end of all perfection"},
//!                             {"num": 97, "text": "O how love I thy law!"}]}
//! ]}]}"#).unwrap();
//!
//! let readings = resolve_all("Psalms 119:96-97;John 3:16", &bible);
//! assert_eq!(
//!     "I have seen an end of all perfection O how love I thy law!",
//!     readings[0].as_ref().unwrap().text()
//! );
//! // John is not in this corpus; the first reading is unaffected
//! assert!(readings[1].is_err());
//! ```

pub mod celebrations;
pub mod context;
pub mod coptic;
pub mod corpus;
pub mod date;
pub mod error;
pub mod feasts;
pub mod lectionary;
pub mod reference;
pub mod resolver;
pub mod seasons;
pub mod synaxarium;

pub use coptic::CopticDate;
pub use date::{Date, YearType};
pub use error::{CalendarError, DataError, MissingVerseError};
