//! Classification of scripture reference strings.
//!
//! Recognised shapes, most specific first:
//!
//! | shape               | example               | [`Kind`]              |
//! |---------------------|-----------------------|-----------------------|
//! | `c:v-c:v` / `c-c`   | `2 Peter 1:19-2:8`    | `MultiChapterRange`   |
//! | `c:v-v`             | `Psalms 119:96-97`    | `VerseRange`          |
//! | `c:v`               | `Psalms 119:96`       | `Verse`               |
//! | `c`                 | `Psalms 119`          | `Chapter`             |
//! | any of the above, `,` | `Psalms 119:96-97,98` | `CommaList`         |
//!
//! Semicolons separate independent references, see [`classify_all`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

const BOOK: &str = r"(?P<book>(?:[1-4]\s*)?[A-Za-z]+(?:\s+[A-Za-z]+)*)";

static MULTI_CHAPTER: Lazy<Regex> = Lazy::new(|| {
    let pattern = r"\s+(?P<c1>\d+):(?P<v1>\d+)\s*-\s*(?P<c2>\d+):(?P<v2>\d+)$";
    Regex::new(&format!("^{BOOK}{pattern}")).unwrap()
});
static CHAPTER_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{BOOK}\s+(?P<c1>\d+)\s*-\s*(?P<c2>\d+)$")).unwrap());
static VERSE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{BOOK}\s+(?P<c>\d+):(?P<v1>\d+)\s*-\s*(?P<v2>\d+)$")).unwrap()
});
static VERSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{BOOK}\s+(?P<c>\d+):(?P<v>\d+)$")).unwrap());
static CHAPTER: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"^{BOOK}\s+(?P<c>\d+)$")).unwrap());

/// Segments after a comma may leave out the book, and the chapter too.
static REL_MULTI_CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<c1>\d+):(?P<v1>\d+)\s*-\s*(?P<c2>\d+):(?P<v2>\d+)$").unwrap());
static REL_CHAPTER_VERSES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<c>\d+):(?P<v1>\d+)(?:\s*-\s*(?P<v2>\d+))?$").unwrap());
static REL_NUMBERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<n1>\d+)(?:\s*-\s*(?P<n2>\d+))?$").unwrap());

/// Shape of a reference.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    Chapter,
    Verse,
    VerseRange,
    MultiChapterRange,
    CommaList,
}

/// A single classified reference. `kind` is never [`Kind::CommaList`]; comma
/// lists are a [`Reference::CommaList`] of these.
///
/// | kind                | chapter_end | verse_start | verse_end |
/// |---------------------|-------------|-------------|-----------|
/// | `Chapter`           | -           | -           | -         |
/// | `Verse`             | -           | yes         | -         |
/// | `VerseRange`        | -           | yes         | yes       |
/// | `MultiChapterRange` | yes         | optional    | optional  |
///
/// A multi-chapter range without verses covers whole chapters.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedReference {
    pub book: String,
    pub chapter: u32,
    pub chapter_end: Option<u32>,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
    pub kind: Kind,
}

impl ParsedReference {
    pub fn chapter(book: String, chapter: u32) -> Self {
        Self {
            book,
            chapter,
            chapter_end: None,
            verse_start: None,
            verse_end: None,
            kind: Kind::Chapter,
        }
    }
    pub fn verse(book: String, chapter: u32, verse: u32) -> Self {
        Self {
            verse_start: Some(verse),
            kind: Kind::Verse,
            ..Self::chapter(book, chapter)
        }
    }
    /// `None` if `end < start`.
    pub fn verse_range(book: String, chapter: u32, start: u32, end: u32) -> Option<Self> {
        if end < start {
            return None;
        }
        Some(Self {
            verse_start: Some(start),
            verse_end: Some(end),
            kind: Kind::VerseRange,
            ..Self::chapter(book, chapter)
        })
    }
    /// Whole chapters `start..=end`; `None` if `end < start`.
    pub fn chapter_range(book: String, start: u32, end: u32) -> Option<Self> {
        match end.cmp(&start) {
            std::cmp::Ordering::Less => None,
            std::cmp::Ordering::Equal => Some(Self::chapter(book, start)),
            std::cmp::Ordering::Greater => Some(Self {
                chapter_end: Some(end),
                kind: Kind::MultiChapterRange,
                ..Self::chapter(book, start)
            }),
        }
    }
    /// `c1:v1` through `c2:v2`; `None` if the end precedes the start.
    pub fn multi_chapter(book: String, c1: u32, v1: u32, c2: u32, v2: u32) -> Option<Self> {
        match c2.cmp(&c1) {
            std::cmp::Ordering::Less => None,
            std::cmp::Ordering::Equal => Self::verse_range(book, c1, v1, v2),
            std::cmp::Ordering::Greater => Some(Self {
                chapter_end: Some(c2),
                verse_start: Some(v1),
                verse_end: Some(v2),
                kind: Kind::MultiChapterRange,
                ..Self::chapter(book, c1)
            }),
        }
    }

    /// Chapter the reference ends in.
    pub fn last_chapter(&self) -> u32 {
        self.chapter_end.unwrap_or(self.chapter)
    }
    fn has_verses(&self) -> bool {
        self.verse_start.is_some()
    }

    /// Passage without the book, e.g. `119:96-97`.
    fn passage(&self) -> String {
        match (self.kind, self.chapter_end, self.verse_start, self.verse_end) {
            (Kind::MultiChapterRange, Some(c2), Some(v1), Some(v2)) => {
                format!("{}:{v1}-{c2}:{v2}", self.chapter)
            }
            (Kind::MultiChapterRange, Some(c2), _, _) => format!("{}-{c2}", self.chapter),
            (Kind::VerseRange, _, Some(v1), Some(v2)) => format!("{}:{v1}-{v2}", self.chapter),
            (_, _, Some(v), _) => format!("{}:{v}", self.chapter),
            _ => self.chapter.to_string(),
        }
    }
}

impl fmt::Display for ParsedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book, self.passage())
    }
}

/// A classified reference string.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Reference {
    Single(ParsedReference),
    /// At least one part, in input order.
    CommaList(Vec<ParsedReference>),
}

impl Reference {
    pub fn kind(&self) -> Kind {
        match self {
            Reference::Single(p) => p.kind,
            Reference::CommaList(_) => Kind::CommaList,
        }
    }
    /// The simple references making up `self`.
    pub fn parts(&self) -> &[ParsedReference] {
        match self {
            Reference::Single(p) => std::slice::from_ref(p),
            Reference::CommaList(parts) => parts,
        }
    }
}

/// Normalised form; list parts repeat only what changed from the previous
/// part (`Psalms 119:96-97, 98, 120:1`). A bare number after a part with
/// verses reads as a verse, so whole chapters there repeat the book.
impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev: Option<&ParsedReference> = None;
        for part in self.parts() {
            match prev {
                None => write!(f, "{part}")?,
                Some(p) if p.book != part.book => write!(f, ", {part}")?,
                Some(p) if p.has_verses() && !part.has_verses() => write!(f, ", {part}")?,
                Some(p)
                    if p.has_verses()
                        && matches!(part.kind, Kind::Verse | Kind::VerseRange)
                        && part.chapter == p.last_chapter() =>
                {
                    let passage = part.passage();
                    let verses = passage.split_once(':').map_or(passage.as_str(), |(_, v)| v);
                    write!(f, ", {verses}")?
                }
                Some(_) => write!(f, ", {}", part.passage())?,
            }
            prev = Some(part);
        }
        Ok(())
    }
}

/// Normalises a book name: whitespace collapsed, first letter upper-cased,
/// and "Song of Solomon" spelled "Song of Songs" as in the Bible texts.
///
/// ```
/// use katameros::reference::normalize_book;
///
/// assert_eq!("1 John", normalize_book("1  john"));
/// assert_eq!("Song of Songs", normalize_book("song of Solomon"));
/// assert_eq!("Song of Songs", normalize_book("Song of solomon"));
/// ```
pub fn normalize_book(raw: &str) -> String {
    let mut book = String::with_capacity(raw.len());
    let mut capitalized = false;
    for (i, word) in raw.split_whitespace().enumerate() {
        if i > 0 {
            book.push(' ');
        }
        for ch in word.chars() {
            if !capitalized && ch.is_ascii_alphabetic() {
                book.push(ch.to_ascii_uppercase());
                capitalized = true;
            } else {
                book.push(ch);
            }
        }
    }
    if book == "Song of Solomon" || book == "Song of solomon" {
        return "Song of Songs".to_owned();
    }
    book
}

fn num(caps: &Captures, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok().filter(|&n| n > 0)
}

fn book(caps: &Captures) -> String {
    normalize_book(&caps["book"])
}

/// Classifies a reference that names its book.
fn parse_full(s: &str) -> Option<ParsedReference> {
    if let Some(caps) = MULTI_CHAPTER.captures(s) {
        let (c1, v1) = (num(&caps, "c1")?, num(&caps, "v1")?);
        let (c2, v2) = (num(&caps, "c2")?, num(&caps, "v2")?);
        return ParsedReference::multi_chapter(book(&caps), c1, v1, c2, v2);
    }
    if let Some(caps) = CHAPTER_RANGE.captures(s) {
        return ParsedReference::chapter_range(book(&caps), num(&caps, "c1")?, num(&caps, "c2")?);
    }
    if let Some(caps) = VERSE_RANGE.captures(s) {
        let (v1, v2) = (num(&caps, "v1")?, num(&caps, "v2")?);
        return ParsedReference::verse_range(book(&caps), num(&caps, "c")?, v1, v2);
    }
    if let Some(caps) = VERSE.captures(s) {
        return Some(ParsedReference::verse(book(&caps), num(&caps, "c")?, num(&caps, "v")?));
    }
    if let Some(caps) = CHAPTER.captures(s) {
        return Some(ParsedReference::chapter(book(&caps), num(&caps, "c")?));
    }
    None
}

/// Classifies a list segment that may lean on the previous one for its book
/// and chapter.
fn parse_relative(s: &str, prev: &ParsedReference) -> Option<ParsedReference> {
    let book = prev.book.clone();
    if let Some(caps) = REL_MULTI_CHAPTER.captures(s) {
        let (c1, v1) = (num(&caps, "c1")?, num(&caps, "v1")?);
        let (c2, v2) = (num(&caps, "c2")?, num(&caps, "v2")?);
        return ParsedReference::multi_chapter(book, c1, v1, c2, v2);
    }
    if let Some(caps) = REL_CHAPTER_VERSES.captures(s) {
        let (c, v1) = (num(&caps, "c")?, num(&caps, "v1")?);
        return match caps.name("v2") {
            Some(_) => ParsedReference::verse_range(book, c, v1, num(&caps, "v2")?),
            None => Some(ParsedReference::verse(book, c, v1)),
        };
    }
    let caps = REL_NUMBERS.captures(s)?;
    let n1 = num(&caps, "n1")?;
    let n2 = match caps.name("n2") {
        Some(_) => Some(num(&caps, "n2")?),
        None => None,
    };
    if prev.has_verses() {
        let chapter = prev.last_chapter();
        match n2 {
            Some(n2) => ParsedReference::verse_range(book, chapter, n1, n2),
            None => Some(ParsedReference::verse(book, chapter, n1)),
        }
    } else {
        match n2 {
            Some(n2) => ParsedReference::chapter_range(book, n1, n2),
            None => Some(ParsedReference::chapter(book, n1)),
        }
    }
}

/// Classifies one reference string.
///
/// Returns `None` when the string has none of the recognised shapes, which
/// callers treat as "no reading", not as an error. Segments of a comma list
/// that fail to classify are dropped; the list is `None` only when every
/// segment fails.
///
/// # Example
///
/// ```
/// use katameros::reference::{classify, Kind};
///
/// let r = classify("Psalms 119:96-97").unwrap();
/// assert_eq!(Kind::VerseRange, r.kind());
/// assert_eq!((Some(96), Some(97)), (r.parts()[0].verse_start, r.parts()[0].verse_end));
///
/// assert_eq!(Kind::CommaList, classify("Psalms 119:96-97,98,101").unwrap().kind());
/// assert_eq!(None, classify("Glory be to God"));
/// ```
pub fn classify(input: &str) -> Option<Reference> {
    let input = input.trim();
    if !input.contains(',') {
        return parse_full(input).map(Reference::Single);
    }

    let mut parts: Vec<ParsedReference> = Vec::new();
    for segment in input.split(',').map(str::trim) {
        let parsed = match parts.last() {
            None => parse_full(segment),
            Some(prev) => parse_full(segment).or_else(|| parse_relative(segment, prev)),
        };
        match parsed {
            Some(part) => parts.push(part),
            None => debug!(segment, input, "dropping unclassifiable reference segment"),
        }
    }
    (!parts.is_empty()).then_some(Reference::CommaList(parts))
}

/// Splits a semicolon-delimited string and classifies every item on its own;
/// items that fail are dropped without affecting the others.
///
/// ```
/// use katameros::reference::classify_all;
///
/// let refs = classify_all("Psalms 119:96-97;nonsense;John 3:16");
/// assert_eq!(2, refs.len());
/// assert_eq!("John 3:16", refs[1].to_string());
/// ```
pub fn classify_all(input: &str) -> Vec<Reference> {
    input
        .split(';')
        .filter(|item| !item.trim().is_empty())
        .filter_map(|item| {
            let classified = classify(item);
            if classified.is_none() {
                debug!(item, "dropping unclassifiable reference");
            }
            classified
        })
        .collect()
}
