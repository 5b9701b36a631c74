//! Bible text collaborators.
//!
//! The resolver reads scripture through the [`Corpus`] trait, so any source
//! holding verses by book, chapter and verse number can stand behind it.
//! [`Bible`] is the in-memory source loaded from the JSON layout
//!
//! ```json
//! { "books": [ { "name": "John", "chapters": [
//!     { "num": 3, "verses": [ { "num": 16, "text": "For God so loved..." } ] }
//! ] } ] }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::DataError;

/// Read-only access to verse text.
///
/// Absence is always `None`/`false`, never a panic. Implementations are
/// shared between threads without locking.
pub trait Corpus: Sync {
    /// Canonical spelling of `book`, matched case-insensitively.
    fn book_name(&self, book: &str) -> Option<&str>;
    fn has_chapter(&self, book: &str, chapter: u32) -> bool;
    fn verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&str>;
}

impl<T: Corpus + ?Sized> Corpus for &T {
    fn book_name(&self, book: &str) -> Option<&str> {
        (**self).book_name(book)
    }
    fn has_chapter(&self, book: &str, chapter: u32) -> bool {
        (**self).has_chapter(book, chapter)
    }
    fn verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        (**self).verse(book, chapter, verse)
    }
}

#[derive(Deserialize)]
struct RawBible {
    books: Vec<RawBook>,
}

#[derive(Deserialize)]
struct RawBook {
    name: String,
    chapters: Vec<RawChapter>,
}

#[derive(Deserialize)]
struct RawChapter {
    num: u32,
    verses: Vec<RawVerse>,
}

#[derive(Deserialize)]
struct RawVerse {
    num: u32,
    text: String,
}

#[derive(Debug, Clone, Default)]
struct Book {
    name: String,
    chapters: BTreeMap<u32, BTreeMap<u32, String>>,
}

/// A whole Bible translation held in memory.
///
/// # Example
///
/// ```
/// use katameros::corpus::{Bible, Corpus};
///
/// let bible = Bible::from_json_str(r#"{"books": [{"name": "John", "chapters": [
///     {"num": 3, "verses": [{"num": 16, "text": "For God so loved the world"}]}
/// ]}]}"#).unwrap();
///
/// assert_eq!(Some("John"), bible.book_name("JOHN"));
/// assert_eq!(Some("For God so loved the world"), bible.verse("john", 3, 16));
/// assert_eq!(None, bible.verse("John", 3, 17));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bible {
    /// Keyed by lower-cased book name.
    books: BTreeMap<String, Book>,
}

impl Bible {
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let raw: RawBible = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let raw: RawBible = serde_json::from_reader(reader)?;
        Ok(Self::from_raw(raw))
    }
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading bible");
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    fn from_raw(raw: RawBible) -> Self {
        let mut books = BTreeMap::new();
        for raw_book in raw.books {
            let book = books
                .entry(raw_book.name.to_lowercase())
                .or_insert_with(|| Book {
                    name: raw_book.name.clone(),
                    chapters: BTreeMap::new(),
                });
            for chapter in raw_book.chapters {
                let verses = book.chapters.entry(chapter.num).or_default();
                for verse in chapter.verses {
                    verses.entry(verse.num).or_insert(verse.text);
                }
            }
        }
        let bible = Self { books };
        debug!(books = bible.books.len(), verses = bible.verse_count(), "bible loaded");
        bible
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }
    pub fn verse_count(&self) -> usize {
        self.books
            .values()
            .flat_map(|b| b.chapters.values())
            .map(BTreeMap::len)
            .sum()
    }

    fn book(&self, book: &str) -> Option<&Book> {
        self.books.get(&book.to_lowercase())
    }
}

impl Corpus for Bible {
    fn book_name(&self, book: &str) -> Option<&str> {
        self.book(book).map(|b| b.name.as_str())
    }
    fn has_chapter(&self, book: &str, chapter: u32) -> bool {
        self.book(book)
            .is_some_and(|b| b.chapters.contains_key(&chapter))
    }
    fn verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.book(book)?
            .chapters
            .get(&chapter)?
            .get(&verse)
            .map(String::as_str)
    }
}

/// Reads from `primary`, and from `fallback` whatever `primary` lacks.
///
/// Lets a partial translation be completed by a full one.
#[derive(Debug, Clone)]
pub struct Fallback<P, F> {
    pub primary: P,
    pub fallback: F,
}

impl<P: Corpus, F: Corpus> Fallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Corpus, F: Corpus> Corpus for Fallback<P, F> {
    fn book_name(&self, book: &str) -> Option<&str> {
        self.primary
            .book_name(book)
            .or_else(|| self.fallback.book_name(book))
    }
    fn has_chapter(&self, book: &str, chapter: u32) -> bool {
        self.primary.has_chapter(book, chapter) || self.fallback.has_chapter(book, chapter)
    }
    fn verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.primary
            .verse(book, chapter, verse)
            .or_else(|| self.fallback.verse(book, chapter, verse))
    }
}
