//! Expansion of classified references into verse text.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::Corpus;
use crate::error::{Missing, MissingVerseError};
use crate::reference::{self, ParsedReference, Reference};

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Verse {
    pub num: u32,
    pub text: String,
}

/// Verses read from one chapter, ascending and unique by `num`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterReading {
    pub chapter: u32,
    pub verses: Vec<Verse>,
    /// Read as a chapter or a range of whole chapters; rendered with verse
    /// numbers.
    pub whole: bool,
}

/// Text of a reference, grouped by chapter.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReading {
    pub book: String,
    pub chapters: Vec<ChapterReading>,
}

impl ResolvedReading {
    /// Normalised reference, one `"<book> <chapter>:<verses>"` per chapter
    /// joined by `"; "`. Gaps in the verses are listed with commas.
    ///
    /// ```
    /// use katameros::corpus::Bible;
    /// use katameros::resolver::resolve_all;
    ///
    /// let bible = Bible::from_json_str(r#"{"books": [{"name": "Psalms", "chapters": [
    ///     {"num": 119, "verses": [{"num": 96, "text": "a"}, {"num": 97, "text": "b"},
    ///                             {"num": 98, "text": "c"}, {"num": 101, "text": "d"}]}
    /// ]}]}"#).unwrap();
    ///
    /// let readings = resolve_all("psalms 119:96-97,98,101", &bible);
    /// assert_eq!("Psalms 119:96-98, 101", readings[0].as_ref().unwrap().reference());
    /// ```
    pub fn reference(&self) -> String {
        self.chapters
            .iter()
            .map(|c| {
                if c.whole {
                    return format!("{} {}", self.book, c.chapter);
                }
                let mut runs: Vec<(u32, u32)> = Vec::new();
                for v in &c.verses {
                    match runs.last_mut() {
                        Some((_, last)) if *last + 1 == v.num => *last = v.num,
                        _ => runs.push((v.num, v.num)),
                    }
                }
                let runs: Vec<String> = runs
                    .into_iter()
                    .map(|(a, b)| if a == b { a.to_string() } else { format!("{a}-{b}") })
                    .collect();
                format!("{} {}:{}", self.book, c.chapter, runs.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Verse text in reading order. Whole chapters carry their verse
    /// numbers; a single verse is exactly its text.
    pub fn text(&self) -> String {
        let mut out: Vec<String> = Vec::new();
        for chapter in &self.chapters {
            for verse in &chapter.verses {
                if chapter.whole {
                    out.push(format!("{} {}", verse.num, verse.text));
                } else {
                    out.push(verse.text.clone());
                }
            }
        }
        out.join(" ")
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }
}

struct Resolver<'a, C: ?Sized> {
    corpus: &'a C,
    book: &'a str,
    reference: &'a ParsedReference,
}

impl<C: Corpus + ?Sized> Resolver<'_, C> {
    fn missing(&self, missing: Missing) -> MissingVerseError {
        MissingVerseError {
            reference: self.reference.to_string(),
            missing,
        }
    }

    fn check_chapter(&self, chapter: u32) -> Result<(), MissingVerseError> {
        if self.corpus.has_chapter(self.book, chapter) {
            Ok(())
        } else {
            Err(self.missing(Missing::Chapter(chapter)))
        }
    }

    fn verse(&self, chapter: u32, num: u32) -> Result<Verse, MissingVerseError> {
        self.corpus
            .verse(self.book, chapter, num)
            .map(|text| Verse {
                num,
                text: text.to_owned(),
            })
            .ok_or_else(|| self.missing(Missing::Verse { chapter, verse: num }))
    }

    /// `start..=end`, every verse required.
    fn span(
        &self,
        chapter: u32,
        start: u32,
        end: u32,
    ) -> Result<ChapterReading, MissingVerseError> {
        self.check_chapter(chapter)?;
        let verses = (start..=end)
            .map(|num| self.verse(chapter, num))
            .collect::<Result<_, _>>()?;
        Ok(ChapterReading {
            chapter,
            verses,
            whole: false,
        })
    }

    /// From `start` while verses are present; `start` itself is required.
    fn to_end(
        &self,
        chapter: u32,
        start: u32,
        whole: bool,
    ) -> Result<ChapterReading, MissingVerseError> {
        self.check_chapter(chapter)?;
        let mut verses = vec![self.verse(chapter, start)?];
        let mut num = start + 1;
        while let Some(text) = self.corpus.verse(self.book, chapter, num) {
            verses.push(Verse {
                num,
                text: text.to_owned(),
            });
            num += 1;
        }
        Ok(ChapterReading {
            chapter,
            verses,
            whole,
        })
    }

    fn run(&self) -> Result<Vec<ChapterReading>, MissingVerseError> {
        let r = self.reference;
        let chapters = match (r.chapter_end, r.verse_start, r.verse_end) {
            (None, None, _) => vec![self.to_end(r.chapter, 1, true)?],
            (None, Some(v), None) => vec![self.span(r.chapter, v, v)?],
            (None, Some(v1), Some(v2)) => vec![self.span(r.chapter, v1, v2)?],
            (Some(c2), None, _) => (r.chapter..=c2)
                .map(|c| self.to_end(c, 1, true))
                .collect::<Result<_, _>>()?,
            (Some(c2), Some(v1), v2) => {
                let mut chapters = vec![self.to_end(r.chapter, v1, false)?];
                for c in r.chapter + 1..c2 {
                    chapters.push(self.to_end(c, 1, false)?);
                }
                if c2 > r.chapter {
                    chapters.push(match v2 {
                        Some(v2) => self.span(c2, 1, v2)?,
                        None => self.to_end(c2, 1, false)?,
                    });
                }
                chapters
            }
        };
        Ok(chapters)
    }
}

/// Resolves one simple reference against `corpus`.
///
/// Verse ranges are read `start..=end` and every verse must exist. A chapter
/// is read from verse 1 until the first missing number. A multi-chapter
/// range runs from its first verse to the end of that chapter, takes middle
/// chapters whole and ends at its last verse.
///
/// # Example
///
/// ```
/// use katameros::corpus::Bible;
/// use katameros::reference::classify;
/// use katameros::resolver::resolve;
///
/// let bible = Bible::from_json_str(r#"{"books": [{"name": "John", "chapters": [
///     {"num": 3, "verses": [{"num": 16, "text": "For God so loved the world"}]}
/// ]}]}"#).unwrap();
///
/// let r = classify("John 3:16").unwrap();
/// let reading = resolve(&r.parts()[0], &bible).unwrap();
/// assert_eq!("For God so loved the world", reading.text());
/// assert_eq!("John 3:16", reading.reference());
///
/// let r = classify("John 3:16-17").unwrap();
/// assert!(resolve(&r.parts()[0], &bible).is_err());
/// ```
pub fn resolve<C: Corpus + ?Sized>(
    reference: &ParsedReference,
    corpus: &C,
) -> Result<ResolvedReading, MissingVerseError> {
    let book = corpus.book_name(&reference.book).ok_or_else(|| MissingVerseError {
        reference: reference.to_string(),
        missing: Missing::Book(reference.book.clone()),
    })?;
    let chapters = Resolver {
        corpus,
        book,
        reference,
    }
    .run()?;
    Ok(ResolvedReading {
        book: book.to_owned(),
        chapters,
    })
}

/// Resolves every part of a reference and merges parts of the same book.
/// The first missing part fails the whole reference.
pub fn resolve_reference<C: Corpus + ?Sized>(
    reference: &Reference,
    corpus: &C,
) -> Result<Vec<ResolvedReading>, MissingVerseError> {
    let readings = reference
        .parts()
        .iter()
        .map(|part| resolve(part, corpus))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge(readings))
}

/// Resolves a semicolon-delimited list. Unclassifiable items are dropped;
/// each remaining item succeeds or fails on its own.
pub fn resolve_all<C: Corpus + ?Sized>(
    input: &str,
    corpus: &C,
) -> Vec<Result<ResolvedReading, MissingVerseError>> {
    let mut out = Vec::new();
    for reference in reference::classify_all(input) {
        match resolve_reference(&reference, corpus) {
            Ok(readings) => out.extend(readings.into_iter().map(Ok)),
            Err(err) => out.push(Err(err)),
        }
    }
    out
}

/// Combines consecutive readings of the same book, keeping chapters and
/// verses ordered and unique.
///
/// ```
/// use katameros::resolver::{merge, ChapterReading, ResolvedReading, Verse};
///
/// let reading = |chapter, num: u32| ResolvedReading {
///     book: "Psalms".into(),
///     chapters: vec![ChapterReading {
///         chapter,
///         verses: vec![Verse { num, text: num.to_string() }],
///         whole: false,
///     }],
/// };
///
/// let merged = merge(vec![reading(119, 98), reading(119, 96), reading(119, 98)]);
/// assert_eq!(1, merged.len());
/// assert_eq!("96 98", merged[0].text());
/// ```
pub fn merge(readings: Vec<ResolvedReading>) -> Vec<ResolvedReading> {
    let mut out: Vec<ResolvedReading> = Vec::with_capacity(readings.len());
    for reading in readings {
        match out.last_mut() {
            Some(last) if last.book == reading.book => {
                let chapters = std::mem::take(&mut last.chapters);
                last.chapters = merge_chapters(chapters, reading.chapters);
            }
            _ => out.push(reading),
        }
    }
    out
}

fn merge_chapters(a: Vec<ChapterReading>, b: Vec<ChapterReading>) -> Vec<ChapterReading> {
    let mut chapters: BTreeMap<u32, (bool, BTreeMap<u32, String>)> = BTreeMap::new();
    for c in a.into_iter().chain(b) {
        let (whole, verses) = chapters.entry(c.chapter).or_default();
        *whole |= c.whole;
        for v in c.verses {
            verses.entry(v.num).or_insert(v.text);
        }
    }
    chapters
        .into_iter()
        .map(|(chapter, (whole, verses))| ChapterReading {
            chapter,
            verses: verses
                .into_iter()
                .map(|(num, text)| Verse { num, text })
                .collect(),
            whole,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Bible;
    use crate::reference::classify;

    fn bible() -> Bible {
        let verses = |n: u32, prefix: &str| {
            (1..=n)
                .map(|i| format!(r#"{{"num": {i}, "text": "{prefix}{i}"}}"#))
                .collect::<Vec<_>>()
                .join(",")
        };
        let json = format!(
            r#"{{"books": [
                {{"name": "Psalms", "chapters": [
                    {{"num": 119, "verses": [{}]}},
                    {{"num": 120, "verses": [{}]}}
                ]}},
                {{"name": "2 Peter", "chapters": [
                    {{"num": 1, "verses": [{}]}},
                    {{"num": 2, "verses": [{}]}},
                    {{"num": 3, "verses": [{}]}}
                ]}},
                {{"name": "Jude", "chapters": [
                    {{"num": 1, "verses": [
                        {{"num": 1, "text": "j1"}},
                        {{"num": 2, "text": "j2"}},
                        {{"num": 4, "text": "j4"}}
                    ]}}
                ]}}
            ]}}"#,
            verses(176, "p"),
            verses(7, "q"),
            verses(21, "a"),
            verses(22, "b"),
            verses(18, "c"),
        );
        Bible::from_json_str(&json).unwrap()
    }

    fn resolve_str(input: &str) -> Result<ResolvedReading, MissingVerseError> {
        let r = classify(input).unwrap();
        resolve(&r.parts()[0], &bible())
    }

    #[test]
    fn verse_range() {
        let reading = resolve_str("Psalms 119:96-97").unwrap();
        assert_eq!("p96 p97", reading.text());
        assert_eq!("Psalms 119:96-97", reading.reference());

        let reading = resolve_str("Psalms 119:9-10").unwrap();
        let nums: Vec<_> = reading.chapters[0].verses.iter().map(|v| v.num).collect();
        assert_eq!(vec![9, 10], nums);
    }

    #[test]
    fn single_verse() {
        let reading = resolve_str("psalms 119:96").unwrap();
        assert_eq!("Psalms", reading.book);
        assert_eq!("p96", reading.text());
        assert_eq!(1, reading.verse_count());
    }

    #[test]
    fn whole_chapter() {
        let reading = resolve_str("Psalms 120").unwrap();
        assert_eq!("1 q1 2 q2 3 q3 4 q4 5 q5 6 q6 7 q7", reading.text());
        assert_eq!("Psalms 120", reading.reference());

        // stops at the first gap
        let reading = resolve_str("Jude 1").unwrap();
        assert_eq!("1 j1 2 j2", reading.text());
    }

    #[test]
    fn multi_chapter() {
        let reading = resolve_str("2 Peter 1:19-2:8").unwrap();
        let nums: Vec<_> = reading
            .chapters
            .iter()
            .map(|c| (c.chapter, c.verses.first().unwrap().num, c.verses.last().unwrap().num))
            .collect();
        assert_eq!(vec![(1, 19, 21), (2, 1, 8)], nums);
        assert_eq!("2 Peter 1:19-21; 2 Peter 2:1-8", reading.reference());
        assert_eq!(11, reading.verse_count());

        let reading = resolve_str("2 Peter 1:20-3:2").unwrap();
        let lens: Vec<_> = reading.chapters.iter().map(|c| c.verses.len()).collect();
        assert_eq!(vec![2, 22, 2], lens);

        let reading = resolve_str("2 Peter 2-3").unwrap();
        assert_eq!(40, reading.verse_count());
        assert!(reading.chapters.iter().all(|c| c.whole));

        // starting at verse 1 does not make the first chapter whole
        let reading = resolve_str("2 Peter 1:1-2:2").unwrap();
        assert!(reading.chapters.iter().all(|c| !c.whole));
        assert!(reading.text().starts_with("a1 a2 a3 "));
        assert!(reading.text().ends_with(" a21 b1 b2"));
        assert_eq!("2 Peter 1:1-21; 2 Peter 2:1-2", reading.reference());
    }

    #[test]
    fn missing() {
        let dataset = [
            ("Jubilees 1:1", Missing::Book("Jubilees".into())),
            ("Psalms 121", Missing::Chapter(121)),
            ("Psalms 120:8", Missing::Verse { chapter: 120, verse: 8 }),
            ("Psalms 120:6-9", Missing::Verse { chapter: 120, verse: 8 }),
            ("Jude 1:1-4", Missing::Verse { chapter: 1, verse: 3 }),
            ("2 Peter 3:1-4:2", Missing::Chapter(4)),
        ];
        for (input, expected) in dataset {
            let err = resolve_str(input).unwrap_err();
            assert_eq!(expected, err.missing, "{input}");
            assert_eq!(classify(input).unwrap().to_string(), err.reference);
        }
    }

    #[test]
    fn comma_list_merges() {
        let bible = bible();
        let r = classify("Psalms 119:96-97,98,101,97").unwrap();
        let readings = resolve_reference(&r, &bible).unwrap();
        assert_eq!(1, readings.len());
        assert_eq!("Psalms 119:96-98, 101", readings[0].reference());
        assert_eq!("p96 p97 p98 p101", readings[0].text());

        let r = classify("Psalms 119:1, 2 Peter 1:1").unwrap();
        assert_eq!(2, resolve_reference(&r, &bible).unwrap().len());

        let r = classify("Psalms 119:1, 200").unwrap();
        assert!(resolve_reference(&r, &bible).is_err());
    }

    #[test]
    fn semicolon_lists() {
        let bible = bible();
        let readings = resolve_all("Psalms 119:96-97;John 3:16", &bible);
        assert_eq!(2, readings.len());
        assert_eq!("p96 p97", readings[0].as_ref().unwrap().text());
        assert!(readings[1].is_err());

        let readings = resolve_all("Psalms 119:96-97;;gibberish;2 Peter 1:1", &bible);
        assert_eq!(2, readings.len());
        assert!(readings.iter().all(Result::is_ok));
    }

    #[test]
    fn merge_keeps_order() {
        let bible = bible();
        let parts = ["Psalms 120:3", "Psalms 119:5", "2 Peter 1:1", "Psalms 120:1"]
            .map(|s| resolve(&classify(s).unwrap().parts()[0], &bible).unwrap());
        let merged = merge(parts.to_vec());
        assert_eq!(3, merged.len());
        assert_eq!("Psalms 119:5; Psalms 120:3", merged[0].reference());
        assert_eq!("p5 q3", merged[0].text());
    }
}
