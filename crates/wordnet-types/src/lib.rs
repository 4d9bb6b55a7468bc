//! Types shared by the WordNet lexicon and morphology crates.
//!
//! [`Pos`] is the coarse grammatical category used everywhere a lemma is keyed,
//! and [`LemmaStats`] carries the counts an `index.*` line records for a lemma.
//!
//! ```rust
//! use wordnet_types::Pos;
//!
//! assert_eq!(Pos::from_char('s'), Some(Pos::Adj));
//! assert_eq!(Pos::Verb.to_string(), "verb");
//! ```

use std::fmt;
use std::str::FromStr;

/// Part-of-speech marker as used by WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    /// Every category, in the order lookups should try them.
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*` lines.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix of the per-category dictionary files (`index.noun`, `verb.exc`, ...).
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// Error returned when a category name is not one of `noun`, `verb`, `adj`, `adv`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownPos(pub String);

impl fmt::Display for UnknownPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown part of speech: {}", self.0)
    }
}

impl std::error::Error for UnknownPos {}

impl FromStr for Pos {
    type Err = UnknownPos;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noun" | "n" => Ok(Pos::Noun),
            "verb" | "v" => Ok(Pos::Verb),
            "adj" | "a" | "s" => Ok(Pos::Adj),
            "adv" | "r" => Ok(Pos::Adv),
            _ => Err(UnknownPos(s.to_string())),
        }
    }
}

/// Counts recorded for one lemma in one category of the index files.
///
/// `tagsense_cnt` counts how many of the lemma's senses occur in WordNet's tagged
/// corpora. It measures breadth of meaning, not how often the word is used.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LemmaStats {
    pub synset_cnt: u32,
    pub sense_cnt: u32,
    pub tagsense_cnt: u32,
}
