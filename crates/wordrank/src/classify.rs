//! Base/derived classification of candidate words.
//!
//! A word is *derived* when it looks like a regular inflection of another word:
//! anything ending in `ing`, a noun that is its lemma plus `s`/`es`, or a verb
//! that is its lemma plus `d`/`ed`. Everything else, including irregular forms
//! such as `geese` or `ran`, is a *base* word.
//!
//! The `ing` check is purely on the surface, so base nouns such as `king` or
//! `thing` are classified as derived. Downstream orderings depend on that, so
//! it is kept as is.

use std::fmt;

use tracing::debug;
use wordnet_types::Pos;

/// Lemma and coarse category reported for a single word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Analysis {
    pub lemma: String,
    pub category: Pos,
}

impl Analysis {
    pub fn new(lemma: impl Into<String>, category: Pos) -> Self {
        Self {
            lemma: lemma.into(),
            category,
        }
    }
}

/// Lemmatizer plus coarse part-of-speech tagger.
///
/// Returns `None` when the word cannot be analyzed; the classifier then treats
/// it as a base word.
pub trait TaggingOracle {
    fn analyze(&self, word: &str) -> Option<Analysis>;
}

/// Which regular inflection a derived word was recognised as.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Inflection {
    Progressive,
    Plural,
    Past,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Classification {
    Base,
    Derived(Inflection),
}

impl Classification {
    pub fn is_derived(self) -> bool {
        matches!(self, Classification::Derived(_))
    }

    /// Primary sort bucket: base words before derived ones.
    pub fn bucket(self) -> u8 {
        match self {
            Classification::Base => 0,
            Classification::Derived(_) => 1,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Base => f.write_str("base"),
            Classification::Derived(Inflection::Progressive) => f.write_str("derived (progressive)"),
            Classification::Derived(Inflection::Plural) => f.write_str("derived (plural)"),
            Classification::Derived(Inflection::Past) => f.write_str("derived (past)"),
        }
    }
}

/// Match a word against its lemma for the plural and past-tense rules.
///
/// Both rules demand exact string equality with the lemma plus suffix, so
/// irregular forms never match.
pub fn inflection_of(word: &str, lemma: &str, category: Pos) -> Option<Inflection> {
    let suffix = word.strip_prefix(lemma)?;
    match (category, suffix) {
        (Pos::Noun, "s" | "es") => Some(Inflection::Plural),
        (Pos::Verb, "d" | "ed") => Some(Inflection::Past),
        _ => None,
    }
}

/// Classifies words against an explicitly supplied oracle.
pub struct Classifier<'a> {
    oracle: &'a dyn TaggingOracle,
}

impl<'a> Classifier<'a> {
    pub fn new(oracle: &'a dyn TaggingOracle) -> Self {
        Self { oracle }
    }

    pub fn classify(&self, word: &str) -> Classification {
        let word = word.to_lowercase();
        if word.ends_with("ing") {
            return Classification::Derived(Inflection::Progressive);
        }

        let Some(analysis) = self.oracle.analyze(&word) else {
            debug!("{word}: no analysis, base");
            return Classification::Base;
        };
        let lemma = analysis.lemma.to_lowercase();
        let class = match inflection_of(&word, &lemma, analysis.category) {
            Some(inflection) => Classification::Derived(inflection),
            None => Classification::Base,
        };
        debug!("{word}: lemma {lemma} ({}), {class}", analysis.category);
        class
    }
}
