//! WordNet-style morphological processing (morphy).
//!
//! Recovers dictionary lemmas from inflected surface forms: check the surface
//! form itself, then the exception lists, then POS-specific suffix rules, and
//! keep only candidates that a caller-provided predicate says exist. The crate
//! is decoupled from any particular loader; it only depends on `Pos` and the
//! callback you supply.
//!
//! # How it works
//! 1. Emit the surface form if it exists.
//! 2. Check exceptions (`*.exc` files), e.g. `geese -> goose`.
//! 3. Apply suffix rules. Stems ending in a doubled consonant also yield the
//!    undoubled stem (`running -> runn, run`).
//! 4. Deduplicate while preserving provenance (`Surface`, `Exception`, `Rule`).
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, Lexicon};
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/path/to/wordnet";
//! let lexicon = Lexicon::load_with_mode(dict, LoadMode::Mmap)?;
//! let morph = Morphy::load(dict)?;
//! let exists = |pos, lemma: &str| lexicon.lemma_exists(pos, lemma);
//!
//! for cand in morph.lemmas_for(Pos::Verb, "walked", exists) {
//!     println!("{:?}: {}", cand.source, cand.lemma);
//! }
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wordnet_types::Pos;

/// Where a candidate lemma originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    Surface,
    Exception,
    Rule {
        suffix: &'static str,
        replacement: &'static str,
    },
}

/// A lemma candidate paired with its POS and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate<'a> {
    pub pos: Pos,
    pub lemma: Cow<'a, str>,
    pub source: CandidateSource,
}

/// Morphy parameterised by caller-provided existence checks.
#[derive(Debug, Default)]
pub struct Morphy {
    exceptions: HashMap<Pos, HashMap<String, Vec<String>>>,
}

impl Morphy {
    /// A morphy with no exception lists; only surface and rule candidates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load exception lists (`noun.exc`, `verb.exc`, ...) from a WordNet dict directory.
    ///
    /// Files are optional; missing ones are treated as empty.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut exceptions = HashMap::new();
        for pos in Pos::ALL {
            let path = dir.join(format!("{}.exc", pos.file_suffix()));
            exceptions.insert(pos, load_exc(path)?);
        }
        Ok(Self { exceptions })
    }

    /// Register an irregular form, e.g. `(Pos::Noun, "mice", ["mouse"])`.
    pub fn with_exception<I, S>(mut self, pos: Pos, surface: &str, lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lemmas: Vec<String> = lemmas.into_iter().map(|l| normalize(l.as_ref())).collect();
        if !lemmas.is_empty() {
            self.exceptions
                .entry(pos)
                .or_default()
                .insert(normalize(surface), lemmas);
        }
        self
    }

    /// Number of exception entries loaded for `pos`.
    pub fn exception_count(&self, pos: Pos) -> usize {
        self.exceptions.get(&pos).map_or(0, HashMap::len)
    }

    /// Generate lemmas for a surface form in one category, with provenance.
    ///
    /// The callback `lemma_exists` typically delegates to `Lexicon::lemma_exists`
    /// so this crate stays ignorant of any concrete database layout.
    pub fn lemmas_for<'a, F>(
        &'a self,
        pos: Pos,
        surface: &str,
        lemma_exists: F,
    ) -> Vec<LemmaCandidate<'a>>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let mut seen: HashSet<Cow<'a, str>> = HashSet::new();
        let mut out: Vec<LemmaCandidate<'a>> = Vec::new();
        let norm_surface = normalize(surface);
        if norm_surface.is_empty() {
            return out;
        }

        if lemma_exists(pos, &norm_surface) {
            push_unique(
                &mut out,
                &mut seen,
                LemmaCandidate {
                    pos,
                    lemma: Cow::Owned(norm_surface.clone()),
                    source: CandidateSource::Surface,
                },
            );
        }

        // Exceptions may list several lemmas for one surface form.
        if let Some(entries) = self
            .exceptions
            .get(&pos)
            .and_then(|exc| exc.get(&norm_surface))
        {
            for lemma in entries.iter().filter(|l| lemma_exists(pos, l)) {
                push_unique(
                    &mut out,
                    &mut seen,
                    LemmaCandidate {
                        pos,
                        lemma: Cow::Borrowed(lemma.as_str()),
                        source: CandidateSource::Exception,
                    },
                );
            }
        }

        for &(suffix, replacement) in rules_for(pos) {
            for candidate in apply_rule(&norm_surface, suffix, replacement) {
                if lemma_exists(pos, &candidate) {
                    push_unique(
                        &mut out,
                        &mut seen,
                        LemmaCandidate {
                            pos,
                            lemma: Cow::Owned(candidate),
                            source: CandidateSource::Rule {
                                suffix,
                                replacement,
                            },
                        },
                    );
                }
            }
        }

        out
    }

    /// Candidates across every category, in `Pos::ALL` order.
    pub fn lemmas_for_any<'a, F>(
        &'a self,
        surface: &str,
        lemma_exists: F,
    ) -> Vec<LemmaCandidate<'a>>
    where
        F: Fn(Pos, &str) -> bool,
    {
        Pos::ALL
            .into_iter()
            .flat_map(|pos| self.lemmas_for(pos, surface, &lemma_exists))
            .collect()
    }
}

fn load_exc(path: PathBuf) -> Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(&path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let Some(surface) = parts.next().map(normalize) else {
            continue;
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.insert(surface, lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn push_unique<'a>(
    out: &mut Vec<LemmaCandidate<'a>>,
    seen: &mut HashSet<Cow<'a, str>>,
    candidate: LemmaCandidate<'a>,
) {
    if seen.insert(candidate.lemma.clone()) {
        out.push(candidate);
    }
}

/// Strip `suffix` and append `replacement`, returning every stem worth checking.
///
/// When nothing is appended and the stem ends in a doubled consonant, the
/// undoubled stem follows the literal one (`stopped -> stopp, stop`).
fn apply_rule(surface: &str, suffix: &str, replacement: &str) -> Vec<String> {
    let Some(stem) = surface.strip_suffix(suffix) else {
        return Vec::new();
    };
    if stem.is_empty() {
        return Vec::new();
    }
    if !replacement.is_empty() {
        return vec![format!("{stem}{replacement}")];
    }

    let mut out = vec![stem.to_string()];
    let mut tail = stem.chars().rev();
    if let (Some(last), Some(prev)) = (tail.next(), tail.next())
        && last == prev
        && is_consonant(last)
    {
        let mut undoubled = stem.to_string();
        undoubled.pop();
        out.push(undoubled);
    }
    out
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj | Pos::Adv => &[("er", ""), ("er", "e"), ("est", ""), ("est", "e")],
    }
}
