//! Lemma lexicon built from WordNet's `index.*` files.
//!
//! Only the index side of the WNDB format is read: one line per
//! `(lemma, category)` pair with its synset count, sense count, and the number
//! of those senses seen in the tagged corpora. That is enough to answer "is
//! this a word in this category?" and to weigh competing readings, which is
//! all a lemmatizer needs. The `data.*` files are never opened.
//!
//! Callers choose between memory-mapped files or owned buffers at runtime via
//! [`LoadMode`]. Parsed keys are owned, so the backing buffers are released as
//! soon as loading finishes.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, Lexicon};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let lexicon = Lexicon::load_with_mode("/path/to/wordnet", LoadMode::Mmap)?;
//! if let Some(stats) = lexicon.stats(Pos::Noun, "dog") {
//!     println!("dog: {} tagged senses", stats.tagsense_cnt);
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use tracing::debug;
use wordnet_types::{LemmaStats, Pos};

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each index file (fast, no copy of the raw text).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

impl LoadMode {
    /// Parse `mmap` / `owned`, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Names of the index files that must be present in a dictionary directory.
pub fn required_files() -> [String; 4] {
    Pos::ALL.map(|pos| format!("index.{}", pos.file_suffix()))
}

/// Lemma statistics for every category, keyed by normalized lemma.
pub struct Lexicon {
    entries: HashMap<(Pos, String), LemmaStats>,
}

impl Lexicon {
    /// Load the index files from `dict_dir`, memory-mapping them.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load the index files choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for name in required_files() {
            let path = dir.join(&name);
            if !path.exists() {
                bail!("missing required WordNet file: {}", path.display());
            }
        }

        let mut entries = HashMap::new();
        for pos in Pos::ALL {
            let path = dir.join(format!("index.{}", pos.file_suffix()));
            let buffer = load_file(&path, mode)?;
            let before = entries.len();
            parse_index(buffer.as_slice(), &path, pos, &mut entries)?;
            debug!(
                "loaded {} {} lemmas from {}",
                entries.len() - before,
                pos,
                path.display()
            );
        }

        Ok(Self { entries })
    }

    /// Build a lexicon directly from `(pos, lemma, stats)` triples.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Pos, S, LemmaStats)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(pos, lemma, stats)| ((pos, normalize_lemma(lemma.as_ref())), stats))
                .collect(),
        }
    }

    /// Check whether a lemma exists for the given POS according to index files.
    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        self.entries.contains_key(&(pos, normalize_lemma(lemma)))
    }

    /// Index statistics for a lemma, if it is listed under `pos`.
    pub fn stats(&self, pos: Pos, lemma: &str) -> Option<LemmaStats> {
        self.entries.get(&(pos, normalize_lemma(lemma))).copied()
    }

    /// Number of `(pos, lemma)` entries across all categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries listed under one category.
    pub fn count_for(&self, pos: Pos) -> usize {
        self.entries.keys().filter(|(p, _)| *p == pos).count()
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            // SAFETY: the dictionary is treated as read-only input for the
            // duration of the load; the map is dropped before returning.
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Parse one `index.<pos>` file.
///
/// Line layout: `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt
/// tagsense_cnt synset_offset...`. Lines starting with whitespace are the
/// license header and are skipped.
fn parse_index(
    bytes: &[u8],
    path: &Path,
    pos: Pos,
    entries: &mut HashMap<(Pos, String), LemmaStats>,
) -> Result<()> {
    let file = display_name(path);
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        if line.is_empty() || matches!(line.first(), Some(b' ' | b'\t')) {
            continue;
        }
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{}:{} is not valid utf8", file, lineno + 1))?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        if tokens.len() < 6 {
            bail!("{}:{} malformed index line (too few tokens)", file, lineno + 1);
        }

        let line_pos = tokens[1].chars().next().and_then(Pos::from_char);
        if line_pos != Some(pos) {
            bail!(
                "{}:{} expected pos '{}', found '{}'",
                file,
                lineno + 1,
                pos.to_char(),
                tokens[1]
            );
        }

        let synset_cnt: u32 = parse_count(tokens[2], &file, lineno, "synset_cnt")?;
        let p_cnt: usize = parse_count::<usize>(tokens[3], &file, lineno, "p_cnt")?;

        // Pointer symbols are not kept; only their count matters for layout.
        let idx = 4 + p_cnt;
        if tokens.len() < idx + 2 {
            bail!("{}:{} missing sense counts", file, lineno + 1);
        }
        let sense_cnt: u32 = parse_count(tokens[idx], &file, lineno, "sense_cnt")?;
        let tagsense_cnt: u32 = parse_count(tokens[idx + 1], &file, lineno, "tagsense_cnt")?;

        let offsets = tokens.len() - (idx + 2);
        if offsets != synset_cnt as usize {
            bail!(
                "{}:{} synset_cnt mismatch (expected {}, got {})",
                file,
                lineno + 1,
                synset_cnt,
                offsets
            );
        }

        entries.insert(
            (pos, normalize_lemma(tokens[0])),
            LemmaStats {
                synset_cnt,
                sense_cnt,
                tagsense_cnt,
            },
        );
    }

    Ok(())
}

fn parse_count<T>(token: &str, file: &str, lineno: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    token
        .parse::<T>()
        .with_context(|| format!("{}:{} {}", file, lineno + 1, field))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn strip_cr(line: &[u8]) -> &[u8] {
    if line.ends_with(b"\r") {
        &line[..line.len() - 1]
    } else {
        line
    }
}

fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}
