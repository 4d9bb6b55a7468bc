use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::info;

/// Rank assigned to words the corpus never mentions. Larger than any real rank.
pub const UNKNOWN_RANK: u64 = 1_000_000_000_000;

pub const DEFAULT_FREQUENCY_FILE: &str = "frequency-alpha-alldicts.txt";

// rank, word, count, percent, cumulative percent
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+)\s+([A-Za-z']+)\s+([0-9,]+)\s+([0-9]+\.[0-9]+%)\s+([0-9]+\.[0-9]+%)")
        .expect("corpus line pattern compiles")
});

/// Lowercase word to 1-based popularity rank, first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    ranks: HashMap<String, u64>,
}

#[derive(Debug, Error)]
pub enum FrequencyError {
    #[error("failed to read frequency corpus {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FrequencyTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FrequencyError> {
        let path_ref = path.as_ref();
        let bytes = fs::read(path_ref).map_err(|source| FrequencyError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&decode_ignoring_invalid(&bytes));
        info!(
            "loaded {} ranked words from {}",
            table.len(),
            path_ref.display()
        );
        Ok(table)
    }

    /// Parse corpus text. Comment, header, footer and malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut ranks = HashMap::new();
        for line in text.lines() {
            if line.starts_with('#') {
                continue;
            }
            let Some(caps) = LINE_PATTERN.captures(line) else {
                continue;
            };
            let Ok(rank) = caps[1].parse::<u64>() else {
                continue;
            };
            ranks.entry(caps[2].to_lowercase()).or_insert(rank);
        }
        Self { ranks }
    }

    pub fn rank(&self, word: &str) -> Option<u64> {
        self.ranks.get(word).copied()
    }

    pub fn rank_or_sentinel(&self, word: &str) -> u64 {
        self.rank(word).unwrap_or(UNKNOWN_RANK)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Decode UTF-8, dropping invalid bytes so `caf\xe9` still reads as `caf`.
fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

impl<S: Into<String>> FromIterator<(S, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut ranks = HashMap::new();
        for (word, rank) in iter {
            ranks.entry(word.into().to_lowercase()).or_insert(rank);
        }
        Self { ranks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "\
# Frequency list, all dictionaries
#RANK  WORD  COUNT  PERCENT  CUMULATIVE
     1  the    56,271,872  6.2215%  6.2215%
     2  of     33,950,064  3.7536%  9.9751%
     3  Don't  1,234       0.0001%  9.9752%
     4  The    99          0.0000%  9.9753%
   abc  cat    10          0.0000%  9.9754%
     5  cat    10          0.0000%
     6  dog    10          0.0000%  9.9755%  trailing notes
Total words: 1,000,000
";

    #[test]
    fn keeps_first_occurrence_lowercased() {
        let table = FrequencyTable::parse(CORPUS);
        assert_eq!(table.rank("the"), Some(1));
        assert_eq!(table.rank("of"), Some(2));
        assert_eq!(table.rank("don't"), Some(3));
        assert_eq!(table.rank("The"), None);
    }

    #[test]
    fn skips_lines_that_do_not_match_every_column() {
        let table = FrequencyTable::parse(CORPUS);
        assert_eq!(table.rank("cat"), None);
        assert_eq!(table.rank("dog"), Some(6));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn comment_marker_must_start_the_line() {
        let table = FrequencyTable::parse("#1 hidden 10 1.0% 1.0%\n 2 shown 10 1.0% 2.0%\n");
        assert_eq!(table.rank("hidden"), None);
        assert_eq!(table.rank("shown"), Some(2));
    }

    #[test]
    fn unknown_words_get_the_sentinel() {
        let table = FrequencyTable::parse("");
        assert!(table.is_empty());
        assert_eq!(table.rank_or_sentinel("anything"), UNKNOWN_RANK);
    }

    #[test]
    fn load_drops_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freq.txt");
        let mut bytes = b"1 the 100 10.0% 10.0%\n".to_vec();
        bytes.extend_from_slice(b"2 caf\xe9 90 9.0% 19.0%\n3 cat 80 8.0% 27.0%\n");
        fs::write(&path, bytes).unwrap();

        let table = FrequencyTable::load(&path).unwrap();
        assert_eq!(table.rank("the"), Some(1));
        assert_eq!(table.rank("caf"), Some(2));
        assert_eq!(table.rank("cat"), Some(3));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_corpus_is_an_error() {
        let err = FrequencyTable::load("/nonexistent/freq.txt").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/freq.txt"));
    }
}
