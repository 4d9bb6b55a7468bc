use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("failed to read word list {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list {} is not valid JSON", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("word list {} must be a JSON array of strings", .path.display())]
    NotAnArray { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array and keep its non-empty string entries untouched.
pub fn read_json_strings<P: AsRef<Path>>(path: P) -> Result<Vec<String>, WordListError> {
    let path_ref = path.as_ref();
    let text = fs::read_to_string(path_ref).map_err(|source| WordListError::Io {
        path: path_ref.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| WordListError::Json {
        path: path_ref.to_path_buf(),
        source,
    })?;
    let Value::Array(items) = value else {
        return Err(WordListError::NotAnArray {
            path: path_ref.to_path_buf(),
        });
    };

    let total = items.len();
    let strings: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
        .collect();
    if strings.len() < total {
        warn!(
            "skipped {} empty or non-string entries in {}",
            total - strings.len(),
            path_ref.display()
        );
    }
    info!("read {} entries from {}", strings.len(), path_ref.display());
    Ok(strings)
}

/// Read candidate words: strings trimmed of surrounding whitespace, blanks dropped.
pub fn read_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, WordListError> {
    Ok(read_json_strings(path)?
        .into_iter()
        .filter_map(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect())
}

/// Serialize `value` next to `path` and rename it into place.
///
/// Nothing is written at `path` unless serialization and the flush both succeed.
pub fn write_json_atomic<T>(path: &Path, value: &T, pretty: bool) -> Result<(), OutputError>
where
    T: Serialize + ?Sized,
{
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err)?;

    let temp_file = NamedTempFile::new_in(parent).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        let written = if pretty {
            serde_json::to_writer_pretty(&mut writer, value)
        } else {
            serde_json::to_writer(&mut writer, value)
        };
        written.map_err(|source| OutputError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(io_err)?;
    }
    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Word length a list was built for: the first number in the file name,
/// otherwise the longest word, otherwise 0.
pub fn infer_word_length<S: AsRef<str>>(path: &Path, words: &[S]) -> usize {
    path.file_stem()
        .and_then(|stem| first_number(&stem.to_string_lossy()))
        .unwrap_or_else(|| max_word_length(words))
}

pub fn max_word_length<S: AsRef<str>>(words: &[S]) -> usize {
    words
        .iter()
        .map(|w| w.as_ref().chars().count())
        .max()
        .unwrap_or(0)
}

/// `answers-<len>-index.json` in the word list's directory.
pub fn default_index_path(wordlist: &Path, word_len: usize) -> PathBuf {
    let file_name = format!("answers-{word_len}-index.json");
    match wordlist.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn first_number(text: &str) -> Option<usize> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits = &text[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}
