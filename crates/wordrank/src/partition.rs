use std::path::{Path, PathBuf};

use crate::classify::Classifier;

pub const DEFAULT_SPLIT_INPUT: &str = "guesses.json";
pub const DEFAULT_SPLIT_LENGTHS: [usize; 3] = [6, 7, 8];

/// Words whose trimmed length is exactly `len`, kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthBucket {
    pub len: usize,
    pub words: Vec<String>,
}

/// Words the classifier kept as base forms (`valid`) and the derived ones (`invalid`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSplit {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

pub fn split_by_length(words: &[String], lengths: &[usize]) -> Vec<LengthBucket> {
    lengths
        .iter()
        .map(|&len| LengthBucket {
            len,
            words: words
                .iter()
                .filter(|w| w.trim().chars().count() == len)
                .cloned()
                .collect(),
        })
        .collect()
}

pub fn split_output_path(out_dir: &Path, len: usize) -> PathBuf {
    out_dir.join(format!("guesses-{len}.json"))
}

/// Split words into base and derived forms, preserving input order.
pub fn split_answers(words: &[String], classifier: &Classifier<'_>) -> AnswerSplit {
    let mut split = AnswerSplit::default();
    for word in words {
        if classifier.classify(word).is_derived() {
            split.invalid.push(word.clone());
        } else {
            split.valid.push(word.clone());
        }
    }
    split
}

pub fn answer_output_paths(out_dir: &Path, max_len: usize) -> (PathBuf, PathBuf) {
    (
        out_dir.join(format!("valid-answers-{max_len}.json")),
        out_dir.join(format!("invalid-answers-{max_len}.json")),
    )
}
