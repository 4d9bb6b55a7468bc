use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use tracing::info;
use wordnet_db::{LoadMode, Lexicon, required_files};
use wordnet_morphy::{CandidateSource, LemmaCandidate, Morphy};

use crate::classify::{Analysis, TaggingOracle};

pub const DEFAULT_WORDNET_PATH: &str = "open_english_wordnet_2024/oewn2024";
pub const DEFAULT_WORDNET_IMAGE_PATH: &str = "/app/wordnet";

#[derive(Debug, Error)]
pub enum OracleError {
    #[error(
        "WordNet dictionary not found in {}: {} is missing.\n\
         Download Open English WordNet in WNDB format (index.noun, index.verb, index.adj, \
         index.adv and the *.exc exception lists) and pass its directory with \
         --wordnet-dir <DIR> or the WORDNET_DIR environment variable.",
        .dir.display(),
        .missing.display()
    )]
    ModelNotFound { dir: PathBuf, missing: PathBuf },
    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

/// Tagging oracle backed by a WordNet lexicon and morphy.
///
/// Every category is searched for lemma candidates, scored by how many of the
/// lemma's senses occur in the tagged corpora. A word listed under its own
/// spelling keeps that reading unless a reduced lemma in the same category
/// scores higher, so `bed` stays a noun instead of becoming the past of `be`.
/// Words without a dictionary entry take the best-scoring reduction. Ties keep
/// the earlier candidate: noun, verb, adjective, adverb, then exception before
/// suffix rule.
pub struct WordNetOracle {
    lexicon: Lexicon,
    morphy: Morphy,
}

impl WordNetOracle {
    pub fn new(lexicon: Lexicon, morphy: Morphy) -> Self {
        Self { lexicon, morphy }
    }

    pub fn load(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self, OracleError> {
        let dir = dict_dir.as_ref();
        if !dir.is_dir() {
            return Err(OracleError::ModelNotFound {
                dir: dir.to_path_buf(),
                missing: dir.to_path_buf(),
            });
        }
        if let Some(missing) = required_files()
            .iter()
            .map(|name| dir.join(name))
            .find(|path| !path.exists())
        {
            return Err(OracleError::ModelNotFound {
                dir: dir.to_path_buf(),
                missing,
            });
        }

        let lexicon = Lexicon::load_with_mode(dir, mode)
            .with_context(|| format!("loading WordNet index from {}", dir.display()))?;
        let morphy = Morphy::load(dir)
            .with_context(|| format!("loading exceptions from {}", dir.display()))?;
        info!("wordnet lexicon has {} lemma entries", lexicon.len());
        Ok(Self::new(lexicon, morphy))
    }

    fn score(&self, candidate: &LemmaCandidate<'_>) -> u32 {
        self.lexicon
            .stats(candidate.pos, &candidate.lemma)
            .map_or(0, |stats| stats.tagsense_cnt)
    }

    fn best<'c, 'm: 'c>(
        &self,
        candidates: impl IntoIterator<Item = &'c LemmaCandidate<'m>>,
    ) -> Option<(u32, &'c LemmaCandidate<'m>)> {
        let mut best: Option<(u32, &'c LemmaCandidate<'m>)> = None;
        for candidate in candidates {
            let score = self.score(candidate);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, candidate));
            }
        }
        best
    }
}

impl TaggingOracle for WordNetOracle {
    fn analyze(&self, word: &str) -> Option<Analysis> {
        let exists = |pos, lemma: &str| self.lexicon.lemma_exists(pos, lemma);
        let candidates = self.morphy.lemmas_for_any(word, exists);
        let (surface, reduced): (Vec<_>, Vec<_>) = candidates
            .iter()
            .partition(|c| c.source == CandidateSource::Surface);

        let chosen = match self.best(surface) {
            Some((top, own)) => self
                .best(reduced.into_iter().filter(|c| c.pos == own.pos))
                .filter(|(score, _)| *score > top)
                .map_or(own, |(_, candidate)| candidate),
            None => self.best(reduced)?.1,
        };
        Some(Analysis::new(chosen.lemma.as_ref(), chosen.pos))
    }
}

/// Local checkout path if present, otherwise the container image path.
pub fn default_wordnet_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_WORDNET_PATH);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_WORDNET_IMAGE_PATH)
}
