use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};
use tracing::info;

use crate::classify::{Classification, Classifier};
use crate::frequency::{FrequencyTable, UNKNOWN_RANK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub word: String,
    pub class: Classification,
    pub rank: u64,
}

impl RankedEntry {
    /// Base before derived, then corpus rank, then the word itself.
    fn sort_key(&self) -> (u8, u64, &str) {
        (self.class.bucket(), self.rank, &self.word)
    }
}

/// Dense `word -> position` mapping in ranked order.
///
/// Serializes as a JSON object whose keys appear in position order.
#[derive(Debug, Clone, Default)]
pub struct RankedIndex {
    entries: Vec<RankedEntry>,
    positions: HashMap<String, usize>,
}

impl RankedIndex {
    pub fn position(&self, word: &str) -> Option<usize> {
        self.positions.get(word).copied()
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.word.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RankedIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .enumerate()
                .map(|(pos, entry)| (entry.word.as_str(), pos)),
        )
    }
}

/// Classify, look up, and sort `words` into a [`RankedIndex`].
///
/// Words are lowercased first. Duplicates collapse to a single entry; equal
/// words share their whole sort key, so they are adjacent after sorting and
/// collapsing them leaves every other entry's relative order unchanged.
pub fn rank_words<I, S>(
    words: I,
    table: &FrequencyTable,
    classifier: &Classifier<'_>,
) -> RankedIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries: Vec<RankedEntry> = words
        .into_iter()
        .map(|raw| {
            let word = raw.as_ref().to_lowercase();
            let class = classifier.classify(&word);
            let rank = table.rank_or_sentinel(&word);
            RankedEntry { word, class, rank }
        })
        .collect();

    entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    entries.dedup_by(|a, b| a.word == b.word);

    let positions: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(pos, entry)| (entry.word.clone(), pos))
        .collect();

    let derived = entries.iter().filter(|e| e.class.is_derived()).count();
    let unranked = entries.iter().filter(|e| e.rank == UNKNOWN_RANK).count();
    info!(
        "ranked {} words: {} base, {} derived, {} without a corpus rank",
        entries.len(),
        entries.len() - derived,
        derived,
        unranked
    );

    RankedIndex { entries, positions }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wordnet_types::Pos;

    use super::*;
    use crate::classify::{Analysis, TaggingOracle};

    struct MapOracle(HashMap<&'static str, Analysis>);

    impl MapOracle {
        fn new(entries: &[(&'static str, &str, Pos)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(word, lemma, pos)| (*word, Analysis::new(*lemma, *pos)))
                    .collect(),
            )
        }
    }

    impl TaggingOracle for MapOracle {
        fn analyze(&self, word: &str) -> Option<Analysis> {
            self.0.get(word).cloned()
        }
    }

    fn sample_oracle() -> MapOracle {
        MapOracle::new(&[
            ("cats", "cat", Pos::Noun),
            ("cat", "cat", Pos::Noun),
            ("the", "the", Pos::Adj),
            ("dogs", "dog", Pos::Noun),
            ("dog", "dog", Pos::Noun),
            ("walked", "walk", Pos::Verb),
        ])
    }

    fn sample_corpus() -> FrequencyTable {
        FrequencyTable::parse("1 the 1000000 10.0% 10.0%\n2 cat 900000 9.0% 9.0%\n")
    }

    #[test]
    fn places_base_words_before_derived_ones() {
        let oracle = sample_oracle();
        let classifier = Classifier::new(&oracle);
        let index = rank_words(["cats", "the", "running", "cat"], &sample_corpus(), &classifier);

        assert_eq!(index.position("the"), Some(0));
        assert_eq!(index.position("cat"), Some(1));
        assert_eq!(index.position("cats"), Some(2));
        assert_eq!(index.position("running"), Some(3));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn orders_by_rank_then_alphabetically_within_a_bucket() {
        let oracle = sample_oracle();
        let classifier = Classifier::new(&oracle);
        let table: FrequencyTable = [("dog", 50), ("zebra", 10)].into_iter().collect();
        let index = rank_words(["apple", "dog", "zebra", "mango"], &table, &classifier);
        let words: Vec<&str> = index.words().collect();
        assert_eq!(words, vec!["zebra", "dog", "apple", "mango"]);
    }

    #[test]
    fn derived_words_sort_by_rank_too() {
        let oracle = sample_oracle();
        let classifier = Classifier::new(&oracle);
        let table: FrequencyTable = [("walked", 7), ("dogs", 3)].into_iter().collect();
        let index = rank_words(["walked", "singing", "dogs", "dog"], &table, &classifier);
        let words: Vec<&str> = index.words().collect();
        assert_eq!(words, vec!["dog", "dogs", "walked", "singing"]);
    }

    #[test]
    fn duplicates_collapse_and_positions_stay_dense() {
        let oracle = sample_oracle();
        let classifier = Classifier::new(&oracle);
        let words = ["Cat", "cat", "the", "THE", "cats"];
        let index = rank_words(words, &sample_corpus(), &classifier);
        assert_eq!(index.len(), 3);
        let mut positions: Vec<usize> = index.words().filter_map(|w| index.position(w)).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn empty_word_list_gives_empty_index() {
        let oracle = sample_oracle();
        let classifier = Classifier::new(&oracle);
        let index = rank_words(Vec::<String>::new(), &sample_corpus(), &classifier);
        assert!(index.is_empty());
        assert_eq!(serde_json::to_string(&index).unwrap(), "{}");
    }

    #[test]
    fn serializes_in_position_order() {
        let oracle = sample_oracle();
        let classifier = Classifier::new(&oracle);
        let index = rank_words(["cats", "the", "running", "cat"], &sample_corpus(), &classifier);
        assert_eq!(
            serde_json::to_string(&index).unwrap(),
            r#"{"the":0,"cat":1,"cats":2,"running":3}"#
        );
    }

    #[test]
    fn records_class_and_rank_per_entry() {
        let oracle = sample_oracle();
        let classifier = Classifier::new(&oracle);
        let index = rank_words(["cats", "the"], &sample_corpus(), &classifier);
        let entries = index.entries();
        assert_eq!(entries[0].word, "the");
        assert_eq!(entries[0].rank, 1);
        assert!(!entries[0].class.is_derived());
        assert_eq!(entries[1].rank, UNKNOWN_RANK);
        assert!(entries[1].class.is_derived());
    }
}
