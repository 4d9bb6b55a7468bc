pub mod classify;
pub mod frequency;
pub mod oracle;
pub mod partition;
pub mod rank;
pub mod wordlist;

pub use classify::{Analysis, Classification, Classifier, Inflection, TaggingOracle};
pub use frequency::{FrequencyTable, UNKNOWN_RANK};
pub use oracle::{OracleError, WordNetOracle};
pub use rank::{RankedEntry, RankedIndex, rank_words};
