use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordnet_db::LoadMode;

use wordrank::frequency::DEFAULT_FREQUENCY_FILE;
use wordrank::oracle::default_wordnet_path;
use wordrank::partition::{
    DEFAULT_SPLIT_INPUT, DEFAULT_SPLIT_LENGTHS, answer_output_paths, split_answers,
    split_by_length, split_output_path,
};
use wordrank::wordlist::{
    default_index_path, infer_word_length, max_word_length, read_json_strings, read_word_list,
    write_json_atomic,
};
use wordrank::{Classifier, FrequencyTable, WordNetOracle, rank_words};

#[derive(Parser)]
#[command(name = "wordrank", version)]
#[command(about = "Build frequency-sorted answer indexes, placing simple inflected forms last")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write answers-<len>-index.json mapping each word to its rank position.
    Index(IndexArgs),
    /// Split a flat word list into guesses-<len>.json files.
    Split(SplitArgs),
    /// Split a word list into valid (base) and invalid (derived) answers.
    Filter(FilterArgs),
}

#[derive(Args)]
struct IndexArgs {
    /// Path to guesses-<N>.json
    wordlist: PathBuf,
    #[arg(long, env = "FREQUENCY_FILE", default_value = DEFAULT_FREQUENCY_FILE)]
    frequency_file: PathBuf,
    #[command(flatten)]
    wordnet: WordNetArgs,
    /// Defaults to answers-<len>-index.json next to the word list
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SplitArgs {
    #[arg(default_value = DEFAULT_SPLIT_INPUT)]
    input: PathBuf,
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SPLIT_LENGTHS)]
    lengths: Vec<usize>,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args)]
struct FilterArgs {
    wordlist: PathBuf,
    #[command(flatten)]
    wordnet: WordNetArgs,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args)]
struct WordNetArgs {
    /// WordNet dictionary directory (WNDB index.* and *.exc files)
    #[arg(long, env = "WORDNET_DIR")]
    wordnet_dir: Option<PathBuf>,
    #[arg(long, env = "WORDNET_LOAD_MODE", default_value = "mmap", value_parser = parse_load_mode)]
    wordnet_mode: LoadMode,
}

impl WordNetArgs {
    fn load(&self) -> Result<WordNetOracle> {
        let dir = self.wordnet_dir.clone().unwrap_or_else(default_wordnet_path);
        info!(
            "using wordnet at {} (mode: {:?})",
            dir.display(),
            self.wordnet_mode
        );
        let start = Instant::now();
        let oracle = WordNetOracle::load(&dir, self.wordnet_mode)?;
        info!("wordnet loaded in {} ms", start.elapsed().as_millis());
        Ok(oracle)
    }
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Commands::Index(args) => run_index(args),
        Commands::Split(args) => run_split(args),
        Commands::Filter(args) => run_filter(args),
    }
}

fn run_index(args: IndexArgs) -> Result<()> {
    let words = read_word_list(&args.wordlist)?;

    let start = Instant::now();
    let table = FrequencyTable::load(&args.frequency_file)?;
    info!("frequency corpus loaded in {} ms", start.elapsed().as_millis());

    let oracle = args.wordnet.load()?;
    let classifier = Classifier::new(&oracle);

    let start = Instant::now();
    let index = rank_words(&words, &table, &classifier);
    info!("index built in {} ms", start.elapsed().as_millis());

    let output = args.output.unwrap_or_else(|| {
        default_index_path(&args.wordlist, infer_word_length(&args.wordlist, &words))
    });
    write_json_atomic(&output, &index, false)?;

    println!("Wrote {} with {} entries.", output.display(), index.len());
    Ok(())
}

fn run_split(args: SplitArgs) -> Result<()> {
    let words = read_json_strings(&args.input)?;
    for bucket in split_by_length(&words, &args.lengths) {
        let path = split_output_path(&args.out_dir, bucket.len);
        write_json_atomic(&path, &bucket.words, true)?;
        println!("Saved {} words to {}", bucket.words.len(), path.display());
    }
    Ok(())
}

fn run_filter(args: FilterArgs) -> Result<()> {
    let words = read_word_list(&args.wordlist)?;
    let oracle = args.wordnet.load()?;
    let classifier = Classifier::new(&oracle);

    let split = split_answers(&words, &classifier);
    let (valid_path, invalid_path) = answer_output_paths(&args.out_dir, max_word_length(&words));
    write_json_atomic(&valid_path, &split.valid, true)?;
    write_json_atomic(&invalid_path, &split.invalid, true)?;

    println!(
        "Done. {} valid, {} invalid.",
        split.valid.len(),
        split.invalid.len()
    );
    println!(
        "Output: {}, {}",
        display_name(&valid_path),
        display_name(&invalid_path)
    );
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    LoadMode::parse(raw).ok_or_else(|| format!("expected mmap or owned, got {raw}"))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
