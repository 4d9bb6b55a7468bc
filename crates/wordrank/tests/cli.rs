use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn wordnet_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("wordnet-db")
        .join("tests")
        .join("fixtures")
        .join("wn")
}

fn wordrank(args: &[&str], cwd: &Path) -> Output {
    wordrank_logging(args, cwd, "warn")
}

fn wordrank_logging(args: &[&str], cwd: &Path, filter: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wordrank"))
        .args(args)
        .current_dir(cwd)
        .env_remove("WORDNET_DIR")
        .env_remove("WORDNET_LOAD_MODE")
        .env_remove("FREQUENCY_FILE")
        .env("RUST_LOG", filter)
        .output()
        .expect("run wordrank")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn index_writes_next_to_the_word_list() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = dir.path().join("guesses-5.json");
    fs::copy(fixtures().join("guesses-5.json"), &wordlist).unwrap();
    let corpus = fixtures().join("frequency.txt");
    let wordnet = wordnet_fixture();

    let out = wordrank(
        &[
            "index",
            path_arg(&wordlist),
            "--frequency-file",
            path_arg(&corpus),
            "--wordnet-dir",
            path_arg(&wordnet),
        ],
        dir.path(),
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let expected = dir.path().join("answers-5-index.json");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.trim(),
        format!("Wrote {} with 13 entries.", expected.display())
    );

    let index: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&expected).unwrap()).unwrap();
    assert_eq!(index["the"], 0);
    assert_eq!(index["dog"], 1);
    assert_eq!(index["walked"], 12);
}

#[test]
fn index_honours_explicit_output_and_empty_lists() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = dir.path().join("words.json");
    fs::write(&wordlist, "[]").unwrap();
    let output = dir.path().join("out").join("empty.json");
    let corpus = fixtures().join("frequency.txt");
    let wordnet = wordnet_fixture();

    let out = wordrank(
        &[
            "index",
            path_arg(&wordlist),
            "--frequency-file",
            path_arg(&corpus),
            "--wordnet-dir",
            path_arg(&wordnet),
            "--wordnet-mode",
            "owned",
            "--output",
            path_arg(&output),
        ],
        dir.path(),
    );
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("with 0 entries."));
    assert_eq!(fs::read_to_string(&output).unwrap(), "{}");
}

#[test]
fn missing_wordnet_aborts_with_instructions() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = dir.path().join("guesses-5.json");
    fs::copy(fixtures().join("guesses-5.json"), &wordlist).unwrap();
    let corpus = fixtures().join("frequency.txt");
    let missing = dir.path().join("no-wordnet");

    let out = wordrank(
        &[
            "index",
            path_arg(&wordlist),
            "--frequency-file",
            path_arg(&corpus),
            "--wordnet-dir",
            path_arg(&missing),
        ],
        dir.path(),
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("WordNet dictionary not found"), "stderr: {stderr}");
    assert!(stderr.contains("--wordnet-dir"));
    assert!(!dir.path().join("answers-5-index.json").exists());
}

#[test]
fn missing_corpus_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = dir.path().join("guesses-5.json");
    fs::copy(fixtures().join("guesses-5.json"), &wordlist).unwrap();
    let wordnet = wordnet_fixture();

    let out = wordrank(
        &["index", path_arg(&wordlist), "--wordnet-dir", path_arg(&wordnet)],
        dir.path(),
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("frequency-alpha-alldicts.txt"));
    assert!(!dir.path().join("answers-5-index.json").exists());
}

#[test]
fn split_writes_one_file_per_length() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("guesses.json"),
        r#"["planet", "rocket ", "nebulae", "asteroid", "moon"]"#,
    )
    .unwrap();

    let out = wordrank(&["split"], dir.path());
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Saved 2 words to ./guesses-6.json"));

    let six: Vec<String> =
        serde_json::from_str(&fs::read_to_string(dir.path().join("guesses-6.json")).unwrap())
            .unwrap();
    assert_eq!(six, vec!["planet", "rocket "]);
    let eight: Vec<String> =
        serde_json::from_str(&fs::read_to_string(dir.path().join("guesses-8.json")).unwrap())
            .unwrap();
    assert_eq!(eight, vec!["asteroid"]);
}

#[test]
fn split_accepts_custom_lengths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("all.json"), r#"["moon", "star", "sun"]"#).unwrap();

    let out = wordrank(
        &["split", "all.json", "--lengths", "3,4", "--out-dir", "parts"],
        dir.path(),
    );
    assert!(out.status.success());
    assert!(dir.path().join("parts").join("guesses-3.json").exists());
    assert!(dir.path().join("parts").join("guesses-4.json").exists());
    assert!(!dir.path().join("parts").join("guesses-6.json").exists());
}

#[test]
fn filter_separates_valid_and_invalid_answers() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = fixtures().join("guesses-5.json");
    let wordnet = wordnet_fixture();

    let out = wordrank(
        &["filter", path_arg(&wordlist), "--wordnet-dir", path_arg(&wordnet)],
        dir.path(),
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Done. 8 valid, 6 invalid."));

    let valid: Vec<String> = serde_json::from_str(
        &fs::read_to_string(dir.path().join("valid-answers-7.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        valid,
        vec!["the", "bread", "geese", "uses", "Bread", "dog", "quicker", "runs"]
    );
    let invalid: Vec<String> = serde_json::from_str(
        &fs::read_to_string(dir.path().join("invalid-answers-7.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        invalid,
        vec!["cats", "walked", "king", "baked", "used", "boxes"]
    );
}

fn index_args<'a>(wordlist: &'a Path, corpus: &'a Path, wordnet: &'a Path) -> [&'a str; 6] {
    [
        "index",
        path_arg(wordlist),
        "--frequency-file",
        path_arg(corpus),
        "--wordnet-dir",
        path_arg(wordnet),
    ]
}

#[test]
fn rust_log_off_silences_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = dir.path().join("guesses-5.json");
    fs::copy(fixtures().join("guesses-5.json"), &wordlist).unwrap();
    let corpus = fixtures().join("frequency.txt");
    let wordnet = wordnet_fixture();

    let out = wordrank_logging(&index_args(&wordlist, &corpus, &wordnet), dir.path(), "off");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stderr), "");
}

#[test]
fn rust_log_applies_per_target_directives() {
    let dir = tempfile::tempdir().unwrap();
    let wordlist = dir.path().join("guesses-5.json");
    fs::copy(fixtures().join("guesses-5.json"), &wordlist).unwrap();
    let corpus = fixtures().join("frequency.txt");
    let wordnet = wordnet_fixture();

    let out = wordrank_logging(
        &index_args(&wordlist, &corpus, &wordnet),
        dir.path(),
        "warn,wordnet_db=debug",
    );
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("lemmas from"), "stderr: {stderr}");
    assert!(!stderr.contains("frequency corpus loaded"), "stderr: {stderr}");
}
