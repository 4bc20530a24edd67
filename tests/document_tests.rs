use colly::config::{CollyConfig, OverrideRule};
use colly::document::{fence_for, DocumentBuilder};
use colly::loader::{FileEntry, SkipReason, SkippedFile};
use colly::truncate::TruncationPlan;
use std::path::PathBuf;

fn entry(path: &str, text: &str) -> FileEntry {
    FileEntry::new(PathBuf::from(path), text.to_string())
}

#[test]
fn test_sections_follow_input_order() {
    let config = CollyConfig::default();
    let entries = vec![
        entry("./src/main.py", "print('hi')\n\n"),
        entry("notes.txt", "plain"),
    ];

    let document = DocumentBuilder::new(&config, None).build(&entries, &[]);

    assert_eq!(
        document.render(),
        "## src/main.py\n```python\nprint('hi')\n```\n\n## notes.txt\n```plaintext\nplain\n```\n\n"
    );
    assert!(document.preamble.is_none());
    assert!(document.summary.is_none());
}

#[test]
fn test_blank_files_are_omitted() {
    let config = CollyConfig::default();
    let entries = vec![entry("empty.rs", "  \n\t\n"), entry("lib.rs", "pub fn f() {}")];

    let document = DocumentBuilder::new(&config, None).build(&entries, &[]);

    assert_eq!(document.sections.len(), 1);
    assert_eq!(document.sections[0].display_path, "lib.rs");
    assert_eq!(document.sections[0].language, "rust");
}

#[test]
fn test_embedded_fences_get_a_longer_fence() {
    assert_eq!(fence_for("no ticks"), "```");
    assert_eq!(fence_for("```rust\nx\n```"), "````");

    let config = CollyConfig::default();
    let entries = vec![entry("README.md", "```sh\nls\n```")];
    let rendered = DocumentBuilder::new(&config, None)
        .build(&entries, &[])
        .render();
    assert_eq!(rendered, "## README.md\n````markdown\n```sh\nls\n```\n````\n\n");
}

#[test]
fn test_verbose_preamble_and_summary() {
    let config = CollyConfig {
        patterns: vec!["src/**/*.py".to_string()],
        exclusions: vec!["*.csv".to_string()],
        truncate: true,
        minify: true,
        verbose: true,
        max_word_length: 60,
        overrides: vec![OverrideRule::parse("*.md:12").unwrap()],
        encoding: encoding_rs::WINDOWS_1252,
        run_arguments: vec!["-f".to_string(), "src/**/*.py".to_string(), "-v".to_string()],
        ..CollyConfig::default()
    };
    let plan = TruncationPlan::compute(["apple apply app"], 60, config.overrides.clone());
    let skipped = vec![SkippedFile {
        path: PathBuf::from("src/blob.py"),
        reason: SkipReason::Binary,
    }];
    let entries = vec![entry("src/a.py", "x = 1")];

    let document = DocumentBuilder::new(&config, Some(&plan)).build(&entries, &skipped);
    let rendered = document.render();

    let preamble = document.preamble.as_deref().unwrap();
    assert!(preamble.starts_with("# Introduction\n"));
    assert!(preamble.contains("A minimal truncation length of 5 was determined"));
    assert!(preamble.contains("`*.md:12`"));
    assert!(preamble.contains("set to 60."));
    assert!(preamble.contains("# Python Minification"));
    assert!(preamble.contains("Additional exclusions: `*.csv`"));
    assert!(preamble.contains("Default encoding set to: windows-1252"));
    assert!(preamble.contains("- `src/**/*.py`"));
    assert!(preamble.contains("```\n-f src/**/*.py -v\n```"));
    assert!(!preamble.contains("# Symlink Following"));

    let summary = document.summary.as_deref().unwrap();
    assert!(summary.contains("- Number of files processed: 1"));
    assert!(summary.contains("  - src/blob.py: binary content"));
    assert!(rendered.ends_with(summary));
}

#[test]
fn test_verbose_reports_skipped_global_truncation() {
    let config = CollyConfig {
        truncate: true,
        verbose: true,
        max_word_length: 3,
        ..CollyConfig::default()
    };
    let plan = TruncationPlan::compute(["abcdef abcxyz"], 3, Vec::new());
    let entries = vec![entry("a.txt", "abcdef abcxyz")];

    let document = DocumentBuilder::new(&config, Some(&plan)).build(&entries, &[]);
    let preamble = document.preamble.unwrap();

    assert!(preamble.contains("Global truncation was not applied"));
    assert!(preamble.contains("- Colliding words: abcdef, abcxyz"));
}

#[test]
fn test_output_is_deterministic() {
    let config = CollyConfig {
        verbose: true,
        truncate: true,
        ..CollyConfig::default()
    };
    let entries = vec![entry("a.rs", "fn alpha() {}"), entry("b.rs", "fn beta() {}")];
    let plan = TruncationPlan::compute(entries.iter().map(|e| e.text.as_str()), 80, Vec::new());

    let first = DocumentBuilder::new(&config, Some(&plan)).build(&entries, &[]).render();
    let second = DocumentBuilder::new(&config, Some(&plan)).build(&entries, &[]).render();
    assert_eq!(first, second);
}
