use crate::config::CollyConfig;
use crate::ignore::DEFAULT_EXCLUSIONS;
use crate::loader::{FileEntry, SkippedFile};
use crate::truncate::TruncationPlan;
use crate::utils::language_for_path;
use tracing::{debug, trace};

/// One rendered file: header, fenced content and a trailing blank line.
#[derive(Debug, Clone)]
pub struct Section {
    pub display_path: String,
    pub language: &'static str,
    pub text: String,
}

/// The assembled Markdown output.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub preamble: Option<String>,
    pub sections: Vec<Section>,
    pub summary: Option<String>,
}

impl Document {
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(preamble) = &self.preamble {
            out.push_str(preamble);
        }
        for section in &self.sections {
            out.push_str(&section.text);
        }
        if let Some(summary) = &self.summary {
            out.push_str(summary);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

pub struct DocumentBuilder<'a> {
    config: &'a CollyConfig,
    plan: Option<&'a TruncationPlan>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(config: &'a CollyConfig, plan: Option<&'a TruncationPlan>) -> Self {
        DocumentBuilder { config, plan }
    }

    pub fn build(&self, entries: &[FileEntry], skipped: &[SkippedFile]) -> Document {
        debug!("Building document from {} file(s)", entries.len());
        let sections: Vec<Section> = entries
            .iter()
            .filter(|entry| !entry.text.trim().is_empty())
            .map(render_section)
            .collect();

        let (preamble, summary) = if self.config.verbose {
            (
                Some(self.preamble()),
                Some(summary(sections.len(), skipped)),
            )
        } else {
            (None, None)
        };

        Document {
            preamble,
            sections,
            summary,
        }
    }

    fn preamble(&self) -> String {
        let config = self.config;
        let mut out = Vec::new();

        out.push("# Introduction".to_string());
        out.push(
            "This output was created by colly. It gathers and processes files with optional transformations."
                .to_string(),
        );
        out.push(String::new());

        if config.truncate {
            out.push("# Truncation Details".to_string());
            match self.plan.and_then(|plan| plan.global_length) {
                Some(length) => {
                    out.push(format!(
                        "- A minimal truncation length of {} was determined to preserve word uniqueness.",
                        length
                    ));
                    out.push(format!(
                        "- Words longer than {} characters may have been truncated in files without overrides.",
                        length
                    ));
                }
                None => {
                    out.push("- No truncation length within the allowed range preserves word uniqueness.".to_string());
                    out.push("- Global truncation was not applied to files without overrides.".to_string());
                    for group in self.plan.map(|p| p.collisions.as_slice()).unwrap_or_default() {
                        out.push(format!("- Colliding words: {}", group.join(", ")));
                    }
                }
            }
            if !config.overrides.is_empty() {
                let rules: Vec<String> = config
                    .overrides
                    .iter()
                    .map(|rule| format!("`{}:{}`", rule.pattern.as_str(), rule.max_length))
                    .collect();
                out.push(format!(
                    "- Truncation overrides were applied to specific file patterns: {}",
                    rules.join(", ")
                ));
            }
            if config.max_word_length != crate::config::DEFAULT_MAX_WORD_LENGTH {
                out.push(format!(
                    "- The maximum allowed word length for truncation was set to {}.",
                    config.max_word_length
                ));
            }
            out.push(String::new());
        }

        if config.minify {
            out.push("# Python Minification".to_string());
            out.push("- Python files were minified by removing comments and extra whitespace.".to_string());
            out.push(String::new());
        }

        if config.follow_symlinks {
            out.push("# Symlink Following".to_string());
            out.push("- Symbolic links were followed during file traversal.".to_string());
            out.push(String::new());
        }

        out.push("# Exclusions".to_string());
        out.push(format!(
            "- {} default exclusion patterns were applied.",
            DEFAULT_EXCLUSIONS.len()
        ));
        if !config.exclusions.is_empty() {
            let extra: Vec<String> = config.exclusions.iter().map(|p| format!("`{}`", p)).collect();
            out.push(format!("- Additional exclusions: {}", extra.join(", ")));
        }
        out.push(String::new());

        if !config.encoding_is_default() {
            out.push("# Encoding".to_string());
            out.push(format!("- Default encoding set to: {}", config.encoding.name()));
            out.push(String::new());
        }

        out.push("# Input Patterns".to_string());
        for pattern in &config.patterns {
            out.push(format!("- `{}`", pattern));
        }
        out.push(String::new());

        out.push("# Run Parameters".to_string());
        out.push("```".to_string());
        out.push(config.run_arguments.join(" "));
        out.push("```".to_string());
        out.push(String::new());

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

pub fn render_section(entry: &FileEntry) -> Section {
    let language = language_for_path(&entry.path);
    let content = entry.text.trim_end();
    let fence = fence_for(content);
    trace!("Rendering {} as {}", entry.display_path, language);

    let text = format!(
        "## {}\n{}{}\n{}\n{}\n\n",
        entry.display_path, fence, language, content, fence
    );

    Section {
        display_path: entry.display_path.clone(),
        language,
        text,
    }
}

/// Three backticks, or one more than the longest backtick run in `content`.
pub fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn summary(processed: usize, skipped: &[SkippedFile]) -> String {
    let mut out = vec![
        "# Summary".to_string(),
        format!("- Number of files processed: {}", processed),
    ];
    if !skipped.is_empty() {
        out.push(format!("- Number of files skipped: {}", skipped.len()));
        for skip in skipped {
            out.push(format!("  - {}: {}", skip.path.display(), skip.reason));
        }
    }
    out.push(String::new());
    out.join("\n")
}
