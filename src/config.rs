use crate::errors::CollyError;
use encoding_rs::Encoding;
use glob::Pattern;
use tracing::error;

pub const DEFAULT_MAX_CLIP_LENGTH: usize = 500_000;
pub const DEFAULT_MAX_WORD_LENGTH: usize = 80;
pub const DEFAULT_ENCODING: &str = "utf-8";
/// Smallest chunk length that still leaves room for a section prefix.
pub const MIN_CLIP_LENGTH: usize = 256;

/// A `PATTERN:LENGTH` truncation override.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub pattern: Pattern,
    pub max_length: usize,
}

impl OverrideRule {
    /// Parses `PATTERN:LENGTH`, splitting on the last colon.
    pub fn parse(raw: &str) -> Result<Self, CollyError> {
        let invalid = || {
            CollyError::ConfigError(format!(
                "Invalid override format: {}. Expected PATTERN:INTEGER",
                raw
            ))
        };

        let (pattern, length) = raw.rsplit_once(':').ok_or_else(invalid)?;
        if pattern.is_empty() {
            return Err(invalid());
        }
        let max_length: usize = length.trim().parse().map_err(|_| invalid())?;
        if max_length == 0 {
            return Err(invalid());
        }
        let pattern = Pattern::new(pattern)?;

        Ok(OverrideRule {
            pattern,
            max_length,
        })
    }
}

/// Immutable run configuration shared by every stage.
#[derive(Debug, Clone)]
pub struct CollyConfig {
    pub patterns: Vec<String>,
    pub exclusions: Vec<String>,
    pub max_clip_length: usize,
    pub follow_symlinks: bool,
    pub encoding: &'static Encoding,
    pub minify: bool,
    pub truncate: bool,
    pub max_word_length: usize,
    pub overrides: Vec<OverrideRule>,
    pub verbose: bool,
    pub strict: bool,
    pub print: bool,
    pub stats: bool,
    pub model: String,
    /// Arguments as typed, echoed in the verbose preamble.
    pub run_arguments: Vec<String>,
}

impl Default for CollyConfig {
    fn default() -> Self {
        CollyConfig {
            patterns: Vec::new(),
            exclusions: Vec::new(),
            max_clip_length: DEFAULT_MAX_CLIP_LENGTH,
            follow_symlinks: false,
            encoding: encoding_rs::UTF_8,
            minify: false,
            truncate: false,
            max_word_length: DEFAULT_MAX_WORD_LENGTH,
            overrides: Vec::new(),
            verbose: false,
            strict: false,
            print: false,
            stats: false,
            model: "gpt-4o".to_string(),
            run_arguments: Vec::new(),
        }
    }
}

impl CollyConfig {
    /// Resolves an encoding label such as `utf-8` or `latin1`.
    pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, CollyError> {
        Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| CollyError::ConfigError(format!("Unknown encoding: {}", label)))
    }

    /// Parses override rules. Invalid rules are logged and dropped.
    pub fn parse_overrides(raw_rules: &[String]) -> Vec<OverrideRule> {
        raw_rules
            .iter()
            .filter_map(|raw| match OverrideRule::parse(raw) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    error!("{}", e);
                    None
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), CollyError> {
        if self.patterns.is_empty() {
            return Err(CollyError::ConfigError(
                "At least one file pattern is required".to_string(),
            ));
        }
        if self.max_clip_length < MIN_CLIP_LENGTH {
            return Err(CollyError::ConfigError(format!(
                "max clip length must be at least {}, got {}",
                MIN_CLIP_LENGTH, self.max_clip_length
            )));
        }
        if self.max_word_length == 0 {
            return Err(CollyError::ConfigError(
                "max word length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn encoding_is_default(&self) -> bool {
        self.encoding == encoding_rs::UTF_8
    }
}
