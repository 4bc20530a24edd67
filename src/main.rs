use clap::Parser;
use colly::config::{
    CollyConfig, DEFAULT_ENCODING, DEFAULT_MAX_CLIP_LENGTH, DEFAULT_MAX_WORD_LENGTH,
};
use colly::copy_files_to_clipboard;
use colly::logger::initialize_logger;
use colly::CollyError;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Process project files into markdown with optional transformations and copy the result to the clipboard.",
    after_help = "Examples:\n  \
        colly -f \"src/**/*.py\" --truncate --minify\n  \
        colly -f file1.py file2.py --exclude \"*.log\" --override-max-length \"*.py:50\"\n  \
        colly -f \"someDir/*\" --follow-symlinks --encoding latin1\n  \
        colly -f \"./**/*.md\" --truncate --max-length 60"
)]
struct CliArgs {
    /// Files or directories to process (supports wildcards)
    #[arg(short = 'f', long = "files", required = true, num_args = 1..)]
    files: Vec<String>,

    /// Additional exclusion patterns
    #[arg(short = 'e', long = "exclude", num_args = 1..)]
    exclude: Vec<String>,

    /// Maximum clipboard chunk length in characters
    #[arg(short = 'x', long, default_value_t = DEFAULT_MAX_CLIP_LENGTH)]
    max_clip_length: usize,

    /// Follow symbolic links
    #[arg(short = 's', long)]
    follow_symlinks: bool,

    /// Fallback encoding when detection fails
    #[arg(short = 'c', long, default_value = DEFAULT_ENCODING)]
    encoding: String,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    debug: bool,

    /// Minify Python files
    #[arg(short = 'm', long, visible_alias = "minify-python")]
    minify: bool,

    /// Enable dynamic truncation
    #[arg(short = 't', long)]
    truncate: bool,

    /// Max word length for truncation
    #[arg(short = 'l', long, default_value_t = DEFAULT_MAX_WORD_LENGTH)]
    max_length: usize,

    /// PATTERN:LENGTH overrides (e.g. '*.py:50')
    #[arg(short = 'o', long = "override-max-length")]
    override_max_length: Vec<String>,

    /// Add run details to the output and show info-level logs
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Fail when a named path does not exist
    #[arg(long)]
    strict: bool,

    /// Write the document to stdout instead of the clipboard
    #[arg(short = 'p', long)]
    print: bool,

    /// Log per-file token counts
    #[arg(long)]
    stats: bool,

    /// Tokenizer model used by --stats
    #[arg(short = 'M', long, default_value = "gpt-4o")]
    model: String,
}

fn build_config(args: CliArgs) -> Result<CollyConfig, CollyError> {
    let config = CollyConfig {
        encoding: CollyConfig::resolve_encoding(&args.encoding)?,
        overrides: CollyConfig::parse_overrides(&args.override_max_length),
        patterns: args.files,
        exclusions: args.exclude,
        max_clip_length: args.max_clip_length,
        follow_symlinks: args.follow_symlinks,
        minify: args.minify,
        truncate: args.truncate,
        max_word_length: args.max_length,
        verbose: args.verbose,
        strict: args.strict,
        print: args.print,
        stats: args.stats,
        model: args.model,
        run_arguments: std::env::args().skip(1).collect(),
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();
    initialize_logger(cli_args.debug, cli_args.verbose || cli_args.stats);
    let start_time = Instant::now();

    let config = match build_config(cli_args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match copy_files_to_clipboard(config).await {
        Ok(report) => {
            info!(
                "Processed {} file(s) ({} bytes), skipped {}, {} characters in {} section(s)",
                report.files_processed,
                report.bytes_read,
                report.skipped.len(),
                report.characters,
                report.chunks
            );
            if let Some(length) = report.truncation_length {
                info!("Words truncated to {} characters", length);
            }
            info!("Completed in {:.2?}", start_time.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
