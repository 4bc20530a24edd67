//! Clipboard delivery: backend detection, chunking and pacing.

use crate::errors::CollyError;
use arboard::Clipboard;
use async_trait::async_trait;
use std::env;
use std::ffi::OsStr;
use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, trace};

pub const CONTINUE_NOTICE: &str =
    "It is imperative not to respond until all sections have been provided.";
pub const FINAL_NOTICE: &str =
    "All sections have been provided. You may proceed with the response.";

/// Delay between chunks when nobody is at the terminal.
pub const NON_INTERACTIVE_DELAY: Duration = Duration::from_millis(500);

/// Something that can hold one piece of text at a time.
pub trait ClipboardSink {
    fn name(&self) -> &str;
    fn set_text(&mut self, text: &str) -> Result<(), CollyError>;
}

pub struct ArboardClipboard {
    clipboard: Clipboard,
}

impl ClipboardSink for ArboardClipboard {
    fn name(&self) -> &str {
        "arboard"
    }

    fn set_text(&mut self, text: &str) -> Result<(), CollyError> {
        self.clipboard
            .set_text(text)
            .map_err(|e| CollyError::ClipboardWriteError(e.to_string()))
    }
}

/// Command-line clipboard tools, tried when no native clipboard is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardCommand {
    MacOS,
    Wayland,
    Xclip,
    Xsel,
    Windows,
    Termux,
}

impl ClipboardCommand {
    pub fn program(&self) -> &'static str {
        match self {
            Self::MacOS => "pbcopy",
            Self::Wayland => "wl-copy",
            Self::Xclip => "xclip",
            Self::Xsel => "xsel",
            Self::Windows => "clip.exe",
            Self::Termux => "termux-clipboard-set",
        }
    }

    fn args(&self) -> &'static [&'static str] {
        match self {
            Self::Xclip => &["-selection", "clipboard", "-in"],
            Self::Xsel => &["-b", "-i"],
            _ => &[],
        }
    }

    /// Candidates for the current platform, in order of preference.
    pub fn candidates() -> Vec<ClipboardCommand> {
        if cfg!(target_os = "macos") {
            vec![Self::MacOS]
        } else if cfg!(target_os = "windows") {
            vec![Self::Windows]
        } else if cfg!(target_os = "android") {
            vec![Self::Termux]
        } else if env::var("WSL_DISTRO_NAME").is_ok() {
            vec![Self::Windows, Self::Wayland, Self::Xclip, Self::Xsel]
        } else {
            vec![Self::Wayland, Self::Xclip, Self::Xsel]
        }
    }
}

pub struct CommandClipboard {
    command: ClipboardCommand,
}

impl CommandClipboard {
    pub fn new(command: ClipboardCommand) -> Self {
        CommandClipboard { command }
    }
}

impl ClipboardSink for CommandClipboard {
    fn name(&self) -> &str {
        self.command.program()
    }

    fn set_text(&mut self, text: &str) -> Result<(), CollyError> {
        let program = self.command.program();
        let mut child = Command::new(program)
            .args(self.command.args())
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| CollyError::ClipboardWriteError(format!("Failed to spawn {}: {}", program, e)))?;

        {
            let stdin = child.stdin.as_mut().ok_or_else(|| {
                CollyError::ClipboardWriteError(format!("Failed to open stdin for {}", program))
            })?;
            stdin.write_all(text.as_bytes()).map_err(|e| {
                CollyError::ClipboardWriteError(format!("Failed to write to {}: {}", program, e))
            })?;
        }
        drop(child.stdin.take());

        let status = child.wait().map_err(|e| {
            CollyError::ClipboardWriteError(format!("Failed to wait for {}: {}", program, e))
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(CollyError::ClipboardWriteError(format!(
                "{} exited with status: {}",
                program, status
            )))
        }
    }
}

/// True when `program` is an executable found on `PATH`.
pub fn command_exists(program: &str) -> bool {
    command_on_path(program, env::var_os("PATH").as_deref())
}

/// True when `program` is a file in one of the directories of `path_var`.
pub fn command_on_path(program: &str, path_var: Option<&OsStr>) -> bool {
    path_var
        .map(|paths| env::split_paths(paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

/// First candidate accepted by `available`.
pub fn select_command<F>(
    candidates: &[ClipboardCommand],
    available: F,
) -> Result<ClipboardCommand, CollyError>
where
    F: Fn(&str) -> bool,
{
    candidates
        .iter()
        .copied()
        .find(|command| available(command.program()))
        .ok_or_else(|| {
            CollyError::ClipboardUnavailableError(format!(
                "no supported clipboard mechanism found on {}",
                env::consts::OS
            ))
        })
}

/// Picks the native clipboard, else the first available command-line tool.
pub fn detect_clipboard() -> Result<Box<dyn ClipboardSink>, CollyError> {
    match Clipboard::new() {
        Ok(clipboard) => {
            debug!("Using native clipboard");
            return Ok(Box::new(ArboardClipboard { clipboard }));
        }
        Err(e) => debug!("Native clipboard unavailable: {}", e),
    }

    let command = select_command(&ClipboardCommand::candidates(), command_exists)?;
    debug!("Using clipboard command {}", command.program());
    Ok(Box::new(CommandClipboard::new(command)))
}

pub fn section_header(index: usize, total: usize) -> String {
    let notice = if index < total {
        CONTINUE_NOTICE
    } else {
        FINAL_NOTICE
    };
    format!("# Clipboard section {} of {}. {}\n", index, total, notice)
}

/// Splits `text` into the fewest chunks of at most `max_len` characters each,
/// prefix included. A single chunk carries no prefix.
pub fn split_into_chunks(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut total = 2;
    loop {
        let header_len = section_header(total - 1, total)
            .chars()
            .count()
            .max(section_header(total, total).chars().count());
        let capacity = max_len.saturating_sub(header_len).max(1);
        let bodies = split_body(text, capacity);
        trace!(
            "Splitting with capacity {} gave {} chunk(s)",
            capacity,
            bodies.len()
        );

        if bodies.len() <= total {
            let count = bodies.len();
            return bodies
                .into_iter()
                .enumerate()
                .map(|(i, body)| format!("{}{}", section_header(i + 1, count), body))
                .collect();
        }
        total = bodies.len();
    }
}

/// Line-boundary cuts, unless they would cost more chunks than hard cuts.
fn split_body(text: &str, capacity: usize) -> Vec<&str> {
    let by_lines = cut(text, capacity, true);
    let hard = cut(text, capacity, false);
    if by_lines.len() > hard.len() {
        hard
    } else {
        by_lines
    }
}

fn cut(text: &str, capacity: usize, prefer_lines: bool) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let window_end = rest
            .char_indices()
            .nth(capacity)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if window_end == rest.len() {
            chunks.push(rest);
            break;
        }

        let end = if prefer_lines {
            rest[..window_end]
                .rfind('\n')
                .map(|newline| newline + 1)
                .unwrap_or(window_end)
        } else {
            window_end
        };
        chunks.push(&rest[..end]);
        rest = &rest[end..];
    }
    chunks
}

/// Waits between chunks so the operator can paste the previous one.
#[async_trait(?Send)]
pub trait ChunkPacer {
    async fn wait_for_next(&self, sent: usize, total: usize) -> Result<(), CollyError>;
}

pub struct DelayPacer {
    delay: Duration,
}

impl DelayPacer {
    pub fn new(delay: Duration) -> Self {
        DelayPacer { delay }
    }
}

#[async_trait(?Send)]
impl ChunkPacer for DelayPacer {
    async fn wait_for_next(&self, _sent: usize, _total: usize) -> Result<(), CollyError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

pub struct InteractivePacer;

#[async_trait(?Send)]
impl ChunkPacer for InteractivePacer {
    async fn wait_for_next(&self, sent: usize, total: usize) -> Result<(), CollyError> {
        eprintln!(
            "Copied section {} of {}. Paste it, then press Enter to copy the next section.",
            sent, total
        );
        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        Ok(())
    }
}

/// Interactive when stdin is a terminal, otherwise a short fixed delay.
pub fn default_pacer() -> Box<dyn ChunkPacer> {
    if std::io::stdin().is_terminal() {
        Box::new(InteractivePacer)
    } else {
        Box::new(DelayPacer::new(NON_INTERACTIVE_DELAY))
    }
}

pub struct ClipboardWriter<'a> {
    sink: &'a mut dyn ClipboardSink,
    pacer: &'a dyn ChunkPacer,
    max_clip_length: usize,
}

impl<'a> ClipboardWriter<'a> {
    pub fn new(
        sink: &'a mut dyn ClipboardSink,
        pacer: &'a dyn ChunkPacer,
        max_clip_length: usize,
    ) -> Self {
        ClipboardWriter {
            sink,
            pacer,
            max_clip_length,
        }
    }

    /// Sends every chunk in order and returns how many were sent.
    pub async fn write(&mut self, text: &str) -> Result<usize, CollyError> {
        let chunks = split_into_chunks(text, self.max_clip_length);
        let total = chunks.len();
        debug!("Sending {} chunk(s) via {}", total, self.sink.name());

        for (i, chunk) in chunks.iter().enumerate() {
            self.sink.set_text(chunk)?;
            trace!("Chunk {} of {} holds {} bytes", i + 1, total, chunk.len());
            if i + 1 < total {
                self.pacer.wait_for_next(i + 1, total).await?;
            }
        }

        info!("Copied {} clipboard section(s)", total);
        Ok(total)
    }
}
