use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, warn};

/// Languages the minifier understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
}

impl Language {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "py" | "pyw" | "pyi" => Some(Language::Python),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Code,
    Str { quote: char, triple: bool },
}

/// A scanned line and whether it begins or ends inside a string literal.
struct Line {
    text: String,
    starts_in_string: bool,
    ends_in_string: bool,
}

/// Minifies `text` if the path names a recognized language.
pub fn minify_for_path<'a>(path: &Path, text: &'a str) -> Cow<'a, str> {
    match Language::from_path(path) {
        Some(language) => {
            debug!("Minifying {} as {:?}", path.display(), language);
            Cow::Owned(minify(text, language))
        }
        None => Cow::Borrowed(text),
    }
}

pub fn minify(text: &str, language: Language) -> String {
    match language {
        Language::Python => minify_python(text),
    }
}

/// Removes `#` comments, trailing whitespace and blank lines outside string
/// literals. Input that ends inside an unterminated string is returned as-is.
pub fn minify_python(source: &str) -> String {
    let Some(lines) = scan_python(source) else {
        warn!("Unterminated string literal, leaving file unminified");
        return source.to_string();
    };

    let mut kept = Vec::with_capacity(lines.len());
    for line in lines {
        let text = if line.ends_in_string {
            line.text.as_str()
        } else {
            line.text.trim_end()
        };
        if !line.starts_in_string && text.trim().is_empty() {
            continue;
        }
        kept.push(text.to_string());
    }
    kept.join("\n")
}

fn scan_python(source: &str) -> Option<Vec<Line>> {
    let chars: Vec<char> = source.chars().collect();
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut starts_in_string = false;
    let mut state = State::Code;
    let mut i = 0;

    let mut finish = |current: &mut String, starts: bool, ends: bool| {
        lines.push(Line {
            text: std::mem::take(current),
            starts_in_string: starts,
            ends_in_string: ends,
        });
    };

    while i < chars.len() {
        let c = chars[i];
        match state {
            State::Code => match c {
                '#' => {
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                    }
                    continue;
                }
                '\'' | '"' => {
                    let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                    if triple {
                        current.extend([c, c, c]);
                        i += 3;
                        state = State::Str { quote: c, triple };
                        continue;
                    }
                    current.push(c);
                    state = State::Str { quote: c, triple };
                }
                '\n' => {
                    finish(&mut current, starts_in_string, false);
                    starts_in_string = false;
                }
                _ => current.push(c),
            },
            State::Str { quote, triple } => match c {
                '\\' => {
                    current.push(c);
                    match chars.get(i + 1) {
                        Some('\n') => {
                            finish(&mut current, starts_in_string, true);
                            starts_in_string = true;
                        }
                        Some(&next) => current.push(next),
                        None => {}
                    }
                    i += 2;
                    continue;
                }
                '\n' if triple => {
                    finish(&mut current, starts_in_string, true);
                    starts_in_string = true;
                }
                '\n' => return None,
                c if c == quote => {
                    if !triple {
                        current.push(c);
                        state = State::Code;
                    } else if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote)
                    {
                        current.extend([c, c, c]);
                        i += 3;
                        state = State::Code;
                        continue;
                    } else {
                        current.push(c);
                    }
                }
                _ => current.push(c),
            },
        }
        i += 1;
    }

    if matches!(state, State::Str { .. }) {
        return None;
    }
    if !current.is_empty() {
        finish(&mut current, starts_in_string, false);
    }
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_python_files() {
        assert_eq!(Language::from_path("a/b.py"), Some(Language::Python));
        assert_eq!(Language::from_path("a/b.rs"), None);
        assert_eq!(Language::from_path("Makefile"), None);
    }

    #[test]
    fn non_python_passes_through() {
        let text = "# heading\n\n\ntext";
        assert_eq!(minify_for_path(Path::new("notes.md"), text), text);
    }
}
