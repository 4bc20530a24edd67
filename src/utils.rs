use std::path::Path;

/// Renders a path with `/` separators and without a leading `./`.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let path = path.strip_prefix("./").unwrap_or(path);
    path.to_string_lossy().replace('\\', "/")
}

/// Header path for a file: relative to the working directory when it lies
/// below it, otherwise as collected.
pub fn display_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if path.is_absolute() {
        if let Ok(cwd) = std::env::current_dir() {
            if let Ok(relative) = path.strip_prefix(&cwd) {
                if !relative.as_os_str().is_empty() {
                    return normalize_path(relative);
                }
            }
        }
    }
    normalize_path(path)
}

/// Returns true when the pattern needs glob expansion.
pub fn has_glob_metachars(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Fenced-block language tag for a file, `plaintext` when unknown.
pub fn language_for_path<P: AsRef<Path>>(path: P) -> &'static str {
    let path = path.as_ref();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "ps1" => "powershell",
        "txt" => "plaintext",
        "py" | "pyw" | "pyi" => "python",
        "json" | "ipynb" => "json",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "tsx" => "tsx",
        "jsx" => "jsx",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "xml" => "xml",
        "yml" | "yaml" => "yaml",
        "md" | "markdown" => "markdown",
        "mdx" => "mdx",
        "sh" | "bash" | "zsh" => "shell",
        "bat" | "cmd" => "batch",
        "c" => "c",
        "cpp" | "cc" | "cxx" | "h" | "hpp" => "cpp",
        "cs" => "csharp",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "rb" => "ruby",
        "php" => "php",
        "r" => "r",
        "jl" => "julia",
        "pl" | "pm" => "perl",
        "lua" => "lua",
        "sql" => "sql",
        "ini" | "cfg" | "conf" => "ini",
        "toml" => "toml",
        "dockerfile" => "dockerfile",
        "makefile" | "mk" => "makefile",
        "cmake" => "cmake",
        "asm" | "s" => "asm",
        "v" => "verilog",
        "sv" => "systemverilog",
        "vhdl" | "hdl" => "vhdl",
        "tex" => "latex",
        "bib" => "bibtex",
        "rmd" => "rmarkdown",
        _ => match path.file_name().and_then(|n| n.to_str()) {
            Some("Dockerfile") => "dockerfile",
            Some("Makefile") | Some("makefile") => "makefile",
            _ => "plaintext",
        },
    }
}
