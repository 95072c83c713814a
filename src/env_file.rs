//! Environment file loading
//!
//! Reads `KEY=VALUE` files (the `.env` convention) into a map. The process
//! environment is never modified; callers look values up explicitly and give
//! real environment variables precedence.

use crate::error::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Env file looked up in the working directory when `--env-file` is not given
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Parsed contents of an environment file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

/// How unparsable lines are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineErrors {
    /// The first bad line fails the whole file
    Reject,
    /// Bad lines are logged and skipped
    Skip,
}

impl EnvFile {
    /// Load an environment file from disk, rejecting unparsable lines
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::read(path.as_ref(), LineErrors::Reject)
    }

    /// Load an environment file from disk, skipping unparsable lines
    ///
    /// Used for the implicit [`DEFAULT_ENV_FILE`], which may belong to other
    /// tools and hold lines this parser does not understand.
    pub fn from_file_lenient<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::read(path.as_ref(), LineErrors::Skip)
    }

    fn read(path: &Path, line_errors: LineErrors) -> AppResult<Self> {
        let path_display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| AppError::EnvFileRead {
            path: path_display.clone(),
            source,
        })?;
        parse(&content, &path_display, line_errors)
    }

    /// Resolve the env file for one invocation
    ///
    /// An explicit path must exist and parse cleanly. Without one,
    /// [`DEFAULT_ENV_FILE`] is read leniently when present; otherwise the
    /// result is empty.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_ENV_FILE);
                if default_path.is_file() {
                    Self::from_file_lenient(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl FromStr for EnvFile {
    type Err = AppError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        parse(content, "<string>", LineErrors::Reject)
    }
}

fn parse(content: &str, path: &str, line_errors: LineErrors) -> AppResult<EnvFile> {
    let mut vars = HashMap::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        match parse_line(line) {
            // Later assignments win, matching shell semantics
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(reason) => match line_errors {
                LineErrors::Reject => {
                    return Err(AppError::EnvFileParse {
                        path: path.to_string(),
                        line: index + 1,
                        reason,
                    });
                }
                LineErrors::Skip => {
                    tracing::warn!(
                        path = %path,
                        line = index + 1,
                        reason = %reason,
                        "Skipping unparsable env file line"
                    );
                }
            },
        }
    }

    Ok(EnvFile { vars })
}

fn parse_line(line: &str) -> Result<(String, String), String> {
    let Some((key, value)) = line.split_once('=') else {
        return Err("expected KEY=VALUE".to_string());
    };

    let key = key.trim();
    if !is_valid_key(key) {
        return Err(format!("invalid variable name '{}'", key));
    }

    Ok((key.to_string(), parse_value(value.trim())?))
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn parse_value(value: &str) -> Result<String, String> {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            return match rest.find(quote) {
                Some(end) => Ok(rest[..end].to_string()),
                None => Err(format!("unterminated {} quote", quote)),
            };
        }
    }

    // Unquoted: an inline comment starts at " #"
    let value = match value.find(" #") {
        Some(pos) => &value[..pos],
        None => value,
    };
    Ok(value.trim_end().to_string())
}
