//! Self-deleting helper scripts.
//!
//! The script is the only thing launched with elevation. It re-invokes the
//! helper executable with the hidden sub-command and the encoded request,
//! deletes itself, and exits with the helper's status. Every word it embeds
//! is quoted with the dialect's single-quote rule.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::{ElevationConfig, HelperExitCode};
use crate::error::ElevationError;

/// Shell dialect of the generated script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    /// Windows PowerShell, run with `-File`.
    PowerShell,
    /// POSIX `sh`.
    Posix,
}

impl ScriptDialect {
    /// Dialect of the host platform.
    pub fn native() -> Self {
        if cfg!(windows) {
            ScriptDialect::PowerShell
        } else {
            ScriptDialect::Posix
        }
    }

    /// Script file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ScriptDialect::PowerShell => "ps1",
            ScriptDialect::Posix => "sh",
        }
    }

    /// Quote `value` as one literal word.
    ///
    /// PowerShell doubles embedded single quotes; POSIX closes the quote,
    /// emits an escaped quote and reopens.
    pub fn quote(self, value: &str) -> String {
        match self {
            ScriptDialect::PowerShell => format!("'{}'", value.replace('\'', "''")),
            ScriptDialect::Posix => format!("'{}'", value.replace('\'', r"'\''")),
        }
    }

    /// Render the script that runs `helper` with `payload` appended.
    pub fn render(self, helper: &HelperCommand, payload: &str) -> Result<String, ElevationError> {
        let program = helper.program.to_str().ok_or_else(|| {
            ElevationError::failed(format!(
                "helper path {} is not valid Unicode",
                helper.program.display()
            ))
        })?;

        let mut words = Vec::with_capacity(helper.args.len() + 2);
        words.push(self.quote(program));
        words.extend(helper.args.iter().map(|arg| self.quote(arg)));
        words.push(self.quote(payload));
        let invocation = words.join(" ");

        Ok(match self {
            ScriptDialect::PowerShell => format!(
                "\u{feff}$ErrorActionPreference = 'Stop'\r\n\
                 $code = 1\r\n\
                 try {{\r\n\
                 \x20   & {invocation}\r\n\
                 \x20   $code = $LASTEXITCODE\r\n\
                 }} catch {{\r\n\
                 \x20   $code = 1\r\n\
                 }} finally {{\r\n\
                 \x20   Remove-Item -LiteralPath $PSCommandPath -Force -ErrorAction SilentlyContinue\r\n\
                 }}\r\n\
                 exit $code\r\n"
            ),
            ScriptDialect::Posix => format!(
                "#!/bin/sh\n\
                 {invocation}\n\
                 status=$?\n\
                 if [ \"$status\" -ge 126 ]; then status={not_run}; fi\n\
                 rm -f -- \"$0\"\n\
                 exit \"$status\"\n",
                not_run = HelperExitCode::NOT_RUN
            ),
        })
    }
}

/// The executable the elevated script re-invokes, with its leading
/// arguments. The encoded request is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl HelperCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The running executable with the hidden helper sub-command.
    pub fn current_exe() -> io::Result<Self> {
        Ok(Self::new(
            std::env::current_exe()?,
            vec![ElevationConfig::HELPER_SUBCOMMAND.to_string()],
        ))
    }

    /// Same command, telling the helper not to refresh the search index.
    pub fn without_index_refresh(mut self) -> Self {
        let flag = ElevationConfig::NO_INDEX_REFRESH_FLAG;
        if !self.args.iter().any(|arg| arg == flag) {
            self.args.insert(0, flag.to_string());
        }
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Words of the helper invocation in a rendered script, unquoted.
#[cfg(test)]
pub(crate) fn invocation_words(dialect: ScriptDialect, script: &str) -> Vec<String> {
    let line = match dialect {
        ScriptDialect::PowerShell => script
            .lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix("& ")),
        ScriptDialect::Posix => script.lines().find(|line| line.starts_with('\'')),
    }
    .unwrap_or_default();

    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (dialect, c) {
            (_, ' ') => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (_, '\'') => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => {
                            if dialect == ScriptDialect::PowerShell && chars.peek() == Some(&'\'')
                            {
                                chars.next();
                                current.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some(inner) => current.push(inner),
                        None => break,
                    }
                }
            }
            (ScriptDialect::Posix, '\\') => {
                in_word = true;
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (_, other) => {
                in_word = true;
                current.push(other);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}
