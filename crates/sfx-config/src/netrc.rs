//! Netrc credential lookup.
//!
//! Parses the standard machine-credentials format:
//!
//! ```text
//! # comment
//! machine api.signalfx.com
//!   login me@example.com
//!   password <token>
//!
//! default login anonymous password guest
//! ```
//!
//! Only the password of the `api.signalfx.com` entry (or of the `default`
//! entry when no machine matches) is used, as the auth token.

use std::path::Path;

use crate::{ConfigError, Result};

/// Errors produced while parsing a netrc file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetrcError {
    /// A keyword was not followed by its value.
    #[error("line {line}: expected a value after '{keyword}'")]
    MissingValue { keyword: String, line: usize },

    /// A credential field appeared before any `machine` or `default`.
    #[error("line {line}: '{keyword}' must follow a machine or default entry")]
    OrphanField { keyword: String, line: usize },

    /// Unrecognized keyword.
    #[error("line {line}: unknown token '{token}'")]
    UnknownToken { token: String, line: usize },

    /// A double-quoted value was never closed.
    #[error("line {line}: unterminated quoted value")]
    UnterminatedQuote { line: usize },

    /// A `machine` entry followed the `default` entry.
    #[error("line {line}: machine entries must precede the default entry")]
    MachineAfterDefault { line: usize },

    /// More than one `default` entry.
    #[error("line {line}: duplicate default entry")]
    DuplicateDefault { line: usize },
}

/// One `machine` (or `default`) entry.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Machine {
    /// Host name; `None` for the `default` entry.
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
}

impl Machine {
    /// Whether this is the catch-all `default` entry.
    pub fn is_default(&self) -> bool {
        self.name.is_none()
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("name", &self.name)
            .field("login", &self.login)
            .field("password", &self.password.as_deref().map(crate::redact))
            .field("account", &self.account)
            .finish()
    }
}

/// A parsed netrc file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netrc {
    pub machines: Vec<Machine>,
}

impl Netrc {
    /// Parse netrc content.
    pub fn parse(input: &str) -> std::result::Result<Self, NetrcError> {
        let mut lexer = Lexer::new(input);
        let mut machines = Vec::new();
        let mut current: Option<Machine> = None;
        let mut seen_default = false;

        while let Some((token, line)) = lexer.next_token()? {
            match token.as_str() {
                "machine" => {
                    if seen_default {
                        return Err(NetrcError::MachineAfterDefault { line });
                    }
                    let name = lexer.expect_value("machine", line)?;
                    machines.extend(current.take());
                    current = Some(Machine {
                        name: Some(name),
                        ..Default::default()
                    });
                }
                "default" => {
                    if seen_default {
                        return Err(NetrcError::DuplicateDefault { line });
                    }
                    seen_default = true;
                    machines.extend(current.take());
                    current = Some(Machine::default());
                }
                "login" | "password" | "account" => {
                    let value = lexer.expect_value(&token, line)?;
                    let machine = current.as_mut().ok_or_else(|| NetrcError::OrphanField {
                        keyword: token.clone(),
                        line,
                    })?;
                    let slot = match token.as_str() {
                        "login" => &mut machine.login,
                        "password" => &mut machine.password,
                        _ => &mut machine.account,
                    };
                    *slot = Some(value);
                }
                "macdef" => {
                    lexer.expect_value("macdef", line)?;
                    lexer.skip_macro_body();
                }
                _ => {
                    return Err(NetrcError::UnknownToken {
                        token: token.clone(),
                        line,
                    });
                }
            }
        }
        machines.extend(current);

        Ok(Self { machines })
    }

    /// Find the entry for `host`, falling back to the `default` entry.
    pub fn find_machine(&self, host: &str) -> Option<&Machine> {
        self.machines
            .iter()
            .find(|m| m.name.as_deref() == Some(host))
            .or_else(|| self.machines.iter().find(|m| m.is_default()))
    }
}

/// Look up the password stored for `host` in the netrc file at `path`.
///
/// A missing file, a directory, or a file without a matching entry all
/// yield `Ok(None)`. A file that exists but fails to parse is an error.
pub fn read_netrc_token(path: &Path, host: &str) -> Result<Option<String>> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "netrc file not present, skipping");
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::ReadFile {
                path: path.display().to_string(),
                source: e,
            });
        }
        Ok(meta) if meta.is_dir() => {
            tracing::debug!(path = %path.display(), "netrc path is a directory, ignoring");
            return Ok(None);
        }
        Ok(_) => {}
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let netrc = Netrc::parse(&contents).map_err(|e| ConfigError::Netrc {
        path: path.display().to_string(),
        source: e,
    })?;

    let Some(machine) = netrc.find_machine(host) else {
        tracing::debug!(path = %path.display(), host, "no netrc entry for host");
        return Ok(None);
    };
    Ok(machine.password.clone().filter(|p| !p.is_empty()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexer
// ─────────────────────────────────────────────────────────────────────────────

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Next keyword with the line it started on. `#` here opens a comment.
    fn next_token(&mut self) -> std::result::Result<Option<(String, usize)>, NetrcError> {
        self.scan(true)
    }

    fn scan(&mut self, comments: bool) -> std::result::Result<Option<(String, usize)>, NetrcError> {
        loop {
            match self.peek() {
                None => return Ok(None),
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') if comments => self.skip_line(),
                Some(_) => break,
            }
        }

        let line = self.line;
        let mut token = String::new();

        if self.peek() == Some('"') {
            self.bump();
            loop {
                match self.bump() {
                    None => return Err(NetrcError::UnterminatedQuote { line }),
                    Some('"') => break,
                    Some('\\') => match self.bump() {
                        Some(c) => token.push(c),
                        None => return Err(NetrcError::UnterminatedQuote { line }),
                    },
                    Some(c) => token.push(c),
                }
            }
            return Ok(Some((token, line)));
        }

        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            token.push(c);
            self.bump();
        }
        Ok(Some((token, line)))
    }

    fn expect_value(
        &mut self,
        keyword: &str,
        line: usize,
    ) -> std::result::Result<String, NetrcError> {
        // Values may start with `#`
        self.scan(false)?
            .map(|(value, _)| value)
            .ok_or_else(|| NetrcError::MissingValue {
                keyword: keyword.to_string(),
                line,
            })
    }

    /// Skip a macro body: the rest of the definition line, then every line
    /// up to and including the first blank one.
    fn skip_macro_body(&mut self) {
        self.skip_line();
        loop {
            let start = self.pos;
            if self.peek().is_none() {
                return;
            }
            self.skip_line();
            let blank = self.chars[start..self.pos]
                .iter()
                .all(|c| c.is_whitespace());
            if blank {
                return;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
