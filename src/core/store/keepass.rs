//! KeePass storage backend.
//!
//! Reads entries from a KDBX database through `keepassxc-cli`.
//!
//! ## Requirements
//!
//! - `keepassxc-cli` must be installed and on `PATH`
//!
//! ## Usage
//!
//! ```toml
//! [storages.work]
//! type = "keepass"
//! config = { path = "/home/me/work.kdbx" }
//! ```
//!
//! Entry paths are group names separated by `/`, ending with the entry
//! title, e.g. `databases/prod`.

use std::cell::OnceCell;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::rc::Rc;

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{Credentials, Store, Validation};
use crate::core::entry::Entry;
use crate::error::{Result, StorageError};

const CLI: &str = "keepassxc-cli";
const NOTES: &str = "Notes";

/// A KeePass database file.
pub struct Keepass {
    name: String,
    file: PathBuf,
    key_file: Option<PathBuf>,
    credentials: Rc<dyn Credentials>,
    password: OnceCell<Zeroizing<String>>,
}

impl std::fmt::Debug for Keepass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keepass")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("key_file", &self.key_file)
            .finish()
    }
}

impl Keepass {
    pub fn new(
        name: &str,
        file: impl Into<PathBuf>,
        key_file: Option<PathBuf>,
        credentials: Rc<dyn Credentials>,
    ) -> Self {
        Self {
            name: name.to_string(),
            file: file.into(),
            key_file,
            credentials,
            password: OnceCell::new(),
        }
    }

    /// Password for the database, asked for at most once per instance.
    fn password(&self) -> Result<&Zeroizing<String>> {
        if let Some(password) = self.password.get() {
            return Ok(password);
        }
        let password = self.credentials.password(&self.name)?;
        Ok(self.password.get_or_init(|| password))
    }

    fn backend_error(&self, message: impl Into<String>) -> StorageError {
        StorageError::Backend {
            storage: self.name.clone(),
            message: message.into(),
        }
    }
}

impl Keepass {
    /// Run `keepassxc-cli show` for `path` with extra `args` and return stdout.
    fn show(&self, args: &[&str], path: &str) -> Result<String> {
        let cli = which::which(CLI).map_err(|_| StorageError::ToolMissing { tool: CLI })?;
        let password = self.password()?;

        let mut cmd = Command::new(cli);
        cmd.args(["show", "--quiet", "--show-protected"]).args(args);
        if let Some(key_file) = &self.key_file {
            cmd.arg("--key-file").arg(key_file);
        }
        cmd.arg(&self.file)
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| self.backend_error(format!("failed to run {}: {}", CLI, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(format!("{}\n", password.as_str()).as_bytes())
                .map_err(|e| self.backend_error(format!("failed to send password: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.backend_error(format!("{} did not finish: {}", CLI, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            trace!(stderr = %stderr, "keepassxc-cli failed");
            if stderr.to_lowercase().contains("could not find entry") {
                return Err(StorageError::EntryNotFound {
                    storage: self.name.clone(),
                    path: path.to_string(),
                }
                .into());
            }
            return Err(self.backend_error(stderr).into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Store for Keepass {
    fn get_entry(&self, path: &str) -> Result<Entry> {
        debug!(storage = %self.name, path = %path, "reading keepass entry");

        let output = self.show(&["--all"], path)?;

        // Notes may span lines that look like attributes, so its exact
        // value is fetched on its own.
        let notes = if output.lines().any(|line| notes_value(line).is_some()) {
            Some(self.show(&["--attributes", NOTES], path)?)
        } else {
            None
        };

        parse_show_output(&output, notes.as_deref())
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn validate(&self) -> Validation {
        let exists = self.file.is_file();
        let cli_found = which::which(CLI).is_ok();
        let lines = vec![
            format!(
                "Configured file is {}\nFile exists: {}",
                self.file.display(),
                exists
            ),
            format!("{} found: {}", CLI, cli_found),
        ];

        if exists {
            Validation::passed(lines)
        } else {
            Validation::failed(StorageError::ValidationFailed(self.name.clone()), lines)
        }
    }
}

/// Convert `keepassxc-cli show --all` output into an entry.
///
/// Each `Name: value` line starts an attribute and lines without a separator
/// continue the previous value. With `notes` given, the `Notes` attribute
/// takes exactly that value and the lines it spans are skipped.
fn parse_show_output(output: &str, notes: Option<&str>) -> Result<Entry> {
    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut lines = output.lines();

    while let Some(line) = lines.next() {
        if let (Some(_), Some(notes)) = (notes_value(line), notes) {
            let notes = notes.strip_suffix('\n').unwrap_or(notes);
            for _ in 1..notes.lines().count() {
                lines.next();
            }
            attributes.push((NOTES.to_string(), notes.to_string()));
            continue;
        }

        match line.split_once(": ") {
            Some((key, value)) if is_attribute_name(key) => {
                attributes.push((key.to_string(), value.to_string()));
            }
            _ => match line.strip_suffix(':') {
                Some(key) if is_attribute_name(key) => {
                    attributes.push((key.to_string(), String::new()));
                }
                _ => {
                    if let Some((_, value)) = attributes.last_mut() {
                        value.push('\n');
                        value.push_str(line);
                    }
                }
            },
        }
    }

    let mut entry = Entry::new();
    for (key, value) in attributes {
        entry.set_attribute(&key, &value)?;
    }
    Ok(entry)
}

/// The inline part of a `Notes:` line.
fn notes_value(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(NOTES)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn is_attribute_name(key: &str) -> bool {
    !key.is_empty() && !key.starts_with(char::is_whitespace)
}
