//! AppleScript execution through the `osascript` binary

use std::ffi::OsString;
use tokio::process::Command;
use tracing::trace;

/// Runs AppleScript snippets and captures their result
#[derive(Debug, Clone)]
pub struct Osascript {
    program: OsString,
}

impl Default for Osascript {
    fn default() -> Self {
        Self::new()
    }
}

impl Osascript {
    pub fn new() -> Self {
        Self::with_program("osascript")
    }

    /// Use a different interpreter binary
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `script` and return its trimmed stdout
    ///
    /// Spawn failures and non-zero exits are returned as a message suitable
    /// for wrapping into a command or query error.
    pub async fn run(&self, script: &str) -> std::result::Result<String, String> {
        trace!(script, "osascript");

        let output = Command::new(&self.program)
            .arg("-e")
            .arg(script)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to run {:?}: {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{} ({})", stderr.trim(), output.status));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Quote `value` as an AppleScript string literal
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
