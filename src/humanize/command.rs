//! Rewriter that shells out to a user command
//!
//! `POSTCHECK_REWRITE_CMD` names any program that reads a prompt on stdin and
//! prints the rewrite on stdout (an LLM CLI, a script, `cat` in tests).

use super::{RewriteError, Rewriter};
use std::io::Write;
use std::process::{Command, Stdio};

pub const REWRITE_CMD_ENV: &str = "POSTCHECK_REWRITE_CMD";

pub struct CommandRewriter {
    program: String,
    args: Vec<String>,
}

impl CommandRewriter {
    /// Split a command line on whitespace. Returns None for a blank command.
    pub fn new(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(REWRITE_CMD_ENV)
            .ok()
            .and_then(|cmd| Self::new(&cmd))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Rewriter for CommandRewriter {
    fn rewrite(&self, prompt: &str) -> Result<String, RewriteError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RewriteError::Command(format!("{}: {}", self.program, e)))?;

        // Writer thread so a command that streams output early can't deadlock on a full pipe
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_string();
            std::thread::spawn(move || stdin.write_all(prompt.as_bytes()))
        });

        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            match handle.join() {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RewriteError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RewriteError::InvalidResponse(format!("output is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_splits_arguments() {
        let cmd = CommandRewriter::new("llm -m  claude ").unwrap();
        assert_eq!(cmd.program(), "llm");
        assert_eq!(cmd.args, vec!["-m", "claude"]);
    }

    #[test]
    fn test_blank_command_is_none() {
        assert!(CommandRewriter::new("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_cat_echoes_prompt() {
        let cmd = CommandRewriter::new("cat").unwrap();
        assert_eq!(cmd.rewrite("just shipped it").unwrap(), "just shipped it");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_status() {
        let cmd = CommandRewriter::new("false").unwrap();
        let err = cmd.rewrite("x").unwrap_err();
        assert!(matches!(err, RewriteError::Command(_)));
    }

    #[test]
    fn test_missing_program_is_command_error() {
        let cmd = CommandRewriter::new("postcheck-no-such-rewriter-binary").unwrap();
        let err = cmd.rewrite("x").unwrap_err();
        assert!(err.to_string().contains("postcheck-no-such-rewriter-binary"));
    }
}
