//! Hook tool command execution.
//!
//! Provides utilities for running hook tools and collecting their output.

use crate::config::MAX_TOOL_OUTPUT;
use crate::error::{Error, Result};
use colored::Colorize;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a command found on `PATH` and return its stdout.
pub fn run(cmd: &str) -> Result<String> {
    run_in(None, cmd)
}

/// Run a command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
/// When `tool_dir` is set the program is looked up there instead of `PATH`.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command fails, produces too much output, or is not UTF-8
pub fn run_in(tool_dir: Option<&Path>, cmd: &str) -> Result<String> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);

    let program = match cmds.first() {
        Some(p) if !p.is_empty() => *p,
        _ => return Err(Error::hook_tool(cmd, "empty command")),
    };

    let mut command = match tool_dir {
        Some(dir) => Command::new(dir.join(program)),
        None => Command::new(program),
    };
    for arg in cmds.iter().skip(1) {
        command.arg(arg);
    }

    let output = command.output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        Error::hook_tool(cmd, format!("failed to execute: {e}"))
    })?;

    if output.status.success() {
        log::debug!("Success cmd: {cmd}");
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > MAX_TOOL_OUTPUT {
            return Err(Error::hook_tool(
                cmd,
                format!("response too large: {} bytes", output.stdout.len()),
            ));
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(Error::hook_tool(
            cmd,
            format!("{}: {}", output.status, stderr.trim()),
        ));
    }

    String::from_utf8(output.stdout).map_err(|e| Error::hook_tool(cmd, format!("invalid UTF-8: {e}")))
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .filter(|s| !s.is_empty())
        .collect()
}
