//! Startup text written through the output channel.

use crate::core::paths::RunPaths;
use crate::core::verbosity::Verbosity;

/// Width of boxed sections.
pub const BOX_WIDTH: usize = 80;

/// Welcome banner carrying the version.
pub fn welcome(version: &str) -> String {
    let rule = "~".repeat(BOX_WIDTH);
    let mut out = String::new();
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&centered(""));
    out.push_str(&centered(&format!("L A U N C H E R   v{version}")));
    out.push_str(&centered("distributed simulation bootstrap"));
    out.push_str(&centered(""));
    out.push_str(&rule);
    out.push_str("\n\n");
    out
}

/// Boxed summary of the run directories and verbosity.
pub fn io_summary(paths: &RunPaths, verbosity: &Verbosity) -> String {
    let mut out = title("IO");
    out.push_str("Directories\n");
    out.push_str(&equals("input", &paths.input_dir.display().to_string()));
    out.push_str(&equals("output", &paths.output_dir.display().to_string()));
    out.push_str("Verbose\n");
    out.push_str(&equals("level", &verbosity.level.to_string()));
    out.push_str(&equals("warnings", &verbosity.warnings.to_string()));
    out.push_str(&"=".repeat(BOX_WIDTH));
    out.push_str("\n\n");
    out
}

/// Framed warning block; empty input gives empty output.
pub fn warning_box(message: &str) -> String {
    if message.is_empty() {
        return String::new();
    }
    let rule = "!".repeat(BOX_WIDTH);
    format!("{rule}\nWARNING\n{message}\n{rule}\n\n")
}

fn title(name: &str) -> String {
    let label = format!(" {name} ");
    let left = BOX_WIDTH.saturating_sub(label.len()) / 2;
    let right = BOX_WIDTH.saturating_sub(label.len() + left);
    format!("{}{}{}\n", "=".repeat(left), label, "=".repeat(right))
}

fn equals(key: &str, value: &str) -> String {
    format!("  {key:<8} = {value}\n")
}

fn centered(text: &str) -> String {
    let pad = BOX_WIDTH.saturating_sub(text.len()) / 2;
    let line = format!("{}{}", " ".repeat(pad), text);
    format!("{}\n", line.trim_end())
}
