//! Generated files written next to a resolved template

use std::io;
use std::path::Path;

const GENERATED_HEADER: &str = "# Generated by yaml-fragments.\n\
# Do not edit this file directly, edit the template sources instead.\n";

/// Prefix each line with its 1-based number so errors reported against the
/// resolved text can be traced back.
pub fn annotate_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let width = lines.len().to_string().len() + 1;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}:{}", i + 1, line, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolved text with the "generated" header
pub fn generated_text(resolved: &str) -> String {
    format!("{}\n{}\n", GENERATED_HEADER, resolved)
}

/// Write the generated companion file
pub fn write_generated(path: &Path, resolved: &str) -> io::Result<()> {
    std::fs::write(path, generated_text(resolved))
}

/// Write the line-numbered copy used for debugging
pub fn write_annotated(path: &Path, resolved: &str) -> io::Result<()> {
    std::fs::write(path, annotate_lines(resolved))
}
