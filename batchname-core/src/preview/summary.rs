use super::{PreviewResult, PreviewStatus};
use std::fmt::Write;

/// Render a preview as a plain, line-oriented summary
pub fn render_summary(result: &PreviewResult) -> String {
    let mut output = String::new();
    let counts = &result.counts;

    writeln!(output, "[PREVIEW SUMMARY]").unwrap();
    writeln!(output, "Files: {}", counts.total()).unwrap();
    writeln!(output, "Valid: {}", counts.valid).unwrap();
    writeln!(output, "Unchanged: {}", counts.unchanged).unwrap();
    writeln!(output, "Invalid: {}", counts.invalid).unwrap();
    writeln!(output, "Duplicate: {}", counts.duplicate).unwrap();

    let renames: Vec<_> = result
        .pairs
        .iter()
        .filter(|p| p.status == PreviewStatus::Valid)
        .collect();
    if !renames.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "[RENAMES]").unwrap();
        for pair in renames {
            writeln!(output, "{} -> {}", pair.old_name, pair.new_name).unwrap();
        }
    }

    let problems: Vec<_> = result.pairs.iter().filter(|p| p.status.is_blocking()).collect();
    if !problems.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "[PROBLEMS]").unwrap();
        for pair in problems {
            write!(output, "{} -> {}: {}", pair.old_name, pair.new_name, pair.status.as_str()).unwrap();
            if let Some(reason) = &pair.reason {
                write!(output, " ({})", reason).unwrap();
            }
            writeln!(output).unwrap();
        }
    }

    output
}
