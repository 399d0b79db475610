use super::{PreviewResult, PreviewStatus};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::io::{self, IsTerminal};

fn status_color(status: PreviewStatus) -> Color {
    match status {
        PreviewStatus::Valid => Color::Green,
        PreviewStatus::Unchanged => Color::DarkGrey,
        PreviewStatus::Invalid => Color::Red,
        PreviewStatus::Duplicate => Color::Yellow,
    }
}

/// Render a preview as a table with one row per file
pub fn render_table(result: &PreviewResult, use_color: bool) -> String {
    let mut table = Table::new();

    if io::stdout().is_terminal() {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    } else {
        table.set_content_arrangement(ContentArrangement::Disabled);
    }

    // Force styling even in non-TTY environments when colors are explicitly requested
    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("Old name").fg(Color::Cyan),
            Cell::new("New name").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["Old name", "New name", "Status"]);
    }

    for pair in &result.pairs {
        let status = match &pair.reason {
            Some(reason) => format!("{}: {}", pair.status.as_str(), reason),
            None => pair.status.as_str().to_string(),
        };

        if use_color {
            table.add_row(vec![
                Cell::new(&pair.old_name),
                Cell::new(format!("→ {}", pair.new_name)).fg(Color::Magenta),
                Cell::new(status).fg(status_color(pair.status)),
            ]);
        } else {
            table.add_row(vec![
                pair.old_name.clone(),
                format!("→ {}", pair.new_name),
                status,
            ]);
        }
    }

    let counts = &result.counts;
    let totals = format!(
        "{} valid, {} unchanged, {} invalid, {} duplicate",
        counts.valid, counts.unchanged, counts.invalid, counts.duplicate
    );
    if use_color {
        table.add_row(vec![
            Cell::new("TOTALS").fg(Color::Cyan),
            Cell::new(format!("{} files", counts.total())).fg(Color::White),
            Cell::new(totals).fg(Color::White),
        ]);
    } else {
        table.add_row(vec![
            "TOTALS".to_string(),
            format!("{} files", counts.total()),
            totals,
        ]);
    }

    table.to_string()
}
