use std::fmt::Write;

use crate::{
    domain::table::{cell_text, Table},
    ports::dashboard_service::TabOutcome,
};

/// Cells wider than this are cut and end with `…`.
pub const MAX_CELL_WIDTH: usize = 40;

/// Renders a table as a bordered text grid:
///
/// ```text
/// +--------+-------+
/// | name   | price |
/// +--------+-------+
/// | Widget | 9.99  |
/// +--------+-------+
/// ```
pub fn render_table(table: &Table) -> String {
    if table.column_count() == 0 {
        return "(no data)\n".to_string();
    }

    let header: Vec<String> = table.columns().iter().map(|c| fit(c)).collect();
    let body: Vec<Vec<String>> = table
        .rows()
        .map(|row| row.values().iter().map(|v| fit(&cell_text(v))).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let separator = separator_line(&widths);
    let mut out = String::new();
    out.push_str(&separator);
    out.push_str(&grid_line(&header, &widths));
    out.push_str(&separator);
    for row in &body {
        out.push_str(&grid_line(row, &widths));
    }
    if !body.is_empty() {
        out.push_str(&separator);
    }
    out
}

/// Renders one dashboard tab: label, header, description, then the grid or
/// the reason it is empty.
pub fn render_tab(outcome: &TabOutcome) -> String {
    let worksheet = outcome.worksheet;
    let mut out = String::new();

    let _ = writeln!(out, "== {} ==", worksheet.tab_label());
    let _ = writeln!(out, "{}", worksheet.header());
    let _ = writeln!(out, "{}", worksheet.description());

    match &outcome.error {
        Some(report) => {
            let _ = writeln!(
                out,
                "Could not load worksheet '{}': {}",
                worksheet,
                report.current_context()
            );
        }
        None => {
            if let Some(fetched_at) = outcome.fetched_at {
                let _ = writeln!(
                    out,
                    "{} rows, fetched {}",
                    outcome.table.row_count(),
                    fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }
    }

    out.push_str(&render_table(&outcome.table));
    out
}

fn fit(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn grid_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line.push('\n');
    line
}
