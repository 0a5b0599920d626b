use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use codex_cli::types::RunSummary;

use crate::commands::CheckResult;

pub fn print_run_summaries(summaries: &[RunSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Job"),
        header_cell("System"),
        header_cell("Mode"),
        header_cell("Read"),
        header_cell("Skipped"),
        header_cell("Invalid"),
        header_cell("Duplicates"),
        header_cell("Written"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..=7 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_read = 0usize;
    let mut total_written = 0usize;
    for summary in summaries {
        let stats = summary.stats.as_ref();
        total_read += stats.map_or(0, |stats| stats.rows_read);
        total_written += summary.rows_written;
        let invalid = stats.map(|stats| stats.invalid_dropped + stats.invalid_flagged);
        table.add_row(vec![
            job_cell(summary),
            summary
                .system
                .map_or_else(|| dim_cell("-"), |system| Cell::new(system.label())),
            Cell::new(summary.mode),
            stats.map_or_else(|| dim_cell("-"), |stats| Cell::new(stats.rows_read)),
            count_cell(stats.map(|stats| stats.malformed_skipped), Color::Yellow),
            count_cell(invalid, Color::Yellow),
            count_cell(stats.map(|stats| stats.duplicates_removed), Color::DarkYellow),
            written_cell(summary),
            output_cell(summary),
        ]);
    }
    if summaries.len() > 1 {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(total_read).add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(total_written).add_attribute(Attribute::Bold),
            dim_cell("-"),
        ]);
    }
    println!("{table}");

    let failures: Vec<&RunSummary> = summaries.iter().filter(|s| s.is_failure()).collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for summary in failures {
            let message = summary.error.as_deref().unwrap_or("failed");
            eprintln!("- {}: {message}", summary.job);
        }
    }
}

pub fn print_check_results(profile: &str, results: &[CheckResult]) {
    println!("Profile: {profile}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Cleaned"),
        header_cell("Valid"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for result in results {
        let valid = if result.is_valid {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new("✗")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(format!("{:?}", result.input)),
            Cell::new(&result.cleaned),
            valid,
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn job_cell(summary: &RunSummary) -> Cell {
    let cell = Cell::new(&summary.job).add_attribute(Attribute::Bold);
    if summary.is_failure() {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Blue)
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn written_cell(summary: &RunSummary) -> Cell {
    if summary.is_failure() {
        return dim_cell("-");
    }
    if summary.rows_omitted > 0 {
        Cell::new(format!("{} (+{} omitted)", summary.rows_written, summary.rows_omitted))
            .fg(Color::Yellow)
    } else {
        Cell::new(summary.rows_written)
    }
}

fn output_cell(summary: &RunSummary) -> Cell {
    match (&summary.output, &summary.failed_path) {
        (Some(path), _) => Cell::new(path.display()).fg(Color::Green),
        (None, Some(path)) => Cell::new(format!("not saved: {}", path.display())).fg(Color::Red),
        (None, None) => Cell::new("failed")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}
