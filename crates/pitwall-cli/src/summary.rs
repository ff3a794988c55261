use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use pitwall_model::ParseIssue;

use crate::types::FeaturesResult;

pub fn print_summary(result: &FeaturesResult) {
    let report = &result.report;
    for path in &result.written {
        println!("Wrote: {}", path.display());
    }
    println!(
        "Rolling window: {} events, qualifying delta: {}",
        result.window,
        if result.normalized { "z-score" } else { "seconds" }
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        stage_cell("Qualifying"),
        Cell::new(report.join.qualifying_rows),
        count_cell(report.join.unmatched_qualifying, Color::Yellow),
    ]);
    table.add_row(vec![
        stage_cell("Race"),
        Cell::new(report.join.race_rows),
        count_cell(report.join.unmatched_race, Color::Yellow),
    ]);
    table.add_row(vec![
        stage_cell("Joined"),
        Cell::new(report.join.merged_rows),
        count_cell(report.excluded_records, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Features")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} x {}",
            report.output_rows, report.output_columns
        ))
        .add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_issue_table(&report.parse_issues);
}

fn print_issue_table(issues: &[ParseIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut sorted: Vec<&ParseIssue> = issues.iter().collect();
    sorted.sort_by(|a, b| {
        (a.season, &a.event, &a.driver, &a.field).cmp(&(b.season, &b.event, &b.driver, &b.field))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Season"),
        header_cell("Event"),
        header_cell("Driver"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Problem"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for issue in sorted {
        table.add_row(vec![
            Cell::new(issue.season),
            Cell::new(&issue.event),
            Cell::new(&issue.driver),
            Cell::new(&issue.field).fg(Color::Yellow),
            Cell::new(&issue.raw),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Excluded records:");
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
