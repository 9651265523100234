use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use baac_model::{FEATURES, LABEL};
use baac_transform::{ColumnAvailability, Stage};

use crate::commands::{AvailabilityOutcome, RunOutcome};

pub fn print_run_summary(outcome: &RunOutcome) {
    let stats = &outcome.output.stats;
    let options = &outcome.resolved.pipeline;
    println!(
        "Data: {} (vintage {})",
        outcome.data_dir.display(),
        outcome.resolved.vintage
    );
    println!(
        "Reference year: {}, missing values: {}",
        options.reference_year,
        options.sentinel_policy.label()
    );

    let mut sources = Table::new();
    sources.set_header(vec![header_cell("Source"), header_cell("Rows")]);
    apply_table_style(&mut sources);
    align_column(&mut sources, 1, CellAlignment::Right);
    for (kind, rows) in outcome.tables.row_counts() {
        sources.add_row(vec![Cell::new(kind.label()), Cell::new(rows)]);
    }
    println!("{sources}");

    let mut stages = Table::new();
    stages.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut stages);
    align_column(&mut stages, 1, CellAlignment::Right);
    align_column(&mut stages, 2, CellAlignment::Right);
    for stage in Stage::ALL {
        let df = outcome.output.stage(stage);
        stages.add_row(vec![
            Cell::new(stage.label()),
            Cell::new(stats.rows(stage)),
            Cell::new(df.width()),
        ]);
    }
    stages.add_row(vec![
        Cell::new("DROPPED")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(stats.dropped_rows(), Color::Yellow),
        dim_cell("-"),
    ]);
    println!("{stages}");

    if let Some(persons) = stats.distinct_persons {
        println!("Distinct road users after join: {persons}");
    }
    if let Some(path) = &outcome.written {
        println!("Output: {}", path.display());
    }
    if let Some(path) = &outcome.report {
        println!("Report: {}", path.display());
    }
    if let Some(preview) = &outcome.preview {
        println!();
        println!("{preview}");
    }
}

pub fn print_availability(outcome: &AvailabilityOutcome) {
    println!("Stage: {} ({} rows)", outcome.stage, outcome.rows);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Available"),
        header_cell("Missing"),
        header_cell("Total"),
        header_cell("%"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in &outcome.columns {
        table.add_row(vec![
            Cell::new(&column.column),
            Cell::new(column.available),
            count_cell(column.missing(), Color::Yellow),
            Cell::new(column.total),
            percent_cell(column),
        ]);
    }
    println!("{table}");
}

pub fn print_features() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Column"), header_cell("Role")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, name) in FEATURES.iter().enumerate() {
        let role = if *name == LABEL {
            Cell::new("label")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("feature")
        };
        table.add_row(vec![Cell::new(index + 1), Cell::new(name), role]);
    }
    println!("{table}");
}

fn percent_cell(column: &ColumnAvailability) -> Cell {
    let text = format!("{:.1}", column.percent);
    let color = if column.percent >= 90.0 {
        Color::Green
    } else if column.percent >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(text).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
