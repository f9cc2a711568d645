//! Terminal summary tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::CheckReport;

pub fn print_check_summary(report: &CheckReport) {
    println!("Document: {}", report.path.display());
    println!("Grammar: {}", report.grammar);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Record Type"), header_cell("Records")]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for count in &report.counts {
        table.add_row(vec![
            Cell::new(&count.record_type)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(count.records),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.records).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
