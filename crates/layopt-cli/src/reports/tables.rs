use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use layopt_core::analyzer::SampleReport;
use layopt_core::core_types::TASK_COUNT;

/// Prints the baseline/candidate ranking: one row per layout, loss first,
/// then the per-task scaled costs.
pub fn ranking(results: &[(String, SampleReport)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Loss").fg(Color::Cyan),
        Cell::new("Flaws").fg(Color::Red),
        Cell::new("KC zh"),
        Cell::new("KC en"),
        Cell::new("DC zh"),
        Cell::new("DC en"),
        Cell::new("SC zh"),
        Cell::new("SC en"),
        Cell::new("Sim"),
    ]);

    for i in 1..=TASK_COUNT + 3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, report) in results {
        let mut row = vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.5}", report.loss)).fg(Color::Cyan),
            Cell::new(report.flaws).fg(Color::Red),
        ];
        // Scaled costs are laid out metric-major: kc zh, kc en, dc zh, ...
        for &cost in report.scaled_costs.iter() {
            row.push(Cell::new(format!("{cost:.3}")));
        }
        row.push(Cell::new(format!("{:.2}", report.qwerty_similarity)));
        table.add_row(row);
    }
    println!("\n{table}");
}
