use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ac_mechanics::Formula;

pub fn run(source: &str) -> Result<(), String> {
    let set = Formula::parse_set(source).map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Tags", "Min", "Max"]);
    for (i, formula) in set.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            formula.tags().join(", "),
            formula.min().to_string(),
            formula.max().to_string(),
        ]);
    }
    println!("{table}");

    let min: i64 = set.iter().map(Formula::min).sum();
    let max: i64 = set.iter().map(Formula::max).sum();
    println!();
    println!("  {} {min}..={max}", "Range:".bold());
    Ok(())
}
