use std::io::{self, Write};

use crate::schema::hierarchy::{SchemaMapping, Tier};

const RULE_WIDTH: usize = 40;

fn level_label(weight: u32) -> String {
    match Tier::from_weight(weight) {
        Some(tier) => tier.report_label().to_string(),
        None => format!("Level (weight {weight})"),
    }
}

/// Writes the mapping grouped by weight, heaviest group first, one line per group.
pub fn write_hierarchy_report<W: Write>(out: &mut W, schema: &SchemaMapping) -> io::Result<()> {
    writeln!(out, "Schema Type Hierarchy:")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    for (weight, names) in schema.grouped_by_weight() {
        let label = level_label(weight);
        writeln!(out, "{label:<10}: {}", names.join(", "))?;
    }
    writeln!(out)?;
    Ok(())
}

/// Writes every entry as `name : weight`, heaviest first. Equal weights keep insertion order.
pub fn write_weight_listing<W: Write>(out: &mut W, schema: &SchemaMapping) -> io::Result<()> {
    writeln!(out, "Schema hierarchy by weight:")?;

    let mut entries = schema.entries().to_vec();
    entries.sort_by(|a, b| b.weight.cmp(&a.weight));
    for entry in entries {
        writeln!(out, "{:<15}: {}", entry.name, entry.weight)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/schema/report.rs"]
mod tests;
