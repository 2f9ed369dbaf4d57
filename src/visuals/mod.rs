mod formatters;

use crate::bind::ParsedArgs;
use crate::compile::ParserPlan;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use formatters::{format_flags, format_slot, format_value};

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

/// Bound values, one row per declared argument.
pub fn parsed_table(parsed: &ParsedArgs) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Argument", "Value"]));
    for (name, slot) in parsed.iter() {
        table.add_row(vec![Cell::new(name), Cell::new(format_slot(slot))]);
    }
    table
}

/// Compiled declaration, one row per argument and alias.
pub fn plan_table(plan: &ParserPlan) -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Argument", "Flags", "Type", "Default", "Required", "Group"]));
    for field in &plan.fields {
        table.add_row(vec![
            Cell::new(field.name()),
            Cell::new(format_flags(field)),
            Cell::new(field.argument.value_type()),
            Cell::new(field.default.as_ref().map(format_value).unwrap_or_default()),
            Cell::new(if field.required { "yes" } else { "" }),
            Cell::new(field.heading.as_deref().unwrap_or("")),
        ]);
    }
    for alias in &plan.aliases {
        let flags = alias
            .flags
            .long
            .as_ref()
            .map(|l| format!("--{l}"))
            .or_else(|| alias.flags.short.map(|c| format!("-{c}")))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(format!("{} (alias)", alias.target)),
            Cell::new(flags),
            Cell::new(""),
            Cell::new(format_value(&alias.value)),
            Cell::new(""),
            Cell::new(""),
        ]);
    }
    table
}

pub fn print_summary(parsed: &ParsedArgs) {
    let set = parsed.iter().filter(|(_, slot)| slot.value().is_some()).count();
    println!("✓ Bound {set} of {} arguments", parsed.plan().fields.len());
}
