use crate::bind::Slot;
use crate::compile::{Arity, Field, Placement};
use crate::types::Value;

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) if s.is_empty() => "\"\"".to_string(),
        Value::List(items) if items.is_empty() => "[]".to_string(),
        other => other.to_string(),
    }
}

pub fn format_slot(slot: &Slot) -> String {
    match slot {
        Slot::Set(value) => format_value(value),
        Slot::Unset => "<unset>".to_string(),
    }
}

pub fn format_flags(field: &Field) -> String {
    match &field.placement {
        Placement::Flag(flags) => {
            let mut parts: Vec<String> = Vec::new();
            parts.extend(flags.short.iter().map(|c| format!("-{c}")));
            parts.extend(flags.long.iter().map(|l| format!("--{l}")));
            parts.extend(flags.short_aliases.iter().map(|c| format!("-{c}")));
            parts.extend(flags.long_aliases.iter().map(|l| format!("--{l}")));
            parts.join(", ")
        }
        Placement::Positional(index) if field.arity == Arity::Many => format!("#{}...", index + 1),
        Placement::Positional(index) => format!("#{}", index + 1),
    }
}
