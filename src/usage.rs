//! Usage text rendering.
//!
//! Flags are listed per group, groups in first-use order and flags in
//! declaration order. Within a group the name columns are padded to a common
//! width so descriptions line up.

use std::fmt::Write as _;

use crate::registry::{DEFAULT_GROUP, FlagDefinition, GroupInfo, Registry, validate_names};

const INDENT: &str = "   ";

/// Render the full usage text for `registry`.
///
/// # Panics
///
/// Panics if a flag has no name or a name containing whitespace.
pub fn render(registry: &Registry) -> String {
    for def in registry.flags() {
        validate_names(def.long(), def.short());
    }

    let mut out = String::new();
    if !registry.description().is_empty() {
        let _ = writeln!(out, "{}\n", registry.description());
    }
    let _ = writeln!(out, "Usage:\n  {} [flags]\n", registry.tool());
    out.push_str("Flags:\n");
    out.push_str(&render_flags(registry));
    out
}

/// Render only the grouped flag listing.
pub fn render_flags(registry: &Registry) -> String {
    let groups = registry.ordered_groups();
    let headers = !is_implicit_only(&groups);

    let mut out = String::new();
    for group in &groups {
        let members: Vec<&FlagDefinition> = registry
            .flags()
            .filter(|def| def.group() == group.key)
            .collect();
        if headers {
            let label = group.label.as_deref().unwrap_or(&group.key);
            let _ = writeln!(out, "{}:", label.to_uppercase());
        }

        let names: Vec<String> = members.iter().map(|def| name_column(def)).collect();
        let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) + 2;
        for (def, name) in members.iter().zip(&names) {
            let mut line = format!("{INDENT}{name:<width$}{}", def.description());
            if !def.default_is_zero {
                let _ = write!(line, " (default {})", def.default_annotation);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

fn is_implicit_only(groups: &[GroupInfo]) -> bool {
    matches!(groups, [only] if only.key == DEFAULT_GROUP && only.label.is_none())
}

/// `-short, -long type`, leaving out whatever the flag lacks.
fn name_column(def: &FlagDefinition) -> String {
    let names: Vec<String> = [def.short(), def.long()]
        .iter()
        .filter(|n| !n.is_empty())
        .map(|n| format!("-{n}"))
        .collect();
    let mut column = names.join(", ");
    if let Some(hint) = def.cell().type_hint() {
        column.push(' ');
        column.push_str(hint);
    }
    column
}
