//! Generate the named DGN table from the manifest.
use super::conf::{DEFAULT_PRIORITY, MAX_DGN};
use super::domain::{DgnEntry, Manifest, ResolvedDgn};
use super::errors::BuildError;
use super::name_helpers::to_screaming_snake_case;

use std::collections::HashSet;
use std::fmt::Write;

/// Validate every manifest entry and emit the Rust source for the table.
pub(crate) fn run_dgns_gen(manifest: &Manifest) -> Result<String, BuildError> {
    let mut resolved = manifest
        .dgns
        .iter()
        .map(resolve_entry)
        .collect::<Result<Vec<_>, _>>()?;

    check_duplicates(&resolved)?;
    // Sorted by value so the runtime lookup can binary search.
    resolved.sort_by_key(|d| d.value);

    let mut code = String::new();
    writeln!(code, "// @generated by build.rs from the DGN manifest. Do not edit.")?;
    writeln!(code)?;

    for dgn in &resolved {
        writeln!(code, "/// {} (`0x{:05X}`).", dgn.label, dgn.value)?;
        if !dgn.description.is_empty() {
            writeln!(code, "///")?;
            writeln!(code, "/// {}", dgn.description)?;
        }
        writeln!(code, "pub const {}: u32 = 0x{:05X};", dgn.const_name, dgn.value)?;
    }

    writeln!(code)?;
    writeln!(code, "/// Every named DGN, sorted by value.")?;
    writeln!(code, "pub static KNOWN_DGNS: &[DgnInfo] = &[")?;
    for dgn in &resolved {
        writeln!(
            code,
            "    DgnInfo {{ dgn: 0x{:05X}, name: {:?}, label: {:?}, priority: {} }},",
            dgn.value, dgn.const_name, dgn.label, dgn.priority
        )?;
    }
    writeln!(code, "];")?;

    Ok(code)
}

/// Parse the hexadecimal value and normalize the name of one entry.
fn resolve_entry(entry: &DgnEntry) -> Result<ResolvedDgn, BuildError> {
    let digits = entry
        .dgn
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    let value = u32::from_str_radix(digits, 16)
        .ok()
        .filter(|v| *v <= MAX_DGN)
        .ok_or_else(|| BuildError::InvalidDgn {
            name: entry.name.clone(),
            value: entry.dgn.clone(),
        })?;

    let priority = entry.priority.unwrap_or(DEFAULT_PRIORITY);
    if priority > 7 {
        return Err(BuildError::InvalidPriority {
            name: entry.name.clone(),
            priority,
        });
    }

    Ok(ResolvedDgn {
        const_name: to_screaming_snake_case(&entry.name),
        label: entry.name.clone(),
        value,
        priority,
        description: entry.description.clone().unwrap_or_default(),
    })
}

/// Reject entries that would generate the same constant or shadow a value.
fn check_duplicates(resolved: &[ResolvedDgn]) -> Result<(), BuildError> {
    let mut names = HashSet::new();
    let mut values = HashSet::new();
    for dgn in resolved {
        if !names.insert(dgn.const_name.as_str()) || !values.insert(dgn.value) {
            return Err(BuildError::DuplicateDgn {
                name: dgn.label.clone(),
            });
        }
    }
    Ok(())
}
