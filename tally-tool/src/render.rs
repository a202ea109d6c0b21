//! Plain-text rendering of the meal list.

use std::io::{self, Write};

use tally_core::{InputError, Item};

pub fn item_line(item: &Item) -> String {
    format!("#{} {}: {} Calories", item.id, item.name, item.quantity)
}

pub fn total_line(total: i64) -> String {
    format!("Total Calories: {}", total)
}

/// Reports input that was rejected before anything changed.
pub fn write_rejected(err: &mut impl Write, error: &InputError) -> io::Result<()> {
    writeln!(err, "Invalid input: {}", error)
}

/// Writes every item, one per line, followed by the total.
pub fn write_list(out: &mut impl Write, items: &[Item], total: i64) -> io::Result<()> {
    if items.is_empty() {
        writeln!(out, "No meals recorded.")?;
    }
    for item in items {
        writeln!(out, "{}", item_line(item))?;
    }
    writeln!(out, "{}", total_line(total))
}
