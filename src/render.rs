//! Plain-text rendering of a build listing.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::editor::html;
use crate::models::{AquariumBuild, Comment, LivestockLine};
use crate::pricing::BuildTotals;

/// Render the listing: header, equipment with cheapest prices, livestock,
/// description, gallery size and comments.
///
/// Example output:
/// ```text
/// My Aquarium Build  [private]  by CurrentUser
///
/// Equipment
/// ├── Fluval Flex Aquarium 15 Gallon (FL15) x1  $129.99 @ Amazon
/// └── Seiryu Stone (per lb) x4  $4.49 @ Aquarium Co-op
/// Total: $134.48
/// ```
pub fn render_listing(build: &AquariumBuild, comments: &[Comment]) -> String {
    let mut out = String::new();
    let visibility = if build.is_public { "public" } else { "private" };
    let _ = writeln!(out, "{}  [{}]  by {}", build.title, visibility, build.author);

    out.push_str("\nEquipment\n");
    if build.equipment.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, line) in build.equipment.iter().enumerate() {
        let branch = branch(i, build.equipment.len());
        let model = line
            .item
            .model_number
            .as_ref()
            .map(|m| format!(" ({})", m))
            .unwrap_or_default();
        let price = match line.item.cheapest_quote() {
            Some(q) => format!("${:.2} @ {}", q.price, q.source),
            None => "no price".to_string(),
        };
        let _ = writeln!(
            out,
            "{}{}{} x{}  {}",
            branch, line.item.name, model, line.quantity, price
        );
    }
    let totals = BuildTotals::of(build);
    let _ = writeln!(out, "Total: ${:.2}", totals.equipment_total);

    render_livestock(&mut out, "Fish", &build.fish);
    render_livestock(&mut out, "Plants", &build.plants);

    let description = html::parse(&build.description).plain_text();
    if !description.trim().is_empty() {
        out.push_str("\nDescription\n");
        for line in description.lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }

    let _ = writeln!(out, "\nPhotos: {}", build.photos.len());

    let _ = writeln!(out, "\nComments ({})", comments.len());
    for comment in comments {
        let _ = writeln!(
            out,
            "  {} · {}\n    {}",
            comment.author,
            format_date(&comment.created_at),
            comment.content
        );
    }

    out
}

fn render_livestock(out: &mut String, heading: &str, lines: &[LivestockLine]) {
    let _ = writeln!(out, "\n{}", heading);
    if lines.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}{} ({}) x{}",
            branch(i, lines.len()),
            line.item.name,
            line.item.scientific_name,
            line.quantity
        );
    }
}

fn branch(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "└── "
    } else {
        "├── "
    }
}

/// `Dec 15, 2025, 10:30 AM` style timestamps.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %-I:%M %p").to_string()
}
