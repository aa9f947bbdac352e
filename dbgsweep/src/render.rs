//! Report rendering for CLI output

use console::Style;
use dbgsweeplib::RunSummary;

/// Width of the heading rule
const RULE_WIDTH: usize = 50;

struct Theme {
    heading: Style,
    count: Style,
    skipped: Style,
    error: Style,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme {
        heading: Style::new().bold(),
        count: Style::new().cyan(),
        skipped: Style::new().yellow(),
        error: Style::new().red(),
    }
}

/// Render the human-readable summary
pub fn render_text(summary: &RunSummary) -> String {
    let theme = create_theme();
    let totals = &summary.totals;
    let mut out = String::new();

    let title = if summary.dry_run {
        "Debug log cleanup report (dry run)"
    } else {
        "Debug log cleanup report"
    };
    out.push_str(&format!("{}\n", theme.heading.apply_to(title)));
    out.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));

    let removed_label = if summary.dry_run {
        "Debug lines to remove"
    } else {
        "Debug lines removed"
    };
    out.push_str(&format!(
        "Files processed: {}\n",
        theme.count.apply_to(totals.processed)
    ));
    out.push_str(&format!(
        "{}: {}\n",
        removed_label,
        theme.count.apply_to(totals.lines.removed)
    ));
    out.push_str(&format!(
        "Files skipped: {}\n",
        theme.count.apply_to(totals.skipped)
    ));
    out.push_str(&format!(
        "Files with errors: {}\n",
        theme.count.apply_to(totals.errored)
    ));

    let processed: Vec<_> = summary.processed().collect();
    if !processed.is_empty() {
        out.push_str(&format!("\n{}\n", theme.heading.apply_to("Detailed results:")));
        for file in processed {
            out.push_str(&format!(
                "   {}: {} lines removed\n",
                file.path.display(),
                file.removed()
            ));
        }
    }

    let skipped: Vec<_> = summary.skipped().collect();
    if !skipped.is_empty() {
        out.push_str(&format!("\n{}\n", theme.skipped.apply_to("Skipped files:")));
        for file in skipped {
            out.push_str(&format!("   {}\n", file.path.display()));
        }
    }

    let errored: Vec<_> = summary.errored().collect();
    if !errored.is_empty() {
        out.push_str(&format!("\n{}\n", theme.error.apply_to("Errors:")));
        for file in errored {
            out.push_str(&format!(
                "   {}: {}\n",
                file.path.display(),
                file.error().unwrap_or_default()
            ));
        }
    }

    match &summary.backup {
        Some(backup) => {
            if !backup.failures.is_empty() {
                out.push_str(&format!("\n{}\n", theme.error.apply_to("Backup failures:")));
                for failure in &backup.failures {
                    out.push_str(&format!(
                        "   {}: {}\n",
                        failure.source.display(),
                        failure.error
                    ));
                }
            }
            out.push_str(&format!(
                "\nBackup location: {} ({} files)\n",
                backup.root.display(),
                backup.entries.len()
            ));
        }
        None => out.push_str("\nBackup location: none (dry run)\n"),
    }

    out
}

/// Render the summary as pretty JSON
pub fn render_json(summary: &RunSummary) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(summary)?;
    json.push('\n');
    Ok(json)
}
