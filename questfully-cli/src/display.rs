//! Display Helpers
//!
//! Terminal output formatting and styling.

use console::style;
use questfully_core::{Category, Question, RefreshReport, ViewProgress};

/// Prints a success message.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Prints a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Prints an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Maps a server color tag onto a terminal color swatch.
fn color_swatch(color_tag: &str) -> console::StyledObject<&'static str> {
    let swatch = style("●");
    match color_tag.to_ascii_lowercase().as_str() {
        "red" => swatch.red(),
        "green" => swatch.green(),
        "yellow" | "orange" => swatch.yellow(),
        "blue" => swatch.blue(),
        "purple" | "magenta" | "pink" => swatch.magenta(),
        "cyan" | "teal" => swatch.cyan(),
        _ => swatch.dim(),
    }
}

/// Displays one category line with its loaded question count.
pub fn display_category(category: &Category, loaded: usize) {
    println!(
        "  {} {:24} {} {}",
        color_swatch(&category.color_tag),
        style(&category.name).bold(),
        style(&category.id).dim(),
        style(format!("({} loaded)", loaded)).dim()
    );
}

/// Displays a question in a compact format.
pub fn display_question(question: &Question, index: usize) {
    println!(
        "{:3}. {} {}",
        index + 1,
        question.text,
        style(format!("[{}]", question.id)).dim()
    );
}

/// Summarizes a refresh cycle.
pub fn display_report(report: &RefreshReport) {
    if report.joined {
        info("Joined a refresh that was already running");
    }
    if report.categories_updated {
        success(&format!(
            "Categories refreshed, {} question buckets updated",
            report.buckets_updated.len()
        ));
    }
    if report.stats_updated {
        success("Stats refreshed");
    }
    for (target, error) in &report.failed {
        warning(&format!("{} not refreshed: {}", target, error));
    }
}

/// Renders progress as a bar.
pub fn display_progress(label: &str, progress: ViewProgress) {
    let width = 30;
    let filled = if progress.total == 0 {
        0
    } else {
        (progress.viewed * width / progress.total) as usize
    };
    println!(
        "{:12} [{}{}] {}/{}",
        label,
        style("█".repeat(filled)).green(),
        "░".repeat(width as usize - filled),
        progress.viewed,
        progress.total
    );
}
