//! Quota Commands

use anyhow::Result;
use console::style;

use crate::config::{today, CliConfig};
use crate::display;

/// Shows today's usage.
pub fn status(config: &CliConfig) -> Result<()> {
    let quota = config.open_quota()?;
    let today = today();

    println!(
        "Today:    {}/{}",
        quota.questions_consumed(today),
        quota.limit()
    );
    println!("All time: {}", quota.total_viewed());
    match quota.remaining(today) {
        Some(0) => println!("{}", style("Daily limit reached").red()),
        Some(left) => println!("Left:     {}", left),
        None => println!("Left:     unlimited"),
    }
    Ok(())
}

/// Counts one question view.
pub fn view(config: &CliConfig) -> Result<()> {
    let mut quota = config.open_quota()?;
    let today = today();

    if quota.register_view(today)? {
        let left = quota.remaining(today).unwrap_or(u32::MAX);
        display::success(&format!("View counted, {} left today", left));
    } else {
        display::warning("Daily limit reached, come back tomorrow.");
    }
    Ok(())
}

/// Restarts today's count.
pub fn reset(config: &CliConfig) -> Result<()> {
    let mut quota = config.open_quota()?;
    quota.reset_to_limited(today())?;
    display::success("Daily quota reset.");
    Ok(())
}
