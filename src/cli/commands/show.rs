//! Show command implementation
//!
//! Prints one region of a built index: the species list of a single week,
//! or the checklist count of every week when no week is given.

use crate::cli::args::ShowArgs;
use crate::codec::FrequencyReader;
use crate::constants::MAX_STORED_CHECKLISTS;
use crate::models::month_of_week;
use anyhow::{Context, Result};
use colored::*;

/// Run the show command
pub async fn run_show(args: ShowArgs) -> Result<()> {
    args.validate()?;
    let region = args.region.to_uppercase();
    let reader = FrequencyReader::new(args.index_dir());

    println!(
        "{} {}",
        "Region:".bright_cyan(),
        region.as_str().bright_white().bold()
    );

    match args.week {
        Some(week) => {
            let species = reader
                .week_species(&region, week)
                .with_context(|| format!("failed to read week {} of {}", week, region))?;
            println!(
                "  {} {} ({})",
                "Week:".bright_cyan(),
                week.to_string().bright_white(),
                month_name(week)
            );
            if species.is_empty() {
                println!("  {}", "No species recorded".bright_yellow());
            }
            for entry in species {
                let line = format!("  {:>6.2}%  {}", entry.frequency, entry.name);
                if entry.is_rarity {
                    println!(
                        "{} {}",
                        line.bright_red(),
                        format!("(rare, seen in {} years)", entry.years_observed).red()
                    );
                } else {
                    println!("{}", line);
                }
            }
        }
        None => {
            let counts = reader
                .checklist_counts(&region)
                .with_context(|| format!("failed to read {}", region))?;
            println!("  {}", "Checklists per week:".bright_cyan());
            for (week, count) in counts.iter().enumerate() {
                println!(
                    "  {:>2}  {:<9}  {}",
                    week,
                    month_name(week),
                    format_count(*count).bright_white()
                );
            }
        }
    }

    Ok(())
}

/// Calendar month a week bucket falls in
fn month_name(week: usize) -> &'static str {
    u8::try_from(month_of_week(week))
        .ok()
        .and_then(|month| chrono::Month::try_from(month).ok())
        .map(|month| month.name())
        .unwrap_or("?")
}

/// Checklist count, marked when the stored value is saturated
fn format_count(count: u32) -> String {
    if count >= MAX_STORED_CHECKLISTS {
        format!("{}+", count)
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(17), "May");
        assert_eq!(month_name(47), "December");
    }

    #[test]
    fn test_saturated_count_is_marked() {
        assert_eq!(format_count(120), "120");
        assert_eq!(format_count(65_535), "65535+");
    }
}
