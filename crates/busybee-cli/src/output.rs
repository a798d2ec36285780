//! Terminal output formatting.

use std::path::Path;

use busybee_core::analysis::{KeywordRecord, Level, ProductRecord, SalesPoint, ShopRecord};
use busybee_core::{AnalysisResult, SearchHistoryEntry};
use busybee_export::document::{dollars, thousands};
use busybee_export::{ExportError, ExportFormat};
use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

/// Print every record of a finished analysis.
pub fn print_result(result: &AnalysisResult) {
    if result.is_empty() {
        println!("{}", "The analysis returned no records.".dimmed());
        return;
    }

    println!(
        "{} {} analysis: {} records",
        "✓".green().bold(),
        result.kind(),
        result.len()
    );

    match result {
        AnalysisResult::Product(records) => {
            for (i, record) in records.iter().enumerate() {
                print_product(i + 1, record);
            }
        }
        AnalysisResult::Shop(records) => {
            for (i, record) in records.iter().enumerate() {
                print_shop(i + 1, record);
            }
        }
        AnalysisResult::Keyword(records) => {
            for (i, record) in records.iter().enumerate() {
                print_keyword(i + 1, record);
            }
        }
    }
}

fn print_heading(n: usize, title: &str) {
    let width = term_width().saturating_sub(6).max(20);
    println!();
    println!("{} {}", format!("{:>2}.", n).dimmed(), truncate_visual(title, width).cyan().bold());
}

fn print_product(n: usize, p: &ProductRecord) {
    print_heading(n, &p.product_title);
    println!(
        "    {}: {}  {}: {}  {}: {} days",
        "Sales/mo".bold(),
        thousands(p.monthly_sales),
        "Revenue/mo".bold(),
        dollars(p.monthly_revenue).green(),
        "Age".bold(),
        thousands(p.listing_age_days)
    );
    println!(
        "    {}: {}  {}: {}",
        "Views".bold(),
        thousands(p.total_views),
        "Favorites".bold(),
        thousands(p.favorites)
    );

    if !p.tags.is_empty() {
        println!("    {}: {}", "Tags".bold(), p.tags.join(", ").dimmed());
    }
    if !p.summary.is_empty() {
        println!("    {}", p.summary);
    }
    if !p.sales_trend.is_empty() {
        println!("    {}: {}", "Trend".bold(), format_trend(&p.sales_trend));
    }
    if !p.sales_trend_analysis.is_empty() {
        println!("    {}", p.sales_trend_analysis.italic());
    }

    if !p.related_products.is_empty() {
        println!("    {}", "Related products".bold());
        for related in &p.related_products {
            println!(
                "      • {} {}",
                pad_right(&truncate_visual(&related.title, 48), 48),
                format!("{}/mo", thousands(related.monthly_sales)).dimmed()
            );
        }
    }
}

fn print_shop(n: usize, s: &ShopRecord) {
    print_heading(n, &s.shop_name);
    println!(
        "    {}: {}  {}: {}  {}: {}",
        "Sales/mo".bold(),
        thousands(s.total_monthly_sales),
        "Revenue/mo".bold(),
        dollars(s.total_monthly_revenue).green(),
        "Avg price".bold(),
        dollars(s.average_product_price)
    );

    if !s.top_products.is_empty() {
        println!("    {}", "Top products".bold());
        for product in &s.top_products {
            println!(
                "      • {} {:>8} {:>14}",
                pad_right(&truncate_visual(&product.title, 40), 40),
                thousands(product.monthly_sales),
                dollars(product.monthly_revenue)
            );
        }
    }
}

fn print_keyword(n: usize, k: &KeywordRecord) {
    print_heading(n, &k.keyword);
    println!(
        "    {}: {}  {}: {}  {}: {}",
        "Competition".bold(),
        level_colored(k.competition, true),
        "Demand".bold(),
        level_colored(k.demand, false),
        "Opportunity".bold(),
        score_colored(k.opportunity_score)
    );

    if !k.top_listings.is_empty() {
        println!("    {}", "Top listings".bold());
        for listing in &k.top_listings {
            println!(
                "      • {} {}",
                pad_right(&truncate_visual(&listing.title, 48), 48),
                format!("{}/mo", thousands(listing.monthly_sales)).dimmed()
            );
        }
    }
    if !k.related_keywords.is_empty() {
        println!("    {}: {}", "Related".bold(), k.related_keywords.join(", ").dimmed());
    }
}

/// Color a level; for competition a high level is bad, for demand it is good.
fn level_colored(level: Level, inverted: bool) -> ColoredString {
    let good = match level {
        Level::Low => inverted,
        Level::Medium => return level.as_str().yellow(),
        Level::High => !inverted,
    };
    if good {
        level.as_str().green()
    } else {
        level.as_str().red()
    }
}

fn score_colored(score: u32) -> ColoredString {
    let text = format!("{}/100", score);
    match score {
        70.. => text.green().bold(),
        40..=69 => text.yellow(),
        _ => text.red(),
    }
}

/// `Jan 120 · Feb 98 · ...`
fn format_trend(points: &[SalesPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", p.month, thousands(p.sales)))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Print recent searches as a numbered table.
pub fn print_history(entries: &[SearchHistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No searches yet.".dimmed());
        return;
    }

    let query_width = term_width().saturating_sub(16).clamp(20, 60);

    println!("{:<4} {} {}", "#", pad_right("Query", query_width), "Type");
    println!("{}", "─".repeat(query_width + 14));

    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:<4} {} {}",
            i + 1,
            pad_right(&truncate_visual(&entry.query, query_width), query_width),
            entry.kind.as_str().cyan()
        );
    }
}

pub fn print_exported(format: ExportFormat, path: &Path) {
    println!(
        "{} Exported {} → {}",
        "✓".green().bold(),
        format.to_string().bold(),
        path.display()
    );
}

pub fn print_export_error(format: ExportFormat, err: &ExportError) {
    eprintln!("{} {} export failed: {}", "✗".red().bold(), format, err);
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
