//! Paginated Markdown report.
//!
//! One page per record, separated by horizontal rules, each closed by a
//! `Page n of m` footer. The report title and generation date open the
//! first page.

use busybee_core::analysis::{KeywordRecord, ProductRecord, ShopRecord};
use busybee_core::{AnalysisKind, AnalysisResult};
use chrono::NaiveDate;

/// Render `result` as a Markdown report dated `generated_on`.
pub fn render_document(result: &AnalysisResult, generated_on: NaiveDate) -> String {
    let pages: Vec<String> = match result {
        AnalysisResult::Product(records) => records.iter().map(product_page).collect(),
        AnalysisResult::Shop(records) => records.iter().map(shop_page).collect(),
        AnalysisResult::Keyword(records) => records.iter().map(keyword_page).collect(),
    };

    let mut content = String::new();
    content.push_str(&format!("# {}\n\n", report_title(result.kind())));
    content.push_str(&format!(
        "Generated {} · {} records\n\n",
        generated_on.format("%B %-d, %Y"),
        pages.len()
    ));

    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            content.push_str("\n---\n\n");
        }
        content.push_str(&format!("## {}. ", i + 1));
        content.push_str(page);
        content.push_str(&format!("\n_Page {} of {}_\n", i + 1, total));
    }

    content
}

/// `Busy Bee: <Kind> Analysis Report`.
pub fn report_title(kind: AnalysisKind) -> String {
    format!("Busy Bee: {} Analysis Report", kind)
}

fn product_page(p: &ProductRecord) -> String {
    let mut page = format!("{}\n\n", single_line(&p.product_title));

    page.push_str("| Metric | Value |\n|---|---|\n");
    page.push_str(&format!("| Monthly Sales | {} |\n", thousands(p.monthly_sales)));
    page.push_str(&format!("| Monthly Revenue | {} |\n", dollars(p.monthly_revenue)));
    page.push_str(&format!("| Listing Age | {} days |\n", thousands(p.listing_age_days)));
    page.push_str(&format!("| Total Views | {} |\n", thousands(p.total_views)));
    page.push_str(&format!("| Favorites | {} |\n\n", thousands(p.favorites)));

    if !p.summary.is_empty() {
        page.push_str(&format!("**Summary:** {}\n\n", p.summary));
    }
    if !p.tags.is_empty() {
        page.push_str(&format!("**Tags:** {}\n\n", p.tags.join(", ")));
    }

    if !p.sales_trend.is_empty() {
        page.push_str("### Sales Trend\n\n| Month | Sales |\n|---|---|\n");
        for point in &p.sales_trend {
            page.push_str(&format!("| {} | {} |\n", cell(&point.month), thousands(point.sales)));
        }
        page.push('\n');
    }
    if !p.sales_trend_analysis.is_empty() {
        page.push_str(&format!("{}\n\n", p.sales_trend_analysis));
    }

    if !p.related_products.is_empty() {
        page.push_str("### Related Products\n\n| Title | Monthly Sales |\n|---|---|\n");
        for related in &p.related_products {
            page.push_str(&format!(
                "| {} | {} |\n",
                cell(&related.title),
                thousands(related.monthly_sales)
            ));
        }
    }

    page
}

fn shop_page(s: &ShopRecord) -> String {
    let mut page = format!("{}\n\n", single_line(&s.shop_name));

    page.push_str("| Metric | Value |\n|---|---|\n");
    page.push_str(&format!("| Total Monthly Sales | {} |\n", thousands(s.total_monthly_sales)));
    page.push_str(&format!("| Total Monthly Revenue | {} |\n", dollars(s.total_monthly_revenue)));
    page.push_str(&format!("| Average Product Price | {} |\n\n", dollars(s.average_product_price)));

    if !s.top_products.is_empty() {
        page.push_str("### Top Products\n\n| Title | Monthly Sales | Monthly Revenue |\n|---|---|---|\n");
        for product in &s.top_products {
            page.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&product.title),
                thousands(product.monthly_sales),
                dollars(product.monthly_revenue)
            ));
        }
    }

    page
}

fn keyword_page(k: &KeywordRecord) -> String {
    let mut page = format!("{}\n\n", single_line(&k.keyword));

    page.push_str("| Metric | Value |\n|---|---|\n");
    page.push_str(&format!("| Competition | {} |\n", k.competition));
    page.push_str(&format!("| Demand | {} |\n", k.demand));
    page.push_str(&format!("| Opportunity Score | {}/100 |\n\n", k.opportunity_score));

    if !k.top_listings.is_empty() {
        page.push_str("### Top Listings\n\n| Title | Monthly Sales |\n|---|---|\n");
        for listing in &k.top_listings {
            page.push_str(&format!(
                "| {} | {} |\n",
                cell(&listing.title),
                thousands(listing.monthly_sales)
            ));
        }
        page.push('\n');
    }

    if !k.related_keywords.is_empty() {
        page.push_str(&format!("**Related Keywords:** {}\n", k.related_keywords.join(", ")));
    }

    page
}

/// `1234567` -> `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `1234.5` -> `$1,234.50`.
pub fn dollars(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, thousands(cents / 100), cents % 100)
}

fn cell(text: &str) -> String {
    single_line(&text.replace('|', "\\|"))
}

// A line break would end a heading or table row early.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
