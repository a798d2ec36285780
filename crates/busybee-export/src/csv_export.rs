//! CSV exports, one header row per kind.

use std::io::Write;

use busybee_core::analysis::{KeywordRecord, ProductRecord, ShopRecord};
use busybee_core::AnalysisResult;
use csv::Writer;

use crate::error::ExportResult;

const PRODUCT_HEADERS: [&str; 8] = [
    "Product Title",
    "Monthly Sales",
    "Monthly Revenue",
    "Listing Age (Days)",
    "Total Views",
    "Favorites",
    "Summary",
    "Tags",
];

const SHOP_HEADERS: [&str; 7] = [
    "Shop Name",
    "Total Monthly Sales",
    "Total Monthly Revenue",
    "Average Product Price",
    "Top Product Title",
    "Product Monthly Sales",
    "Product Monthly Revenue",
];

const KEYWORD_HEADERS: [&str; 7] = [
    "Keyword",
    "Competition",
    "Demand",
    "Opportunity Score",
    "Top Listing Title",
    "Listing Monthly Sales",
    "Related Keywords",
];

const RELATED_HEADERS: [&str; 2] = ["Source Keyword", "Related Keyword"];

/// Write `result` as CSV to `out`.
pub fn write_csv<W: Write>(result: &AnalysisResult, out: W) -> ExportResult<()> {
    let mut writer = Writer::from_writer(out);

    match result {
        AnalysisResult::Product(records) => write_products(&mut writer, records)?,
        AnalysisResult::Shop(records) => write_shops(&mut writer, records)?,
        AnalysisResult::Keyword(records) => write_keywords(&mut writer, records)?,
    }

    writer.flush()?;
    Ok(())
}

/// Write one `(source keyword, related keyword)` row per pair.
pub fn write_related_keywords_csv<W: Write>(records: &[KeywordRecord], out: W) -> ExportResult<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(RELATED_HEADERS)?;
    for record in records {
        for related in &record.related_keywords {
            writer.write_record([record.keyword.as_str(), related.as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_products<W: Write>(writer: &mut Writer<W>, records: &[ProductRecord]) -> ExportResult<()> {
    writer.write_record(PRODUCT_HEADERS)?;
    for p in records {
        writer.write_record([
            p.product_title.clone(),
            p.monthly_sales.to_string(),
            money(p.monthly_revenue),
            p.listing_age_days.to_string(),
            p.total_views.to_string(),
            p.favorites.to_string(),
            p.summary.clone(),
            p.tags.join(" | "),
        ])?;
    }
    Ok(())
}

fn write_shops<W: Write>(writer: &mut Writer<W>, records: &[ShopRecord]) -> ExportResult<()> {
    writer.write_record(SHOP_HEADERS)?;
    for s in records {
        let shop = [
            s.shop_name.clone(),
            s.total_monthly_sales.to_string(),
            money(s.total_monthly_revenue),
            money(s.average_product_price),
        ];

        if s.top_products.is_empty() {
            writer.write_record(shop.iter().cloned().chain(blank_cells(3)))?;
            continue;
        }

        for product in &s.top_products {
            writer.write_record(shop.iter().cloned().chain([
                product.title.clone(),
                product.monthly_sales.to_string(),
                money(product.monthly_revenue),
            ]))?;
        }
    }
    Ok(())
}

fn write_keywords<W: Write>(writer: &mut Writer<W>, records: &[KeywordRecord]) -> ExportResult<()> {
    writer.write_record(KEYWORD_HEADERS)?;
    for k in records {
        let related = k.related_keywords.join(" | ");
        let head = [
            k.keyword.clone(),
            k.competition.to_string(),
            k.demand.to_string(),
            k.opportunity_score.to_string(),
        ];

        if k.top_listings.is_empty() {
            writer.write_record(
                head.iter().cloned().chain(blank_cells(2)).chain([related.clone()]),
            )?;
            continue;
        }

        for listing in &k.top_listings {
            writer.write_record(head.iter().cloned().chain([
                listing.title.clone(),
                listing.monthly_sales.to_string(),
                related.clone(),
            ]))?;
        }
    }
    Ok(())
}

fn blank_cells(n: usize) -> impl Iterator<Item = String> {
    std::iter::repeat(String::new()).take(n)
}

fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use busybee_core::analysis::{KeywordListing, Level, ShopProduct};
    use pretty_assertions::assert_eq;

    fn to_string(result: &AnalysisResult) -> String {
        let mut buf = Vec::new();
        write_csv(result, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn keyword(name: &str, listings: Vec<KeywordListing>) -> KeywordRecord {
        KeywordRecord {
            keyword: name.to_string(),
            competition: Level::High,
            demand: Level::Low,
            opportunity_score: 35,
            top_listings: listings,
            related_keywords: vec!["a".to_string(), "b".to_string()],
        }
    }

    #[test]
    fn test_product_csv_quotes_and_tags() {
        let result = AnalysisResult::Product(vec![ProductRecord {
            product_title: "Lamp, \"Walnut\" edition".to_string(),
            monthly_sales: 120,
            monthly_revenue: 4200.5,
            listing_age_days: 90,
            total_views: 15000,
            favorites: 800,
            tags: vec!["lamp".to_string(), "walnut".to_string()],
            summary: "Strong\nseller".to_string(),
            sales_trend: vec![],
            sales_trend_analysis: String::new(),
            related_products: vec![],
        }]);

        let csv = to_string(&result);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Product Title,Monthly Sales,Monthly Revenue,Listing Age (Days),Total Views,Favorites,Summary,Tags"
        );
        assert_eq!(
            &csv[csv.find('\n').unwrap() + 1..],
            "\"Lamp, \"\"Walnut\"\" edition\",120,4200.50,90,15000,800,\"Strong\nseller\",lamp | walnut\n"
        );
    }

    #[test]
    fn test_shop_csv_one_row_per_top_product() {
        let product = |title: &str| ShopProduct {
            title: title.to_string(),
            monthly_sales: 10,
            monthly_revenue: 99.0,
        };
        let result = AnalysisResult::Shop(vec![
            ShopRecord {
                shop_name: "Glow".to_string(),
                total_monthly_sales: 300,
                total_monthly_revenue: 7500.0,
                average_product_price: 25.0,
                top_products: vec![product("Candle"), product("Wick")],
            },
            ShopRecord {
                shop_name: "Empty".to_string(),
                total_monthly_sales: 0,
                total_monthly_revenue: 0.0,
                average_product_price: 0.0,
                top_products: vec![],
            },
        ]);

        let csv = to_string(&result);
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], "Glow,300,7500.00,25.00,Candle,10,99.00");
        assert_eq!(rows[2], "Glow,300,7500.00,25.00,Wick,10,99.00");
        assert_eq!(rows[3], "Empty,0,0.00,0.00,,,");
    }

    #[test]
    fn test_keyword_csv_without_listings() {
        let result = AnalysisResult::Keyword(vec![
            keyword(
                "boho",
                vec![KeywordListing {
                    title: "Macrame".to_string(),
                    monthly_sales: 40,
                }],
            ),
            keyword("rare", vec![]),
        ]);

        let csv = to_string(&result);
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(
            rows[0],
            "Keyword,Competition,Demand,Opportunity Score,Top Listing Title,Listing Monthly Sales,Related Keywords"
        );
        assert_eq!(rows[1], "boho,High,Low,35,Macrame,40,a | b");
        assert_eq!(rows[2], "rare,High,Low,35,,,a | b");
    }

    #[test]
    fn test_related_keywords_csv() {
        let mut buf = Vec::new();
        write_related_keywords_csv(&[keyword("boho", vec![])], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Source Keyword,Related Keyword\nboho,a\nboho,b\n"
        );
    }
}
