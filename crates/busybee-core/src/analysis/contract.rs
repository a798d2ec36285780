//! Nominal provider contract checks.
//!
//! Deviations are reported, never enforced: a short or slightly off-shape
//! result is still shown and exported.

use std::fmt;

use super::model::{AnalysisResult, KeywordRecord, ProductRecord, ShopRecord};

/// Number of records each analysis is expected to return.
pub const EXPECTED_RECORDS: usize = 10;

const SALES_TREND_MONTHS: usize = 12;
const RELATED_PRODUCTS_MIN: usize = 3;
const RELATED_PRODUCTS_MAX: usize = 5;
const SHOP_TOP_PRODUCTS: usize = 5;
const KEYWORD_TOP_LISTINGS_MAX: usize = 5;
const RELATED_KEYWORDS_MAX: usize = 10;
const OPPORTUNITY_SCORE_MAX: u32 = 100;

/// A single deviation from the provider contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    /// Index of the offending record, `None` for result-level findings.
    pub record: Option<usize>,
    pub detail: String,
}

impl ContractViolation {
    fn result(detail: impl Into<String>) -> Self {
        Self {
            record: None,
            detail: detail.into(),
        }
    }

    fn record(index: usize, detail: impl Into<String>) -> Self {
        Self {
            record: Some(index),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(index) => write!(f, "record {}: {}", index, self.detail),
            None => f.write_str(&self.detail),
        }
    }
}

/// Collect every deviation from the nominal contract in `result`.
pub fn check_contract(result: &AnalysisResult) -> Vec<ContractViolation> {
    let mut violations = Vec::new();

    if result.len() != EXPECTED_RECORDS {
        violations.push(ContractViolation::result(format!(
            "expected {} records, got {}",
            EXPECTED_RECORDS,
            result.len()
        )));
    }

    match result {
        AnalysisResult::Product(records) => {
            for (i, record) in records.iter().enumerate() {
                check_product(i, record, &mut violations);
            }
        }
        AnalysisResult::Shop(records) => {
            for (i, record) in records.iter().enumerate() {
                check_shop(i, record, &mut violations);
            }
        }
        AnalysisResult::Keyword(records) => {
            for (i, record) in records.iter().enumerate() {
                check_keyword(i, record, &mut violations);
            }
        }
    }

    violations
}

fn check_product(index: usize, record: &ProductRecord, out: &mut Vec<ContractViolation>) {
    if record.sales_trend.len() != SALES_TREND_MONTHS {
        out.push(ContractViolation::record(
            index,
            format!(
                "sales trend has {} points, expected {}",
                record.sales_trend.len(),
                SALES_TREND_MONTHS
            ),
        ));
    }

    let related = record.related_products.len();
    if !(RELATED_PRODUCTS_MIN..=RELATED_PRODUCTS_MAX).contains(&related) {
        out.push(ContractViolation::record(
            index,
            format!(
                "{} related products, expected {}-{}",
                related, RELATED_PRODUCTS_MIN, RELATED_PRODUCTS_MAX
            ),
        ));
    }
}

fn check_shop(index: usize, record: &ShopRecord, out: &mut Vec<ContractViolation>) {
    if record.top_products.len() != SHOP_TOP_PRODUCTS {
        out.push(ContractViolation::record(
            index,
            format!(
                "{} top products, expected {}",
                record.top_products.len(),
                SHOP_TOP_PRODUCTS
            ),
        ));
    }
}

fn check_keyword(index: usize, record: &KeywordRecord, out: &mut Vec<ContractViolation>) {
    if record.opportunity_score > OPPORTUNITY_SCORE_MAX {
        out.push(ContractViolation::record(
            index,
            format!(
                "opportunity score {} exceeds {}",
                record.opportunity_score, OPPORTUNITY_SCORE_MAX
            ),
        ));
    }

    if record.top_listings.len() > KEYWORD_TOP_LISTINGS_MAX {
        out.push(ContractViolation::record(
            index,
            format!(
                "{} top listings, at most {} expected",
                record.top_listings.len(),
                KEYWORD_TOP_LISTINGS_MAX
            ),
        ));
    }

    if record.related_keywords.len() > RELATED_KEYWORDS_MAX {
        out.push(ContractViolation::record(
            index,
            format!(
                "{} related keywords, at most {} expected",
                record.related_keywords.len(),
                RELATED_KEYWORDS_MAX
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::{KeywordListing, Level, RelatedProduct, SalesPoint, ShopProduct};
    use pretty_assertions::assert_eq;

    fn keyword(score: u32) -> KeywordRecord {
        KeywordRecord {
            keyword: "lamp".to_string(),
            competition: Level::Low,
            demand: Level::High,
            opportunity_score: score,
            top_listings: vec![KeywordListing {
                title: "Walnut Lamp".to_string(),
                monthly_sales: 12,
            }],
            related_keywords: vec!["desk lamp".to_string()],
        }
    }

    fn product(trend_months: usize, related: usize) -> ProductRecord {
        ProductRecord {
            product_title: "Walnut Lamp".to_string(),
            monthly_sales: 100,
            monthly_revenue: 4500.0,
            listing_age_days: 200,
            total_views: 9000,
            favorites: 800,
            tags: vec!["lamp".to_string()],
            summary: "Solid seller.".to_string(),
            sales_trend: (0..trend_months)
                .map(|i| SalesPoint {
                    month: format!("M{}", i),
                    sales: 10,
                })
                .collect(),
            sales_trend_analysis: "Flat.".to_string(),
            related_products: (0..related)
                .map(|i| RelatedProduct {
                    title: format!("Related {}", i),
                    image_url: "https://placehold.co/300x300".to_string(),
                    monthly_sales: 5,
                })
                .collect(),
        }
    }

    #[test]
    fn test_full_keyword_result_is_clean() {
        let result = AnalysisResult::Keyword((0..10).map(|_| keyword(55)).collect());
        assert!(check_contract(&result).is_empty());
    }

    #[test]
    fn test_short_result_is_reported_not_rejected() {
        let result = AnalysisResult::Keyword((0..3).map(|_| keyword(55)).collect());
        let violations = check_contract(&result);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].record, None);
        assert_eq!(violations[0].to_string(), "expected 10 records, got 3");
    }

    #[test]
    fn test_score_out_of_range() {
        let mut records: Vec<_> = (0..10).map(|_| keyword(40)).collect();
        records[4] = keyword(140);
        let violations = check_contract(&AnalysisResult::Keyword(records));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].record, Some(4));
    }

    #[test]
    fn test_product_trend_and_related_counts() {
        let mut records: Vec<_> = (0..10).map(|_| product(12, 4)).collect();
        records[0] = product(11, 4);
        records[1] = product(12, 2);
        let violations = check_contract(&AnalysisResult::Product(records));
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].record, Some(0));
        assert_eq!(violations[1].record, Some(1));
    }

    #[test]
    fn test_shop_top_products() {
        let shop = ShopRecord {
            shop_name: "Clay & Co".to_string(),
            total_monthly_sales: 300,
            total_monthly_revenue: 9000.0,
            average_product_price: 30.0,
            top_products: vec![ShopProduct {
                title: "Mug".to_string(),
                monthly_sales: 90,
                monthly_revenue: 2700.0,
            }],
        };
        let violations = check_contract(&AnalysisResult::Shop(vec![shop; 10]));
        assert_eq!(violations.len(), 10);
        assert!(violations.iter().all(|v| v.detail == "1 top products, expected 5"));
    }
}
