//! Export filename derivation.

use busybee_core::AnalysisResult;

const FALLBACK_TOKEN: &str = "analysis";

/// Lowercase `title` and replace every character that is not an ASCII
/// letter or digit with `-`.
pub fn sanitize(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// `busy-bee-<kind>-<first title>.<ext>`, using `analysis` when the first
/// record is missing or its title is blank.
pub fn export_filename(result: &AnalysisResult, ext: &str) -> String {
    let token = match result.first_title() {
        Some(title) if !title.trim().is_empty() => sanitize(title),
        _ => FALLBACK_TOKEN.to_string(),
    };
    format!("busy-bee-{}-{}.{}", result.kind().slug(), token, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use busybee_core::analysis::ShopRecord;
    use pretty_assertions::assert_eq;

    fn shop(name: &str) -> ShopRecord {
        ShopRecord {
            shop_name: name.to_string(),
            total_monthly_sales: 0,
            total_monthly_revenue: 0.0,
            average_product_price: 0.0,
            top_products: vec![],
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Boho Wall Decor!"), "boho-wall-decor-");
        assert_eq!(sanitize("Café 2"), "caf--2");
    }

    #[test]
    fn test_filename_from_first_record() {
        let result = AnalysisResult::Shop(vec![shop("The Candle Co."), shop("Other")]);
        assert_eq!(export_filename(&result, "csv"), "busy-bee-shop-the-candle-co-.csv");
    }

    #[test]
    fn test_filename_fallback() {
        let empty = AnalysisResult::Shop(vec![]);
        assert_eq!(export_filename(&empty, "json"), "busy-bee-shop-analysis.json");

        let blank = AnalysisResult::Shop(vec![shop("   ")]);
        assert_eq!(export_filename(&blank, "md"), "busy-bee-shop-analysis.md");
    }
}
