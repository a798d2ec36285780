//! Response schemas handed to the model.
//!
//! Field names here must match the serde names of the core record types.

use busybee_core::AnalysisKind;
use serde_json::{json, Value};

/// Response schema for `kind`: an array of ten records of the matching shape.
pub fn response_schema(kind: AnalysisKind) -> Value {
    match kind {
        AnalysisKind::Product => json!({
            "type": "ARRAY",
            "description": "A list of 10 fictional but realistic product analyses based on the provided description.",
            "items": product_schema(),
        }),
        AnalysisKind::Shop => json!({
            "type": "ARRAY",
            "description": "A list of 10 competing shops based on the provided description.",
            "items": shop_schema(),
        }),
        AnalysisKind::Keyword => json!({
            "type": "ARRAY",
            "description": "A list of 10 fictional but realistic analyses for the provided keyword and other closely related keywords.",
            "items": keyword_schema(),
        }),
    }
}

fn product_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "productTitle": { "type": "STRING", "description": "A plausible and engaging title for the product." },
            "monthlySales": { "type": "INTEGER", "description": "Estimated number of sales per month (e.g., between 50 and 1500)." },
            "monthlyRevenue": { "type": "NUMBER", "description": "Estimated monthly revenue in USD." },
            "listingAgeDays": { "type": "INTEGER", "description": "The age of the listing in days (e.g., between 30 and 1000)." },
            "totalViews": { "type": "INTEGER", "description": "Total number of views (e.g., between 5000 and 100000)." },
            "favorites": { "type": "INTEGER", "description": "Total number of favorites (e.g., between 500 and 10000)." },
            "tags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of 13 relevant, high-traffic SEO tags for the product."
            },
            "summary": { "type": "STRING", "description": "A brief 2-3 sentence analysis of the product's market position and potential." },
            "salesTrend": {
                "type": "ARRAY",
                "description": "A list of estimated sales for the last 12 months.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "month": { "type": "STRING", "description": "The month, e.g., 'Jan'" },
                        "sales": { "type": "INTEGER", "description": "Number of sales in that month." }
                    },
                    "required": ["month", "sales"]
                }
            },
            "salesTrendAnalysis": { "type": "STRING", "description": "A 1-2 sentence analysis of the sales trend, noting seasonality, growth, or decline." },
            "relatedProducts": {
                "type": "ARRAY",
                "description": "A list of 3 to 5 visually similar or complementary products.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "The title of the related product." },
                        "imageUrl": { "type": "STRING", "description": "A placeholder image URL, e.g., 'https://placehold.co/300x300/1E293B/94A3B8?text=Product'." },
                        "monthlySales": { "type": "INTEGER", "description": "The estimated monthly sales for the related product." }
                    },
                    "required": ["title", "imageUrl", "monthlySales"]
                }
            }
        },
        "required": [
            "productTitle", "monthlySales", "monthlyRevenue", "listingAgeDays", "totalViews",
            "favorites", "tags", "summary", "salesTrend", "salesTrendAnalysis", "relatedProducts"
        ]
    })
}

fn shop_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "shopName": { "type": "STRING", "description": "A plausible name for the Etsy shop." },
            "totalMonthlySales": { "type": "INTEGER", "description": "The shop's total estimated sales across all products for one month." },
            "totalMonthlyRevenue": { "type": "NUMBER", "description": "The shop's total estimated revenue in USD for one month." },
            "averageProductPrice": { "type": "NUMBER", "description": "The average price of products in this shop." },
            "topProducts": {
                "type": "ARRAY",
                "description": "A list of the top 5 selling products in the shop.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "monthlySales": { "type": "INTEGER" },
                        "monthlyRevenue": { "type": "NUMBER" }
                    },
                    "required": ["title", "monthlySales", "monthlyRevenue"]
                }
            }
        },
        "required": ["shopName", "totalMonthlySales", "totalMonthlyRevenue", "averageProductPrice", "topProducts"]
    })
}

fn keyword_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "keyword": { "type": "STRING", "description": "The keyword being analyzed." },
            "competition": { "type": "STRING", "enum": ["Low", "Medium", "High"], "description": "The level of competition for this keyword." },
            "demand": { "type": "STRING", "enum": ["Low", "Medium", "High"], "description": "The level of search demand for this keyword." },
            "opportunityScore": { "type": "INTEGER", "description": "A score from 1-100 indicating the market opportunity (high demand, low competition is better)." },
            "topListings": {
                "type": "ARRAY",
                "description": "A list of the top 5 performing listings for this keyword.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "monthlySales": { "type": "INTEGER" }
                    },
                    "required": ["title", "monthlySales"]
                }
            },
            "relatedKeywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of 10 related long-tail keywords."
            }
        },
        "required": ["keyword", "competition", "demand", "opportunityScore", "topListings", "relatedKeywords"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use busybee_core::analysis::{KeywordListing, KeywordRecord, Level};

    fn required(schema: &Value) -> Vec<String> {
        schema["items"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_every_schema_is_an_array() {
        for kind in AnalysisKind::ALL {
            assert_eq!(response_schema(kind)["type"], "ARRAY");
        }
    }

    #[test]
    fn test_required_fields_match_keyword_record() {
        let record = KeywordRecord {
            keyword: "lamp".to_string(),
            competition: Level::Low,
            demand: Level::Low,
            opportunity_score: 1,
            top_listings: vec![KeywordListing {
                title: "t".to_string(),
                monthly_sales: 1,
            }],
            related_keywords: vec![],
        };
        let serialized = serde_json::to_value(&record).unwrap();
        let mut record_fields: Vec<String> = serialized.as_object().unwrap().keys().cloned().collect();
        let mut schema_fields = required(&response_schema(AnalysisKind::Keyword));

        record_fields.sort();
        schema_fields.sort();
        assert_eq!(record_fields, schema_fields);
    }

    #[test]
    fn test_product_schema_requires_eleven_fields() {
        assert_eq!(required(&response_schema(AnalysisKind::Product)).len(), 11);
    }
}
