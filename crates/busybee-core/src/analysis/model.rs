//! Analysis domain models.
//!
//! Field names on the wire are camelCase, matching the response schema the
//! provider is asked to fill.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What a query is interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    Product,
    Shop,
    Keyword,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [Self::Product, Self::Shop, Self::Keyword];

    /// Display name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Shop => "Shop",
            Self::Keyword => "Keyword",
        }
    }

    /// Lowercase form used in filenames.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Shop => "shop",
            Self::Keyword => "keyword",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "product" => Ok(Self::Product),
            "shop" => Ok(Self::Shop),
            "keyword" => Ok(Self::Keyword),
            _ => Err(CoreError::InvalidKind(s.to_string())),
        }
    }
}

/// Competition or demand level for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One month of estimated sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub month: String,
    #[serde(with = "whole_number")]
    pub sales: u64,
}

/// A visually similar or complementary product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedProduct {
    pub title: String,
    pub image_url: String,
    #[serde(with = "whole_number")]
    pub monthly_sales: u64,
}

/// Analysis of a single competing product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_title: String,
    #[serde(with = "whole_number")]
    pub monthly_sales: u64,
    pub monthly_revenue: f64,
    #[serde(with = "whole_number")]
    pub listing_age_days: u64,
    #[serde(with = "whole_number")]
    pub total_views: u64,
    #[serde(with = "whole_number")]
    pub favorites: u64,
    pub tags: Vec<String>,
    pub summary: String,
    pub sales_trend: Vec<SalesPoint>,
    pub sales_trend_analysis: String,
    pub related_products: Vec<RelatedProduct>,
}

/// A top-selling product inside a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProduct {
    pub title: String,
    #[serde(with = "whole_number")]
    pub monthly_sales: u64,
    pub monthly_revenue: f64,
}

/// Analysis of a single competing shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRecord {
    pub shop_name: String,
    #[serde(with = "whole_number")]
    pub total_monthly_sales: u64,
    pub total_monthly_revenue: f64,
    pub average_product_price: f64,
    pub top_products: Vec<ShopProduct>,
}

/// A listing ranking for a keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordListing {
    pub title: String,
    #[serde(with = "whole_number")]
    pub monthly_sales: u64,
}

/// Analysis of a single keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    pub keyword: String,
    pub competition: Level,
    pub demand: Level,
    #[serde(with = "whole_number")]
    pub opportunity_score: u32,
    pub top_listings: Vec<KeywordListing>,
    pub related_keywords: Vec<String>,
}

// Integer fields also accept whole-valued floats such as `72.0`.
mod whole_number {
    use std::fmt::Display;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
        T::Error: Display,
    {
        let n = f64::deserialize(deserializer)?;
        if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
            return Err(D::Error::custom(format!(
                "expected a non-negative whole number, got {}",
                n
            )));
        }
        T::try_from(n as u64).map_err(D::Error::custom)
    }
}

/// The records produced by one analysis. The variant always matches the
/// kind that was requested.
///
/// Serializes as the bare record array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Product(Vec<ProductRecord>),
    Shop(Vec<ShopRecord>),
    Keyword(Vec<KeywordRecord>),
}

impl AnalysisResult {
    /// Parse a record array of the shape selected by `kind`.
    pub fn from_json(kind: AnalysisKind, json: &str) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            AnalysisKind::Product => Self::Product(serde_json::from_str(json)?),
            AnalysisKind::Shop => Self::Shop(serde_json::from_str(json)?),
            AnalysisKind::Keyword => Self::Keyword(serde_json::from_str(json)?),
        })
    }

    pub fn kind(&self) -> AnalysisKind {
        match self {
            Self::Product(_) => AnalysisKind::Product,
            Self::Shop(_) => AnalysisKind::Shop,
            Self::Keyword(_) => AnalysisKind::Keyword,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Product(records) => records.len(),
            Self::Shop(records) => records.len(),
            Self::Keyword(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Title, shop name or keyword of the first record.
    pub fn first_title(&self) -> Option<&str> {
        match self {
            Self::Product(records) => records.first().map(|r| r.product_title.as_str()),
            Self::Shop(records) => records.first().map(|r| r.shop_name.as_str()),
            Self::Keyword(records) => records.first().map(|r| r.keyword.as_str()),
        }
    }
}
