//! The remote analysis backend, as seen by the controller.

use async_trait::async_trait;

use crate::analysis::model::{KeywordRecord, ProductRecord, ShopRecord};

/// Produces analysis records from a free-text query.
///
/// Errors are reported as a message chain; the controller only looks at the
/// text to decide what to tell the user.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Analyze competing listings for a product concept.
    async fn analyze_product(&self, query: &str) -> anyhow::Result<Vec<ProductRecord>>;

    /// Analyze competing shops for a shop concept.
    async fn analyze_shop(&self, query: &str) -> anyhow::Result<Vec<ShopRecord>>;

    /// Analyze a keyword and closely related keywords.
    async fn analyze_keyword(&self, query: &str) -> anyhow::Result<Vec<KeywordRecord>>;
}
