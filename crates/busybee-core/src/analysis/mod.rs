//! Analysis result shapes and their provider contract.

pub mod contract;
pub mod model;

pub use contract::{check_contract, ContractViolation, EXPECTED_RECORDS};
pub use model::{
    AnalysisKind, AnalysisResult, KeywordListing, KeywordRecord, Level, ProductRecord,
    RelatedProduct, SalesPoint, ShopProduct, ShopRecord,
};
