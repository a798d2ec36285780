//! JSON exports.

use busybee_core::analysis::KeywordRecord;
use busybee_core::AnalysisResult;
use serde::Serialize;

use crate::error::ExportResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RelatedKeywords<'a> {
    keyword: &'a str,
    related_keywords: &'a [String],
}

/// The record array exactly as received, pretty-printed.
pub fn to_json(result: &AnalysisResult) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// `[{keyword, relatedKeywords}]` for each keyword record.
pub fn related_keywords_json(records: &[KeywordRecord]) -> ExportResult<String> {
    let projection: Vec<RelatedKeywords<'_>> = records
        .iter()
        .map(|r| RelatedKeywords {
            keyword: &r.keyword,
            related_keywords: &r.related_keywords,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&projection)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use busybee_core::analysis::Level;
    use busybee_core::AnalysisKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records() -> Vec<KeywordRecord> {
        vec![KeywordRecord {
            keyword: "boho wall decor".to_string(),
            competition: Level::Medium,
            demand: Level::High,
            opportunity_score: 71,
            top_listings: vec![],
            related_keywords: vec!["macrame".to_string()],
        }]
    }

    #[test]
    fn test_json_is_bare_record_array() {
        let result = AnalysisResult::Keyword(records());
        let text = to_json(&result).unwrap();

        assert_eq!(AnalysisResult::from_json(AnalysisKind::Keyword, &text).unwrap(), result);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["opportunityScore"], 71);
    }

    #[test]
    fn test_related_keywords_projection() {
        let value: serde_json::Value =
            serde_json::from_str(&related_keywords_json(&records()).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([{ "keyword": "boho wall decor", "relatedKeywords": ["macrame"] }])
        );
    }
}
