//! Instruction text sent with each analysis.

use busybee_core::AnalysisKind;

/// Build the prompt for `kind`, embedding the user's query.
pub fn prompt_for(kind: AnalysisKind, query: &str) -> String {
    match kind {
        AnalysisKind::Product => format!(
            "You are an expert e-commerce analyst. Based on the product concept \"{query}\", \
             generate a detailed, realistic but fictional analysis for 10 competing successful \
             Etsy listings. The sales trend data must cover the last 12 months. For each product, \
             provide a concise analysis of its sales trend. For each main product analysis, also \
             generate a list of 3 to 5 visually similar or complementary products. Provide all \
             data points requested in the JSON schema for each product."
        ),
        AnalysisKind::Shop => format!(
            "You are an expert e-commerce analyst. Based on the shop concept \"{query}\", \
             generate a detailed, realistic but fictional analysis of 10 competing successful \
             Etsy shops. Provide all data points requested in the JSON schema for each shop."
        ),
        AnalysisKind::Keyword => format!(
            "You are an expert e-commerce keyword researcher. Analyze the keyword \"{query}\" \
             and 9 other closely related keywords for their potential on Etsy. Generate a \
             detailed, realistic but fictional analysis for each. Provide all data points \
             requested in the JSON schema."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_embedded_for_every_kind() {
        for kind in AnalysisKind::ALL {
            let prompt = prompt_for(kind, "walnut desk lamp");
            assert!(prompt.contains("\"walnut desk lamp\""), "{kind}: {prompt}");
            assert!(prompt.contains("JSON schema"));
        }
    }

    #[test]
    fn test_product_prompt_asks_for_trend_and_related() {
        let prompt = prompt_for(AnalysisKind::Product, "lamp");
        assert!(prompt.contains("last 12 months"));
        assert!(prompt.contains("3 to 5"));
    }
}
