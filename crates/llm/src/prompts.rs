//! Prompt templates
//!
//! PRIVATE MODULE - Not exported from crate

use barkeep_core::StrategyId;

pub const KEYWORD_VISUAL: &str = include_str!("../assets/prompts/keyword_visual.txt");
pub const KEYWORD_GLASS: &str = include_str!("../assets/prompts/keyword_glass.txt");
pub const KEYWORD_MULTI_HOP: &str = include_str!("../assets/prompts/keyword_multi_hop.txt");
pub const KEYWORD_ALTERNATIVE: &str = include_str!("../assets/prompts/keyword_alternative.txt");

pub const TASK_CLASSIFIER: &str = include_str!("../assets/prompts/task_classifier.txt");
pub const QUALITY_SCORING: &str = include_str!("../assets/prompts/quality_scoring.txt");
pub const IMAGE_DESCRIPTION: &str = include_str!("../assets/prompts/image_description.txt");

pub const EXTRACTION_SYSTEM: &str = "You are a keyword extraction expert. \
    Always respond with valid JSON only. Extract only what the question states.";
pub const CLASSIFIER_SYSTEM: &str =
    "You classify cocktail questions. Always respond with valid JSON only.";
pub const SCORING_SYSTEM: &str =
    "You are a strict evaluator of search results. Always respond with valid JSON only.";

/// Keyword extraction template for a strategy
pub fn keyword_template(strategy: StrategyId) -> &'static str {
    match strategy {
        StrategyId::VisualIngredient => KEYWORD_VISUAL,
        StrategyId::GlassProgressive => KEYWORD_GLASS,
        StrategyId::MultiHop => KEYWORD_MULTI_HOP,
        StrategyId::Alternative => KEYWORD_ALTERNATIVE,
    }
}

pub fn format_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prompt() {
        let template = "Question: {query} ({count} items)";
        let result = format_prompt(template, &[("query", "red drink"), ("count", "3")]);
        assert_eq!(result, "Question: red drink (3 items)");
    }

    #[test]
    fn test_format_prompt_leaves_json_braces() {
        let result = format_prompt(KEYWORD_MULTI_HOP, &[("query", "gin"), ("categories", "Shot")]);
        assert!(result.contains("\"ingredients\": []"));
        assert!(result.contains("Question: \"gin\""));
        assert!(!result.contains("{query}"));
    }

    #[test]
    fn test_every_strategy_has_a_keyword_template() {
        for strategy in [
            StrategyId::VisualIngredient,
            StrategyId::GlassProgressive,
            StrategyId::MultiHop,
            StrategyId::Alternative,
        ] {
            let template = keyword_template(strategy);
            assert!(template.contains("{query}"), "{strategy} lacks {{query}}");
            assert!(template.contains("{categories}"), "{strategy} lacks {{categories}}");
        }
    }

    #[test]
    fn test_scoring_template_placeholders() {
        for key in ["{query}", "{count}", "{candidates}"] {
            assert!(QUALITY_SCORING.contains(key));
        }
        assert!(TASK_CLASSIFIER.contains("{query}"));
        assert!(!IMAGE_DESCRIPTION.is_empty());
    }
}
