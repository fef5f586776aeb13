//! Candidate list text sent to the scoring model

use barkeep_core::Candidate;

const DESCRIPTION_LIMIT: usize = 200;
const MISSING: &str = "N/A";

/// Numbered, one block per candidate
pub fn format_candidates(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "No cocktails were retrieved.".to_string();
    }

    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let marker = if c.is_target { " (target)" } else { "" };
            format!(
                "{index}. {name}{marker}\n   \
                 Category: {category} | Glass: {glass} | Alcoholic: {alcoholic}\n   \
                 Ingredients: {ingredients}\n   \
                 Description: {description}",
                index = i + 1,
                name = c.name,
                category = c.category.as_deref().unwrap_or(MISSING),
                glass = c.glass_type.as_deref().unwrap_or(MISSING),
                alcoholic = c.alcoholic.as_deref().unwrap_or(MISSING),
                ingredients = ingredients_line(c),
                description = c
                    .description
                    .as_deref()
                    .map_or_else(|| MISSING.to_string(), truncate),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn ingredients_line(candidate: &Candidate) -> String {
    if !candidate.recipe.is_empty() {
        return candidate
            .recipe
            .iter()
            .map(|r| format!("{} {}", r.measure, r.ingredient))
            .collect::<Vec<_>>()
            .join(", ");
    }
    if candidate.ingredients.is_empty() {
        return MISSING.to_string();
    }
    candidate.ingredients.join(", ")
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_LIMIT {
        return text.to_string();
    }
    let cut: String = text.chars().take(DESCRIPTION_LIMIT).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_core::RecipeIngredient;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_full_candidate() {
        let candidate = Candidate {
            category: Some("Cocktail".to_string()),
            glass_type: Some("Cocktail glass".to_string()),
            alcoholic: Some("Alcoholic".to_string()),
            description: Some("Amber and stirred".to_string()),
            recipe: vec![
                RecipeIngredient::new("Bourbon", "2 oz"),
                RecipeIngredient::new("Sweet Vermouth", "1 oz"),
            ],
            is_target: true,
            ..Candidate::named("Manhattan")
        };

        assert_eq!(
            format_candidates(&[candidate]),
            "1. Manhattan (target)\n   \
             Category: Cocktail | Glass: Cocktail glass | Alcoholic: Alcoholic\n   \
             Ingredients: 2 oz Bourbon, 1 oz Sweet Vermouth\n   \
             Description: Amber and stirred"
        );
    }

    #[test]
    fn test_missing_fields_and_ingredient_fallback() {
        let candidate = Candidate {
            ingredients: vec!["Gin".to_string(), "Campari".to_string()],
            ..Candidate::named("Negroni")
        };

        let text = format_candidates(&[Candidate::named("Mystery"), candidate]);

        assert!(text.starts_with("1. Mystery\n"));
        assert!(text.contains("Ingredients: N/A"));
        assert!(text.contains("2. Negroni\n"));
        assert!(text.contains("Ingredients: Gin, Campari"));
    }

    #[test]
    fn test_long_description_truncated_on_char_boundary() {
        let candidate = Candidate {
            description: Some("é".repeat(250)),
            ..Candidate::named("Long")
        };

        let text = format_candidates(&[candidate]);

        assert!(text.ends_with(&format!("{}...", "é".repeat(200))));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_candidates(&[]), "No cocktails were retrieved.");
    }
}
