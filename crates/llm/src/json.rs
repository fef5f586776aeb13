//! Pulls a JSON document out of a chatty model response

/// Strip markdown code fences from a model response
fn strip_markdown_fences(response: &str) -> &str {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        // Skip the opening fence line (```json or ```)
        let after_fence = if let Some(newline_pos) = trimmed.find('\n') {
            &trimmed[newline_pos + 1..]
        } else {
            trimmed
                .strip_prefix("```json")
                .or_else(|| trimmed.strip_prefix("```"))
                .unwrap_or(trimmed)
        };

        if let Some(close_pos) = after_fence.rfind("```") {
            after_fence[..close_pos].trim()
        } else {
            after_fence.trim()
        }
    } else {
        trimmed
    }
}

/// Extract the balanced structure opening at byte offset `start_pos`
fn extract_balanced_at(content: &str, start_pos: usize) -> Option<&str> {
    let json_content = content.get(start_pos..)?;
    let start_char = json_content.chars().next()?;
    let end_char = match start_char {
        '{' => '}',
        '[' => ']',
        _ => return None,
    };

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in json_content.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == start_char => depth += 1,
            c if c == end_char => {
                depth -= 1;
                if depth == 0 {
                    return Some(&json_content[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

fn is_valid_json(s: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(s).is_ok()
}

/// Extract JSON from a model response, stripping markdown and extraneous text.
///
/// Handles:
/// - Markdown code blocks: ```json\n{...}\n```
/// - Chatty prefixes: "Here's the result:\n{...}"
/// - Trailing explanations: "{...}\n\nLet me know if you need..."
/// - Nested JSON (finds the outermost balanced structure)
/// - Bracketed prose like `[see above]` (validated with serde_json)
pub fn extract_json(response: &str) -> Option<&str> {
    let content = strip_markdown_fences(response);

    let candidates: Vec<usize> = content.match_indices(['{', '[']).map(|(i, _)| i).collect();

    for pos in candidates {
        if let Some(json) = extract_balanced_at(content, pos) {
            if is_valid_json(json) {
                return Some(json);
            }
        }
    }

    None
}

/// Parse the first JSON document found in `response`
pub fn parse_json_response(response: &str) -> Option<serde_json::Value> {
    extract_json(response).and_then(|json| serde_json::from_str(json).ok())
}

/// Shorten a model response for inclusion in an error message
pub fn truncate_for_error(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
