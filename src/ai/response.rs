//! Typed parsing of model output
//!
//! Completions are expected to hold exactly one JSON value, optionally
//! wrapped in a Markdown code fence or surrounded by prose. The value is
//! located with a string-aware bracket scan, deserialized into typed
//! structs and range-checked. Anything that does not fit is an
//! [`AiError`], never a partially-filled result.

use crate::ai::error::{AiError, AiResult};
use serde::Deserialize;

/// Top-level rerank response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResponse {
    pub analyses: Vec<AiAnalysis>,
}

/// One candidate judgment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    /// Position in the prompt's candidate list. Signed so that a stray
    /// negative index is discarded by the caller instead of failing the parse.
    pub index: i64,

    /// Relevance on a 0-10 scale
    pub relevance_score: f64,

    pub reason: String,

    #[serde(default)]
    pub semantic_matches: Vec<String>,

    /// Certainty on a 0-1 scale
    pub confidence: f64,
}

/// Parse a rerank completion
pub fn parse_analyses(completion: &str) -> AiResult<AnalysisResponse> {
    let json = extract_json(completion, '{', '}').ok_or(AiError::MissingJson)?;
    let response: AnalysisResponse = serde_json::from_str(json)?;

    for analysis in &response.analyses {
        if !(0.0..=10.0).contains(&analysis.relevance_score) {
            return Err(AiError::Schema(format!(
                "relevanceScore {} out of range for index {}",
                analysis.relevance_score, analysis.index
            )));
        }
        if !(0.0..=1.0).contains(&analysis.confidence) {
            return Err(AiError::Schema(format!(
                "confidence {} out of range for index {}",
                analysis.confidence, analysis.index
            )));
        }
    }

    Ok(response)
}

/// Parse a suggestion completion (a bare array of strings)
pub fn parse_suggestions(completion: &str) -> AiResult<Vec<String>> {
    let json = extract_json(completion, '[', ']').ok_or(AiError::MissingJson)?;
    let suggestions: Vec<String> = serde_json::from_str(json)?;

    Ok(suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// First balanced `open ... close` span, ignoring brackets inside strings
fn extract_json(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"analyses":[{"index":1,"relevanceScore":9,"reason":"Morning prayer","semanticMatches":["morning","pagi"],"confidence":0.9}]}"#;

    #[test]
    fn test_parse_plain_object() {
        let response = parse_analyses(VALID).unwrap();
        assert_eq!(response.analyses.len(), 1);

        let analysis = &response.analyses[0];
        assert_eq!(analysis.index, 1);
        assert_eq!(analysis.relevance_score, 9.0);
        assert_eq!(analysis.semantic_matches, vec!["morning", "pagi"]);
        assert_eq!(analysis.confidence, 0.9);
    }

    #[test]
    fn test_parse_fenced_object_with_prose() {
        let completion = format!("Here is my analysis:\n```json\n{}\n```\nHope this helps!", VALID);
        assert!(parse_analyses(&completion).is_ok());
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let completion = r#"{"analyses":[{"index":0,"relevanceScore":5,"reason":"uses } and { freely","confidence":0.5}]} trailing }"#;
        let response = parse_analyses(completion).unwrap();
        assert_eq!(response.analyses[0].reason, "uses } and { freely");
        assert!(response.analyses[0].semantic_matches.is_empty());
    }

    #[test]
    fn test_negative_index_parses() {
        let completion = r#"{"analyses":[{"index":-1,"relevanceScore":2,"reason":"stray","confidence":0.4}]}"#;
        let response = parse_analyses(completion).unwrap();
        assert_eq!(response.analyses[0].index, -1);
    }

    #[test]
    fn test_missing_json() {
        assert!(matches!(parse_analyses("I cannot help"), Err(AiError::MissingJson)));
        assert!(matches!(parse_analyses("{ unterminated"), Err(AiError::MissingJson)));
    }

    #[test]
    fn test_schema_mismatch() {
        let wrong_shape = r#"{"results":[]}"#;
        assert!(matches!(parse_analyses(wrong_shape), Err(AiError::Schema(_))));

        let wrong_type = r#"{"analyses":[{"index":"one","relevanceScore":5,"reason":"x","confidence":0.5}]}"#;
        assert!(matches!(parse_analyses(wrong_type), Err(AiError::Schema(_))));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let score = r#"{"analyses":[{"index":0,"relevanceScore":11,"reason":"x","confidence":0.5}]}"#;
        assert!(matches!(parse_analyses(score), Err(AiError::Schema(_))));

        let confidence = r#"{"analyses":[{"index":0,"relevanceScore":5,"reason":"x","confidence":1.5}]}"#;
        assert!(matches!(parse_analyses(confidence), Err(AiError::Schema(_))));
    }

    #[test]
    fn test_parse_suggestions() {
        let completion = "Sure:\n[\"doa pagi\", \" doa sebelum makan \", \"\"]";
        assert_eq!(
            parse_suggestions(completion).unwrap(),
            vec!["doa pagi", "doa sebelum makan"]
        );
        assert!(matches!(parse_suggestions("none"), Err(AiError::MissingJson)));
    }
}
