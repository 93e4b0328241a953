//! Prompt construction for reranking and query suggestions

use crate::ai::provider::ChatMessage;
use crate::search::SearchResult;
use std::fmt::Write;

/// Judgments requested per rerank call
pub const MAX_ANALYSES: usize = 5;

const RERANK_SYSTEM: &str = "You are a relevance judge for a collection of Islamic prayers (doa). \
Given a user query and a numbered list of candidate prayers, pick the candidates that best satisfy \
the user's intent, including situational and cross-language meaning (Indonesian, English, Arabic). \
Respond with a single JSON object and nothing else.";

const SUGGEST_SYSTEM: &str = "You suggest search queries for a collection of Islamic prayers (doa). \
Respond with a JSON array of strings and nothing else.";

/// Inputs for a rerank prompt
#[derive(Debug, Clone, Copy)]
pub struct RerankPrompt<'a> {
    pub query: &'a str,
    pub candidates: &'a [SearchResult],
    /// Prior queries, oldest first
    pub context: &'a [String],
    pub max_candidates: usize,
    pub preview_chars: usize,
}

impl<'a> RerankPrompt<'a> {
    /// Render the ordered message list sent to the provider
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(RERANK_SYSTEM), ChatMessage::user(self.user_message())]
    }

    fn user_message(&self) -> String {
        let mut out = String::new();

        if !self.context.is_empty() {
            let _ = writeln!(out, "Recent searches by this user:");
            for previous in self.context {
                let _ = writeln!(out, "- {}", previous);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "Query: \"{}\"", self.query);
        out.push('\n');
        let _ = writeln!(out, "Candidates:");

        for (index, candidate) in self.candidates.iter().take(self.max_candidates).enumerate() {
            let doc = &candidate.document;
            let tags: Vec<&str> = doc.tags.iter().map(String::as_str).collect();
            let _ = writeln!(
                out,
                "[{}] title: {} | category: {} | tags: {} | translation: {} | score: {:.2}",
                index,
                doc.title,
                doc.category,
                tags.join(", "),
                preview(&doc.translation, self.preview_chars),
                candidate.score
            );
        }

        let _ = write!(
            out,
            "\nReturn at most {} of the most relevant candidates as:\n\
             {{\"analyses\": [{{\"index\": <candidate number>, \"relevanceScore\": <0-10>, \
             \"reason\": \"<short explanation>\", \"semanticMatches\": [\"<concept>\"], \
             \"confidence\": <0-1>}}]}}",
            MAX_ANALYSES
        );

        out
    }
}

/// Messages asking for up to `limit` query completions of `partial`
pub fn suggestion_messages(partial: &str, limit: usize) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUGGEST_SYSTEM),
        ChatMessage::user(format!(
            "Suggest up to {} search queries a user typing \"{}\" is likely looking for. \
             Format: [\"query one\", \"query two\"]",
            limit, partial
        )),
    ]
}

/// Truncate on a character boundary, marking the cut with an ellipsis
fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ChatRole;
    use crate::models::Document;
    use std::collections::BTreeSet;

    fn result(id: &str, title: &str, translation: &str) -> SearchResult {
        SearchResult {
            document: Document::new(id, title, "Harian")
                .with_translation(translation)
                .with_tags(["pagi", "dzikir"]),
            score: 2.5,
            matched_fields: BTreeSet::new(),
            highlight_snippets: Vec::new(),
        }
    }

    #[test]
    fn test_rerank_prompt_enumerates_candidates() {
        let candidates = vec![result("1", "Doa Pagi", "O Allah"), result("2", "Doa Tidur", "In Your name")];
        let prompt = RerankPrompt {
            query: "morning",
            candidates: &candidates,
            context: &[],
            max_candidates: 20,
            preview_chars: 150,
        };

        let messages = prompt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);

        let user = &messages[1].content;
        assert!(user.contains("Query: \"morning\""));
        assert!(user.contains("[0] title: Doa Pagi"));
        assert!(user.contains("[1] title: Doa Tidur"));
        assert!(user.contains("tags: dzikir, pagi"));
        assert!(user.contains("score: 2.50"));
        assert!(user.contains("\"analyses\""));
        assert!(!user.contains("Recent searches"));
    }

    #[test]
    fn test_rerank_prompt_caps_candidates_and_includes_context() {
        let candidates: Vec<_> = (0..5)
            .map(|i| result(&i.to_string(), &format!("Doa {}", i), ""))
            .collect();
        let context = vec!["tidur".to_string(), "makan".to_string()];
        let prompt = RerankPrompt {
            query: "pagi",
            candidates: &candidates,
            context: &context,
            max_candidates: 3,
            preview_chars: 150,
        };

        let user = prompt.messages().remove(1).content;
        assert!(user.contains("[2] title"));
        assert!(!user.contains("[3] title"));
        assert!(user.contains("- tidur\n- makan"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("بِسْمِ", 2), "بِ...");
    }

    #[test]
    fn test_suggestion_messages() {
        let messages = suggestion_messages("doa pa", 4);
        assert!(messages[1].content.contains("up to 4"));
        assert!(messages[1].content.contains("\"doa pa\""));
    }
}
