//! Follow-up question suggestions.
//!
//! The model is asked for a JSON array of short questions, but replies vary:
//! bare arrays, arrays wrapped in prose, or plain lists. Extraction tries an
//! ordered list of strategies and falls back to fixed questions, so callers
//! always get something to show.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::client::CompletionClient;
use crate::models::ChatMessage;
use crate::traits::HttpClient;

/// Longest suggestion kept, in characters.
pub const MAX_SUGGESTION_CHARS: usize = 256;

/// Number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 3;

/// Returned when nothing usable could be extracted.
pub const FALLBACK_SUGGESTIONS: [&str; 3] = [
    "Can you explain that in more detail?",
    "Do you have a related example?",
    "Any other suggestions?",
];

const SUGGESTION_PROMPT: &str = "You are a chat assistant. Based on the previous reply, \
write 3 follow-up questions the user is likely to ask. Keep each question short \
(at most 15 words) and direct, without numbering or quotes. Answer with a JSON array only, \
for example: [\"Question 1\", \"Question 2\", \"Question 3\"]";

type Strategy = fn(&str) -> Vec<String>;

/// Extraction strategies in the order they are tried.
pub const SUGGESTION_STRATEGIES: &[(&str, Strategy)] = &[
    ("json_array", whole_json_array),
    ("embedded_json_array", embedded_json_array),
    ("line_list", line_list),
];

static BULLET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s*").expect("Invalid bullet regex pattern"));
static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("Invalid number regex pattern"));
static QUOTE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^["']|["']$"#).expect("Invalid quote regex pattern"));

/// Extract up to [`MAX_SUGGESTIONS`] questions from a model reply.
///
/// The first strategy yielding anything wins; the fallback questions are
/// returned when all of them come up empty.
pub fn extract_suggestions(reply: &str) -> Vec<String> {
    for (name, strategy) in SUGGESTION_STRATEGIES {
        let found = strategy(reply);
        if !found.is_empty() {
            tracing::debug!("Suggestions extracted with strategy {}", name);
            return found
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .map(|s| clip(&s))
                .collect();
        }
    }
    fallback()
}

/// The fixed fallback questions.
pub fn fallback() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Ask the model for follow-up questions to `last_reply`.
///
/// Never fails: any error is logged and answered with the fallback.
pub async fn generate_suggestions<H: HttpClient>(
    client: &CompletionClient<H>,
    last_reply: &str,
) -> Vec<String> {
    if last_reply.trim().is_empty() {
        return fallback();
    }

    let messages = vec![
        ChatMessage::system(SUGGESTION_PROMPT),
        ChatMessage::user(format!("Previous reply: {}", last_reply)),
    ];
    let max_tokens = client.endpoint().settings.suggestion_max_tokens;

    match client.complete(messages, max_tokens).await {
        Ok(reply) => extract_suggestions(&reply),
        Err(err) => {
            tracing::warn!("Suggestion request failed, using fallback: {}", err);
            fallback()
        }
    }
}

fn clip(text: &str) -> String {
    text.chars().take(MAX_SUGGESTION_CHARS).collect()
}

fn strings_of(items: Vec<serde_json::Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect()
}

fn whole_json_array(reply: &str) -> Vec<String> {
    serde_json::from_str::<Vec<serde_json::Value>>(reply.trim())
        .map(strings_of)
        .unwrap_or_default()
}

fn embedded_json_array(reply: &str) -> Vec<String> {
    let (Some(start), Some(end)) = (reply.find('['), reply.rfind(']')) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }
    whole_json_array(&reply[start..=end])
}

fn line_list(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(|line| {
            let line = BULLET_REGEX.replace(line, "");
            let line = NUMBER_REGEX.replace(&line, "");
            let line = QUOTE_REGEX.replace_all(&line, "");
            line.trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}
