use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fallback name shown in the chat header when no display name is stored.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    HighConfidence,
    MediumConfidence,
    LowConfidence,
}

impl Confidence {
    /// Accepts the tiered wire values as well as the bare `low`/`medium`/`high`
    /// the backend uses on its early-exit paths. Anything else is unknown.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high_confidence" | "high" => Some(Self::HighConfidence),
            "medium_confidence" | "medium" => Some(Self::MediumConfidence),
            "low_confidence" | "low" => Some(Self::LowConfidence),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighConfidence => "high_confidence",
            Self::MediumConfidence => "medium_confidence",
            Self::LowConfidence => "low_confidence",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HighConfidence => "high confidence",
            Self::MediumConfidence => "medium confidence",
            Self::LowConfidence => "low confidence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub chunk_text: String,
    pub score: f64,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub doc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<i64>,
}

/// Document ids come from ingested JSON and may be numbers or strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

impl SourceRef {
    /// Relevance as a whole percentage, the way the sources panel shows it.
    pub fn score_percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tiered_and_bare_confidence_values() {
        assert_eq!(
            Confidence::parse("high_confidence"),
            Some(Confidence::HighConfidence)
        );
        assert_eq!(
            Confidence::parse("medium_confidence"),
            Some(Confidence::MediumConfidence)
        );
        assert_eq!(Confidence::parse("low"), Some(Confidence::LowConfidence));
        assert_eq!(Confidence::parse("certain"), None);
    }

    #[test]
    fn confidence_label_replaces_first_underscore() {
        assert_eq!(Confidence::HighConfidence.label(), "high confidence");
        assert_eq!(Confidence::LowConfidence.as_str(), "low_confidence");
    }

    #[test]
    fn doc_id_accepts_numbers_and_strings() {
        let numeric: SourceRef = serde_json::from_str(
            r#"{"title":"FAQ","chunk_text":"...","score":0.5,"doc_id":12,"chunk_id":3}"#,
        )
        .expect("numeric doc id");
        assert_eq!(numeric.doc_id.as_deref(), Some("12"));
        assert_eq!(numeric.chunk_id, Some(3));

        let textual: SourceRef =
            serde_json::from_str(r#"{"title":"FAQ","chunk_text":"...","score":0.5,"doc_id":"faq"}"#)
                .expect("string doc id");
        assert_eq!(textual.doc_id.as_deref(), Some("faq"));
    }

    #[test]
    fn source_score_rounds_to_percent() {
        let source = SourceRef {
            title: "FAQ".into(),
            chunk_text: "...".into(),
            score: 0.876,
            doc_id: None,
            chunk_id: None,
        };
        assert_eq!(source.score_percent(), 88);
    }
}
