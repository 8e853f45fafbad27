use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized post - the strict shape every later stage relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Route identifier (the document uid, or its id when it has none).
    pub id: String,
    /// Content service identifier, used to anchor adjacency queries.
    pub document_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub banner_url: String,
    pub first_published_at: Option<DateTime<Utc>>,
    pub last_published_at: Option<DateTime<Utc>>,
    /// Never empty for a normalized post.
    pub sections: Vec<Section>,
}

/// One heading plus its rich-text body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: RichText,
}

/// Opaque rich-text value, kept in the content service's block format.
///
/// Only the renderer looks inside it. Plain text is read per block for
/// word counting and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(Vec<Value>);

impl RichText {
    pub fn new(blocks: Vec<Value>) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> &[Value] {
        &self.0
    }

    /// Plain text of each block; `None` where a block carries no text.
    pub fn block_texts(&self) -> impl Iterator<Item = Option<&str>> {
        self.0
            .iter()
            .map(|block| block.get("text").and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_texts_reports_missing_text() {
        let body = RichText::new(vec![
            json!({ "type": "paragraph", "text": "hello world", "spans": [] }),
            json!({ "type": "image", "url": "https://img/1.png" }),
        ]);

        let texts: Vec<_> = body.block_texts().collect();
        assert_eq!(texts, vec![Some("hello world"), None]);
    }

    #[test]
    fn test_rich_text_serializes_as_block_array() {
        let body = RichText::new(vec![json!({ "type": "paragraph", "text": "x" })]);
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.is_array());
    }
}
