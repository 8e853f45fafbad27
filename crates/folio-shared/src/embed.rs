//! Third-party script embeds the client injects after mounting a page.

use serde::{Deserialize, Serialize};

/// A one-time script injection: the client appends a `<script>` with these
/// attributes to the element matching `target` once the markup is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedDirective {
    pub target: String,
    pub src: String,
    pub attributes: Vec<(String, String)>,
}

impl EmbedDirective {
    /// Utterances comment thread backed by the issues of `repo`.
    pub fn utterances(repo: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            target: "#comments".to_string(),
            src: "https://utteranc.es/client.js".to_string(),
            attributes: vec![
                ("crossorigin".to_string(), "anonymous".to_string()),
                ("async".to_string(), "true".to_string()),
                ("repo".to_string(), repo.into()),
                ("issue-term".to_string(), "pathname".to_string()),
                ("theme".to_string(), theme.into()),
            ],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utterances_directive() {
        let embed = EmbedDirective::utterances("owner/blog-comments", "dark-blue");

        assert_eq!(embed.src, "https://utteranc.es/client.js");
        assert_eq!(embed.attribute("repo"), Some("owner/blog-comments"));
        assert_eq!(embed.attribute("issue-term"), Some("pathname"));
        assert_eq!(embed.attribute("theme"), Some("dark-blue"));
        assert_eq!(embed.attribute("missing"), None);
    }
}
