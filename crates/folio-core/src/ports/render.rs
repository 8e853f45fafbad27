use crate::domain::RichText;

/// Pure rich-text to markup conversion.
pub trait RichTextRenderer: Send + Sync {
    fn render(&self, body: &RichText) -> String;
}
