use serde::{Deserialize, Serialize};

use super::{Navigation, Post};

/// Everything the rendering host needs to render one post page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePayload {
    pub post: Post,
    pub reading_time_minutes: u32,
    pub is_edited: bool,
    pub edited_label: Option<String>,
    pub published_label: Option<String>,
    pub navigation: Navigation,
    pub preview_mode: bool,
}

/// How the host treats ids that were not built ahead of time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Unknown ids are a plain 404.
    None,
    /// Resolve on demand and hold the response until the page is ready.
    #[default]
    Blocking,
    /// Resolve on demand while the client shows a placeholder.
    Deferred,
}

impl FallbackPolicy {
    /// Whether ids outside the built catalog are resolved on demand.
    pub fn resolves_unknown(self) -> bool {
        !matches!(self, FallbackPolicy::None)
    }
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "false" => Ok(FallbackPolicy::None),
            "blocking" => Ok(FallbackPolicy::Blocking),
            "deferred" | "true" => Ok(FallbackPolicy::Deferred),
            other => Err(format!("unknown fallback policy: {other}")),
        }
    }
}

/// Ids to build eagerly plus the policy for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCatalog {
    pub ids: Vec<String>,
    pub fallback: FallbackPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_policy_parsing() {
        assert_eq!("blocking".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Blocking));
        assert_eq!("Deferred".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Deferred));
        assert_eq!("true".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Deferred));
        assert_eq!("none".parse::<FallbackPolicy>(), Ok(FallbackPolicy::None));
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
    }

    #[test]
    fn test_only_none_rejects_unknown_ids() {
        assert!(!FallbackPolicy::None.resolves_unknown());
        assert!(FallbackPolicy::Blocking.resolves_unknown());
        assert!(FallbackPolicy::Deferred.resolves_unknown());
    }
}
