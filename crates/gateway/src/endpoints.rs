//! Fixed webhook endpoint table.

/// Webhook base used when no override is configured.
pub const DEFAULT_WEBHOOK_BASE: &str = "https://n8n.sharedvisionai.org/webhook";

/// Full URL of every backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoints {
    pub dashboard: String,
    pub archive: String,
    pub analyze: String,
    pub tag: String,
    pub train: String,
    pub subjects: String,
}

impl WebhookEndpoints {
    /// Derive all endpoints from a base URL such as
    /// `https://host/webhook`. A trailing slash is ignored.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim().trim_end_matches('/');
        let at = |path: &str| format!("{base}/{path}");
        Self {
            dashboard: at("dashboard"),
            archive: at("archive"),
            analyze: at("analyze"),
            tag: at("tag-video"),
            train: at("train-subject"),
            subjects: at("subjects"),
        }
    }
}

impl Default for WebhookEndpoints {
    fn default() -> Self {
        Self::from_base(DEFAULT_WEBHOOK_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production_webhooks() {
        let endpoints = WebhookEndpoints::default();
        assert_eq!(
            endpoints.dashboard,
            "https://n8n.sharedvisionai.org/webhook/dashboard"
        );
        assert_eq!(endpoints.tag, "https://n8n.sharedvisionai.org/webhook/tag-video");
        assert_eq!(
            endpoints.train,
            "https://n8n.sharedvisionai.org/webhook/train-subject"
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let endpoints = WebhookEndpoints::from_base("http://127.0.0.1:5678/webhook/");
        assert_eq!(endpoints.subjects, "http://127.0.0.1:5678/webhook/subjects");
        assert_eq!(endpoints.analyze, "http://127.0.0.1:5678/webhook/analyze");
    }
}
