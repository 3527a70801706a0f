pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const BASE_URL_ENV_VAR: &str = "VIRALCLIP_API_URL";

const ANALYZE_PATH: &str = "/upload/analyze";
const HEALTH_PATH: &str = "/upload/health";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the base URL: explicit value, then environment, then default
    pub fn resolve(explicit: Option<String>) -> Self {
        Self::resolve_from(explicit, std::env::var(BASE_URL_ENV_VAR).ok())
    }

    /// Blank values count as unset at every level
    fn resolve_from(explicit: Option<String>, from_env: Option<String>) -> Self {
        let is_set = |url: &String| !url.trim().is_empty();
        let base_url = explicit
            .filter(is_set)
            .or_else(|| from_env.filter(is_set))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
