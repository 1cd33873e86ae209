use serde::Deserialize;

/// A downloadable file attached to a release
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// A published release as returned by the forge releases API
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Release {
    /// Version tag (e.g., "1.2.0")
    pub tag_name: String,
    /// Release title
    #[serde(default)]
    pub name: String,
    /// Free-text release notes
    #[serde(default)]
    pub body: String,
    /// Publication date (ISO 8601)
    #[serde(default)]
    pub published_at: String,
    pub assets: Vec<Asset>,
}
