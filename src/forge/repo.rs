use anyhow::{Result, anyhow};
use std::str::FromStr;

/// Repository on the forge, written `owner/repo`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ForgeRepo {
    pub owner: String,
    pub repo: String,
}

impl ForgeRepo {
    /// Releases endpoint of this repository under a forge base URL.
    pub fn releases_url(&self, base_url: &str) -> String {
        format!(
            "{}/api/v1/repos/{}/{}/releases",
            base_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

impl std::fmt::Display for ForgeRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for ForgeRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!("Invalid repository format. Expected 'owner/repo'."))
        } else {
            Ok(ForgeRepo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forge_repo_valid() {
        let repo = ForgeRepo::from_str("PuqiAR/Fig-TreeWalker").unwrap();
        assert_eq!(repo.owner, "PuqiAR");
        assert_eq!(repo.repo, "Fig-TreeWalker");
        assert_eq!(repo.to_string(), "PuqiAR/Fig-TreeWalker");
    }

    #[test]
    fn test_parse_forge_repo_invalid() {
        for input in ["", "owner", "owner/", "/repo", "a/b/c"] {
            assert!(ForgeRepo::from_str(input).is_err(), "{} should fail", input);
        }
    }

    #[test]
    fn test_releases_url() {
        let repo = ForgeRepo::from_str("PuqiAR/Fig-TreeWalker").unwrap();
        assert_eq!(
            repo.releases_url("https://git.fig-lang.cn"),
            "https://git.fig-lang.cn/api/v1/repos/PuqiAR/Fig-TreeWalker/releases"
        );
        assert_eq!(
            repo.releases_url("http://127.0.0.1:3000/"),
            "http://127.0.0.1:3000/api/v1/repos/PuqiAR/Fig-TreeWalker/releases"
        );
    }
}
