use super::ReleaseCatalog;
use crate::error::InstallError;
use crate::forge::Release;

/// Number of releases listed before the version prompt. Index selection is
/// limited to the same range.
pub const MAX_LISTED: usize = 3;

/// How the operator's answer to the version prompt is interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Empty answer: install the latest release
    Latest,
    /// Answer containing a `.`: match against tag names
    Version(String),
    /// A whole number: 1-based position in the listing (range not checked yet)
    Index(usize),
    /// Neither a version nor a number
    Invalid(String),
}

impl Selection {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            Selection::Latest
        } else if input.contains('.') {
            Selection::Version(input.to_string())
        } else {
            match input.parse::<usize>() {
                Ok(index) => Selection::Index(index),
                Err(_) => Selection::Invalid(input.to_string()),
            }
        }
    }
}

/// Resolve the operator's answer to exactly one release.
///
/// A version substring scans the whole catalog and the last matching tag
/// wins. An index is only valid within the listed releases
/// (`1..=min(3, len)`), however long the catalog is.
#[tracing::instrument(skip(catalog))]
pub fn select_release<'a>(
    catalog: &'a ReleaseCatalog,
    input: &str,
) -> Result<&'a Release, InstallError> {
    let releases = catalog.releases();
    if releases.is_empty() {
        return Err(InstallError::invalid_selection(
            input,
            "no releases to choose from",
        ));
    }

    match Selection::parse(input) {
        Selection::Latest => Ok(&releases[0]),
        Selection::Version(query) => releases
            .iter()
            .filter(|r| r.tag_name.contains(&query))
            .last()
            .ok_or_else(|| {
                InstallError::invalid_selection(&query, "no release tag contains this version")
            }),
        Selection::Index(index) => {
            let limit = releases.len().min(MAX_LISTED);
            if index < 1 || index > limit {
                return Err(InstallError::invalid_selection(
                    &index.to_string(),
                    format!("index must be between 1 and {}", limit),
                ));
            }
            Ok(&releases[index - 1])
        }
        Selection::Invalid(raw) => Err(InstallError::invalid_selection(
            &raw,
            "not a version or an index",
        )),
    }
}
