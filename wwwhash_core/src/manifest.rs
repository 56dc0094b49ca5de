//! Published-name bookkeeping for a single run.

use crate::config::TemplatePolicy;
use crate::hash::Fingerprint;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Mapping from original template file name to its published name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssetMap {
    assets: BTreeMap<String, String>,
}

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a published file.
    pub fn add(&mut self, original: impl Into<String>, published: impl Into<String>) {
        self.assets.insert(original.into(), published.into());
    }

    /// Published name for an original file name.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.assets.get(original).map(String::as_str)
    }

    /// Entries ordered by original name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assets
            .iter()
            .map(|(orig, published)| (orig.as_str(), published.as_str()))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// A single file copied into the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedFile {
    pub original: String,
    pub published: String,
    pub fingerprint: Fingerprint,
}

/// Summary of a successful publish run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub output_dir: PathBuf,
    pub bundle: PublishedFile,
    pub template_policy: TemplatePolicy,
    pub assets: AssetMap,
    pub entry_point: String,
    /// Placeholder occurrences resolved in the entry point.
    pub replacements: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_map_ordering_and_lookup() {
        let mut map = AssetMap::new();
        assert!(map.is_empty());

        map.add("style.css", "bbbb.css");
        map.add("logo.png", "aaaa.png");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("logo.png"), Some("aaaa.png"));
        assert_eq!(map.get("missing"), None);

        let names: Vec<_> = map.iter().map(|(orig, _)| orig).collect();
        assert_eq!(names, vec!["logo.png", "style.css"]);
    }

    #[test]
    fn test_asset_map_serializes_as_object() {
        let mut map = AssetMap::new();
        map.add("favicon", "cafe");
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({ "favicon": "cafe" }));
    }
}
