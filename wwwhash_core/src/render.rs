//! Placeholder substitution in the entry-point template.

use crate::manifest::AssetMap;

/// Entry-point text with its placeholders resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: String,
    pub replacements: usize,
}

/// Placeholder token for a template file: `{{<name>}}`.
pub fn asset_token(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// Replace every occurrence of `token` and count them.
fn replace_counted(content: &str, token: &str, value: &str) -> (String, usize) {
    let count = content.matches(token).count();
    if count == 0 {
        return (content.to_string(), 0);
    }
    (content.replace(token, value), count)
}

/// Resolve the bundle token, then each asset token when `assets` is given.
///
/// The bundle token is resolved first, so a template file whose own token
/// collides with it never gets substituted.
pub fn render_entry_point(
    template: &str,
    bundle_token: &str,
    bundle_published: &str,
    assets: Option<&AssetMap>,
) -> Rendered {
    let (mut content, mut replacements) =
        replace_counted(template, bundle_token, bundle_published);

    for (original, published) in assets.into_iter().flat_map(|map| map.iter()) {
        let (next, count) = replace_counted(&content, &asset_token(original), published);
        content = next;
        replacements += count;
    }

    Rendered {
        content,
        replacements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_token() {
        assert_eq!(asset_token("logo.png"), "{{logo.png}}");
    }

    #[test]
    fn test_single_placeholder() {
        let rendered = render_entry_point(
            r#"<script src="{{main.js}}"></script>"#,
            "{{main.js}}",
            "abc123.js",
            None,
        );
        assert_eq!(rendered.content, r#"<script src="abc123.js"></script>"#);
        assert_eq!(rendered.replacements, 1);
    }

    #[test]
    fn test_multiple_placeholders_replaced_identically() {
        let rendered = render_entry_point(
            "<link rel=preload href={{main.js}}><script src={{main.js}}></script>",
            "{{main.js}}",
            "abc123.js",
            None,
        );
        assert_eq!(
            rendered.content,
            "<link rel=preload href=abc123.js><script src=abc123.js></script>"
        );
        assert_eq!(rendered.replacements, 2);
        assert!(!rendered.content.contains("{{main.js}}"));
    }

    #[test]
    fn test_no_placeholder_leaves_content() {
        let rendered = render_entry_point("<p>static</p>", "{{main.js}}", "x.js", None);
        assert_eq!(rendered.content, "<p>static</p>");
        assert_eq!(rendered.replacements, 0);
    }

    #[test]
    fn test_asset_placeholders() {
        let mut assets = AssetMap::new();
        assets.add("logo.png", "beef.png");
        assets.add("style.css", "f00d.css");

        let rendered = render_entry_point(
            "<link href={{style.css}}><img src={{logo.png}}><script src={{main.js}}>",
            "{{main.js}}",
            "abc.js",
            Some(&assets),
        );
        assert_eq!(
            rendered.content,
            "<link href=f00d.css><img src=beef.png><script src=abc.js>"
        );
        assert_eq!(rendered.replacements, 3);
    }

    #[test]
    fn test_bundle_token_wins_over_colliding_asset() {
        let mut assets = AssetMap::new();
        assets.add("main.js", "other.js");

        let rendered =
            render_entry_point("{{main.js}}", "{{main.js}}", "bundle.js", Some(&assets));
        assert_eq!(rendered.content, "bundle.js");
        assert_eq!(rendered.replacements, 1);
    }
}
