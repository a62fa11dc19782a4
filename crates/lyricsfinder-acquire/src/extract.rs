use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use std::ops::Deref;

/// Primary lyric container: any div whose class contains `Lyrics__Container`
/// (class names carry a generated suffix, e.g. `Lyrics__Container-sc-1ynbvzw-1`).
pub const PRIMARY_CONTAINER: &str = r#"div[class*="Lyrics__Container"]"#;

/// Fallback for page layouts that mark containers with a data attribute.
pub const FALLBACK_CONTAINER: &str = r#"[data-lyrics-container="true"]"#;

/// Container selection strategy: a primary selector, then a fallback.
#[derive(Debug, Clone)]
pub struct ContainerSelectors {
    primary: Selector,
    fallback: Selector,
}

impl ContainerSelectors {
    /// Selectors for genius.com song pages.
    pub fn genius() -> Self {
        Self {
            primary: Selector::parse(PRIMARY_CONTAINER).expect("valid selector"),
            fallback: Selector::parse(FALLBACK_CONTAINER).expect("valid selector"),
        }
    }

    /// Build a strategy from custom CSS selectors.
    pub fn new(primary: &str, fallback: &str) -> Result<Self, String> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| format!("invalid selector {s:?}: {e}"));
        Ok(Self {
            primary: parse(primary)?,
            fallback: parse(fallback)?,
        })
    }
}

impl Default for ContainerSelectors {
    fn default() -> Self {
        Self::genius()
    }
}

/// Extract raw lyric lines from a song page.
///
/// Every container matching the primary selector is read in document order,
/// with `<br>` turned into a newline. Containers are joined with a newline
/// and only the outer boundary is trimmed. If the primary selector matches
/// nothing the fallback is tried; `None` means no container was found.
pub fn extract_lyric_lines(html: &str, selectors: &ContainerSelectors) -> Option<Vec<String>> {
    let document = Html::parse_document(html);

    let mut texts = collect_containers(&document, &selectors.primary);
    if texts.is_empty() {
        tracing::debug!("No primary lyric container, trying fallback selector");
        texts = collect_containers(&document, &selectors.fallback);
    }
    if texts.is_empty() {
        tracing::debug!("No lyric container found");
        return None;
    }

    tracing::debug!(containers = texts.len(), "Extracted lyric containers");

    let joined = texts.join("\n");
    Some(joined.trim().lines().map(str::to_string).collect())
}

fn collect_containers(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|container| {
            let mut text = String::new();
            collect_all_text(*container, &mut text);
            text
        })
        .collect()
}

/// Collect all text under a node, turning `<br>` into `\n`.
///
/// Script/style subtrees and inline elements flagged with
/// `data-exclude-from-selection` (promo blocks) are skipped.
fn collect_all_text(node: NodeRef<'_, Node>, text: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t.deref()),
            Node::Element(elem) => match elem.name() {
                "br" => text.push('\n'),
                "script" | "style" => {}
                _ if elem.attr("data-exclude-from-selection") == Some("true") => {}
                _ => collect_all_text(child, text),
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_container_br() {
        let html = r#"<html><body>
            <div class="Lyrics__Container-sc-1ynbvzw-1 kUgSbL">A<br>B</div>
        </body></html>"#;

        let lines = extract_lyric_lines(html, &ContainerSelectors::genius()).unwrap();
        assert_eq!(lines, vec!["A", "B"]);
        assert_eq!(lines.join("\n"), "A\nB");
    }

    #[test]
    fn test_fallback_container_br() {
        let html = r#"<html><body>
            <div class="SongPage__Section" data-lyrics-container="true">A<br/>B</div>
        </body></html>"#;

        let lines = extract_lyric_lines(html, &ContainerSelectors::genius()).unwrap();
        assert_eq!(lines, vec!["A", "B"]);
    }

    #[test]
    fn test_multiple_containers_in_document_order() {
        let html = r#"<html><body>
            <div class="Lyrics__Container-sc-1">[Verse 1]<br>夢ならばどれほどよかったでしょう</div>
            <div class="RightSidebar">Ad</div>
            <div class="Lyrics__Container-sc-1"><a href="/x"><span>未だにあなたのことを夢にみる</span></a><br><br>[Chorus]</div>
        </body></html>"#;

        let lines = extract_lyric_lines(html, &ContainerSelectors::genius()).unwrap();
        assert_eq!(
            lines,
            vec![
                "[Verse 1]",
                "夢ならばどれほどよかったでしょう",
                "未だにあなたのことを夢にみる",
                "",
                "[Chorus]",
            ]
        );
    }

    #[test]
    fn test_skips_script_and_excluded() {
        let html = r#"<html><body>
            <div class="Lyrics__Container-sc-1">Line one<script>var x = 1;</script><br>
            <div data-exclude-from-selection="true">You might also like</div>Line two</div>
        </body></html>"#;

        let lines = extract_lyric_lines(html, &ContainerSelectors::genius()).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Line one");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2].trim(), "Line two");
        assert!(lines.iter().all(|l| !l.contains("var x")));
        assert!(lines.iter().all(|l| !l.contains("You might also like")));
    }

    #[test]
    fn test_no_container() {
        let html = r#"<html><body><div class="SongHeader">Nothing here</div></body></html>"#;
        assert!(extract_lyric_lines(html, &ContainerSelectors::genius()).is_none());
    }

    #[test]
    fn test_custom_selectors() {
        let selectors = ContainerSelectors::new("div.lyrics", "pre.lyrics").unwrap();
        let html = r#"<html><body><pre class="lyrics">X<br>Y</pre></body></html>"#;
        let lines = extract_lyric_lines(html, &selectors).unwrap();
        assert_eq!(lines, vec!["X", "Y"]);

        assert!(ContainerSelectors::new("div[", "p").is_err());
    }
}
