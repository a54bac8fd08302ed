use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// A classified unit of document text produced by the upstream layout
/// analyzer. Pages are 1-based.
#[derive(Debug, Clone, Deserialize)]
pub struct LineBlock {
    pub text: String,
    pub page: u32,
    pub tag: Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    Title,
    Heading,
    Body,
}

#[derive(Debug, Deserialize)]
struct OutlineFile {
    #[serde(default)]
    title: Option<LineBlock>,
    blocks: Vec<LineBlock>,
}

/// File extension for pre-classified outline documents.
pub const OUTLINE_EXT: &str = ".outline.json";

/// Read a classified outline document: an optional title block plus the
/// block stream in reading order. Any I/O or schema failure is a parse
/// error for this one document; the caller decides whether to skip it.
pub fn parse_outline(path: &Path) -> Result<(Option<LineBlock>, Vec<LineBlock>)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let outline: OutlineFile = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;

    for block in outline.blocks.iter().chain(outline.title.iter()) {
        ensure!(block.page >= 1, "{}: page numbers are 1-based", path.display());
    }

    Ok((outline.title, outline.blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("persona_ranker_outline_{}", name));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_blocks_in_order() {
        let path = write_temp(
            "ok.outline.json",
            r#"{
                "title": {"text": "Guide", "page": 1, "tag": "TITLE"},
                "blocks": [
                    {"text": "Intro", "page": 1, "tag": "HEADING"},
                    {"text": "Welcome text.", "page": 1, "tag": "BODY"}
                ]
            }"#,
        );
        let (title, blocks) = parse_outline(&path).unwrap();
        assert_eq!(title.unwrap().text, "Guide");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].tag, Tag::Heading);
        assert_eq!(blocks[1].tag, Tag::Body);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn title_is_optional() {
        let path = write_temp(
            "no_title.outline.json",
            r#"{"blocks": [{"text": "A.", "page": 1, "tag": "BODY"}]}"#,
        );
        let (title, blocks) = parse_outline(&path).unwrap();
        assert!(title.is_none());
        assert_eq!(blocks.len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn zero_page_is_a_parse_error() {
        let path = write_temp(
            "zero_page.outline.json",
            r#"{"blocks": [{"text": "A.", "page": 0, "tag": "BODY"}]}"#,
        );
        assert!(parse_outline(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_tag_is_a_parse_error() {
        let path = write_temp(
            "bad_tag.outline.json",
            r#"{"blocks": [{"text": "A.", "page": 1, "tag": "FOOTER"}]}"#,
        );
        assert!(parse_outline(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let path = std::env::temp_dir().join("persona_ranker_outline_missing.outline.json");
        assert!(parse_outline(&path).is_err());
    }
}
