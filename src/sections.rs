use std::collections::BTreeSet;

use crate::outline::{LineBlock, Tag};

/// A heading plus the body text accumulated until the next heading.
/// `score` and `importance_rank` are zero until the ranking pass
/// annotates them.
#[derive(Debug, Clone)]
pub struct Section {
    pub doc: String,
    pub heading: String,
    pub page: u32,
    pub text: String,
    pub score: f64,
    pub importance_rank: u32,
}

/// Flush-on-next-heading accumulator. Feed blocks in reading order via
/// `push`, then `finish` to flush the open section and apply the
/// whole-document fallback when no headings were seen.
pub struct SectionBuilder {
    doc: String,
    sections: Vec<Section>,
    open: Option<OpenSection>,
    // Every non-TITLE block's text, for the no-heading fallback.
    fallback_parts: Vec<String>,
}

struct OpenSection {
    heading: String,
    heading_page: u32,
    parts: Vec<String>,
    pages: BTreeSet<u32>,
}

impl SectionBuilder {
    pub fn new(doc: &str) -> Self {
        SectionBuilder {
            doc: doc.to_string(),
            sections: Vec::new(),
            open: None,
            fallback_parts: Vec::new(),
        }
    }

    pub fn push(&mut self, block: &LineBlock) {
        match block.tag {
            Tag::Title => {}
            Tag::Heading => {
                self.flush();
                self.fallback_parts.push(block.text.clone());
                let mut pages = BTreeSet::new();
                pages.insert(block.page);
                self.open = Some(OpenSection {
                    heading: block.text.clone(),
                    heading_page: block.page,
                    parts: Vec::new(),
                    pages,
                });
            }
            Tag::Body => {
                self.fallback_parts.push(block.text.clone());
                // Body before the first heading is dropped.
                if let Some(open) = self.open.as_mut() {
                    open.parts.push(block.text.clone());
                    open.pages.insert(block.page);
                }
            }
        }
    }

    pub fn finish(mut self) -> Vec<Section> {
        self.flush();
        if self.sections.is_empty() {
            // No headings anywhere: the whole document becomes one section.
            self.sections.push(Section {
                doc: self.doc.clone(),
                heading: self.doc.clone(),
                page: 1,
                text: self.fallback_parts.join(" ").trim().to_string(),
                score: 0.0,
                importance_rank: 0,
            });
        }
        self.sections
    }

    fn flush(&mut self) {
        if let Some(open) = self.open.take() {
            self.sections.push(Section {
                doc: self.doc.clone(),
                heading: open.heading,
                page: open.pages.first().copied().unwrap_or(open.heading_page),
                text: open.parts.join(" ").trim().to_string(),
                score: 0.0,
                importance_rank: 0,
            });
        }
    }
}

/// One section per heading; exactly one synthetic section when a document
/// has no headings at all.
pub fn build_sections(doc: &str, blocks: &[LineBlock]) -> Vec<Section> {
    let mut builder = SectionBuilder::new(doc);
    for block in blocks {
        builder.push(block);
    }
    builder.finish()
}

// ── Tests ──
