use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::sections::Section;
use crate::snippets::Snippet;

#[derive(Debug, Serialize)]
pub struct Report {
    pub metadata: Metadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: u32,
    pub page_number: u32,
}

#[derive(Debug, Serialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// Assemble the final report. Sections arrive in rank order and snippets
/// in section order, so the output ordering falls out of the input.
pub fn assemble(
    input_documents: Vec<String>,
    persona: &str,
    job: &str,
    top_sections: &[Section],
    snippets: &[Snippet],
) -> Report {
    Report {
        metadata: Metadata {
            input_documents,
            persona: persona.to_string(),
            job_to_be_done: job.to_string(),
            processing_timestamp: Utc::now().to_rfc3339(),
        },
        extracted_sections: top_sections
            .iter()
            .map(|s| ExtractedSection {
                document: s.doc.clone(),
                section_title: s.heading.clone(),
                importance_rank: s.importance_rank,
                page_number: s.page,
            })
            .collect(),
        subsection_analysis: snippets
            .iter()
            .map(|s| SubsectionAnalysis {
                document: s.doc.clone(),
                refined_text: s.text.clone(),
                page_number: s.page,
            })
            .collect(),
    }
}

/// Write `output.json` under `output_dir`, creating the directory first.
pub fn write(report: &Report, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let out_path = output_dir.join("output.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&out_path, json)
        .with_context(|| format!("writing {}", out_path.display()))?;
    Ok(out_path)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let sections = vec![Section {
            doc: "a.outline.json".to_string(),
            heading: "Details".to_string(),
            page: 2,
            text: "More info here.".to_string(),
            score: 1.5,
            importance_rank: 1,
        }];
        let snippets = vec![Snippet {
            doc: "a.outline.json".to_string(),
            text: "More info here.".to_string(),
            page: 2,
        }];
        assemble(
            vec!["a.outline.json".to_string()],
            "Travel Planner",
            "Plan a trip",
            &sections,
            &snippets,
        )
    }

    #[test]
    fn report_has_expected_shape() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["metadata"]["persona"], "Travel Planner");
        assert_eq!(json["metadata"]["job_to_be_done"], "Plan a trip");
        assert_eq!(json["metadata"]["input_documents"][0], "a.outline.json");
        assert!(json["metadata"]["processing_timestamp"].is_string());
        assert_eq!(json["extracted_sections"][0]["section_title"], "Details");
        assert_eq!(json["extracted_sections"][0]["importance_rank"], 1);
        assert_eq!(json["extracted_sections"][0]["page_number"], 2);
        assert_eq!(json["subsection_analysis"][0]["refined_text"], "More info here.");
    }

    #[test]
    fn score_never_leaks_into_output() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert!(json["extracted_sections"][0].get("score").is_none());
    }

    #[test]
    fn write_creates_output_dir() {
        let dir = std::env::temp_dir().join("persona_ranker_report_out");
        std::fs::remove_dir_all(&dir).ok();
        let path = write(&sample_report(), &dir).unwrap();
        assert!(path.ends_with("output.json"));
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("extracted_sections"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
