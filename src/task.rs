use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Normalized task description: the persona/job pair driving all scoring
/// for one run, plus the requested document filenames.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub persona: String,
    pub job: String,
    pub documents: Vec<String>,
}

pub const UNKNOWN_PERSONA: &str = "(unknown persona)";
pub const NO_TASK: &str = "(no task specified)";

#[derive(Debug, Deserialize)]
struct RawTask {
    #[serde(default)]
    persona: Option<RawPersona>,
    #[serde(default)]
    job_to_be_done: Option<RawJob>,
    #[serde(default)]
    documents: Vec<RawDocument>,
    // Opaque: logged for traceability, never emitted to output.
    #[serde(default)]
    challenge_info: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawPersona {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    #[serde(default)]
    task: Option<String>,
}

/// Document entries come either as bare filename strings or as objects
/// with a `filename` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Name(String),
    Object {
        #[serde(default)]
        filename: Option<String>,
    },
}

/// Load the task description and normalize missing persona/job fields to
/// placeholders; the run must still produce output.
pub fn load_task(path: &Path) -> Result<TaskSpec> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading task file {}", path.display()))?;
    let task: RawTask = serde_json::from_str(&raw)
        .with_context(|| format!("parsing task file {}", path.display()))?;

    if let Some(info) = &task.challenge_info {
        info!("challenge_info: {}", info);
    }

    let persona = task
        .persona
        .and_then(|p| p.role)
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_PERSONA.to_string());
    let job = task
        .job_to_be_done
        .and_then(|j| j.task)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| NO_TASK.to_string());

    let documents = task
        .documents
        .into_iter()
        .filter_map(|d| match d {
            RawDocument::Name(name) => Some(name),
            RawDocument::Object { filename } => filename,
        })
        .collect();

    Ok(TaskSpec {
        persona,
        job,
        documents,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("persona_ranker_task_{}", name));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn full_task_parses() {
        let path = write_temp(
            "full.json",
            r#"{
                "challenge_info": {"challenge_id": "round_1b_002"},
                "documents": [
                    {"filename": "a.outline.json", "title": "A"},
                    "b.outline.json"
                ],
                "persona": {"role": "Travel Planner"},
                "job_to_be_done": {"task": "Plan a 4-day trip"}
            }"#,
        );
        let task = load_task(&path).unwrap();
        assert_eq!(task.persona, "Travel Planner");
        assert_eq!(task.job, "Plan a 4-day trip");
        assert_eq!(task.documents, vec!["a.outline.json", "b.outline.json"]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_persona_and_job_get_placeholders() {
        let path = write_temp("bare.json", r#"{"documents": []}"#);
        let task = load_task(&path).unwrap();
        assert_eq!(task.persona, UNKNOWN_PERSONA);
        assert_eq!(task.job, NO_TASK);
        assert!(task.documents.is_empty());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_strings_get_placeholders() {
        let path = write_temp(
            "empty_fields.json",
            r#"{"persona": {"role": "  "}, "job_to_be_done": {"task": ""}}"#,
        );
        let task = load_task(&path).unwrap();
        assert_eq!(task.persona, UNKNOWN_PERSONA);
        assert_eq!(task.job, NO_TASK);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn document_object_without_filename_dropped() {
        let path = write_temp(
            "no_filename.json",
            r#"{"documents": [{"title": "only a title"}, "kept.outline.json"]}"#,
        );
        let task = load_task(&path).unwrap();
        assert_eq!(task.documents, vec!["kept.outline.json"]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_json_is_an_error() {
        let path = write_temp("broken.json", "{not json");
        assert!(load_task(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("persona_ranker_task_missing.json");
        assert!(load_task(&path).is_err());
    }
}
