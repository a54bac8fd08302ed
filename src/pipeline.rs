use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::outline::{self, OUTLINE_EXT};
use crate::rank::rank_sections;
use crate::report;
use crate::scoring::{build_keywords, build_query, LexicalScorer};
use crate::sections::{build_sections, Section};
use crate::snippets::{extract_snippets, Snippet};
use crate::task;

pub const DEFAULT_TOPK: usize = 20;
pub const DEFAULT_SNIPS: usize = 3;
pub const DEFAULT_TASK_FILE: &str = "input.json";

pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub task_file: String,
    pub topk_sections: usize,
    pub max_snips: usize,
}

/// Counts returned to the CLI after a completed run.
pub struct RunSummary {
    pub documents: usize,
    pub sections: usize,
    pub selected: usize,
    pub snippets: usize,
    pub out_path: PathBuf,
}

/// One full batch run: task → documents → sections → ranking → snippets
/// → report. Per-document parse failures are skipped with a warning;
/// everything listed in the fatal taxonomy bails before any output is
/// written.
pub fn run(cfg: &RunConfig) -> Result<RunSummary> {
    let task_path = cfg.input_dir.join(&cfg.task_file);
    if !task_path.is_file() {
        bail!(
            "task file '{}' not found in {}",
            cfg.task_file,
            cfg.input_dir.display()
        );
    }
    let task = task::load_task(&task_path)?;
    info!("persona: {} | job: {}", task.persona, task.job);

    let docs = if task.documents.is_empty() {
        discover_outlines(&cfg.input_dir)?
    } else {
        resolve_outlines(&cfg.input_dir, &task.documents)
    };
    if docs.is_empty() {
        bail!("no outline documents to process in {}", cfg.input_dir.display());
    }

    let all_sections = collect_sections(&docs)?;
    if all_sections.is_empty() {
        bail!("no sections extracted from any document");
    }

    // Query and keywords are derived once and reused for the whole batch;
    // recomputing mid-run would make ranks incomparable.
    let query = build_query(&task.persona, &task.job);
    let keywords = build_keywords(&task.persona, &task.job);
    let scorer = LexicalScorer;

    let ranked = rank_sections(&scorer, &query, &keywords, all_sections);
    let total = ranked.len();
    let top: Vec<Section> = ranked
        .into_iter()
        .take(cfg.topk_sections)
        .collect();

    let mut snippets: Vec<Snippet> = Vec::new();
    for section in &top {
        snippets.extend(extract_snippets(section, &query, &scorer, cfg.max_snips));
    }

    let input_documents: Vec<String> = docs.iter().map(|p| basename(p)).collect();
    let report = report::assemble(input_documents, &task.persona, &task.job, &top, &snippets);
    let out_path = report::write(&report, &cfg.output_dir)?;
    info!(
        "ranked {} sections across {} documents, selected {}",
        total,
        docs.len(),
        top.len()
    );

    Ok(RunSummary {
        documents: docs.len(),
        sections: total,
        selected: top.len(),
        snippets: snippets.len(),
        out_path,
    })
}

/// Convert requested filenames into paths under `input_dir` (absolute
/// paths pass through). Missing or wrong-type files are skipped with a
/// warning, preserving request order for the rest.
fn resolve_outlines(input_dir: &Path, names: &[String]) -> Vec<PathBuf> {
    let mut docs = Vec::new();
    for name in names {
        let path = if Path::new(name).is_absolute() {
            PathBuf::from(name)
        } else {
            input_dir.join(name)
        };
        if path.is_file() && name.ends_with(OUTLINE_EXT) {
            docs.push(path);
        } else {
            warn!(
                "document '{}' not found in {} (or not *{}); skipped",
                name,
                input_dir.display(),
                OUTLINE_EXT
            );
        }
    }
    docs
}

/// Fallback when the task requests no documents: every outline file in
/// the input directory, sorted by name so discovery order is stable.
fn discover_outlines(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut docs: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("listing {}", input_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(OUTLINE_EXT))
        })
        .collect();
    docs.sort();
    Ok(docs)
}

/// Parse and section every document in parallel, order-preserving, then
/// pool the results. A failed parse drops that one document only.
fn collect_sections(docs: &[PathBuf]) -> Result<Vec<Section>> {
    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
            .progress_chars("=> "),
    );

    let results: Vec<(String, Result<Vec<Section>>)> = docs
        .par_iter()
        .map(|path| {
            let doc = basename(path);
            let sections = outline::parse_outline(path)
                .map(|(_title, blocks)| build_sections(&doc, &blocks));
            pb.inc(1);
            (doc, sections)
        })
        .collect();
    pb.finish_and_clear();

    let mut all_sections = Vec::new();
    for (doc, result) in results {
        match result {
            Ok(sections) => all_sections.extend(sections),
            Err(e) => warn!("failed to parse '{}': {:#}; skipped", doc, e),
        }
    }
    Ok(all_sections)
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ── Tests ──
