mod outline;
mod pipeline;
mod rank;
mod report;
mod scoring;
mod sections;
mod snippets;
mod task;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "persona_ranker", about = "Persona-driven section ranking over classified documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank sections across all documents and write output.json
    Run {
        /// Input directory (default: env INPUT_DIR or ./input)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory (default: env OUTPUT_DIR or ./output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Task JSON filename in the input directory
        #[arg(short, long, default_value = pipeline::DEFAULT_TASK_FILE)]
        task: String,
        /// Max sections to return
        #[arg(long, default_value_t = pipeline::DEFAULT_TOPK)]
        topk: usize,
        /// Max snippets per section
        #[arg(long, default_value_t = pipeline::DEFAULT_SNIPS)]
        snips: usize,
    },
    /// Build and print the sections of a single outline document
    Sections {
        /// Path to a *.outline.json file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { input, output, task, topk, snips } => {
            let input_dir = input
                .or_else(|| std::env::var("INPUT_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("input"));
            let output_dir = output
                .or_else(|| std::env::var("OUTPUT_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("output"));
            if !input_dir.is_dir() {
                anyhow::bail!("input directory '{}' not found", input_dir.display());
            }

            let cfg = pipeline::RunConfig {
                input_dir,
                output_dir,
                task_file: task,
                topk_sections: topk,
                max_snips: snips,
            };
            let summary = pipeline::run(&cfg)?;
            println!(
                "Ranked {} sections from {} documents, selected {} ({} snippets) -> {}",
                summary.sections,
                summary.documents,
                summary.selected,
                summary.snippets,
                summary.out_path.display()
            );
            Ok(())
        }
        Commands::Sections { file } => {
            let doc = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (title, blocks) = outline::parse_outline(&file)?;
            if let Some(title) = title {
                println!("Title: {}", title.text);
            }
            let sections = sections::build_sections(&doc, &blocks);

            println!("{:>3} | {:>4} | {:<32} | {}", "#", "Page", "Heading", "Text");
            println!("{}", "-".repeat(100));
            for (i, s) in sections.iter().enumerate() {
                println!(
                    "{:>3} | {:>4} | {:<32} | {}",
                    i + 1,
                    s.page,
                    truncate(&s.heading, 32),
                    truncate(&s.text, 48)
                );
            }
            println!("\n{} sections", sections.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
