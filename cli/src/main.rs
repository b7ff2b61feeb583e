//! pdfsift CLI - batch outline extraction and persona-driven ranking

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::{
    process_outline_batch, process_ranking_batch, BatchConfig, HashedEmbedder, LopdfDecoder,
    RankOptions, RelevanceRanker,
};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a title/heading outline JSON for every PDF in a directory
    Outline {
        /// Directory containing the input PDF files
        #[arg(long, value_name = "DIR", default_value = "input")]
        input_dir: PathBuf,

        /// Directory the outline JSON files are written to
        #[arg(long, value_name = "DIR", default_value = "output")]
        output_dir: PathBuf,
    },

    /// Rank sections across a collection for the persona in input.json
    Rank {
        /// Directory containing input.json and the listed PDF files
        #[arg(long, value_name = "DIR", default_value = "input")]
        input_dir: PathBuf,

        /// Directory result.json is written to
        #[arg(long, value_name = "DIR", default_value = "output")]
        output_dir: PathBuf,

        /// Seconds allowed for the embedding pass
        #[arg(long, value_name = "SECS", default_value = "120")]
        embed_timeout: u64,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input_dir,
            output_dir,
        } => cmd_outline(input_dir, output_dir),
        Commands::Rank {
            input_dir,
            output_dir,
            embed_timeout,
        } => cmd_rank(input_dir, output_dir, embed_timeout),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(input_dir: PathBuf, output_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = BatchConfig::new(input_dir, output_dir);

    let pb = spinner("Extracting outlines...");
    let summary = process_outline_batch(&LopdfDecoder::new(), &config)?;
    pb.finish_and_clear();

    if summary.written == 0 {
        println!("{}", "No PDF files found, nothing written".yellow());
        return Ok(());
    }

    println!(
        "{} {} outline(s) written to {}",
        "Done:".green().bold(),
        summary.written,
        config.output_dir.display()
    );
    if summary.degraded > 0 {
        println!(
            "{} {} document(s) could not be processed",
            "Warning:".yellow().bold(),
            summary.degraded
        );
    }

    Ok(())
}

fn cmd_rank(
    input_dir: PathBuf,
    output_dir: PathBuf,
    embed_timeout: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = BatchConfig::new(input_dir, output_dir);

    let options = RankOptions {
        embed_timeout: Some(Duration::from_secs(embed_timeout)),
        ..RankOptions::default()
    };
    let ranker = RelevanceRanker::with_options(Arc::new(HashedEmbedder::default()), options);

    let pb = spinner("Ranking sections...");
    let output = process_ranking_batch(&LopdfDecoder::new(), &ranker, &config)?;
    pb.finish_and_clear();

    println!(
        "{} {} of {} section(s) selected, {} subsection(s)",
        "Done:".green().bold(),
        output.metadata.sections_selected,
        output.metadata.total_sections_found,
        output.subsections.len()
    );
    println!(
        "Results written to {}",
        config.output_dir.join("result.json").display()
    );

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
