//! Show command - Display a saved transcript
//!
//! Usage:
//! ```bash
//! dialectic show debate.json
//! dialectic show debate.json --raw
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use std::path::PathBuf;

use dialectic_debate::{AgentTag, Criterion, DebateOrchestrator, DebateRecord, Verdict};

/// Arguments for the show command
#[derive(Args)]
pub struct ShowArgs {
    /// Transcript file written by `dialectic run --output`
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Also print the judge's full response
    #[arg(long)]
    raw: bool,

    /// Print the transcript as JSON
    #[arg(long)]
    json: bool,
}

/// Run the show command
pub async fn run(args: ShowArgs) -> Result<()> {
    let record = DebateOrchestrator::load_debate_record(&args.file)
        .await
        .with_context(|| format!("Failed to load transcript: {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", "⚖ Dialectic Transcript".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!("  {} {}", "File:".dimmed(), args.file.display());
    println!("  {} {}", "Topic:".dimmed(), record.topic.bold());
    println!(
        "  {} {} rounds, {} ({}), temperature {}",
        "Setup:".dimmed(),
        record.metadata.num_rounds,
        record.metadata.model_name.green(),
        record.metadata.execution_mode,
        record.metadata.temperature
    );
    println!();

    print_record(&record, args.raw);
    Ok(())
}

/// Print the rounds, score table and verdict of a transcript
pub fn print_record(record: &DebateRecord, raw: bool) {
    for entry in &record.debate_history {
        let label = format!("Round {} - Agent {}", entry.round, entry.agent);
        let label = match entry.agent {
            AgentTag::A => label.green().bold(),
            AgentTag::B => label.yellow().bold(),
        };
        println!("{}", label);
        println!("{}", entry.content);
        println!();
    }

    if record.is_partial() {
        println!(
            "{} Debate stopped after {} entries; no judgment recorded",
            "⚠".yellow().bold(),
            record.debate_history.len()
        );
        return;
    }

    println!("{}", "Judgment".bold().cyan());
    println!("{}", "─".repeat(50).cyan());

    if let Some(scores) = &record.judgment.scores {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Criterion").fg(Color::Cyan),
                Cell::new("Score").fg(Color::Cyan),
            ]);

        for criterion in Criterion::ALL {
            let score = scores.get(criterion);
            let cell = if score == 0 {
                Cell::new("n/a").fg(Color::DarkGrey)
            } else {
                Cell::new(format!("{}/10", score)).fg(Color::Green)
            };
            table.add_row(vec![Cell::new(criterion.label()), cell]);
        }
        table.add_row(vec![
            Cell::new("Total").fg(Color::Cyan),
            Cell::new(format!("{}/40", scores.total())).fg(Color::Cyan),
        ]);

        println!("{table}");
    }

    match &record.judgment.result {
        Some(verdict @ Verdict::Found { .. }) => {
            println!("{} {}", "Verdict:".bold(), verdict.as_text().green().bold())
        }
        Some(verdict) => println!("{} {}", "Verdict:".bold(), verdict.as_text().yellow()),
        None => println!("{} {}", "Verdict:".bold(), "none".dimmed()),
    }
    println!(
        "  {} {}",
        "Judged at:".dimmed(),
        record.judgment.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if raw {
        if let Some(text) = &record.judgment.raw_judgment {
            println!();
            println!("{}", "Judge response:".bold());
            println!("{}", text);
        }
    }
    println!();
}
