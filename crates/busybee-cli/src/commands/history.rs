//! Search history commands.

use anyhow::Result;
use busybee_core::{AppContext, SearchHistoryEntry};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Select;

use super::analyze::{run_analysis, OutputArgs};
use crate::output;

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List recent searches, newest first
    List,

    /// Run a previous search again
    Rerun(RerunArgs),
}

#[derive(Args)]
pub struct RerunArgs {
    /// Position in `history list` (1 = most recent); omit to pick interactively
    pub index: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn execute(cmd: HistoryCommands, ctx: &AppContext) -> Result<()> {
    let entries = ctx.controller().history();

    match cmd {
        HistoryCommands::List => {
            output::print_history(&entries);
            Ok(())
        }

        HistoryCommands::Rerun(args) => {
            if entries.is_empty() {
                println!("{}", "No searches yet.".dimmed());
                return Ok(());
            }

            let entry = match args.index {
                Some(index) => select_by_index(&entries, index)?,
                None => match pick(&entries)? {
                    Some(entry) => entry,
                    None => return Ok(()),
                },
            };

            run_analysis(ctx, &entry.query, entry.kind, &args.output).await
        }
    }
}

/// Entry at 1-based `index`.
fn select_by_index(entries: &[SearchHistoryEntry], index: usize) -> Result<SearchHistoryEntry> {
    index
        .checked_sub(1)
        .and_then(|i| entries.get(i))
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No search at position {}; history has {} entries",
                index,
                entries.len()
            )
        })
}

fn pick(entries: &[SearchHistoryEntry]) -> Result<Option<SearchHistoryEntry>> {
    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("{} ({})", e.query, e.kind))
        .collect();

    let choice = Select::new()
        .with_prompt("Re-run which search?")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(choice.and_then(|i| entries.get(i).cloned()))
}
