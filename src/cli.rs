//! Client commands: drive a [`NoteStore`] through one action and render the result.

use anyhow::{Context, Result};
use clap::Subcommand;
use uuid::Uuid;

use crate::config::SummaryConfig;
use crate::models::{SummaryStatus, SUMMARY_FAILED_MESSAGE};
use crate::store::{NoteStore, Outcome, StoreSnapshot};
use crate::summary::{KeywordSummarizer, SummaryRequester};
use crate::table::NoteTable;

pub const EMPTY_STATE_MESSAGE: &str = "No notes yet. Create your first note above!";

#[derive(Debug, Clone, Subcommand)]
pub enum NoteCommand {
    /// List notes, newest first
    List,
    /// Add a note
    Add {
        /// Note text
        text: String,
    },
    /// Replace a note's text
    Edit {
        id: Uuid,
        /// New note text
        text: String,
    },
    /// Delete a note
    Delete { id: Uuid },
    /// Generate a summary of a note
    Summarize { id: Uuid },
}

/// Load the notes, apply `command`, and return what should be printed.
pub async fn run<T: NoteTable>(
    store: &NoteStore<T>,
    summary: &SummaryConfig,
    command: NoteCommand,
) -> Result<String> {
    store.initialize().await.context("Failed to load notes")?;

    match command {
        NoteCommand::List => {}
        NoteCommand::Add { text } => {
            store.update_input_text(text);
            let outcome = store.submit_input().await.context("Failed to add note")?;
            if outcome == Outcome::Skipped {
                anyhow::bail!("Note text is empty");
            }
        }
        NoteCommand::Edit { id, text } => {
            if !store.start_editing(id) {
                anyhow::bail!("Note {} not found", id);
            }
            let outcome = store
                .save_edit(id, &text)
                .await
                .context("Failed to save note")?;
            if outcome == Outcome::Skipped {
                store.cancel_edit(id);
                anyhow::bail!("Note text is empty");
            }
        }
        NoteCommand::Delete { id } => {
            store.delete_note(id).await.context("Failed to delete note")?;
        }
        NoteCommand::Summarize { id } => {
            let snapshot = store.snapshot();
            let note = snapshot
                .note(id)
                .ok_or_else(|| anyhow::anyhow!("Note {} not found", id))?;
            return summarize(&note.content, summary).await;
        }
    }

    Ok(render_notes(&store.snapshot()))
}

async fn summarize(content: &str, config: &SummaryConfig) -> Result<String> {
    let requester = SummaryRequester::new(KeywordSummarizer::from_config(config));
    requester.request_summary(content).settled().await;

    match requester.dialog().map(|d| d.status) {
        Some(SummaryStatus::Succeeded { summary }) => Ok(format!("{}\n", summary)),
        Some(SummaryStatus::Failed { message }) => Err(anyhow::anyhow!(message)),
        _ => Err(anyhow::anyhow!(SUMMARY_FAILED_MESSAGE)),
    }
}

/// Plain-text rendering of the note list.
pub fn render_notes(snapshot: &StoreSnapshot) -> String {
    if snapshot.is_empty_state() {
        return format!("{}\n", EMPTY_STATE_MESSAGE);
    }

    let mut output = String::new();
    for note in &snapshot.notes {
        output.push_str(&format!(
            "{}  {}\n",
            note.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            note.id
        ));
        for line in note.content.lines() {
            output.push_str("    ");
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');
    }
    output
}
