//! One run: search, pick, fetch, annotate, render.

use std::io::{BufRead, Write};

use shiori_api::{AniListError, MetadataService};
use shiori_core::render::{DocumentRenderer, RenderedNote};
use shiori_core::ShioriError;
use thiserror::Error;

use crate::prompt::{PromptError, Prompter};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Core(#[from] ShioriError),
}

/// How a run ended, when it ended without an error.
#[derive(Debug)]
pub enum Outcome {
    Saved(RenderedNote),
    NoResults,
}

/// Drive a single cataloguing session.
pub async fn run<S, R, W>(
    service: &S,
    renderer: &DocumentRenderer,
    prompter: &mut Prompter<R, W>,
) -> Result<Outcome, AppError>
where
    S: MetadataService,
    ShioriError: From<S::Error>,
    R: BufRead,
    W: Write,
{
    let category = prompter.choose_category()?;
    let query = prompter.ask_query()?;

    let candidates = match service.search(category, &query).await.map_err(ShioriError::from) {
        Ok(candidates) => candidates,
        Err(ShioriError::Api(e @ AniListError::RetriesExhausted { .. })) => {
            tracing::error!(error = %e, %category, query = query.as_str(), "Search failed");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };
    if candidates.is_empty() {
        prompter.say("No results found.")?;
        return Ok(Outcome::NoResults);
    }

    let chosen = prompter.choose_candidate(&candidates)?;
    tracing::debug!(id = chosen.id, title = chosen.display_title(), "Candidate selected");
    let record = service
        .fetch_details(chosen.id)
        .await
        .map_err(ShioriError::from)?;

    let annotation = prompter.ask_annotation(record.category())?;
    let note = renderer.render(&record, &annotation).await?;

    prompter.say("")?;
    prompter.say(&format!(
        "Entry for {} saved to {}",
        record.title.preferred().unwrap_or_default(),
        note.document.display()
    ))?;
    Ok(Outcome::Saved(note))
}
