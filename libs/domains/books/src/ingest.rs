use std::path::Path;

use openai_client::TextEmbedder;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{BookError, BookResult};
use crate::models::{BookSummary, StoredSummary};
use crate::repository::SummaryStore;

const TITLE_PREFIX: &str = "## Title: ";
const AUTHOR_PREFIX: &str = "# Author: ";

/// Parse the summaries source file.
///
/// Entries are separated by blank lines. Each entry is a `## Title: ` line,
/// an `# Author: ` line, and one or more summary lines.
pub fn parse_summaries(text: &str) -> BookResult<Vec<BookSummary>> {
    let mut books = Vec::new();

    for (index, entry) in text.split("\n\n").enumerate() {
        let lines: Vec<&str> = entry
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            continue;
        }

        let title = lines
            .first()
            .and_then(|line| line.strip_prefix(TITLE_PREFIX))
            .ok_or_else(|| {
                BookError::Ingestion(format!("Entry {}: missing '{}' line", index + 1, "## Title:"))
            })?;

        let author = lines
            .get(1)
            .and_then(|line| line.strip_prefix(AUTHOR_PREFIX))
            .ok_or_else(|| {
                BookError::Ingestion(format!("Entry {}: missing '{}' line", index + 1, "# Author:"))
            })?;

        let summary = lines[2..].join(" ");
        if summary.is_empty() {
            return Err(BookError::Ingestion(format!(
                "Entry {}: missing summary text",
                index + 1
            )));
        }

        books.push(BookSummary::new(title.trim(), author.trim(), summary));
    }

    Ok(books)
}

/// Load the summaries file into the vector store, once.
///
/// Guarded by a best-effort count check: a non-empty collection is assumed to
/// be already loaded and is left untouched. No content diffing and no lock;
/// concurrent startups may double-load in a race, which upserts tolerate.
///
/// Returns the number of summaries ingested (0 when skipped).
pub async fn ingest_summaries(
    store: &dyn SummaryStore,
    embedder: &dyn TextEmbedder,
    path: &Path,
) -> BookResult<usize> {
    store.ensure_collection(embedder.dimension() as u64).await?;

    let existing = store.count().await?;
    if existing > 0 {
        info!(existing, "Summary collection already loaded; skipping ingestion");
        return Ok(0);
    }

    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        BookError::Ingestion(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let books = parse_summaries(&text)?;
    if books.is_empty() {
        warn!(path = %path.display(), "Summaries file contained no entries");
        return Ok(0);
    }

    let texts: Vec<String> = books.iter().map(|book| book.summary.clone()).collect();
    let outcome = embedder.embed(&texts).await;
    if outcome.is_degraded() {
        // Zero vectors would poison the collection; leave it empty so the
        // next startup retries.
        return Err(BookError::Ingestion(
            "Embedding provider degraded; skipping ingestion".to_string(),
        ));
    }

    let vectors = outcome.into_vectors();
    if vectors.len() != books.len() {
        return Err(BookError::Internal(format!(
            "Embedding count mismatch: {} vectors for {} summaries",
            vectors.len(),
            books.len()
        )));
    }

    let count = books.len();
    let entries: Vec<StoredSummary> = books
        .into_iter()
        .zip(vectors)
        .map(|(book, vector)| StoredSummary {
            id: Uuid::new_v4(),
            vector,
            book,
        })
        .collect();

    store.upsert_batch(entries).await?;
    info!(count, "Ingested book summaries into the vector store");

    Ok(count)
}
