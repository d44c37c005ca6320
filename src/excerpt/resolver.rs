//! Resolves excerpt candidates into exact content chunks.

use tracing::debug;

use crate::capabilities::ExcerptPlanner;
use crate::error::CapabilityError;
use crate::types::{Anchor, ContentChunk, ExcerptCandidate, SourceDocument};

use super::matcher::{DocumentIndex, locate};

/// Resolve candidates against a document.
///
/// Each candidate's start and end snippets are located independently
/// (anchored to their respective boundaries). A candidate is dropped, not
/// raised as an error, when either snippet cannot be located or when the
/// resolved end span finishes before the start span begins. Survivors are
/// emitted in candidate order; each chunk's `content` is the verbatim
/// document text from the start of the start-match to the end of the
/// end-match.
///
/// Every candidate only reads the shared immutable document, so callers may
/// fan the matching out across candidates if they need to; the output order
/// is candidate order either way.
///
/// # Examples
///
/// ```rust
/// use chunksmith::excerpt::resolve_chunks;
/// use chunksmith::types::{ExcerptCandidate, SourceDocument};
///
/// let document = SourceDocument::new("Alpha beta gamma delta epsilon");
/// let candidates = vec![ExcerptCandidate {
///     title: "T1".into(),
///     start: "Alpha beta".into(),
///     end: "delta epsilon".into(),
/// }];
///
/// let chunks = resolve_chunks(&candidates, &document);
/// assert_eq!(chunks[0].content, "Alpha beta gamma delta epsilon");
/// ```
pub fn resolve_chunks(
    candidates: &[ExcerptCandidate],
    document: &SourceDocument,
) -> Vec<ContentChunk> {
    let index = DocumentIndex::new(&document.text);
    let mut chunks = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let Some(start) = locate(&candidate.start, &index, Anchor::Start) else {
            debug!(title = %candidate.title, "dropping excerpt: start snippet not located");
            continue;
        };
        let Some(end) = locate(&candidate.end, &index, Anchor::End) else {
            debug!(title = %candidate.title, "dropping excerpt: end snippet not located");
            continue;
        };
        if end.end < start.start {
            debug!(title = %candidate.title, "dropping excerpt: end span precedes start span");
            continue;
        }

        chunks.push(ContentChunk {
            title: candidate.title.clone(),
            content: document.text[start.start..end.end].to_string(),
        });
    }

    chunks
}

/// Ask the excerpt-planning capability for candidates over a document and
/// resolve them in one step.
///
/// Planning failures propagate; unresolvable candidates are still dropped
/// silently, so the returned list may be shorter than the planner's.
pub async fn plan_chunks(
    planner: &dyn ExcerptPlanner,
    document: &SourceDocument,
) -> Result<Vec<ContentChunk>, CapabilityError> {
    let candidates = planner.propose_excerpts(&document.text).await?;
    debug!(candidates = candidates.len(), "planner proposed excerpt candidates");
    Ok(resolve_chunks(&candidates, document))
}
