/*!
 * Batch orchestration: apply, validate, retry.
 *
 * LLM backends routinely drop items from a batch, echo the source back when
 * they refuse to translate, or return whitespace noise. The policy here is
 * two-tier: one batch call per chunk, then one isolated retry per failed id,
 * then a pass-through of the original text so the output file is always
 * complete. Transport errors propagate; only content-level failures are
 * retried.
 */

use std::collections::HashMap;

use anyhow::Result;
use log::{debug, warn};

use crate::transcript::{Chunk, Cue, Transcript};

use super::translator::Translator;
use super::TranslationParams;

/// Acceptance test for one candidate translation.
///
/// A candidate is accepted iff, after trimming surrounding whitespace, it is
/// non-empty and not identical to the trimmed source. The comparison is
/// exact and locale-naive. Trimming is only used for this test; accepted
/// candidates are stored raw.
pub fn is_acceptable(candidate: &str, source: &str) -> bool {
    let trimmed = candidate.trim();
    !trimmed.is_empty() && trimmed != source.trim()
}

/// Apply one batch of `(id, source_text)` requests to the cue sequence.
///
/// Issues one batch call, then one single-item retry for every id that came
/// back missing or rejected. Ids that still fail get their cue's own source
/// text stored verbatim and are reported back as unresolved. Every cue whose
/// id was in the batch has `translated` assigned on return.
pub async fn apply_batch(
    translator: &dyn Translator,
    batch: &[(String, String)],
    cues: &mut [Cue],
    params: &TranslationParams,
) -> Result<Vec<String>> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let returned = translator.translate_batch(batch, params).await?;
    let mut candidates: HashMap<String, String> = returned.into_iter().collect();

    let mut unresolved = Vec::new();

    for (id, source) in batch {
        let accepted = candidates
            .remove(id)
            .filter(|candidate| is_acceptable(candidate, source));

        let resolved = match accepted {
            Some(text) => Some(text),
            None => {
                debug!("Cue {} missing or rejected from batch result, retrying individually", id);
                let retry = translator.translate_single(source, params).await?;
                if is_acceptable(&retry, source) {
                    Some(retry)
                } else {
                    None
                }
            }
        };

        let Some(cue) = cues.iter_mut().find(|c| c.index.to_string() == *id) else {
            warn!("Batch contained id {} with no matching cue", id);
            continue;
        };

        match resolved {
            Some(text) => cue.translated = Some(text),
            None => {
                warn!("Cue {} unresolved after retry, keeping source text", id);
                cue.translated = Some(cue.text.clone());
                unresolved.push(id.clone());
            }
        }
    }

    Ok(unresolved)
}

/// Drive one translation pass over the chunked transcript.
///
/// Chunks are processed strictly in order and a chunk with unresolved ids
/// never short-circuits the rest. With `no_llm` set, no transport call is
/// made and every cue is left exactly as found. Returns all unresolved ids
/// for caller-side reporting; `progress` is ticked once per chunk.
pub async fn translate_range(
    translator: &dyn Translator,
    transcript: &mut Transcript,
    chunks: &[Chunk],
    params: &TranslationParams,
    no_llm: bool,
    progress: impl Fn(usize, usize),
) -> Result<Vec<String>> {
    let total = chunks.len();
    let mut unresolved = Vec::new();

    for chunk in chunks {
        if no_llm {
            progress(chunk.cid, total);
            continue;
        }

        let batch: Vec<(String, String)> = transcript
            .cues_in_chunk(chunk)
            .map(|cue| (cue.index.to_string(), cue.text.clone()))
            .collect();

        debug!("Translating chunk {} ({} cues, {} chars)", chunk.cid, batch.len(), chunk.charcount);

        let missing = apply_batch(translator, &batch, &mut transcript.cues, params).await?;
        if !missing.is_empty() {
            warn!("Chunk {}: {} cue(s) left untranslated: {:?}", chunk.cid, missing.len(), missing);
        }
        unresolved.extend(missing);

        progress(chunk.cid, total);
    }

    Ok(unresolved)
}
