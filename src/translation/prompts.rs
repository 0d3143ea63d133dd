/*!
 * Prompt construction and response parsing for the delimited batch protocol.
 *
 * Each batch item is encoded as `id|||text`; the model is asked to answer in
 * the same shape. Responses are parsed line-wise: a line opening with a known
 * `id|||` marker starts a new item, every other line continues the current
 * item's text, so embedded newlines survive the round trip. Source text that
 * itself contains the delimiter sequence can confuse this protocol; that is
 * an accepted limitation rather than something we escape silently.
 */

use std::collections::HashSet;

/// Per-item delimiter between id and text
pub const DELIMITER: &str = "|||";

/// Build the multi-item prompt for one chunk
pub fn build_batch_prompt(
    items: &[(String, String)],
    source_language: &str,
    target_language: &str,
    translate_bracketed: bool,
) -> String {
    let mut prompt = format!(
        "You are a professional subtitle translator. Translate every entry below from {} to {}.\n\
         Each entry is formatted as id{}text and the text may span several lines.\n\
         Answer with one entry per line in exactly the same id{}translation format.\n\
         Keep the ids unchanged, preserve line breaks inside an entry, and add no commentary.\n",
        source_language, target_language, DELIMITER, DELIMITER
    );

    if !translate_bracketed {
        prompt.push_str("Copy bracketed annotations such as [music] through unchanged.\n");
    }

    prompt.push('\n');
    for (id, text) in items {
        prompt.push_str(id);
        prompt.push_str(DELIMITER);
        prompt.push_str(text);
        prompt.push('\n');
    }

    prompt
}

/// Build the prompt for a single-cue fallback call
pub fn build_single_prompt(
    text: &str,
    source_language: &str,
    target_language: &str,
    translate_bracketed: bool,
) -> String {
    let mut prompt = format!(
        "Translate the following subtitle text from {} to {}.\n\
         Answer with the translation only, preserving line breaks, without commentary.\n",
        source_language, target_language
    );

    if !translate_bracketed {
        prompt.push_str("Copy bracketed annotations such as [music] through unchanged.\n");
    }

    prompt.push('\n');
    prompt.push_str(text);
    prompt
}

/// Parse a delimited batch response back into `(id, text)` pairs.
///
/// Only ids that were part of the request open a new item; anything else is
/// treated as continuation text of the current item. Lines before the first
/// marker (model preamble) are dropped. The result may be shorter than the
/// request when the model dropped items; remediation is the caller's job.
pub fn parse_batch_response(response: &str, expected_ids: &[String]) -> Vec<(String, String)> {
    let known: HashSet<&str> = expected_ids.iter().map(|s| s.as_str()).collect();

    let mut items: Vec<(String, Vec<String>)> = Vec::new();

    for line in response.lines() {
        if let Some((id, rest)) = line.split_once(DELIMITER) {
            let id = id.trim();
            if known.contains(id) {
                items.push((id.to_string(), vec![rest.to_string()]));
                continue;
            }
        }
        if let Some((_, text_lines)) = items.last_mut() {
            text_lines.push(line.to_string());
        }
    }

    items
        .into_iter()
        .map(|(id, lines)| (id, lines.join("\n")))
        .collect()
}
