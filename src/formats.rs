/*!
 * Subtitle format parsers and writers.
 *
 * Parses SRT, WebVTT and TSV content into a `Transcript` and renders a
 * transcript back out in any of those formats. Timestamps are carried as
 * opaque strings and cue text is preserved byte-for-byte; no timing
 * semantics are validated here.
 */

use anyhow::Result;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranscriptError;
use crate::transcript::{Cue, SubtitleFormat, Transcript};

// Cue timing line: two opaque timestamps around an arrow
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<start>.*?)\s*-->\s*(?P<end>.*?)\s*$").unwrap()
});

/// Parse SRT content into a transcript
pub fn parse_srt(content: &str) -> Result<Transcript, TranscriptError> {
    let mut cues = Vec::new();
    let mut counter = 0;

    for block in split_blocks(content) {
        let mut lines = block.iter();

        let index_line = match lines.next() {
            Some(line) => line.trim(),
            None => continue,
        };
        let index = match index_line.parse::<usize>() {
            Ok(num) => num,
            Err(_) => {
                warn!("Non-numeric SRT cue counter '{}', renumbering", index_line);
                counter + 1
            }
        };

        let timing_line = lines.next().ok_or_else(|| TranscriptError::Parse {
            format: "srt".to_string(),
            message: format!("cue {} has no timing line", index),
        })?;
        let (start, end) = parse_timing(timing_line).ok_or_else(|| TranscriptError::Parse {
            format: "srt".to_string(),
            message: format!("invalid timing line for cue {}: {}", index, timing_line),
        })?;

        // Remaining lines are the cue text, kept exactly as written
        let text = lines.cloned().collect::<Vec<String>>().join("\n");

        counter = index.max(counter);
        cues.push(Cue::new(index, start, end, text));
    }

    if cues.is_empty() {
        return Err(TranscriptError::Parse {
            format: "srt".to_string(),
            message: "no cues found".to_string(),
        });
    }

    Ok(Transcript::new(SubtitleFormat::Srt, cues, None))
}

/// Parse WebVTT content into a transcript
pub fn parse_vtt(content: &str) -> Result<Transcript, TranscriptError> {
    let mut lines = content.lines();

    let first = lines.next().unwrap_or_default();
    if !first.trim_start_matches('\u{feff}').starts_with("WEBVTT") {
        return Err(TranscriptError::Parse {
            format: "vtt".to_string(),
            message: "missing WEBVTT header".to_string(),
        });
    }

    // Header block runs until the first blank line
    let mut header_lines = vec![first.to_string()];
    let mut body: Vec<&str> = Vec::new();
    let mut in_header = true;
    for line in lines {
        if in_header {
            if line.trim().is_empty() {
                in_header = false;
            } else {
                header_lines.push(line.to_string());
            }
        } else {
            body.push(line);
        }
    }

    let mut cues = Vec::new();
    let mut index = 0;

    for block in split_blocks(&body.join("\n")) {
        // NOTE and STYLE blocks are metadata, not cues
        if block.first().is_some_and(|l| l.starts_with("NOTE") || l.starts_with("STYLE")) {
            continue;
        }

        // Optional cue identifier line before the timing line
        let timing_pos = match block.iter().position(|l| l.contains("-->")) {
            Some(pos) if pos <= 1 => pos,
            _ => {
                warn!("Skipping VTT block without timing line: {:?}", block.first());
                continue;
            }
        };
        let Some((start, end)) = parse_timing(&block[timing_pos]) else {
            warn!("Skipping VTT block with malformed timing line: {}", block[timing_pos]);
            continue;
        };

        let text = block[timing_pos + 1..].join("\n");

        index += 1;
        cues.push(Cue::new(index, start, end, text));
    }

    if cues.is_empty() {
        return Err(TranscriptError::Parse {
            format: "vtt".to_string(),
            message: "no cues found".to_string(),
        });
    }

    Ok(Transcript::new(SubtitleFormat::Vtt, cues, Some(header_lines.join("\n"))))
}

/// Parse TSV content (`start<TAB>end<TAB>text`) into a transcript
pub fn parse_tsv(content: &str) -> Result<Transcript, TranscriptError> {
    let mut cues = Vec::new();
    let mut index = 0;

    for (line_no, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, '\t');
        let (start, end, text) = match (fields.next(), fields.next(), fields.next()) {
            (Some(s), Some(e), Some(t)) => (s, e, t),
            _ => {
                return Err(TranscriptError::Parse {
                    format: "tsv".to_string(),
                    message: format!("line {} does not have 3 tab-separated fields", line_no + 1),
                });
            }
        };

        // Header row
        if line_no == 0 && start.eq_ignore_ascii_case("start") {
            continue;
        }

        index += 1;
        cues.push(Cue::new(index, start, end, unescape_tsv(text)));
    }

    if cues.is_empty() {
        return Err(TranscriptError::Parse {
            format: "tsv".to_string(),
            message: "no cues found".to_string(),
        });
    }

    Ok(Transcript::new(SubtitleFormat::Tsv, cues, None))
}

/// Render a transcript as SRT
pub fn write_srt(transcript: &Transcript) -> String {
    let mut out = String::new();
    for cue in &transcript.cues {
        out.push_str(&format!("{}\n{} --> {}\n{}\n\n", cue.index, cue.start, cue.end, cue.output_text()));
    }
    out
}

/// Render a transcript as WebVTT, optionally injecting a NOTE line after the header
pub fn write_vtt(transcript: &Transcript, note: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(transcript.header.as_deref().unwrap_or("WEBVTT"));
    out.push_str("\n\n");

    if let Some(note) = note {
        out.push_str(&format!("NOTE {}\n\n", note));
    }

    for cue in &transcript.cues {
        out.push_str(&format!("{} --> {}\n{}\n\n", cue.start, cue.end, cue.output_text()));
    }
    out
}

/// Render a transcript as TSV
pub fn write_tsv(transcript: &Transcript) -> String {
    let mut out = String::from("start\tend\ttext\n");
    for cue in &transcript.cues {
        out.push_str(&format!("{}\t{}\t{}\n", cue.start, cue.end, escape_tsv(cue.output_text())));
    }
    out
}

/// Render the transcript in the requested output format.
///
/// The provenance note (e.g. `translated-with model=... time=...`) is only
/// emitted for formats with a header/note line, which today means WebVTT.
pub fn build_output_as(transcript: &Transcript, format: SubtitleFormat, note: Option<&str>) -> String {
    match format {
        SubtitleFormat::Srt => write_srt(transcript),
        SubtitleFormat::Vtt => write_vtt(transcript, note),
        SubtitleFormat::Tsv => write_tsv(transcript),
    }
}

/// Parse content in the given format
pub fn parse_as(content: &str, format: SubtitleFormat) -> Result<Transcript, TranscriptError> {
    match format {
        SubtitleFormat::Srt => parse_srt(content),
        SubtitleFormat::Vtt => parse_vtt(content),
        SubtitleFormat::Tsv => parse_tsv(content),
    }
}

/// Split line-oriented content into blank-line separated blocks
fn split_blocks(content: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    // Only a truly empty line separates blocks; a line of spaces is cue text
    for line in content.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn parse_timing(line: &str) -> Option<(String, String)> {
    let caps = TIMING_REGEX.captures(line)?;
    let start = caps.name("start")?.as_str();
    let end = caps.name("end")?.as_str();
    if start.is_empty() || end.is_empty() {
        return None;
    }
    Some((start.to_string(), end.to_string()))
}

// Cue text can hold tabs and newlines; TSV cells cannot
fn escape_tsv(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n").replace('\t', "\\t")
}

fn unescape_tsv(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
