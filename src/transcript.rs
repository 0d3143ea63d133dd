use std::fmt;
use std::path::Path;
use std::str::FromStr;
use anyhow::{Result, anyhow};
use log::{warn, debug};

// @module: Transcript data model and request chunking

/// Supported subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// SubRip (.srt)
    Srt,
    /// WebVTT (.vtt)
    Vtt,
    /// Tab-separated values (.tsv)
    Tsv,
}

impl SubtitleFormat {
    /// Detect the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ext = path.as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        ext.parse()
            .map_err(|_| anyhow!("Cannot detect subtitle format from path: {:?}", path.as_ref()))
    }

    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Tsv => "tsv",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = crate::errors::TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "tsv" => Ok(Self::Tsv),
            other => Err(crate::errors::TranscriptError::UnsupportedFormat(other.to_string())),
        }
    }
}

// @struct: Single timed subtitle cue
#[derive(Debug, Clone)]
pub struct Cue {
    // @field: Stable identity, matches the original file order
    pub index: usize,

    // @field: Start timestamp, kept verbatim and never parsed numerically
    pub start: String,

    // @field: End timestamp, kept verbatim
    pub end: String,

    // @field: Source-language text, whitespace and newlines preserved exactly
    pub text: String,

    // @field: Translation, set in place by the engine
    pub translated: Option<String>,
}

impl Cue {
    /// Create a new untranslated cue
    pub fn new(index: usize, start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        Cue {
            index,
            start: start.into(),
            end: end.into(),
            text: text.into(),
            translated: None,
        }
    }

    /// Text to render on output: the translation when present, otherwise the source
    pub fn output_text(&self) -> &str {
        self.translated.as_deref().unwrap_or(&self.text)
    }
}

/// Ordered collection of cues with format metadata
#[derive(Debug)]
pub struct Transcript {
    /// Format the cues were parsed from
    pub format: SubtitleFormat,

    /// Cues in file order; the engine never reorders them
    pub cues: Vec<Cue>,

    /// Header/prelude lines for formats that carry one (e.g. WEBVTT)
    pub header: Option<String>,
}

/// One contiguous range of cues bundled into a single translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Monotonically increasing chunk identifier
    pub cid: usize,

    /// First cue index in the range (inclusive)
    pub start_idx: usize,

    /// Last cue index in the range (inclusive)
    pub end_idx: usize,

    /// Total character mass of the text within the range
    pub charcount: usize,
}

impl Transcript {
    /// Create a new transcript
    pub fn new(format: SubtitleFormat, cues: Vec<Cue>, header: Option<String>) -> Self {
        Transcript { format, cues, header }
    }

    /// Split the cues into chunks bounded by a character budget.
    ///
    /// Greedy left-to-right accumulation: the current chunk is extended while
    /// adding the next cue keeps the character count within budget, otherwise
    /// the chunk is closed and a new one starts at that cue. A single cue
    /// larger than the budget still gets its own chunk so nothing is dropped.
    /// Together the chunk ranges are contiguous, non-overlapping and cover
    /// every cue exactly once, in order.
    pub fn split_into_chunks(&self, max_chars: usize) -> Vec<Chunk> {
        if self.cues.is_empty() {
            warn!("No cues to split into chunks");
            return Vec::new();
        }

        // Guard against a budget so small every request degenerates
        let budget = max_chars.max(1);

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut range_start: Option<usize> = None;
        let mut range_end = 0;
        let mut charcount = 0;

        for cue in &self.cues {
            let size = cue.text.chars().count();

            if let Some(first) = range_start {
                if charcount + size > budget {
                    chunks.push(Chunk {
                        cid: chunks.len() + 1,
                        start_idx: first,
                        end_idx: range_end,
                        charcount,
                    });
                    range_start = Some(cue.index);
                    charcount = size;
                } else {
                    charcount += size;
                }
            } else {
                range_start = Some(cue.index);
                charcount = size;
            }
            range_end = cue.index;
        }

        if let Some(start) = range_start {
            chunks.push(Chunk {
                cid: chunks.len() + 1,
                start_idx: start,
                end_idx: range_end,
                charcount,
            });
        }

        debug!("Split {} cues into {} chunks (budget {} chars)",
               self.cues.len(), chunks.len(), budget);

        chunks
    }

    /// Cues whose index falls within the given chunk range, in file order
    pub fn cues_in_chunk(&self, chunk: &Chunk) -> impl Iterator<Item = &Cue> {
        self.cues.iter()
            .filter(move |c| c.index >= chunk.start_idx && c.index <= chunk.end_idx)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transcript ({})", self.format)?;
        writeln!(f, "Cues: {}", self.cues.len())
    }
}
