/*!
 * Subtitle format parsing and writing tests
 *
 * Cross-format behavior exercised through the public API: format detection,
 * conversion between formats, and the details a converter must not lose
 * (headers, cue text bytes, escaping).
 */

use subsetzer::formats::{build_output_as, parse_as, parse_srt, parse_vtt};
use subsetzer::transcript::SubtitleFormat;

const SRT_SAMPLE: &str = "\
1
00:00:01,000 --> 00:00:04,000
Hello world!

2
00:00:05,000 --> 00:00:07,000
How are you?
";

#[test]
fn test_format_detection_from_path() {
    assert_eq!(SubtitleFormat::from_path("movie.srt").unwrap(), SubtitleFormat::Srt);
    assert_eq!(SubtitleFormat::from_path("movie.VTT").unwrap(), SubtitleFormat::Vtt);
    assert_eq!(SubtitleFormat::from_path("dir/movie.tsv").unwrap(), SubtitleFormat::Tsv);
    assert!(SubtitleFormat::from_path("movie.mkv").is_err());
    assert!(SubtitleFormat::from_path("no_extension").is_err());
}

#[test]
fn test_srt_to_vtt_conversion() {
    let transcript = parse_as(SRT_SAMPLE, SubtitleFormat::Srt).unwrap();
    let vtt = build_output_as(&transcript, SubtitleFormat::Vtt, None);

    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert!(vtt.contains("00:00:01,000 --> 00:00:04,000"));
    assert!(vtt.contains("Hello world!"));

    // The rendered VTT parses back with the same cue texts
    let back = parse_vtt(&vtt).unwrap();
    assert_eq!(back.cues.len(), 2);
    assert_eq!(back.cues[0].text, "Hello world!");
    assert_eq!(back.cues[1].text, "How are you?");
}

#[test]
fn test_srt_to_tsv_conversion_escapes_cue_text() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nline one\nline two\n";
    let transcript = parse_srt(content).unwrap();
    let tsv = build_output_as(&transcript, SubtitleFormat::Tsv, None);

    let mut lines = tsv.lines();
    assert_eq!(lines.next(), Some("start\tend\ttext"));
    assert_eq!(lines.next(), Some("00:00:01,000\t00:00:02,000\tline one\\nline two"));

    let back = parse_as(&tsv, SubtitleFormat::Tsv).unwrap();
    assert_eq!(back.cues[0].text, "line one\nline two");
}

#[test]
fn test_vtt_custom_header_survives_round_trip() {
    let content = "WEBVTT - some title\nKind: captions\n\n00:00:01.000 --> 00:00:02.000\nHi\n";
    let transcript = parse_vtt(content).unwrap();
    assert_eq!(transcript.header.as_deref(), Some("WEBVTT - some title\nKind: captions"));

    let rendered = build_output_as(&transcript, SubtitleFormat::Vtt, None);
    assert!(rendered.starts_with("WEBVTT - some title\nKind: captions\n\n"));
}

#[test]
fn test_vtt_cue_identifier_lines_are_tolerated() {
    let content = "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:02.000\nHi\n\n2\n00:00:03.000 --> 00:00:04.000\nBye\n";
    let transcript = parse_vtt(content).unwrap();
    assert_eq!(transcript.cues.len(), 2);
    assert_eq!(transcript.cues[0].text, "Hi");
    assert_eq!(transcript.cues[1].text, "Bye");
    // Indexes are assigned sequentially regardless of the identifier lines
    assert_eq!(transcript.cues[0].index, 1);
    assert_eq!(transcript.cues[1].index, 2);
}

#[test]
fn test_srt_non_numeric_counter_is_renumbered() {
    let content = "one\n00:00:01,000 --> 00:00:02,000\nHi\n\ntwo\n00:00:03,000 --> 00:00:04,000\nBye\n";
    let transcript = parse_srt(content).unwrap();
    assert_eq!(transcript.cues.len(), 2);
    assert_eq!(transcript.cues[0].index, 1);
    assert_eq!(transcript.cues[1].index, 2);
}

#[test]
fn test_note_only_appears_in_vtt_output() {
    let transcript = parse_srt(SRT_SAMPLE).unwrap();
    let note = "translated-with model=llama3.2-3b time=2024-06-01T10:00:00";

    let vtt = build_output_as(&transcript, SubtitleFormat::Vtt, Some(note));
    assert!(vtt.contains(&format!("NOTE {}\n", note)));

    let srt = build_output_as(&transcript, SubtitleFormat::Srt, Some(note));
    assert!(!srt.contains("NOTE"));
    let tsv = build_output_as(&transcript, SubtitleFormat::Tsv, Some(note));
    assert!(!tsv.contains("NOTE"));
}

#[test]
fn test_parse_as_rejects_mismatched_content() {
    assert!(parse_as(SRT_SAMPLE, SubtitleFormat::Vtt).is_err());
    assert!(parse_as("", SubtitleFormat::Srt).is_err());
}
