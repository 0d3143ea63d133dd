/*!
 * Batch orchestration and range driver tests
 *
 * These exercise the accept/retry/fallback policy against a scripted mock
 * translator: dropped ids escalate to single-item calls, degenerate retries
 * fall back to the source text, and transport errors propagate untouched.
 */

use subsetzer::app_config::Config;
use subsetzer::transcript::{Chunk, Cue, SubtitleFormat, Transcript};
use subsetzer::translation::{apply_batch, translate_range, TranslationParams};

use crate::common::mock_translators::MockTranslator;

fn params() -> TranslationParams {
    TranslationParams::from_config(&Config::default(), None)
}

fn sample_cues() -> Vec<Cue> {
    vec![
        Cue::new(1, "0", "1", "Hello"),
        Cue::new(2, "1", "2", "World"),
        Cue::new(3, "2", "3", "Foo"),
        Cue::new(4, "3", "4", "Bar"),
    ]
}

fn batch_for(cues: &[Cue]) -> Vec<(String, String)> {
    cues.iter().map(|c| (c.index.to_string(), c.text.clone())).collect()
}

#[tokio::test]
async fn test_apply_batch_only_updates_present_ids() {
    let mut cues = sample_cues();
    let translator = MockTranslator::new()
        .push_batch(vec![("1", "Hola"), ("2", "Mundo")])
        .push_batch(vec![("3", "Baz"), ("4", "Qux")]);

    let first = batch_for(&cues[..2]);
    let missing = apply_batch(&translator, &first, &mut cues, &params()).await.unwrap();
    assert!(missing.is_empty());
    assert_eq!(cues[0].translated.as_deref(), Some("Hola"));
    assert_eq!(cues[1].translated.as_deref(), Some("Mundo"));
    assert_eq!(cues[2].translated, None);

    let second = batch_for(&sample_cues()[2..]);
    let missing = apply_batch(&translator, &second, &mut cues, &params()).await.unwrap();
    assert!(missing.is_empty());
    assert_eq!(cues[2].translated.as_deref(), Some("Baz"));
    assert_eq!(cues[3].translated.as_deref(), Some("Qux"));

    assert_eq!(translator.tracker().lock().unwrap().single_calls, 0);
}

#[tokio::test]
async fn test_apply_batch_retries_missing_ids() {
    let mut cues = sample_cues();
    // The backend silently drops id 2
    let translator = MockTranslator::new()
        .push_batch(vec![("1", "Hola")])
        .push_single("Mundo");

    let batch = batch_for(&cues[..2]);
    let missing = apply_batch(&translator, &batch, &mut cues, &params()).await.unwrap();

    assert!(missing.is_empty());
    assert_eq!(cues[0].translated.as_deref(), Some("Hola"));
    assert_eq!(cues[1].translated.as_deref(), Some("Mundo"));

    let tracker = translator.tracker();
    let tracker = tracker.lock().unwrap();
    assert_eq!(tracker.single_calls, 1);
    assert_eq!(tracker.single_texts, vec!["World".to_string()]);
}

#[tokio::test]
async fn test_apply_batch_marks_failures_after_retry() {
    let mut cues = sample_cues();
    // Id 1 is valid but padded; id 2 is whitespace noise, twice
    let translator = MockTranslator::new()
        .push_batch(vec![("1", "  Hola  "), ("2", "   ")])
        .push_single("   ");

    let batch = batch_for(&cues[..2]);
    let missing = apply_batch(&translator, &batch, &mut cues, &params()).await.unwrap();

    assert_eq!(missing, vec!["2".to_string()]);
    // Accepted candidates are stored raw, untrimmed
    assert_eq!(cues[0].translated.as_deref(), Some("  Hola  "));
    // Permanent failure degrades to the cue's own source text
    assert_eq!(cues[1].translated.as_deref(), Some("World"));
}

#[tokio::test]
async fn test_apply_batch_retries_when_translation_equals_source() {
    let mut cues = sample_cues();
    // Id 2 echoes its source back; acceptance must reject it
    let translator = MockTranslator::new()
        .push_batch(vec![("1", "Hola"), ("2", "World")])
        .push_single("Mundo");

    let batch = batch_for(&cues[..2]);
    let missing = apply_batch(&translator, &batch, &mut cues, &params()).await.unwrap();

    assert!(missing.is_empty());
    assert_eq!(cues[0].translated.as_deref(), Some("Hola"));
    assert_eq!(cues[1].translated.as_deref(), Some("Mundo"));
    assert_eq!(translator.tracker().lock().unwrap().single_calls, 1);
}

#[tokio::test]
async fn test_apply_batch_empty_batch_is_a_no_op() {
    let mut cues = sample_cues();
    let translator = MockTranslator::new();
    let missing = apply_batch(&translator, &[], &mut cues, &params()).await.unwrap();
    assert!(missing.is_empty());
    assert_eq!(translator.tracker().lock().unwrap().batch_calls, 0);
}

#[tokio::test]
async fn test_translate_range_preserves_whitespace_on_empty() {
    let mut transcript = Transcript::new(
        SubtitleFormat::Srt,
        vec![Cue::new(1, "0", "1", "  Hello  \n")],
        None,
    );
    let chunks = vec![Chunk { cid: 1, start_idx: 1, end_idx: 1, charcount: 5 }];
    // Both the batch and the retry come back empty
    let translator = MockTranslator::new()
        .push_batch(vec![])
        .push_single("");

    let unresolved = translate_range(&translator, &mut transcript, &chunks, &params(), false, |_, _| {})
        .await
        .unwrap();

    assert_eq!(unresolved, vec!["1".to_string()]);
    assert_eq!(transcript.cues[0].translated.as_deref(), Some("  Hello  \n"));
}

#[tokio::test]
async fn test_translate_range_no_llm_makes_no_calls() {
    let mut transcript = Transcript::new(
        SubtitleFormat::Srt,
        vec![Cue::new(1, "0", "1", "Hello"), Cue::new(2, "1", "2", "World")],
        None,
    );
    let chunks = transcript.split_into_chunks(100);
    let translator = MockTranslator::new();

    let unresolved = translate_range(&translator, &mut transcript, &chunks, &params(), true, |_, _| {})
        .await
        .unwrap();

    assert!(unresolved.is_empty());
    assert!(transcript.cues.iter().all(|c| c.translated.is_none()));
    let tracker = translator.tracker();
    let tracker = tracker.lock().unwrap();
    assert_eq!(tracker.batch_calls, 0);
    assert_eq!(tracker.single_calls, 0);
}

#[tokio::test]
async fn test_translate_range_continues_past_unresolved_chunks() {
    let mut transcript = Transcript::new(
        SubtitleFormat::Srt,
        vec![Cue::new(1, "0", "1", "Hello"), Cue::new(2, "1", "2", "World")],
        None,
    );
    // One cue per chunk
    let chunks = vec![
        Chunk { cid: 1, start_idx: 1, end_idx: 1, charcount: 5 },
        Chunk { cid: 2, start_idx: 2, end_idx: 2, charcount: 5 },
    ];
    // First chunk fails batch and retry; second succeeds
    let translator = MockTranslator::new()
        .push_batch(vec![])
        .push_single("")
        .push_batch(vec![("2", "Mundo")]);

    let unresolved = translate_range(&translator, &mut transcript, &chunks, &params(), false, |_, _| {})
        .await
        .unwrap();

    assert_eq!(unresolved, vec!["1".to_string()]);
    assert_eq!(transcript.cues[0].translated.as_deref(), Some("Hello"));
    assert_eq!(transcript.cues[1].translated.as_deref(), Some("Mundo"));
}

#[tokio::test]
async fn test_translate_range_reports_progress_per_chunk() {
    let mut transcript = Transcript::new(
        SubtitleFormat::Srt,
        vec![Cue::new(1, "0", "1", "a"), Cue::new(2, "1", "2", "b")],
        None,
    );
    let chunks = vec![
        Chunk { cid: 1, start_idx: 1, end_idx: 1, charcount: 1 },
        Chunk { cid: 2, start_idx: 2, end_idx: 2, charcount: 1 },
    ];
    let translator = MockTranslator::new();

    let ticks = std::sync::Mutex::new(Vec::new());
    translate_range(&translator, &mut transcript, &chunks, &params(), true, |done, total| {
        ticks.lock().unwrap().push((done, total));
    })
    .await
    .unwrap();

    assert_eq!(*ticks.lock().unwrap(), vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let mut transcript = Transcript::new(
        SubtitleFormat::Srt,
        vec![Cue::new(1, "0", "1", "Hello")],
        None,
    );
    let chunks = transcript.split_into_chunks(100);
    let translator = MockTranslator::new();
    translator.fail_next_call();

    let result = translate_range(&translator, &mut transcript, &chunks, &params(), false, |_, _| {}).await;
    assert!(result.is_err());
    // No partial mutation on transport failure
    assert_eq!(transcript.cues[0].translated, None);
}
