//! Tests for per-color transcript files.

use std::fs;
use tempfile::TempDir;

use gomoku_arena::{Color, GameEvent, TranscriptWriter, transcript_file_name};

fn read(dir: &TempDir, color: Color) -> String {
    fs::read_to_string(dir.path().join(transcript_file_name(color))).expect("Read failed")
}

#[test]
fn test_events_go_to_their_color() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = TranscriptWriter::open(dir.path()).expect("Open failed");

    let events = [
        GameEvent::GameStarted {
            black: "DeepSeek".to_string(),
            white: "Gemini".to_string(),
        },
        GameEvent::PromptIssued {
            color: Color::Black,
            text: "Board state...".to_string(),
        },
        GameEvent::ResponseFragment {
            color: Color::Black,
            text: "(7,7) center. ".to_string(),
        },
        GameEvent::ResponseFragment {
            color: Color::Black,
            text: "[7,7]".to_string(),
        },
        GameEvent::InvalidMove {
            color: Color::White,
            reason: "no coordinates found in response".to_string(),
            attempt: 1,
        },
        GameEvent::Win { color: Color::Black },
    ];
    for event in &events {
        writer.record(event).expect("Record failed");
    }

    let black = read(&dir, Color::Black);
    let white = read(&dir, Color::White);

    assert!(black.contains("Black: DeepSeek | White: Gemini"));
    assert!(white.contains("Black: DeepSeek | White: Gemini"));
    assert!(black.contains("Board state..."));
    assert!(black.contains("(7,7) center. [7,7]"));
    assert!(!white.contains("[7,7]"));
    assert!(white.contains("[invalid move] no coordinates found in response (attempt 1)"));
    assert!(black.contains("Black wins"));
    assert!(white.contains("Black wins"));
}

#[test]
fn test_reopen_appends() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for _ in 0..2 {
        let mut writer = TranscriptWriter::open(dir.path()).expect("Open failed");
        writer
            .record(&GameEvent::GameStarted {
                black: "A".to_string(),
                white: "B".to_string(),
            })
            .expect("Record failed");
    }

    assert_eq!(read(&dir, Color::Black).matches("Game started").count(), 2);
}

#[test]
fn test_communication_error_recorded() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut writer = TranscriptWriter::open(dir.path()).expect("Open failed");
    writer
        .record(&GameEvent::CommunicationError {
            color: Color::White,
            message: "401 Unauthorized".to_string(),
        })
        .expect("Record failed");

    assert!(read(&dir, Color::White).contains("[error] 401 Unauthorized"));
    assert!(read(&dir, Color::Black).contains("communication error"));
    assert_eq!(writer.dir(), dir.path());
    assert_eq!(
        writer.path(Color::Black),
        dir.path().join("black_output.log")
    );
}
