//! Built-in narrators.

use chrono::Utc;
use mimesis_core::SimulationState;
use mimesis_error::{MimesisErrorKind, WebhookErrorKind};
use mimesis_interface::{CallStats, Narrator, PhaseReport, TickReport};
use mimesis_runner::{ChatNarrator, ConsoleNarrator, FileNarrator};
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use uuid::Uuid;

fn phase_report() -> PhaseReport {
    PhaseReport {
        name: "intention".to_string(),
        index: 0,
        tick: 4,
        duration_ms: 12,
        stats: CallStats::default(),
        output: json!({"bob": {"action": "wait"}}),
        narrative: vec!["bob: waits".to_string()],
    }
}

fn tick_report() -> TickReport {
    TickReport {
        run_id: Uuid::new_v4(),
        tick: 4,
        started_at: Utc::now(),
        finished_at: Utc::now(),
        phases: vec![phase_report()],
        narrative: vec!["bob: waits".to_string()],
        success: true,
        state: SimulationState::default(),
    }
}

/// Accept one connection, answer with `status`, and return the request text.
async fn serve_once(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/hook", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some((head, body)) = text.split_once("\r\n\r\n") {
                let length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if body.len() >= length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let reply = format!(
            "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            status
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    });
    (url, handle)
}

#[tokio::test]
async fn test_file_narrator_appends_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("logs/narration.jsonl");
    let narrator = FileNarrator::new(&path);

    narrator.on_tick_start(4, &SimulationState::default()).await.unwrap();
    narrator.on_phase_complete(&phase_report()).await.unwrap();
    narrator.on_tick_complete(&tick_report()).await.unwrap();

    let lines: Vec<JsonValue> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], json!({"event": "tick_start", "tick": 4, "characters": 0, "locations": 0}));
    assert_eq!(lines[1]["event"], "phase_complete");
    assert_eq!(lines[1]["output"]["bob"]["action"], "wait");
    assert_eq!(lines[2]["event"], "tick_complete");
    assert_eq!(lines[2]["narrative"], json!(["bob: waits"]));
}

#[tokio::test]
async fn test_chat_narrator_posts_narrative() {
    let (url, server) = serve_once("204 No Content").await;

    ChatNarrator::new(url)
        .on_tick_complete(&tick_report())
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /hook HTTP/1.1"));
    let body: JsonValue = serde_json::from_str(request.split_once("\r\n\r\n").unwrap().1).unwrap();
    assert_eq!(body, json!({"content": "**Tick 4**\nbob: waits", "tick": 4}));
}

#[tokio::test]
async fn test_chat_narrator_reports_rejection() {
    let (url, server) = serve_once("500 Internal Server Error").await;

    let result = ChatNarrator::new(url)
        .with_timeout(Duration::from_secs(5))
        .on_tick_complete(&tick_report())
        .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err.kind(),
        MimesisErrorKind::Webhook(e) if e.kind == WebhookErrorKind::Rejected(500)
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_console_narrator_never_fails() {
    let narrator = ConsoleNarrator::verbose();

    narrator.on_tick_start(4, &SimulationState::default()).await.unwrap();
    narrator.on_phase_complete(&phase_report()).await.unwrap();
    narrator.on_tick_complete(&tick_report()).await.unwrap();
}
