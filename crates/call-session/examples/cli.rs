use call_session::{CallSession, SessionEvent, SessionParams, UniformSelector};
use ems_transcript::Speaker;
use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let selector = match std::env::var("CALL_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => UniformSelector::seeded(seed),
        None => UniformSelector::new(),
    };

    let params = SessionParams::new();
    eprintln!("Starting call {}...", params.session_id);
    eprintln!("Type a line and press Enter to speak as the caller.");
    eprintln!("Press Ctrl+C to hang up.");
    eprintln!();
    eprintln!("  CALL_SEED   Seed for the reply selector (default: random)");
    eprintln!();

    let mut session = CallSession::spawn(params, selector);
    let handle = session.handle();
    handle
        .set_listening(true)
        .await
        .expect("session just spawned");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut hung_up = false;

    loop {
        tokio::select! {
            line = lines.next_line(), if !hung_up => match line {
                Ok(Some(line)) => {
                    if handle.ingest(Speaker::User, line, true).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    hung_up = true;
                    let _ = handle.end().await;
                }
                Err(e) => {
                    eprintln!("stdin error: {e}");
                    hung_up = true;
                    let _ = handle.end().await;
                }
            },
            event = session.next() => match event {
                Some(event) => {
                    println!("{}", serde_json::to_string(&event).unwrap_or_default());
                    if matches!(event, SessionEvent::Ended { .. }) {
                        break;
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if !hung_up => {
                hung_up = true;
                let _ = handle.end().await;
            }
        }
    }
}
