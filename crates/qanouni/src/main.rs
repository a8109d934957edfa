//! A terminal client for asking the legal assistant questions.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use qanouni_core::{SessionBuilder, SessionStrings};
use qanouni_http::{HttpConfigBuilder, HttpTransport};
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Idle,
    Chunk(String),
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config =
        HttpConfigBuilder::new().with_connect_timeout(Duration::from_secs(10));
    if let Ok(endpoint) = env::var("QANOUNI_ENDPOINT") {
        config = config.with_endpoint(endpoint);
    }
    let config = config.build();
    info!("using endpoint {}", config.endpoint());

    let transport = match HttpTransport::new(config) {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("cannot create the HTTP client: {err}");
            return;
        }
    };

    let strings = match env::var("QANOUNI_LANG").as_deref() {
        Ok("en") => SessionStrings::english(),
        _ => SessionStrings::arabic(),
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let session = SessionBuilder::with_transport(transport)
        .with_strings(strings)
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::Idle).ok();
            }
        })
        .on_chunk({
            let event_tx = event_tx.clone();
            move |chunk| {
                event_tx.send(SessionEvent::Chunk(chunk.to_owned())).ok();
            }
        })
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .map(|style| style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let mut lines = io::BufReader::new(io::stdin()).lines();

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("error reading input: {err}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if session.ask(line).is_err() {
            error!("session has ended unexpectedly");
            break;
        }

        let mut progress_bar = None;
        let mut answering = false;

        loop {
            // Keep spinning until the first chunk shows up.
            if !answering {
                progress_bar
                    .get_or_insert_with(|| {
                        let progress_bar = ProgressBar::new_spinner();
                        progress_bar.set_style(progress_style.clone());
                        progress_bar.set_message("⚖️  Thinking...");
                        progress_bar
                    })
                    .inc(1);
            }

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = progress_bar.take() {
                progress_bar.finish_and_clear();
            }

            match event {
                SessionEvent::Chunk(chunk) => {
                    if !answering {
                        print!("{}", BAR_CHAR.bright_cyan());
                        answering = true;
                    }
                    print!("{}", chunk.bright_white());
                    std::io::stdout().flush().ok();
                }
                SessionEvent::Idle => {
                    if answering {
                        println!();
                    }
                    if let Some(error) = session.snapshot().error {
                        println!("{}{}", BAR_CHAR.bright_red(), error.red());
                    }
                    println!();
                    break;
                }
            }
        }
    }
}
