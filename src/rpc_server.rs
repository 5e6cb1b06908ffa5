//! PageKeeper host: newline-delimited JSON over stdin/stdout.
//!
//! Request:  {"id":1, "action":"BOOKMARK_PAGE"}
//! Replies:  {"id":1, "event":"extracted", ...} then {"id":1, "event":"enriched", ...}
//! Failure:  {"id":1, "success":false, "error":"..."}
//! Unsolicited: {"event":"ready"} at start, {"event":"notification", ...} when a reminder fires.
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use pagekeeper::app::App;
use pagekeeper::events::{failure_line, parse_request, reply_line, Reply};
use pagekeeper::managers::alarm_manager::TokioAlarmHost;
use pagekeeper::managers::notification_manager::ChannelNotifier;
use pagekeeper::rpc_handler::handle_command;
use pagekeeper::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagekeeper=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Value>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            let mut text = line.to_string();
            text.push('\n');
            if let Err(e) = stdout.write_all(text.as_bytes()).await {
                error!("stdout closed: {}", e);
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let mut settings = SettingsEngine::new(None);
    if let Err(e) = settings.load() {
        warn!("using default settings: {}", e);
    }

    let (alarm_host, mut fired_rx) = TokioAlarmHost::new(Handle::current());
    let notifier = Arc::new(ChannelNotifier::new(out_tx.clone()));
    let app = match App::open(settings, Arc::new(alarm_host), notifier) {
        Ok(app) => Arc::new(app),
        Err(e) => {
            error!("failed to start PageKeeper: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = app.reschedule_all() {
        warn!("could not restore reminders: {}", e);
    }

    let ready = Reply::Ready {
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    if let Ok(line) = serde_json::to_value(&ready) {
        let _ = out_tx.send(line);
    }

    let alarm_app = Arc::clone(&app);
    let alarm_loop = tokio::spawn(async move {
        while let Some(name) = fired_rx.recv().await {
            let outcome = alarm_app.on_alarm(&name);
            debug!("alarm {} -> {:?}", name, outcome);
        }
    });

    let mut requests = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let (id, command) = parse_request(&line);
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                let _ = out_tx.send(failure_line(&id, &e));
                continue;
            }
        };

        let app = Arc::clone(&app);
        let out = out_tx.clone();
        requests.spawn(async move {
            let emit_out = out.clone();
            let emit_id = id.clone();
            let emit = move |reply: Reply| {
                let _ = emit_out.send(reply_line(&emit_id, &reply));
            };
            let line = match handle_command(&app, command, emit).await {
                Ok(reply) => reply_line(&id, &reply),
                Err(e) => failure_line(&id, &e.to_string()),
            };
            let _ = out.send(line);
        });

        while let Some(joined) = requests.try_join_next() {
            if let Err(e) = joined {
                warn!("request task failed: {}", e);
            }
        }
    }

    info!("stdin closed, finishing {} pending requests", requests.len());
    while requests.join_next().await.is_some() {}
    alarm_loop.abort();
    let _ = alarm_loop.await;
    drop(app);
    drop(out_tx);
    let _ = writer.await;
}
