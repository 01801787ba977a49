//! Transport adapter: the `/score` request/response contract over stdio.
//!
//! Each input line is one request body (`{"transcript": "..."}`); each output
//! line is an envelope `{"status": <u16>, "body": <object>}` where `body` is
//! either an evaluation report or `{"error": "..."}`.

use crate::analyzer::ScoringEngine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::panic::{self, AssertUnwindSafe};

const LOG_TARGET: &str = "server";

/// Body returned when the engine hits a defect
pub const INTERNAL_FAILURE: &str = "internal scoring failure";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// One response: an HTTP-style status plus a JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        log::warn!(target: LOG_TARGET, "rejected request: {}", message);
        Self::error(STATUS_BAD_REQUEST, message)
    }
}

/// Handle a single raw request body and return a response.
/// Extracted from `run_stdio_server` for testability.
pub fn handle_request(engine: &ScoringEngine, body: &str) -> Response {
    let payload: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return Response::bad_request(format!("Invalid JSON body: {}", e)),
    };

    let Some(fields) = payload.as_object() else {
        return Response::bad_request("Request body must be a JSON object");
    };

    let transcript = match fields.get("transcript") {
        Some(Value::String(text)) => text,
        Some(_) => return Response::bad_request("Field 'transcript' must be a string"),
        None => return Response::bad_request("No transcript provided"),
    };

    match panic::catch_unwind(AssertUnwindSafe(|| engine.evaluate(transcript))) {
        Ok(Ok(report)) => match serde_json::to_value(&report) {
            Ok(body) => Response::ok(body),
            Err(e) => {
                log::error!(target: LOG_TARGET, "failed to serialize report: {}", e);
                Response::error(STATUS_INTERNAL_ERROR, INTERNAL_FAILURE)
            }
        },
        Ok(Err(e)) if e.is_user_error() => Response::bad_request(e.message()),
        Ok(Err(e)) => {
            log::error!(target: LOG_TARGET, "scoring failed: {}", e);
            Response::error(STATUS_INTERNAL_ERROR, INTERNAL_FAILURE)
        }
        Err(cause) => {
            let detail = cause
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| cause.downcast_ref::<&str>().copied())
                .unwrap_or("unknown panic");
            log::error!(target: LOG_TARGET, "scoring defect: {}", detail);
            Response::error(STATUS_INTERNAL_ERROR, INTERNAL_FAILURE)
        }
    }
}

/// Serve requests line by line until EOF. Returns the number of requests handled.
pub fn serve<R: BufRead, W: Write>(
    engine: &ScoringEngine,
    reader: R,
    mut writer: W,
) -> anyhow::Result<usize> {
    let mut handled = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_request(engine, &line);
        writeln!(writer, "{}", serde_json::to_string(&response)?)?;
        writer.flush()?;
        handled += 1;
    }
    Ok(handled)
}

/// Run the scoring service loop (stdin / stdout).
pub fn run_stdio_server(engine: &ScoringEngine) -> anyhow::Result<()> {
    log::info!(
        target: LOG_TARGET,
        "serving on stdio with criteria: {}",
        engine.registry().names().join(", ")
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let handled = serve(engine, BufReader::new(stdin.lock()), stdout.lock())?;

    if let Some(stats) = engine.cache_stats() {
        log::info!(
            target: LOG_TARGET,
            "cache: {} hits, {} misses",
            stats.hits,
            stats.misses
        );
    }
    log::info!(target: LOG_TARGET, "stdin closed after {} requests", handled);
    Ok(())
}
