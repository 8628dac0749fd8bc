//! Number-guessing fulfillment served over the axum gateway.
//!
//! Run with `cargo run --example number_genie`, then post turns:
//!
//! ```sh
//! curl -s localhost:8080/fulfillment \
//!   -d '{"result":{"action":"start_game"}}' | jq .
//! curl -s localhost:8080/fulfillment \
//!   -d '{"result":{"action":"check_guess","parameters":{"guess":"50"},
//!        "contexts":[<reserved context from the previous reply>]}}' | jq .
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use voxhook::{AdapterConfig, HandlerTable, ProtocolAdapter, gateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let mut table = HandlerTable::new();

    table.insert_fn("start_game", |conv| {
        // Not actually random so the demo is reproducible.
        conv.data_mut().insert("answer".into(), json!(42));
        conv.ask("I'm thinking of a number from 1 to 100. What's your guess?")
    });

    table.insert_fn("check_guess", |conv| {
        let answer = conv
            .data()
            .get("answer")
            .and_then(|v| v.as_i64())
            .unwrap_or(42);
        let guess: i64 = conv
            .parameter("guess")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(-1);
        match guess.cmp(&answer) {
            std::cmp::Ordering::Less => conv.ask("Higher!"),
            std::cmp::Ordering::Greater => conv.ask("Lower!"),
            std::cmp::Ordering::Equal => conv.tell("You got it!"),
        }
    });

    table.insert_fn("quit", |conv| conv.tell("Come back soon."));
    table.redirect("give_up", "quit");

    let adapter = Arc::new(ProtocolAdapter::new(AdapterConfig::default()));
    let addr: SocketAddr = "127.0.0.1:8080".parse()?;
    gateway::serve(addr, adapter, Arc::new(table)).await
}
