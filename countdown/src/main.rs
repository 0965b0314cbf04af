//! Countdown demo binary
//!
//! Usage: `countdown [DEADLINE]`. Without an argument the deadline is five
//! seconds from now. Prints the countdown once per tick until it expires.

use countdown::{CountdownConfig, CountdownEngine, CountdownEnvironment, Deadline};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> countdown::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "countdown=info,countdown_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let deadline = match std::env::args().nth(1) {
        Some(input) => Deadline::parse(&input)?,
        None => Deadline::new(chrono::Utc::now() + chrono::Duration::seconds(5)),
    };
    let config = CountdownConfig::from_env();

    let expired = Arc::new(Notify::new());
    let notify = Arc::clone(&expired);
    let env = CountdownEnvironment::system().with_on_expire(move || notify.notify_one());

    println!("Counting down to {deadline}");
    let engine = CountdownEngine::start(deadline, config, env).await?;

    let mut interval = tokio::time::interval(config.tick_interval);
    loop {
        tokio::select! {
            () = expired.notified() => break,
            _ = interval.tick() => println!("{}", engine.formatted().await),
        }
    }

    println!("{}", engine.formatted().await);
    engine.dispose();
    Ok(())
}
