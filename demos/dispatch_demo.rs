//! Example: dispatching to every reference user
//!
//! Seeds the in-memory user store with the reference users, wires the
//! built-in backends from `NOTIFY_*` environment variables and sends one
//! message to each user, printing the outcome.
//!
//! ```text
//! RUST_LOG=debug NOTIFY_SMS_FAILURE_RATE=0.5 cargo run --example dispatch_demo
//! ```

use notifyhub::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("=== Notifyhub Dispatch Example ===\n");

    let config = NotifyConfig::from_env()?;
    let users = fixtures::demo_users();
    let notifications = Arc::new(InMemoryNotificationStore::new());
    let dispatcher = Dispatcher::from_config(
        &config,
        Arc::new(InMemoryUserStore::with_users(users.clone())),
        notifications.clone(),
    )?;

    println!(
        "Fallback order: {:?}\n",
        dispatcher.selector().fallback_order().channels()
    );

    for user in &users {
        let request = DispatchRequest::new(&user.id, "Your weekly summary is ready")
            .with_metadata("subject", "Weekly summary")
            .with_metadata("title", "Summary")
            .with_metadata("priority", "high");

        match dispatcher.execute(request).await {
            Ok(outcome) => {
                println!("✅ {} -> {} ({})", user.id, outcome.channel, outcome.status);
                println!("   {}", serde_json::to_string(&outcome)?);
            }
            Err(NotifyError::Send(failure)) => {
                println!("❌ {} -> send failed: {}", user.id, failure);
            }
            Err(e) if e.is_internal() => {
                println!("💥 {} -> server error: {}", user.id, e);
            }
            Err(e) => {
                println!("⚠️  {} -> {}", user.id, e);
            }
        }
    }

    println!("\n=== Notification history ===");
    for record in notifications.all().await {
        println!(
            "{} user={} channel={} status={} at={}",
            record.id(),
            record.user_id(),
            record.channel(),
            record.status(),
            record.sent_at().to_rfc3339()
        );
    }

    Ok(())
}
