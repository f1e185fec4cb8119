//! Print what a Rocker server reports about itself.
//!
//! ```sh
//! export ROCKER_BASE_URI='https://rocker.example.com/api'
//! # optional, to also fetch the current user
//! export ROCKER_USER='me@example.com' ROCKER_PASSWORD='...'
//! RUST_LOG=rocker_client=debug cargo run --bin rocker-probe
//! ```

use rocker_api::RockerApi;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api = RockerApi::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        eprintln!("  Set ROCKER_BASE_URI to the server's API root, e.g.");
        eprintln!("  export ROCKER_BASE_URI='https://rocker.example.com/api'");
        std::process::exit(1);
    });

    println!("Probing {}\n", api.base_uri());

    match api.server_version().await {
        Ok(version) => println!("  Server version: {version}"),
        Err(e) => {
            eprintln!("  Failed to get server version: {e}");
            std::process::exit(1);
        }
    }

    match api.available_operations().await {
        Ok(operations) => {
            let pretty = serde_json::to_string_pretty(&operations)
                .unwrap_or_else(|_| operations.to_string());
            println!("  Operations:\n{pretty}");
        }
        Err(e) => eprintln!("  Failed to list operations: {e}"),
    }

    if let Some(user) = api.inner().user() {
        match api.me().await {
            Ok(me) => println!("  Signed in as {user}: {me}"),
            Err(e) => eprintln!("  Failed to get current user {user}: {e}"),
        }
    }
}
