//! Generate a recipe through an inference server
//!
//! Usage:
//! ```bash
//! MATCHAGEN_ENDPOINT=http://localhost:8080 cargo run --example service_builder -- "mango, honey"
//! ```

use matchagen::{GenerationRequest, RecipeService};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let endpoint =
        std::env::var("MATCHAGEN_ENDPOINT").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let inspiration = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "strawberries, vanilla".to_string());

    let service = RecipeService::builder()
        .endpoint(endpoint)
        .timeout(Duration::from_secs(30))
        .build()?;

    for temperature in [0.7, 1.2] {
        let request = GenerationRequest::new(inspiration.as_str(), temperature, 256)?;
        println!("=== temperature {} ===", temperature);
        println!("{}\n", service.generate(&request).await);
    }

    Ok(())
}
