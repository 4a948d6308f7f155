use matchagen::{GenerationRequest, RecipeService};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_service_over_http_backend() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_body(Matcher::PartialJson(json!({
            "inputs": "items: mango, protein powder, matcha powder, coconut milk, honey",
            "parameters": {"max_new_tokens": 128, "skip_special_tokens": false}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "generated_text": "<pad> title: Mango Smoothie <section> ingredients: mango \
                    <sep> protein powder <section> directions: Blend mango with ice.</s>"
            }])
            .to_string(),
        )
        .create();

    let service = RecipeService::builder()
        .endpoint(server.url())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let request = GenerationRequest::new("Mango, Protein Powder", 0.9, 128).unwrap();
    let recipe = service.try_generate(&request).await.unwrap();

    assert!(recipe.starts_with("Title: Mango Matcha Latte\n"));
    assert!(recipe.contains("- Coconut milk\n"));
    mock.assert();
}

#[tokio::test]
async fn test_backend_error_surfaces_as_generation_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .with_status(503)
        .with_body("Model is loading")
        .create();

    let service = RecipeService::builder()
        .endpoint(server.url())
        .build()
        .unwrap();

    let request = GenerationRequest::new("mango", 0.9, 128).unwrap();
    let text = service.generate(&request).await;

    assert!(text.starts_with("Generation failed: "), "{text}");
    assert!(text.contains("Model is loading"), "{text}");
    mock.assert();
}
