use crate::config::ModelConfig;
use crate::generators::{DecodingParams, TextGenerator};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::time::Duration;

/// Talks to a text-generation-inference style server hosting the model.
pub struct HttpGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    temperature: f32,
    max_new_tokens: u32,
    min_new_tokens: u32,
    do_sample: bool,
    top_k: u32,
    top_p: f32,
    repetition_penalty: f32,
    no_repeat_ngram_size: u32,
    num_return_sequences: u32,
    // control tokens carry the section structure
    skip_special_tokens: bool,
    details: bool,
}

impl From<&DecodingParams> for Parameters {
    fn from(params: &DecodingParams) -> Self {
        Self {
            temperature: params.temperature,
            max_new_tokens: params.max_length,
            min_new_tokens: params.min_length,
            do_sample: params.do_sample,
            top_k: params.top_k,
            top_p: params.top_p,
            repetition_penalty: params.repetition_penalty,
            no_repeat_ngram_size: params.no_repeat_ngram_size,
            num_return_sequences: params.num_return_sequences,
            skip_special_tokens: false,
            details: false,
        }
    }
}

impl HttpGenerator {
    /// Create a new generator from configuration
    pub fn new(config: &ModelConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let base_url = config
            .endpoint
            .clone()
            .ok_or("model endpoint not configured")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(HttpGenerator {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: Option<String>) -> Self {
        HttpGenerator {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

/// Pull the generated text out of either response shape the server uses.
fn extract_generated_text(body: &Value) -> Result<String, Box<dyn Error + Send + Sync>> {
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Err(format!("inference server error: {}", message).into());
    }

    let text = body["generated_text"]
        .as_str()
        .or_else(|| body[0]["generated_text"].as_str())
        .ok_or("Failed to extract generated_text from response")?;

    Ok(text.to_string())
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    fn generator_name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        input: &str,
        params: &DecodingParams,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let mut request = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&GenerateBody {
                inputs: input,
                parameters: Parameters::from(params),
            });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(format!("inference server returned {}: {}", status, text.trim()).into());
        }

        let body: Value = serde_json::from_str(&text)?;
        debug!("{:?}", body);
        extract_generated_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_generate_sends_inputs_and_parameters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/generate")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "items: mango, matcha powder",
                "parameters": {
                    "temperature": 0.5,
                    "max_new_tokens": 256,
                    "min_new_tokens": 60,
                    "do_sample": true,
                    "top_k": 50,
                    "no_repeat_ngram_size": 2,
                    "num_return_sequences": 1,
                    "skip_special_tokens": false
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"generated_text": "<pad> title: mango latte</s>"}"#)
            .create();

        let generator = HttpGenerator::with_base_url(server.url(), Some("secret".to_string()));
        let params = DecodingParams {
            temperature: 0.5,
            ..DecodingParams::default()
        };

        let result = generator
            .generate("items: mango, matcha powder", &params)
            .await
            .unwrap();
        assert_eq!(result, "<pad> title: mango latte</s>");
        mock.assert();
    }

    #[tokio::test]
    async fn test_generate_accepts_list_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text": "title: a <section> ingredients: b"}]"#)
            .create();

        let generator = HttpGenerator::with_base_url(server.url(), None);
        let result = generator
            .generate("items: b", &DecodingParams::default())
            .await
            .unwrap();
        assert_eq!(result, "title: a <section> ingredients: b");
        mock.assert();
    }

    #[tokio::test]
    async fn test_generate_server_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/generate")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "CUDA out of memory"}"#)
            .create();

        let generator = HttpGenerator::with_base_url(server.url(), None);
        let err = generator
            .generate("items: mango", &DecodingParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
        mock.assert();
    }

    #[test]
    fn test_error_field_in_successful_response() {
        let err = extract_generated_text(&json!({"error": "Model is overloaded"})).unwrap_err();
        assert!(err.to_string().contains("Model is overloaded"));
        assert!(extract_generated_text(&json!({"text": "x"})).is_err());
    }

    #[test]
    fn test_new_requires_endpoint() {
        assert!(HttpGenerator::new(&ModelConfig::default()).is_err());

        let config = ModelConfig {
            endpoint: Some("http://localhost:8080/".to_string()),
            ..ModelConfig::default()
        };
        let generator = HttpGenerator::new(&config).unwrap();
        assert_eq!(generator.base_url, "http://localhost:8080");
        assert_eq!(generator.generator_name(), "http");
    }
}
