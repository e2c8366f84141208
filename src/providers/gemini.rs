use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::providers::AnalysisSource;
use crate::wallet::short_address;
use crate::wallet::types::{AnalysisResult, Language, ProviderError, TokenHolding};

const PROVIDER: &str = "Gemini";
/// Holdings beyond this are left out of the prompt
const PROMPT_HOLDINGS: usize = 10;

/// Client for Gemini's `generateContent` endpoint with JSON-constrained output
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.ai_timeout).build()?;

        Ok(Self {
            client,
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            temperature: 0.4,
        })
    }

    /// Call `generateContent` and return the text of the first candidate
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey(PROVIDER))?;
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let json: Value = response.json().await?;
        let text = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::InvalidResponse("No text in Gemini response".to_string())
            })?;

        Ok(text.to_string())
    }
}

#[async_trait]
impl AnalysisSource for GeminiClient {
    async fn analyze_holdings(
        &self,
        address: &str,
        holdings: &[TokenHolding],
        lang: Language,
    ) -> Result<AnalysisResult, ProviderError> {
        let prompt = build_prompt(address, holdings, lang);
        debug!("[AI] Prompt for {}:\n{}", short_address(address), prompt);

        let text = self.generate(&prompt).await?;
        let result = parse_analysis(&text)?;

        info!(
            "[AI] {} verdict for {}: {:?} / {:?} risk",
            self.model,
            short_address(address),
            result.sentiment,
            result.risk_level
        );
        Ok(result)
    }
}

/// Schema Gemini must follow; field names match [`AnalysisResult`]'s aliases
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": { "type": "STRING", "enum": ["Bullish", "Bearish", "Neutral"] },
            "summary": { "type": "STRING" },
            "riskLevel": { "type": "STRING", "enum": ["Low", "Medium", "High"] },
            "smartMoneyReasoning": { "type": "STRING" }
        },
        "required": ["sentiment", "summary", "riskLevel", "smartMoneyReasoning"],
        "propertyOrdering": ["sentiment", "summary", "riskLevel", "smartMoneyReasoning"]
    })
}

/// Build the analysis prompt from the top holdings
pub fn build_prompt(address: &str, holdings: &[TokenHolding], lang: Language) -> String {
    let token_summary = holdings
        .iter()
        .take(PROMPT_HOLDINGS)
        .map(|t| {
            let price = t
                .price_per_token
                .filter(|p| *p > 0.0)
                .map(|p| p.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            format!("{}: {} (Price: {})", t.symbol, t.balance, price)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze this Solana whale wallet: {}
Current Top Holdings:
{}

Tasks:
1. Determine if this is a "Smart Money" wallet based on the diversity and nature of assets.
2. Assess the risk level (Low/Medium/High).
3. Identify if the portfolio is biased towards Memecoins or Bluechips.
4. Provide a punchy summary for a professional crypto trader.

Constraint: {}"#,
        address,
        token_summary,
        lang.prompt_instruction()
    )
}

/// Parse the model's JSON answer
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, ProviderError> {
    let mut result: AnalysisResult = serde_json::from_str(text.trim())?;
    // Only locally built placeholders may carry the flag
    result.is_fallback = false;
    Ok(result)
}
