//! The generative-model seam.
//!
//! The interpreter only needs text in, text out. Hiding the provider behind
//! a trait keeps it swappable and lets tests script replies without a
//! network.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("model response contained no candidates")]
    NoCandidates,
}

/// Sampling controls for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    /// Low temperature and a tight output ceiling: order-taking wants
    /// deterministic JSON, not creative prose.
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 1024,
        }
    }
}

/// A text-completing model the interpreter can call.
///
/// One attempt per turn, no retries; the caller falls back on any error.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a completion for a fully-assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Provider-facing model identifier, for logs.
    fn model_name(&self) -> &str;
}
