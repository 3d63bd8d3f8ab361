//! Order interpretation for Outta Sight Pizza: grounded prompting, the
//! Gemini client, and the deterministic fallback tier.

pub mod fallback;
pub mod gemini;
pub mod interpreter;
pub mod model;
pub mod prompt;

pub use fallback::fallback_response;
pub use gemini::{DEFAULT_MODEL, GeminiClient};
pub use interpreter::{InterpretOutcome, OrderInterpreter, ServiceSignal};
pub use model::{GenerationConfig, GenerativeModel, ModelError};
pub use prompt::build_prompt;
