mod chat;
mod display;

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use outtasight_ai::{GeminiClient, GenerativeModel, OrderInterpreter, ServiceSignal};
use outtasight_core::menu::Menu;
use outtasight_core::order::{AddressContext, PricingConfig};

const MODEL_TIMEOUT_SECS: u64 = 30;

#[derive(Parser)]
#[command(name = "outtasight", version, about = "Natural-language ordering for Outta Sight Pizza")]
struct Cli {
    /// Gemini API key. Without one, interpretation runs on keyword
    /// matching alone.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Gemini model id.
    #[arg(long, env = "GEMINI_MODEL", default_value = outtasight_ai::DEFAULT_MODEL, global = true)]
    model: String,

    /// Sales-tax rate applied by the fallback interpreter.
    #[arg(long, default_value_t = 0.08875, global = true)]
    tax_rate: f64,

    /// Flat delivery fee; omitted from totals when unset.
    #[arg(long, global = true)]
    fees: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct AddressArgs {
    /// Customer name for the staging payload.
    #[arg(long)]
    name: Option<String>,
    /// Street address; without it the prompt says so explicitly.
    #[arg(long)]
    line1: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
}

impl From<AddressArgs> for AddressContext {
    fn from(args: AddressArgs) -> Self {
        Self {
            name: args.name,
            line1: args.line1,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the menu exactly as the model sees it.
    Menu,
    /// Interpret one utterance and print the result JSON.
    Interpret {
        utterance: String,
        #[command(flatten)]
        address: AddressArgs,
    },
    /// Interactive ordering chat ending in confirm-and-stage.
    Chat {
        #[command(flatten)]
        address: AddressArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("outtasight v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let menu = Arc::new(Menu::house());
    let pricing = PricingConfig {
        tax_rate: cli.tax_rate,
        fees: cli.fees,
    };
    let model = build_model(&cli);
    let interpreter = OrderInterpreter::new(menu.clone(), model).with_pricing(pricing);

    match cli.command {
        Command::Menu => {
            println!("{}", menu.render_for_prompt());
        }
        Command::Interpret { utterance, address } => {
            let outcome = interpreter
                .interpret(&utterance, &[], &address.into())
                .await;
            if outcome.signal == ServiceSignal::Degraded {
                tracing::warn!("no Gemini credential configured; deterministic fallback answered");
            }
            println!("{}", serde_json::to_string_pretty(&outcome.response)?);
        }
        Command::Chat { address } => {
            chat::run(&interpreter, &pricing, address.into()).await?;
        }
    }

    Ok(())
}

/// Build the Gemini client when a credential is present.
///
/// `--api-key` / `GEMINI_API_KEY` wins; `GOOGLE_API_KEY` is honoured as a
/// secondary source. Empty values count as absent.
fn build_model(cli: &Cli) -> Option<Arc<dyn GenerativeModel>> {
    let api_key = cli
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .or_else(|| std::env::var("GOOGLE_API_KEY").ok().filter(|key| !key.is_empty()))?;

    let client = GeminiClient::with_model(api_key, cli.model.clone())
        .with_timeout(Duration::from_secs(MODEL_TIMEOUT_SECS));
    Some(Arc::new(client))
}
