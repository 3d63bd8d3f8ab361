pub mod chat;
pub mod menu;
pub mod order;
pub mod staging;

pub use chat::{ChatRole, ConversationTurn};
pub use menu::{Menu, MenuCategory, MenuError, MenuItem, PizzaSize};
pub use order::{
    AddressContext, InterpretationResult, OrderSummary, PricingConfig, SchemaError,
    StructuredOrder, StructuredOrderItem, SummaryLine, round_to_cents,
};
pub use staging::{CardOnFile, StagedOrder, StagingError, StagingPayload, stage};
