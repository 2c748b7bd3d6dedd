//! Risk Management Value Objects

mod account;
mod asset;
mod finding;
mod market_stats;
mod order_intent;
mod risk_config;
mod rule_context;
mod verdict;

pub use account::{AccountState, Position};
pub use asset::{AssetClass, CONTRACT_MULTIPLIER, OptionContract, OptionRight};
pub use finding::{Finding, RuleId, Severity};
pub use market_stats::MarketStats;
pub use order_intent::{OrderIntent, OrderKind, OrderSide};
pub use risk_config::{DrawdownBasis, RiskConfig};
pub use rule_context::{RuleContext, RuleContextBuilder};
pub use verdict::{Outcome, Verdict};
