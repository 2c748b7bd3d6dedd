//! Rule context: post-trade projections derived once per evaluation.
//!
//! Every percentage here is computed on the state the account would be in
//! after the order fills, relative to current net liquidation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::account::{AccountState, Position};
use super::asset::{AssetClass, CONTRACT_MULTIPLIER, OptionContract};
use super::market_stats::MarketStats;
use super::order_intent::{OrderIntent, OrderSide};
use super::risk_config::{DrawdownBasis, RiskConfig};
use crate::domain::risk_management::errors::RiskError;

const HUNDRED: Decimal = dec!(100);

/// Derived facts shared by every rule.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    order: &'a OrderIntent,
    account: &'a AccountState,
    config: &'a RiskConfig,
    market_stats: Option<MarketStats>,

    order_price: Decimal,
    order_notional: Decimal,
    existing_quantity: Decimal,
    existing_value: Decimal,
    projected_symbol_value: Decimal,
    projected_symbol_pct: Decimal,
    projected_total_value: Decimal,
    projected_total_pct: Decimal,
    option_exposure_pct: Option<Decimal>,
    sector: Option<String>,
    sector_exposure_pct: Option<Decimal>,
    drawdown_pct: Option<Decimal>,
    post_trade_cash: Decimal,
    reduces_existing: bool,
    underlying_shares_held: Decimal,
    opening_contracts: Decimal,
    opening_strike_value: Decimal,
    bond_value: Decimal,
    collateral_available: Decimal,
}

impl<'a> RuleContext<'a> {
    /// Start building a context for an order.
    #[must_use]
    pub fn builder(order: &'a OrderIntent) -> RuleContextBuilder<'a> {
        RuleContextBuilder {
            order,
            account: None,
            positions: &[],
            config: None,
            market_stats: None,
        }
    }

    /// The order under evaluation.
    #[must_use]
    pub const fn order(&self) -> &OrderIntent {
        self.order
    }

    /// The account snapshot.
    #[must_use]
    pub const fn account(&self) -> &AccountState {
        self.account
    }

    /// Active limits.
    #[must_use]
    pub const fn config(&self) -> &RiskConfig {
        self.config
    }

    /// Market statistics for the order's symbol, if available.
    #[must_use]
    pub const fn market_stats(&self) -> Option<MarketStats> {
        self.market_stats
    }

    /// Price used to value the order.
    #[must_use]
    pub const fn order_price(&self) -> Decimal {
        self.order_price
    }

    /// Absolute order notional (price × quantity × multiplier).
    #[must_use]
    pub const fn order_notional(&self) -> Decimal {
        self.order_notional
    }

    /// Signed quantity already held in the order's symbol.
    #[must_use]
    pub const fn existing_quantity(&self) -> Decimal {
        self.existing_quantity
    }

    /// Signed market value already held in the order's symbol.
    #[must_use]
    pub const fn existing_value(&self) -> Decimal {
        self.existing_value
    }

    /// Signed post-trade value for the order's symbol.
    #[must_use]
    pub const fn projected_symbol_value(&self) -> Decimal {
        self.projected_symbol_value
    }

    /// Post-trade single-symbol exposure, % of net liquidation.
    #[must_use]
    pub const fn projected_symbol_pct(&self) -> Decimal {
        self.projected_symbol_pct
    }

    /// Post-trade gross exposure across all positions.
    #[must_use]
    pub const fn projected_total_value(&self) -> Decimal {
        self.projected_total_value
    }

    /// Post-trade gross exposure, % of net liquidation.
    #[must_use]
    pub const fn projected_total_pct(&self) -> Decimal {
        self.projected_total_pct
    }

    /// Post-trade option market value, % of net liquidation.
    ///
    /// `None` when neither the order nor the holdings involve options.
    #[must_use]
    pub const fn option_exposure_pct(&self) -> Option<Decimal> {
        self.option_exposure_pct
    }

    /// Sector of the order's symbol, if known.
    #[must_use]
    pub fn sector(&self) -> Option<&str> {
        self.sector.as_deref()
    }

    /// Post-trade sector exposure, % of net liquidation.
    #[must_use]
    pub const fn sector_exposure_pct(&self) -> Option<Decimal> {
        self.sector_exposure_pct
    }

    /// Drawdown of the existing position, if there is one.
    #[must_use]
    pub const fn drawdown_pct(&self) -> Option<Decimal> {
        self.drawdown_pct
    }

    /// Cash after the order settles.
    #[must_use]
    pub const fn post_trade_cash(&self) -> Decimal {
        self.post_trade_cash
    }

    /// Whether borrowing is permitted (config allows it and the account is approved).
    #[must_use]
    pub const fn margin_permitted(&self) -> bool {
        self.config.allow_margin && self.account.margin_enabled
    }

    /// Whether the order reduces or closes the existing position.
    #[must_use]
    pub const fn reduces_existing(&self) -> bool {
        self.reduces_existing
    }

    /// Long shares of the option's underlying.
    #[must_use]
    pub const fn underlying_shares_held(&self) -> Decimal {
        self.underlying_shares_held
    }

    /// Contracts this order opens beyond closing existing longs.
    #[must_use]
    pub const fn opening_contracts(&self) -> Decimal {
        self.opening_contracts
    }

    /// Strike value of the opening contracts (strike × contracts × multiplier).
    #[must_use]
    pub const fn opening_strike_value(&self) -> Decimal {
        self.opening_strike_value
    }

    /// Market value of collateral bond holdings.
    #[must_use]
    pub const fn bond_value(&self) -> Decimal {
        self.bond_value
    }

    /// Cash plus discounted bond value.
    #[must_use]
    pub const fn collateral_available(&self) -> Decimal {
        self.collateral_available
    }

    /// Option terms of the order, if it is an option order.
    #[must_use]
    pub fn order_option(&self) -> Option<&OptionContract> {
        match self.order.asset_class {
            AssetClass::Option => self.order.option.as_ref(),
            AssetClass::Equity => None,
        }
    }
}

/// Builder for [`RuleContext`].
#[derive(Debug)]
pub struct RuleContextBuilder<'a> {
    order: &'a OrderIntent,
    account: Option<&'a AccountState>,
    positions: &'a [Position],
    config: Option<&'a RiskConfig>,
    market_stats: Option<MarketStats>,
}

impl<'a> RuleContextBuilder<'a> {
    /// Set the account snapshot.
    #[must_use]
    pub const fn account(mut self, account: &'a AccountState) -> Self {
        self.account = Some(account);
        self
    }

    /// Set the held positions.
    #[must_use]
    pub const fn positions(mut self, positions: &'a [Position]) -> Self {
        self.positions = positions;
        self
    }

    /// Set the risk configuration.
    #[must_use]
    pub const fn config(mut self, config: &'a RiskConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set market statistics (optional).
    #[must_use]
    pub const fn market_stats(mut self, stats: Option<MarketStats>) -> Self {
        self.market_stats = stats;
        self
    }

    /// Compute all derived figures.
    ///
    /// # Errors
    ///
    /// - `RiskError::Configuration` when config or account is missing, net
    ///   liquidation is not positive, or the snapshot is inconsistent.
    /// - `RiskError::InvalidOrder` when the order is malformed or cannot be valued.
    pub fn build(self) -> Result<RuleContext<'a>, RiskError> {
        let config = self
            .config
            .ok_or_else(|| RiskError::configuration("config", "risk configuration is required"))?;
        let account = self
            .account
            .ok_or_else(|| RiskError::configuration("account", "account snapshot is required"))?;
        let order = self.order;
        let positions = self.positions;

        order.validate()?;
        check_account(account)?;

        let nl = account.net_liquidation;
        let existing = positions.iter().find(|p| p.symbol == order.symbol);

        let order_price = order
            .explicit_price()
            .or_else(|| existing.and_then(Position::mark_price))
            .ok_or_else(|| {
                RiskError::invalid_order(
                    "reference_price",
                    "no limit, stop or reference price and no held position to value the order",
                )
            })?;

        let order_notional = order
            .quantity
            .checked_mul(order.asset_class.multiplier())
            .and_then(|units| units.checked_mul(order_price))
            .ok_or_else(|| RiskError::invalid_order("quantity", "order notional overflows"))?;
        let signed_notional = order.side.sign() * order_notional;

        let existing_quantity = existing.map_or(Decimal::ZERO, |p| p.quantity);
        let existing_value = existing.map_or(Decimal::ZERO, Position::signed_value);
        let projected_symbol_value = add(existing_value, signed_notional)?;
        let projected_symbol_gross = projected_symbol_value.abs();

        let others = move || positions.iter().filter(move |p| p.symbol != order.symbol);

        let projected_total_value = add(sum_gross(others())?, projected_symbol_gross)?;

        let options_involved = order.asset_class == AssetClass::Option
            || positions.iter().any(|p| p.asset_class == AssetClass::Option);
        let option_exposure_pct = if options_involved {
            let held = sum_gross(others().filter(|p| p.asset_class == AssetClass::Option))?;
            let own = if order.asset_class == AssetClass::Option {
                projected_symbol_gross
            } else {
                Decimal::ZERO
            };
            Some(pct_of(add(held, own)?, nl)?)
        } else {
            None
        };

        let sector = order
            .sector
            .clone()
            .or_else(|| existing.and_then(|p| p.sector.clone()));
        let sector_exposure_pct = match &sector {
            Some(name) => {
                let held = sum_gross(others().filter(|p| p.sector.as_deref() == Some(name)))?;
                Some(pct_of(add(held, projected_symbol_gross)?, nl)?)
            }
            None => None,
        };

        let drawdown_pct = existing
            .map(|p| drawdown_of(p, config.drawdown_basis))
            .transpose()?
            .flatten();

        let reduces_existing = reduces(order.side, order.quantity, existing_quantity);

        let post_trade_cash = account
            .total_cash
            .checked_sub(signed_notional)
            .ok_or_else(|| RiskError::invalid_order("quantity", "order notional overflows"))?;

        let (underlying_shares_held, opening_contracts, opening_strike_value) = match order.option.as_ref() {
            Some(contract) if order.asset_class == AssetClass::Option => {
                let shares: Decimal = positions
                    .iter()
                    .filter(|p| p.asset_class == AssetClass::Equity && p.symbol == contract.underlying)
                    .map(|p| p.quantity)
                    .sum();
                let long_contracts: Decimal = positions
                    .iter()
                    .filter(|p| p.is_long() && holds_contract(p, &order.symbol, contract))
                    .map(|p| p.quantity)
                    .sum();
                let opening = (order.quantity - long_contracts).max(Decimal::ZERO);
                let strike_value = contract
                    .strike
                    .checked_mul(opening)
                    .and_then(|v| v.checked_mul(CONTRACT_MULTIPLIER))
                    .ok_or_else(|| {
                        RiskError::invalid_order("option.strike", "strike value of the order overflows")
                    })?;
                (shares.max(Decimal::ZERO), opening, strike_value)
            }
            _ => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        let bond_value = sum_gross(positions.iter().filter(|p| {
            p.asset_class == AssetClass::Equity && p.is_long() && config.is_collateral_bond(&p.symbol)
        }))?;
        let discounted_bonds = bond_value
            .checked_mul(config.bond_collateral_pct)
            .and_then(|v| v.checked_div(HUNDRED))
            .ok_or_else(|| RiskError::configuration("account.positions", "bond value overflows"))?;
        let collateral_available = add(account.total_cash, discounted_bonds)?;

        Ok(RuleContext {
            order,
            account,
            config,
            market_stats: self.market_stats,
            order_price,
            order_notional,
            existing_quantity,
            existing_value,
            projected_symbol_value,
            projected_symbol_pct: pct_of(projected_symbol_gross, nl)?,
            projected_total_value,
            projected_total_pct: pct_of(projected_total_value, nl)?,
            option_exposure_pct,
            sector,
            sector_exposure_pct,
            drawdown_pct,
            post_trade_cash,
            reduces_existing,
            underlying_shares_held,
            opening_contracts,
            opening_strike_value,
            bond_value,
            collateral_available,
        })
    }
}

fn check_account(account: &AccountState) -> Result<(), RiskError> {
    if account.net_liquidation <= Decimal::ZERO {
        return Err(RiskError::configuration(
            "account.net_liquidation",
            format!(
                "must be positive to compute exposure percentages, got {}",
                account.net_liquidation
            ),
        ));
    }
    if !account.margin_enabled && account.margin_used > account.net_liquidation {
        return Err(RiskError::configuration(
            "account.margin_used",
            format!(
                "margin used {} exceeds net liquidation {} on a non-margin account",
                account.margin_used, account.net_liquidation
            ),
        ));
    }
    Ok(())
}

/// Opposite side and no larger than the existing absolute quantity.
fn reduces(side: OrderSide, quantity: Decimal, existing: Decimal) -> bool {
    if existing.is_zero() {
        return false;
    }
    let existing_side = if existing > Decimal::ZERO {
        OrderSide::Buy
    } else {
        OrderSide::Sell
    };
    side == existing_side.opposite() && quantity <= existing.abs()
}

fn holds_contract(position: &Position, symbol: &str, contract: &OptionContract) -> bool {
    position.asset_class == AssetClass::Option
        && (position.symbol == symbol
            || position
                .option
                .as_ref()
                .is_some_and(|held| held.same_contract(contract)))
}

fn drawdown_of(position: &Position, basis: DrawdownBasis) -> Result<Option<Decimal>, RiskError> {
    let cost_basis = position.cost_basis();
    if cost_basis.is_zero() {
        return Ok(None);
    }
    let mut loss = (-position.unrealized_pnl).max(Decimal::ZERO);
    if basis == DrawdownBasis::UnrealizedAndRealized {
        loss = add(loss, (-position.realized_pnl).max(Decimal::ZERO))?;
    }
    pct_of(loss, cost_basis).map(Some)
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, RiskError> {
    a.checked_add(b)
        .ok_or_else(|| RiskError::configuration("account.positions", "exposure total overflows"))
}

fn sum_gross<'p>(mut positions: impl Iterator<Item = &'p Position>) -> Result<Decimal, RiskError> {
    positions.try_fold(Decimal::ZERO, |acc, p| add(acc, p.gross_value()))
}

/// `value` as a percentage of `base`. `base` must be positive.
fn pct_of(value: Decimal, base: Decimal) -> Result<Decimal, RiskError> {
    value
        .checked_mul(HUNDRED)
        .and_then(|v| v.checked_div(base))
        .ok_or_else(|| {
            RiskError::configuration(
                "account.net_liquidation",
                format!("cannot express {value} as a percentage of {base}"),
            )
        })
}
