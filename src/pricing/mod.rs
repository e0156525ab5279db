//! Limit price and order quantity computation.
//!
//! All values are truncated, never rounded: the order must never spend more
//! than the requested fiat amount.

use crate::config::AppConfig;
use crate::{OrderError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fractional digits of the submitted price
pub const PRICE_DECIMALS: u32 = 2;
/// Fractional digits of the submitted quantity
pub const AMOUNT_DECIMALS: u32 = 6;

/// Truncate `value` to `decimals` fractional digits (floor), keeping exactly
/// that many digits in its string form
pub fn floor_to(value: Decimal, decimals: u32) -> Result<Decimal> {
    let factor = Decimal::from(10u64.pow(decimals));
    let mut floored = value
        .checked_mul(factor)
        .ok_or_else(|| OrderError::InvalidPrice(format!("{} overflows at {} decimals", value, decimals)))?
        .floor()
        / factor;
    floored.rescale(decimals);
    Ok(floored)
}

/// A computed limit price together with its wire representation
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub price: Decimal,
    pub amount: Decimal,
}

impl Quote {
    pub fn price_string(&self) -> String {
        self.price.to_string()
    }

    pub fn amount_string(&self) -> String {
        self.amount.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct PriceCalculator {
    maker_undercut: Decimal,
    fee_ratio: Decimal,
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self {
            maker_undercut: dec!(0.20),
            fee_ratio: dec!(0.999),
        }
    }
}

impl PriceCalculator {
    pub fn new(maker_undercut: Decimal, fee_ratio: Decimal) -> Self {
        Self {
            maker_undercut,
            fee_ratio,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.maker_undercut, config.fee_ratio)
    }

    /// Limit price for a buy. Makers undercut the ask, takers pay it.
    pub fn compute_price(&self, ask: Decimal, is_maker: bool) -> Result<Decimal> {
        if ask <= Decimal::ZERO {
            return Err(OrderError::InvalidPrice(format!("ask {} is not positive", ask)));
        }

        let raw = if is_maker { ask - self.maker_undercut } else { ask };
        let price = floor_to(raw, PRICE_DECIMALS)?;

        if price <= Decimal::ZERO {
            return Err(OrderError::InvalidPrice(format!(
                "limit price {} derived from ask {} is not positive",
                price, ask
            )));
        }

        Ok(price)
    }

    /// Quantity of the base currency bought with `fiat_amount` at `price`
    pub fn compute_amount(
        &self,
        fiat_amount: Decimal,
        price: Decimal,
        include_fees: bool,
    ) -> Result<Decimal> {
        if price <= Decimal::ZERO {
            return Err(OrderError::InvalidPrice(format!("price {} is not positive", price)));
        }

        let ratio = self.fee_ratio(include_fees);
        let spendable = fiat_amount
            .checked_mul(ratio)
            .ok_or_else(|| OrderError::InvalidPrice(format!("{} x {} overflows", fiat_amount, ratio)))?;
        let amount = spendable
            .checked_div(price)
            .ok_or_else(|| OrderError::InvalidPrice(format!("{} / {} overflows", spendable, price)))?;

        floor_to(amount, AMOUNT_DECIMALS)
    }

    pub fn fee_ratio(&self, include_fees: bool) -> Decimal {
        if include_fees {
            self.fee_ratio
        } else {
            Decimal::ONE
        }
    }

    /// Price and amount in one go
    pub fn quote(
        &self,
        ask: Decimal,
        fiat_amount: Decimal,
        is_maker: bool,
        include_fees: bool,
    ) -> Result<Quote> {
        let price = self.compute_price(ask, is_maker)?;
        let amount = self.compute_amount(fiat_amount, price, include_fees)?;
        Ok(Quote { price, amount })
    }
}
