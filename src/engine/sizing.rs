//! # engine::sizing
//!
//! Pure position-sizing math: lot size from risk, margin from lot size, and
//! the range checks the driver applies to raw inputs before calling either.
//!
//! Nothing here touches I/O, so every function is unit-tested directly.

use tracing::debug;

use crate::error::{
    CalcError, BALANCE_NOT_POSITIVE, DIVISION_BY_ZERO, LEVERAGE_NOT_POSITIVE,
    PRICE_NOT_POSITIVE, RISK_OUT_OF_RANGE, STOP_LOSS_NOT_POSITIVE,
};

// ─── Formulas ─────────────────────────────────────────────────────────────────

/// `(balance * risk) / (stop_loss_pips * pip_value)`
///
/// Callers validate the inputs first.  A zero denominator is still reported
/// as [`CalcError::Unexpected`] rather than returning an infinite lot size.
pub fn calculate_lot_size(
    account_balance: f64,
    risk_per_trade: f64,
    stop_loss_pips: f64,
    pip_value: f64,
) -> Result<f64, CalcError> {
    let risk_amount = account_balance * risk_per_trade;
    let lot_size = checked_div(risk_amount, stop_loss_pips * pip_value)?;
    debug!(risk_amount, stop_loss_pips, pip_value, lot_size, "lot size computed");
    Ok(lot_size)
}

/// `(lot_size * contract_size * current_price) / leverage`
pub fn calculate_margin_required(
    lot_size: f64,
    contract_size: f64,
    current_price: f64,
    leverage: f64,
) -> Result<f64, CalcError> {
    let notional = lot_size * contract_size * current_price;
    let margin = checked_div(notional, leverage)?;
    debug!(notional, leverage, margin, "margin computed");
    Ok(margin)
}

fn checked_div(numerator: f64, denominator: f64) -> Result<f64, CalcError> {
    if denominator == 0.0 {
        return Err(CalcError::Unexpected(DIVISION_BY_ZERO.to_string()));
    }
    Ok(numerator / denominator)
}

// ─── Input Validation ─────────────────────────────────────────────────────────

// NaN fails every comparison below, so it is rejected along with the
// out-of-range values.

pub fn validate_balance(value: f64) -> Result<f64, CalcError> {
    positive(value, BALANCE_NOT_POSITIVE)
}

/// Accepts the open interval `(0, 1)` only.
pub fn validate_risk(value: f64) -> Result<f64, CalcError> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(CalcError::Validation(RISK_OUT_OF_RANGE))
    }
}

pub fn validate_stop_loss(value: f64) -> Result<f64, CalcError> {
    positive(value, STOP_LOSS_NOT_POSITIVE)
}

pub fn validate_price(value: f64) -> Result<f64, CalcError> {
    positive(value, PRICE_NOT_POSITIVE)
}

pub fn validate_leverage(value: f64) -> Result<f64, CalcError> {
    positive(value, LEVERAGE_NOT_POSITIVE)
}

fn positive(value: f64, message: &'static str) -> Result<f64, CalcError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::Validation(message))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
