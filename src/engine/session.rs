//! # engine::session
//!
//! The interactive driver: one linear pass of prompts, validation and
//! calculation that ends in exactly one printed line (or pair of lines).
//!
//! ```text
//! balance ─▶ risk ─▶ stop loss ─▶ symbol ─▶ pip value ─▶ lot size
//!                                                          │
//!                                  XAUUSD? ── no ──▶ Quote::LotSize
//!                                     │
//!                                    yes ─▶ price ─▶ leverage ─▶ margin
//!                                                                  │
//!                              margin > balance? ─▶ InsufficientBalance
//!                                               └─▶ WithMargin
//! ```
//!
//! Any [`CalcError`] aborts the remaining prompts.  There is no retry.
//!
//! The session is generic over its reader and writer so tests can replay a
//! whole transcript from a byte slice into a `Vec<u8>`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::sizing::{
    calculate_lot_size, calculate_margin_required, validate_balance, validate_leverage,
    validate_price, validate_risk, validate_stop_loss,
};
use crate::error::{CalcError, END_OF_INPUT};
use crate::models::{is_gold, pip_value, Quote, GOLD_CONTRACT_SIZE};

pub const WELCOME: &str = "Welcome to the Trading Lot Calculator";

pub const PROMPT_BALANCE: &str = "Enter your account balance: ";
pub const PROMPT_RISK: &str = "Enter your risk per trade (as a decimal, e.g., 0.02 for 2%): ";
pub const PROMPT_STOP_LOSS: &str = "Enter your stop loss in pips: ";
pub const PROMPT_SYMBOL: &str = "Enter your currency pair (e.g., 'USDJPY' or 'XAUUSD' for gold): ";
pub const PROMPT_GOLD_PRICE: &str = "Enter the current price of gold: ";
pub const PROMPT_LEVERAGE: &str = "Enter your leverage (e.g., 100): ";

// ─── Session ──────────────────────────────────────────────────────────────────

pub struct Session<R, W> {
    reader: R,
    writer: W,
    config: Config,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, config: Config) -> Self {
        Self { reader, writer, config }
    }

    /// Run one full session and print its single outcome.
    ///
    /// Calculation failures are reported to the user, not returned.  The
    /// `Err` case is reserved for failing to write the report itself.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.writer.write_all(format!("{WELCOME}\n").as_bytes()).await?;

        let report = match self.calculate().await {
            Ok(quote) => {
                info!(lot_size = quote.lot_size(), ?quote, "✅ Session finished");
                quote.to_string()
            }
            Err(err) => {
                warn!(error = ?err, "Session aborted");
                err.to_string()
            }
        };

        self.writer.write_all(format!("{report}\n").as_bytes()).await?;
        self.writer.flush().await
    }

    /// Give back the writer, e.g. to inspect a captured transcript.
    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn calculate(&mut self) -> Result<Quote, CalcError> {
        // ── 1. Risk inputs ───────────────────────────────────────────────────
        let account_balance = validate_balance(self.prompt_number(PROMPT_BALANCE).await?)?;
        let risk_per_trade = validate_risk(self.prompt_number(PROMPT_RISK).await?)?;
        let stop_loss_pips = validate_stop_loss(self.prompt_number(PROMPT_STOP_LOSS).await?)?;
        debug!(account_balance, risk_per_trade, stop_loss_pips, "risk inputs accepted");

        // ── 2. Instrument ────────────────────────────────────────────────────
        let symbol = self.prompt(PROMPT_SYMBOL).await?;
        let pip = pip_value(&symbol);
        debug!(%symbol, pip_value = pip, "pip value resolved");

        // ── 3. Lot size ──────────────────────────────────────────────────────
        let lot_size = calculate_lot_size(account_balance, risk_per_trade, stop_loss_pips, pip)?;

        if !is_gold(&symbol) {
            return Ok(Quote::LotSize { symbol, lot_size });
        }

        // ── 4. Gold margin check ─────────────────────────────────────────────
        let mut current_price = self.prompt_number(PROMPT_GOLD_PRICE).await?;
        let mut leverage = self.prompt_number(PROMPT_LEVERAGE).await?;
        if self.config.strict_margin_inputs {
            current_price = validate_price(current_price)?;
            leverage = validate_leverage(leverage)?;
        }

        let margin = calculate_margin_required(lot_size, GOLD_CONTRACT_SIZE, current_price, leverage)?;
        let quote = Quote::for_margin(&symbol, lot_size, margin, account_balance);
        if let Quote::InsufficientBalance { .. } = quote {
            warn!(margin, account_balance, "margin exceeds balance");
        }

        Ok(quote)
    }

    // ─── Input ────────────────────────────────────────────────────────────────

    /// Print `text` without a newline and read one line back, minus its
    /// terminator.
    async fn prompt(&mut self, text: &str) -> Result<String, CalcError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(CalcError::Unexpected(END_OF_INPUT.to_string()));
        }

        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(trimmed.to_string())
    }

    async fn prompt_number(&mut self, text: &str) -> Result<f64, CalcError> {
        let raw = self.prompt(text).await?;
        let parsed = parse_number(&raw);
        parsed.ok_or(CalcError::Parse(raw))
    }
}

/// Parse a decimal number, allowing `_` as a digit separator.
///
/// Each `_` must sit between two ASCII digits, so `1_000.5` is accepted while
/// `_1`, `1_`, `1__0` and `1_.5` are not.
fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim();
    let chars: Vec<char> = text.chars().collect();

    let mut digits = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c != '_' {
            digits.push(c);
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| chars.get(j));
        let after = chars.get(i + 1);
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }

    digits.parse().ok()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    async fn run_transcript(input: &str, config: Config) -> String {
        run_bytes(input.as_bytes(), config).await
    }

    async fn run_bytes(input: &[u8], config: Config) -> String {
        let mut session = Session::new(input, Vec::new(), config);
        session.run().await.unwrap();
        String::from_utf8(session.into_writer()).unwrap()
    }

    fn make_expected(prompts: &[&str], outcome: &str) -> String {
        format!("{WELCOME}\n{}{outcome}\n", prompts.concat())
    }

    const ALL_BASE: [&str; 4] = [PROMPT_BALANCE, PROMPT_RISK, PROMPT_STOP_LOSS, PROMPT_SYMBOL];

    #[tokio::test]
    async fn test_eurusd_lot_size_only() {
        let out = run_transcript("10000\n0.02\n50\nEURUSD\n", Config::default()).await;
        assert_eq!(
            out,
            make_expected(&ALL_BASE, "Your calculated lot size for EURUSD is: 40.00")
        );
    }

    #[tokio::test]
    async fn test_gold_insufficient_balance() {
        let out = run_transcript("5000\n0.01\n20\nXAUUSD\n1900\n100\n", Config::default()).await;
        let mut prompts = ALL_BASE.to_vec();
        prompts.extend([PROMPT_GOLD_PRICE, PROMPT_LEVERAGE]);
        assert_eq!(
            out,
            make_expected(
                &prompts,
                "Insufficient balance to trade 250.00 lots of XAUUSD. Required margin: $475000.00"
            )
        );
    }

    #[tokio::test]
    async fn test_gold_sufficient_balance_prints_two_lines() {
        // lot = (100000 * 0.01) / (500 * 0.01) = 200; margin = 200*100*2000/1000 = 40000
        let out = run_transcript("100000\n0.01\n500\nxauusd\n2000\n1000\n", Config::default()).await;
        assert!(out.ends_with(
            "Your calculated lot size for xauusd is: 200.00\nRequired margin: $40000.00\n"
        ));
    }

    #[tokio::test]
    async fn test_negative_balance_stops_after_first_prompt() {
        let out = run_transcript("-100\n0.02\n50\nEURUSD\n", Config::default()).await;
        assert_eq!(
            out,
            make_expected(&[PROMPT_BALANCE], "Input error: Account balance must be positive.")
        );
    }

    #[tokio::test]
    async fn test_risk_out_of_range() {
        let out = run_transcript("1000\n1\n", Config::default()).await;
        assert!(out.ends_with("Input error: Risk per trade must be between 0 and 1.\n"));
    }

    #[tokio::test]
    async fn test_zero_stop_loss() {
        let out = run_transcript("1000\n0.02\n0\n", Config::default()).await;
        assert!(out.ends_with("Input error: Stop loss pips must be positive.\n"));
    }

    #[tokio::test]
    async fn test_non_numeric_balance_is_parse_error() {
        let out = run_transcript("ten thousand\n", Config::default()).await;
        assert!(out.ends_with(
            "Input error: could not convert string to float: 'ten thousand'\n"
        ));
    }

    #[tokio::test]
    async fn test_numbers_tolerate_whitespace_and_crlf() {
        let out = run_transcript("  10000 \r\n0.02\r\n50\r\nUSDJPY\r\n", Config::default()).await;
        // (10000 * 0.02) / (50 * 0.01) = 400
        assert!(out.ends_with("Your calculated lot size for USDJPY is: 400.00\n"));
    }

    #[tokio::test]
    async fn test_unknown_symbol_uses_default_pip() {
        let out = run_transcript("10000\n0.02\n50\nfoobar\n", Config::default()).await;
        assert!(out.ends_with("Your calculated lot size for foobar is: 40.00\n"));
    }

    #[tokio::test]
    async fn test_zero_leverage_is_unexpected_by_default() {
        let out = run_transcript("5000\n0.01\n20\nXAUUSD\n1900\n0\n", Config::default()).await;
        assert!(out.ends_with("An unexpected error occurred: float division by zero\n"));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_zero_leverage() {
        let config = Config { strict_margin_inputs: true };
        let out = run_transcript("5000\n0.01\n20\nXAUUSD\n1900\n0\n", config).await;
        assert!(out.ends_with("Input error: Leverage must be positive.\n"));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_negative_price() {
        let config = Config { strict_margin_inputs: true };
        let out = run_transcript("5000\n0.01\n20\nXAUUSD\n-1\n100\n", config).await;
        assert!(out.ends_with("Input error: Current price must be positive.\n"));
    }

    #[tokio::test]
    async fn test_end_of_input_is_unexpected() {
        let out = run_transcript("1000\n0.02\n", Config::default()).await;
        assert!(out.ends_with(
            "Enter your stop loss in pips: An unexpected error occurred: EOF when reading a line\n"
        ));
    }

    #[tokio::test]
    async fn test_underscore_grouped_balance() {
        let out = run_transcript("10_000\n0.02\n50\nEURUSD\n", Config::default()).await;
        assert!(out.ends_with("Your calculated lot size for EURUSD is: 40.00\n"));
    }

    #[tokio::test]
    async fn test_misplaced_underscore_is_parse_error() {
        let out = run_transcript("10__000\n", Config::default()).await;
        assert!(out.ends_with("Input error: could not convert string to float: '10__000'\n"));
    }

    #[tokio::test]
    async fn test_non_numeric_gold_price_aborts() {
        let out = run_transcript("5000\n0.01\n20\nXAUUSD\nabc\n100\n", Config::default()).await;
        assert!(out.ends_with(
            "Enter the current price of gold: Input error: could not convert string to float: 'abc'\n"
        ));
        assert!(!out.contains(PROMPT_LEVERAGE));
    }

    #[tokio::test]
    async fn test_non_numeric_leverage_aborts() {
        let out = run_transcript("5000\n0.01\n20\nXAUUSD\n1900\nx100\n", Config::default()).await;
        assert!(out.ends_with(
            "Enter your leverage (e.g., 100): Input error: could not convert string to float: 'x100'\n"
        ));
    }

    #[tokio::test]
    async fn test_nan_balance_fails_range_check() {
        let out = run_transcript("nan\n", Config::default()).await;
        assert!(out.ends_with("Input error: Account balance must be positive.\n"));
    }

    #[tokio::test]
    async fn test_nan_risk_fails_range_check() {
        let out = run_transcript("1000\nNaN\n", Config::default()).await;
        assert!(out.ends_with("Input error: Risk per trade must be between 0 and 1.\n"));
    }

    #[tokio::test]
    async fn test_infinite_balance_prints_inf() {
        let out = run_transcript("inf\n0.02\n50\nEURUSD\n", Config::default()).await;
        assert!(out.ends_with("Your calculated lot size for EURUSD is: inf\n"));
    }

    #[tokio::test]
    async fn test_negative_leverage_prints_negative_margin() {
        let out = run_transcript("5000\n0.01\n20\nXAUUSD\n1900\n-100\n", Config::default()).await;
        assert!(out.ends_with(
            "Your calculated lot size for XAUUSD is: 250.00\nRequired margin: $-475000.00\n"
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_input_error() {
        let out = run_bytes(b"\xff\xfe\n", Config::default()).await;
        assert!(out.starts_with(&format!("{WELCOME}\n{PROMPT_BALANCE}Input error: ")));
    }

    #[test]
    fn test_parse_number_underscore_rules() {
        assert_eq!(parse_number("1_000.5"), Some(1000.5));
        assert_eq!(parse_number(" 10_000 "), Some(10_000.0));
        assert_eq!(parse_number("1e1_0"), Some(1e10));
        assert_eq!(parse_number("_1"), None);
        assert_eq!(parse_number("1_"), None);
        assert_eq!(parse_number("1__0"), None);
        assert_eq!(parse_number("1_.5"), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }
}
