//! # config — Config from Environment Variables
//!
//! | Variable                        | Default | Description                              |
//! |---------------------------------|---------|------------------------------------------|
//! | `LOT_CALC_STRICT_MARGIN_INPUTS` | `false` | Reject non-positive gold price/leverage  |
//! | `RUST_LOG`                      | `lot_calculator=warn` | Tracing filter (stderr)    |

use anyhow::bail;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// When set, the gold path validates price and leverage like the other
    /// inputs.  Off by default: a zero leverage then surfaces as an
    /// unexpected division error and a negative one as a negative margin.
    pub strict_margin_inputs: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let strict_margin_inputs = match std::env::var("LOT_CALC_STRICT_MARGIN_INPUTS") {
            Ok(raw) => parse_flag("LOT_CALC_STRICT_MARGIN_INPUTS", &raw)?,
            Err(_) => false,
        };

        Ok(Self { strict_margin_inputs })
    }
}

fn parse_flag(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => bail!("{key} must be a boolean (true/false/1/0/yes/no), got '{other}'"),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
