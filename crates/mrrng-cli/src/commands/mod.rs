pub mod entropy;
pub mod generate;
pub mod probe;
pub mod stream;

use std::fmt::Display;

/// Print an error with context and exit with status 1.
pub fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("Error: {context}: {err}");
    std::process::exit(1);
}

/// Parse a seed given in decimal or `0x`-prefixed hex.
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid seed '{s}': {e}"))
}
