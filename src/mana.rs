//! Mana cost strings such as `{2}{G}{G}` or `{1}{R} // {1}{U}`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SYMBOL_SVG_BASE;

/// Joins per-face values of a multi-faced card.
pub const FACE_SEPARATOR: &str = " // ";

lazy_static! {
    static ref SYMBOL: Regex = Regex::new(r"\{([A-Z0-9/]+)\}").unwrap();
}

/// Symbols in order of appearance across all faces, without braces.
///
/// Hybrid symbols keep their slash (`"W/U"`). Anything outside braces is ignored.
pub fn symbols(cost: &str) -> Vec<String> {
    SYMBOL
        .captures_iter(cost)
        .map(|c| c[1].to_string())
        .collect()
}

/// Split a cost into its per-face parts.
pub fn faces(cost: &str) -> Vec<&str> {
    if cost.is_empty() {
        return Vec::new();
    }
    cost.split(FACE_SEPARATOR).map(str::trim).collect()
}

/// Icon URL for one symbol; hybrid slashes are dropped (`W/U` -> `WU.svg`).
pub fn symbol_icon_url(symbol: &str) -> String {
    format!("{}/{}.svg", SYMBOL_SVG_BASE, symbol.replace('/', ""))
}

/// Mana value of a cost: generic digits count their value, `X`/`Y`/`Z` count
/// zero, a hybrid counts its largest half (`{2/B}` is 2), every other symbol
/// counts one. Faces are summed; the total saturates at `u32::MAX`.
pub fn mana_value(cost: &str) -> u32 {
    symbols(cost)
        .iter()
        .map(|s| symbol_value(s))
        .fold(0u32, u32::saturating_add)
}

fn symbol_value(symbol: &str) -> u32 {
    if symbol.contains('/') {
        return symbol.split('/').map(symbol_value).max().unwrap_or(0);
    }
    if !symbol.is_empty() && symbol.bytes().all(|b| b.is_ascii_digit()) {
        return symbol.parse::<u32>().unwrap_or(u32::MAX);
    }
    match symbol {
        "X" | "Y" | "Z" => 0,
        _ => 1,
    }
}
