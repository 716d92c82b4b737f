//! Token amounts in atto units (10^-18).

use alloy_primitives::U256;

use crate::error::{TypesError, TypesResult};

/// Decimal places of FIL and iFIL.
pub const DECIMALS: u32 = 18;

/// Atto units per whole token.
pub const ATTO_PER_FIL: u128 = 1_000_000_000_000_000_000;

/// Parse a base-10 integer amount in raw token units.
///
/// Accepts the full `uint256` range, so `2^256 - 1` (an unlimited ERC-20
/// allowance) parses.
pub fn parse_token_units(amount: &str) -> TypesResult<U256> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypesError::InvalidAmount(amount.to_string()));
    }
    U256::from_str_radix(amount, 10).map_err(|_| TypesError::InvalidAmount(amount.to_string()))
}

/// Render an atto amount as whole tokens with exactly `decimals` places.
///
/// Rounds half up at the last displayed digit.
pub fn format_fixed(atto: u128, decimals: u32) -> String {
    let decimals = decimals.min(DECIMALS);
    let scale = 10u128.pow(DECIMALS - decimals);
    let mut whole = atto / ATTO_PER_FIL;
    let frac = atto % ATTO_PER_FIL;

    let mut rounded = frac / scale;
    if frac % scale >= scale.div_ceil(2) && scale > 1 {
        rounded += 1;
    }
    let limit = 10u128.pow(decimals);
    if rounded >= limit {
        whole += 1;
        rounded -= limit;
    }

    if decimals == 0 {
        whole.to_string()
    } else {
        format!("{}.{:0width$}", whole, rounded, width = decimals as usize)
    }
}
