use anchor_lang::prelude::*;

use crate::error::VaultError;

/// Shares minted for a deposit of `amount` into a pool holding `pool_before`
/// (measured before the deposit lands) with `total_shares` outstanding.
///
/// Formula: shares = amount × total_shares / pool_before (floor)
///
/// With no shares outstanding the deposit is priced 1:1. Floor rounding means
/// the depositor never receives more than their exact proportional claim.
pub fn shares_for_deposit(amount: u64, total_shares: u64, pool_before: u64) -> Result<u64> {
    if total_shares == 0 {
        return Ok(amount);
    }

    mul_div(amount, total_shares, pool_before)
}

/// Assets paid out for redeeming `shares` out of `total_shares` against a
/// pool currently holding `pool_now`.
///
/// Formula: assets = shares × pool_now / total_shares (floor)
pub fn assets_for_redemption(shares: u64, total_shares: u64, pool_now: u64) -> Result<u64> {
    mul_div(shares, pool_now, total_shares)
}

/// Safe multiplication then floor division.
///
/// Computes: (value × numerator) / denominator
/// Uses u128 intermediate to prevent overflow.
pub fn mul_div(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, VaultError::DivisionByZero);

    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(VaultError::MathOverflow)?;

    let result = product / (denominator as u128);

    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}
