//! Ledger updates as the instruction handlers apply them: balances are
//! written back into account data before any token CPI runs, and token
//! failures surface as `TransferFailed`.

use anchor_lang::prelude::*;
use anchor_lang::{AccountDeserialize, AccountsExit};

use crate::{
    error::VaultError,
    state::{StakeAccount, StakingPool},
};

/// Record a stake and persist both accounts.
pub fn commit_stake<'info>(
    pool: &mut Account<'info, StakingPool>,
    holder: &mut Account<'info, StakeAccount>,
    amount: u64,
    pool_before: u64,
) -> Result<u64> {
    let shares = pool.record_stake(holder, amount, pool_before)?;

    pool.exit(&crate::ID)?;
    holder.exit(&crate::ID)?;

    Ok(shares)
}

/// Record an unstake and persist both accounts.
pub fn commit_unstake<'info>(
    pool: &mut Account<'info, StakingPool>,
    holder: &mut Account<'info, StakeAccount>,
    shares: u64,
    pool_now: u64,
) -> Result<u64> {
    let amount = pool.record_unstake(holder, shares, pool_now)?;

    pool.exit(&crate::ID)?;
    holder.exit(&crate::ID)?;

    Ok(amount)
}

/// Share balance held at a stake PDA. An account that does not exist (never
/// staked, or closed after a full exit) holds 0.
pub fn read_share_balance(info: &AccountInfo, pool: &Pubkey, owner: &Pubkey) -> Result<u64> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(0);
    }

    let data = info.try_borrow_data()?;
    let stake_account = StakeAccount::try_deserialize(&mut &data[..])?;
    require_keys_eq!(stake_account.pool, *pool, VaultError::InvalidStakeAccount);
    require_keys_eq!(stake_account.owner, *owner, VaultError::InvalidStakeAccount);

    Ok(stake_account.shares)
}

pub fn transfer_failed(err: Error) -> Error {
    msg!("Asset transfer failed: {}", err);
    error!(VaultError::TransferFailed)
}
