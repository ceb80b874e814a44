use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::set_return_data;
use anchor_spl::token_interface::TokenAccount;

use crate::{
    constants::STAKE_SEED,
    error::VaultError,
    ledger::read_share_balance,
    state::StakingPool,
};

#[derive(Accounts)]
pub struct PoolView<'info> {
    pub pool: Account<'info, StakingPool>,

    #[account(constraint = asset_vault.key() == pool.asset_vault @ VaultError::InvalidAssetVault)]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,
}

#[derive(Accounts)]
pub struct PoolStateView<'info> {
    pub pool: Account<'info, StakingPool>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct HolderView<'info> {
    pub pool: Account<'info, StakingPool>,

    /// CHECK: the holder's stake PDA; may not exist when the holder has
    /// never staked or has fully unstaked. Read in `read_share_balance`.
    #[account(
        seeds = [STAKE_SEED, pool.key().as_ref(), owner.as_ref()],
        bump
    )]
    pub stake_account: UncheckedAccount<'info>,
}

/// Preview how many shares a deposit would mint (floor rounding)
pub fn preview_stake(ctx: Context<PoolView>, amount: u64) -> Result<()> {
    let shares = ctx
        .accounts
        .pool
        .preview_stake(amount, ctx.accounts.asset_vault.amount)?;

    set_return_data(&shares.to_le_bytes());
    Ok(())
}

/// Preview how many assets redeeming shares would pay out (floor rounding)
pub fn preview_unstake(ctx: Context<PoolView>, shares: u64) -> Result<()> {
    let assets = ctx
        .accounts
        .pool
        .preview_unstake(shares, ctx.accounts.asset_vault.amount)?;

    set_return_data(&assets.to_le_bytes());
    Ok(())
}

/// Get the pool's current asset balance, external inflows included
pub fn get_pool_balance(ctx: Context<PoolView>) -> Result<()> {
    set_return_data(&ctx.accounts.asset_vault.amount.to_le_bytes());
    Ok(())
}

/// Get total shares outstanding
pub fn get_total_shares(ctx: Context<PoolStateView>) -> Result<()> {
    set_return_data(&ctx.accounts.pool.total_shares.to_le_bytes());
    Ok(())
}

/// Whether staking is paused (1) or open (0)
pub fn is_paused(ctx: Context<PoolStateView>) -> Result<()> {
    set_return_data(&[ctx.accounts.pool.gate.paused as u8]);
    Ok(())
}

/// Share balance of `owner`
pub fn share_balance(ctx: Context<HolderView>, owner: Pubkey) -> Result<()> {
    let shares = read_share_balance(
        &ctx.accounts.stake_account,
        &ctx.accounts.pool.key(),
        &owner,
    )?;

    set_return_data(&shares.to_le_bytes());
    Ok(())
}
