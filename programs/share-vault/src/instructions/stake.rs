use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::{
    constants::STAKE_SEED,
    error::VaultError,
    events::Staked,
    ledger::{commit_stake, transfer_failed},
    state::{StakeAccount, StakingPool},
};

#[derive(Accounts)]
pub struct Stake<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(mut)]
    pub pool: Account<'info, StakingPool>,

    #[account(
        constraint = asset_mint.key() == pool.asset_mint @ VaultError::InvalidAssetMint,
    )]
    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        constraint = user_asset_account.mint == pool.asset_mint @ VaultError::InvalidAssetMint,
        constraint = user_asset_account.owner == user.key() @ VaultError::InvalidTokenAccountOwner,
    )]
    pub user_asset_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        constraint = asset_vault.key() == pool.asset_vault @ VaultError::InvalidAssetVault,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = user,
        space = StakeAccount::LEN,
        seeds = [STAKE_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub stake_account: Account<'info, StakeAccount>,

    pub asset_token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

/// Deposit assets and receive shares (floor rounding - favors existing holders)
pub fn handler(ctx: Context<Stake>, amount: u64) -> Result<()> {
    // Price against the balance held before this deposit arrives
    let pool_before = ctx.accounts.asset_vault.amount;

    let pool_key = ctx.accounts.pool.key();
    let owner = ctx.accounts.user.key();
    ctx.accounts
        .stake_account
        .open(pool_key, owner, ctx.bumps.stake_account);

    // Balances land in account data before the token program runs
    let shares = commit_stake(
        &mut ctx.accounts.pool,
        &mut ctx.accounts.stake_account,
        amount,
        pool_before,
    )?;

    transfer_checked(
        CpiContext::new(
            ctx.accounts.asset_token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.user_asset_account.to_account_info(),
                to: ctx.accounts.asset_vault.to_account_info(),
                mint: ctx.accounts.asset_mint.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        amount,
        ctx.accounts.asset_mint.decimals,
    )
    .map_err(transfer_failed)?;

    emit!(Staked {
        pool: pool_key,
        owner,
        amount,
        shares,
        total_shares: ctx.accounts.pool.total_shares,
    });

    Ok(())
}
