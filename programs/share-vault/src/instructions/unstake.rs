use anchor_lang::prelude::*;
use anchor_lang::AccountsClose;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::{
    constants::{POOL_SEED, STAKE_SEED},
    error::VaultError,
    events::Unstaked,
    ledger::{commit_unstake, transfer_failed},
    state::{StakeAccount, StakingPool},
};

#[derive(Accounts)]
pub struct Unstake<'info> {
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

    /// Created empty for a caller without shares so the handler can
    /// reject with `InsufficientShares`; the failed instruction reverts it.
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

/// Redeem shares for assets (floor rounding - favors remaining holders)
pub fn handler(ctx: Context<Unstake>, shares: u64) -> Result<()> {
    let pool_now = ctx.accounts.asset_vault.amount;

    // The burn lands in account data before the token program runs
    let amount = commit_unstake(
        &mut ctx.accounts.pool,
        &mut ctx.accounts.stake_account,
        shares,
        pool_now,
    )?;

    if amount > 0 {
        let asset_mint_key = ctx.accounts.pool.asset_mint;
        let pool_id_bytes = ctx.accounts.pool.pool_id.to_le_bytes();
        let bump = ctx.accounts.pool.bump;
        let signer_seeds: &[&[&[u8]]] = &[&[
            POOL_SEED,
            asset_mint_key.as_ref(),
            pool_id_bytes.as_ref(),
            &[bump],
        ]];

        transfer_checked(
            CpiContext::new_with_signer(
                ctx.accounts.asset_token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.asset_vault.to_account_info(),
                    to: ctx.accounts.user_asset_account.to_account_info(),
                    mint: ctx.accounts.asset_mint.to_account_info(),
                    authority: ctx.accounts.pool.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
            ctx.accounts.asset_mint.decimals,
        )
        .map_err(transfer_failed)?;
    }

    // A fully exited holder's entry is removed
    if ctx.accounts.stake_account.shares == 0 {
        ctx.accounts
            .stake_account
            .close(ctx.accounts.user.to_account_info())?;
    }

    emit!(Unstaked {
        pool: ctx.accounts.pool.key(),
        owner: ctx.accounts.user.key(),
        shares,
        amount,
        total_shares: ctx.accounts.pool.total_shares,
    });

    Ok(())
}
