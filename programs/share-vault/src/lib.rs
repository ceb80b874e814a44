use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("4seFbWUL3ezVqyvJJBDBFSv7x1ZUUdekmHf3niPbK1V8");

#[program]
pub mod share_vault {
    use super::*;

    /// Create a staking pool for the given asset. Starts paused.
    pub fn initialize(
        ctx: Context<Initialize>,
        pool_id: u64,
        super_admin: Pubkey,
        admin: Pubkey,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, pool_id, super_admin, admin)
    }

    /// Replace the super admin (super admin only)
    pub fn set_super_admin(ctx: Context<Admin>, new_super_admin: Pubkey) -> Result<()> {
        instructions::admin::set_super_admin(ctx, new_super_admin)
    }

    /// Replace the admin (super admin only)
    pub fn set_admin(ctx: Context<Admin>, new_admin: Pubkey) -> Result<()> {
        instructions::admin::set_admin(ctx, new_admin)
    }

    /// Pause stake/unstake (admin only, idempotent)
    pub fn pause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::pause(ctx)
    }

    /// Unpause stake/unstake (admin only, idempotent)
    pub fn unpause(ctx: Context<Admin>) -> Result<()> {
        instructions::admin::unpause(ctx)
    }

    /// Deposit assets and receive shares
    /// Mints 1:1 into an empty pool, otherwise amount * total_shares / pool (floor)
    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
        instructions::stake::handler(ctx, amount)
    }

    /// Burn shares and receive assets
    /// Pays shares * pool / total_shares (floor)
    pub fn unstake(ctx: Context<Unstake>, shares: u64) -> Result<()> {
        instructions::unstake::handler(ctx, shares)
    }

    // ============ View Functions (CPI composable) ============

    /// Preview shares minted for a deposit (floor rounding)
    pub fn preview_stake(ctx: Context<PoolView>, amount: u64) -> Result<()> {
        instructions::view::preview_stake(ctx, amount)
    }

    /// Preview assets paid for a redemption (floor rounding)
    pub fn preview_unstake(ctx: Context<PoolView>, shares: u64) -> Result<()> {
        instructions::view::preview_unstake(ctx, shares)
    }

    /// Get the pool's asset balance
    pub fn pool_balance(ctx: Context<PoolView>) -> Result<()> {
        instructions::view::get_pool_balance(ctx)
    }

    /// Get total shares outstanding
    pub fn total_shares(ctx: Context<PoolStateView>) -> Result<()> {
        instructions::view::get_total_shares(ctx)
    }

    /// Get the pause flag
    pub fn is_paused(ctx: Context<PoolStateView>) -> Result<()> {
        instructions::view::is_paused(ctx)
    }

    /// Get a holder's share balance (0 when they hold none)
    pub fn share_balance(ctx: Context<HolderView>, owner: Pubkey) -> Result<()> {
        instructions::view::share_balance(ctx, owner)
    }
}
