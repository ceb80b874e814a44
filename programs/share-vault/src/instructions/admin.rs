use anchor_lang::prelude::*;

use crate::{
    events::{AdminChanged, PauseStatusChanged, SuperAdminChanged},
    state::StakingPool,
};

/// Role checks happen in [`crate::state::AccessGate`], not as account
/// constraints, so every rejection surfaces as `Unauthorized`.
#[derive(Accounts)]
pub struct Admin<'info> {
    pub caller: Signer<'info>,

    #[account(mut)]
    pub pool: Account<'info, StakingPool>,
}

/// Pause staking and unstaking
pub fn pause(ctx: Context<Admin>) -> Result<()> {
    set_paused(ctx, true)
}

/// Resume staking and unstaking
pub fn unpause(ctx: Context<Admin>) -> Result<()> {
    set_paused(ctx, false)
}

fn set_paused(ctx: Context<Admin>, paused: bool) -> Result<()> {
    let pool = &mut ctx.accounts.pool;

    pool.gate.set_paused(ctx.accounts.caller.key(), paused)?;

    emit!(PauseStatusChanged {
        pool: pool.key(),
        paused,
    });

    Ok(())
}

/// Replace the super admin (super admin only)
pub fn set_super_admin(ctx: Context<Admin>, new_super_admin: Pubkey) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let previous_super_admin = pool.gate.super_admin;

    pool.gate
        .set_super_admin(ctx.accounts.caller.key(), new_super_admin)?;

    emit!(SuperAdminChanged {
        pool: pool.key(),
        previous_super_admin,
        new_super_admin,
    });

    Ok(())
}

/// Replace the admin (super admin only)
pub fn set_admin(ctx: Context<Admin>, new_admin: Pubkey) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    let previous_admin = pool.gate.admin;

    pool.gate.set_admin(ctx.accounts.caller.key(), new_admin)?;

    emit!(AdminChanged {
        pool: pool.key(),
        previous_admin,
        new_admin,
    });

    Ok(())
}
