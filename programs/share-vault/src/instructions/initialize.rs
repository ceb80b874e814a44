use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::{
    constants::POOL_SEED,
    events::PoolInitialized,
    state::{AccessGate, StakingPool},
};

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = StakingPool::LEN,
        seeds = [POOL_SEED, asset_mint.key().as_ref(), &pool_id.to_le_bytes()],
        bump
    )]
    pub pool: Account<'info, StakingPool>,

    pub asset_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = payer,
        associated_token::mint = asset_mint,
        associated_token::authority = pool,
        associated_token::token_program = asset_token_program,
    )]
    pub asset_vault: InterfaceAccount<'info, TokenAccount>,

    pub asset_token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    pool_id: u64,
    super_admin: Pubkey,
    admin: Pubkey,
) -> Result<()> {
    // Staking stays closed until the admin unpauses
    let pool = &mut ctx.accounts.pool;
    pool.gate = AccessGate::new(super_admin, admin);
    pool.asset_mint = ctx.accounts.asset_mint.key();
    pool.asset_vault = ctx.accounts.asset_vault.key();
    pool.total_shares = 0;
    pool.pool_id = pool_id;
    pool.bump = ctx.bumps.pool;
    pool._reserved = [0u8; 64];

    emit!(PoolInitialized {
        pool: pool.key(),
        super_admin,
        admin,
        asset_mint: pool.asset_mint,
        pool_id,
    });

    msg!(
        "Staking pool {} initialized for asset {}",
        pool_id,
        pool.asset_mint
    );

    Ok(())
}
