use anchor_lang::prelude::*;

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub super_admin: Pubkey,
    pub admin: Pubkey,
    pub asset_mint: Pubkey,
    pub pool_id: u64,
}

#[event]
pub struct Staked {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub shares: u64,
    pub total_shares: u64,
}

#[event]
pub struct Unstaked {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub shares: u64,
    pub amount: u64,
    pub total_shares: u64,
}

#[event]
pub struct PauseStatusChanged {
    pub pool: Pubkey,
    pub paused: bool,
}

#[event]
pub struct SuperAdminChanged {
    pub pool: Pubkey,
    pub previous_super_admin: Pubkey,
    pub new_super_admin: Pubkey,
}

#[event]
pub struct AdminChanged {
    pub pool: Pubkey,
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}
