use anchor_lang::prelude::*;

use crate::{
    constants::{POOL_SEED, STAKE_SEED},
    error::VaultError,
    math::{assets_for_redemption, shares_for_deposit},
};

/// Role and pause state guarding a pool.
///
/// Embedded in [`StakingPool`]; every authorization decision goes through
/// these methods.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AccessGate {
    /// Replaces itself and the admin
    pub super_admin: Pubkey,
    /// Pauses and unpauses staking
    pub admin: Pubkey,
    /// Blocks stake/unstake while set
    pub paused: bool,
}

impl AccessGate {
    pub const LEN: usize = 32 + // super_admin
        32 + // admin
        1; // paused

    /// New gates start paused.
    pub fn new(super_admin: Pubkey, admin: Pubkey) -> Self {
        Self {
            super_admin,
            admin,
            paused: true,
        }
    }

    pub fn set_super_admin(&mut self, caller: Pubkey, new_super_admin: Pubkey) -> Result<()> {
        require_keys_eq!(caller, self.super_admin, VaultError::Unauthorized);
        self.super_admin = new_super_admin;
        Ok(())
    }

    pub fn set_admin(&mut self, caller: Pubkey, new_admin: Pubkey) -> Result<()> {
        require_keys_eq!(caller, self.super_admin, VaultError::Unauthorized);
        self.admin = new_admin;
        Ok(())
    }

    /// Admin-only. Setting the flag to its current value is a no-op success.
    pub fn set_paused(&mut self, caller: Pubkey, paused: bool) -> Result<()> {
        require_keys_eq!(caller, self.admin, VaultError::Unauthorized);
        self.paused = paused;
        Ok(())
    }

    pub fn check_unpaused(&self) -> Result<()> {
        require!(!self.paused, VaultError::Paused);
        Ok(())
    }
}

#[account]
pub struct StakingPool {
    /// Role and pause state
    pub gate: AccessGate,
    /// Underlying asset mint
    pub asset_mint: Pubkey,
    /// Token account holding the pool's assets (its balance prices shares)
    pub asset_vault: Pubkey,
    /// Sum of every holder's share balance
    pub total_shares: u64,
    /// Unique pool identifier (allows multiple pools per asset)
    pub pool_id: u64,
    /// PDA bump seed
    pub bump: u8,
    /// Reserved for future upgrades
    pub _reserved: [u8; 64],
}

impl StakingPool {
    pub const LEN: usize = 8 +  // discriminator
        AccessGate::LEN +
        32 +  // asset_mint
        32 +  // asset_vault
        8 +   // total_shares
        8 +   // pool_id
        1 +   // bump
        64; // _reserved

    pub const SEED_PREFIX: &'static [u8] = POOL_SEED;

    /// Shares a deposit of `amount` would mint right now.
    pub fn preview_stake(&self, amount: u64, pool_before: u64) -> Result<u64> {
        shares_for_deposit(amount, self.total_shares, pool_before)
    }

    /// Assets a redemption of `shares` would pay out right now.
    pub fn preview_unstake(&self, shares: u64, pool_now: u64) -> Result<u64> {
        assets_for_redemption(shares, self.total_shares, pool_now)
    }

    /// Credit `holder` with the shares minted for a deposit of `amount`.
    ///
    /// `pool_before` must be the pool balance before the deposit is
    /// transferred in. Nothing is written unless every check passes.
    pub fn record_stake(
        &mut self,
        holder: &mut StakeAccount,
        amount: u64,
        pool_before: u64,
    ) -> Result<u64> {
        self.gate.check_unpaused()?;
        require!(amount > 0, VaultError::ZeroAmount);

        let shares = self.preview_stake(amount, pool_before)?;
        require!(shares > 0, VaultError::ZeroShares);

        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        let holder_shares = holder
            .shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;

        self.total_shares = total_shares;
        holder.shares = holder_shares;

        Ok(shares)
    }

    /// Burn `shares` from `holder` and return the asset amount owed.
    ///
    /// A payout that truncates to zero still burns the shares.
    pub fn record_unstake(
        &mut self,
        holder: &mut StakeAccount,
        shares: u64,
        pool_now: u64,
    ) -> Result<u64> {
        self.gate.check_unpaused()?;
        require!(shares > 0, VaultError::ZeroAmount);
        require!(holder.shares >= shares, VaultError::InsufficientShares);

        let amount = self.preview_unstake(shares, pool_now)?;

        // holder.shares <= total_shares, so neither can underflow
        let total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::MathOverflow)?;

        self.total_shares = total_shares;
        holder.shares -= shares;

        Ok(amount)
    }
}

/// One holder's share balance in one pool.
#[account]
pub struct StakeAccount {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub shares: u64,
    pub bump: u8,
}

impl StakeAccount {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 1;

    pub const SEED_PREFIX: &'static [u8] = STAKE_SEED;

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    /// Bind a freshly created (or re-created after a full exit) account to
    /// its pool and owner. Already bound accounts are left alone.
    pub fn open(&mut self, pool: Pubkey, owner: Pubkey, bump: u8) {
        if self.is_initialized() {
            return;
        }
        self.pool = pool;
        self.owner = owner;
        self.shares = 0;
        self.bump = bump;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        super_admin: Pubkey,
        admin: Pubkey,
        pool: StakingPool,
        /// Tokens held by the pool's asset vault
        pool_balance: u64,
    }

    impl Fixture {
        fn new() -> Self {
            let super_admin = Pubkey::new_unique();
            let admin = Pubkey::new_unique();
            let pool = StakingPool {
                gate: AccessGate::new(super_admin, admin),
                asset_mint: Pubkey::new_unique(),
                asset_vault: Pubkey::new_unique(),
                total_shares: 0,
                pool_id: 0,
                bump: 255,
                _reserved: [0u8; 64],
            };
            Self {
                super_admin,
                admin,
                pool,
                pool_balance: 0,
            }
        }

        fn unpaused() -> Self {
            let mut fixture = Self::new();
            fixture.pool.gate.set_paused(fixture.admin, false).unwrap();
            fixture
        }

        fn holder(&self) -> StakeAccount {
            StakeAccount {
                pool: Pubkey::new_unique(),
                owner: Pubkey::new_unique(),
                shares: 0,
                bump: 254,
            }
        }

        fn stake(&mut self, holder: &mut StakeAccount, amount: u64) -> Result<u64> {
            let shares = self.pool.record_stake(holder, amount, self.pool_balance)?;
            self.pool_balance += amount;
            Ok(shares)
        }

        fn unstake(&mut self, holder: &mut StakeAccount, shares: u64) -> Result<u64> {
            let amount = self.pool.record_unstake(holder, shares, self.pool_balance)?;
            self.pool_balance -= amount;
            Ok(amount)
        }
    }

    #[test]
    fn test_gate_starts_paused() {
        let fixture = Fixture::new();
        assert!(fixture.pool.gate.paused);
        assert_eq!(fixture.pool.total_shares, 0);
        assert_eq!(
            fixture.pool.gate.check_unpaused().unwrap_err(),
            VaultError::Paused.into()
        );
    }

    #[test]
    fn test_set_super_admin() {
        let mut fixture = Fixture::new();
        let next = Pubkey::new_unique();
        let gate = &mut fixture.pool.gate;

        assert_eq!(
            gate.set_super_admin(fixture.admin, next).unwrap_err(),
            VaultError::Unauthorized.into()
        );
        gate.set_super_admin(fixture.super_admin, next).unwrap();
        assert_eq!(gate.super_admin, next);

        // the previous super admin lost the role
        assert_eq!(
            gate.set_super_admin(fixture.super_admin, fixture.super_admin)
                .unwrap_err(),
            VaultError::Unauthorized.into()
        );
    }

    #[test]
    fn test_set_admin() {
        let mut fixture = Fixture::new();
        let admin2 = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let gate = &mut fixture.pool.gate;

        assert_eq!(
            gate.set_admin(fixture.admin, admin2).unwrap_err(),
            VaultError::Unauthorized.into()
        );
        assert_eq!(
            gate.set_admin(admin2, other).unwrap_err(),
            VaultError::Unauthorized.into()
        );
        assert_eq!(gate.admin, fixture.admin);

        gate.set_admin(fixture.super_admin, admin2).unwrap();
        assert_eq!(gate.admin, admin2);
    }

    #[test]
    fn test_only_admin_can_pause() {
        let mut fixture = Fixture::new();
        let stranger = Pubkey::new_unique();
        let gate = &mut fixture.pool.gate;

        assert_eq!(
            gate.set_paused(stranger, false).unwrap_err(),
            VaultError::Unauthorized.into()
        );
        assert!(gate.paused);
        assert_eq!(
            gate.set_paused(fixture.super_admin, true).unwrap_err(),
            VaultError::Unauthorized.into()
        );

        gate.set_paused(fixture.admin, false).unwrap();
        assert!(!gate.paused);
        gate.set_paused(fixture.admin, true).unwrap();
        assert!(gate.paused);
    }

    #[test]
    fn test_redundant_pause_is_noop() {
        let mut fixture = Fixture::new();
        let gate = &mut fixture.pool.gate;

        gate.set_paused(fixture.admin, true).unwrap();
        gate.set_paused(fixture.admin, true).unwrap();
        assert!(gate.paused);

        gate.set_paused(fixture.admin, false).unwrap();
        gate.set_paused(fixture.admin, false).unwrap();
        assert!(!gate.paused);
    }

    #[test]
    fn test_stake_unstake_blocked_while_paused() {
        let mut fixture = Fixture::new();
        let mut holder = fixture.holder();

        assert_eq!(
            fixture.stake(&mut holder, 100).unwrap_err(),
            VaultError::Paused.into()
        );
        assert_eq!(fixture.pool.total_shares, 0);

        fixture.pool.gate.set_paused(fixture.admin, false).unwrap();
        assert_eq!(fixture.stake(&mut holder, 100).unwrap(), 100);

        fixture.pool.gate.set_paused(fixture.admin, true).unwrap();
        assert_eq!(
            fixture.unstake(&mut holder, 100).unwrap_err(),
            VaultError::Paused.into()
        );
        assert_eq!(holder.shares, 100);

        fixture.pool.gate.set_paused(fixture.admin, false).unwrap();
        assert_eq!(fixture.unstake(&mut holder, 100).unwrap(), 100);
        assert_eq!(holder.shares, 0);
        assert_eq!(fixture.pool_balance, 0);
    }

    #[test]
    fn test_first_stake_mints_one_to_one() {
        let mut fixture = Fixture::unpaused();
        let mut holder = fixture.holder();

        assert_eq!(holder.shares, 0);
        assert_eq!(fixture.stake(&mut holder, 100).unwrap(), 100);
        assert_eq!(holder.shares, 100);
        assert_eq!(fixture.pool.total_shares, 100);
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let mut fixture = Fixture::unpaused();
        let mut holder = fixture.holder();

        assert_eq!(
            fixture.stake(&mut holder, 0).unwrap_err(),
            VaultError::ZeroAmount.into()
        );
        fixture.stake(&mut holder, 10).unwrap();
        assert_eq!(
            fixture.unstake(&mut holder, 0).unwrap_err(),
            VaultError::ZeroAmount.into()
        );
    }

    #[test]
    fn test_stake_minting_zero_shares_is_rejected() {
        let mut fixture = Fixture::unpaused();
        let mut alice = fixture.holder();
        let mut bob = fixture.holder();

        fixture.stake(&mut alice, 100).unwrap();
        // external inflow: 10 tokens per share
        fixture.pool_balance += 900;

        assert_eq!(
            fixture.stake(&mut bob, 9).unwrap_err(),
            VaultError::ZeroShares.into()
        );
        assert_eq!(bob.shares, 0);
        assert_eq!(fixture.pool.total_shares, 100);
        assert_eq!(fixture.pool_balance, 1_000);

        assert_eq!(fixture.stake(&mut bob, 10).unwrap(), 1);
    }

    #[test]
    fn test_unstake_more_than_balance() {
        let mut fixture = Fixture::unpaused();
        let mut alice = fixture.holder();
        let mut bob = fixture.holder();

        fixture.stake(&mut alice, 100).unwrap();
        fixture.stake(&mut bob, 50).unwrap();

        assert_eq!(
            fixture.unstake(&mut bob, 51).unwrap_err(),
            VaultError::InsufficientShares.into()
        );
        assert_eq!(bob.shares, 50);
        assert_eq!(fixture.pool.total_shares, 150);
    }

    #[test]
    fn test_zero_payout_unstake_burns_shares() {
        let mut fixture = Fixture::unpaused();
        let mut alice = fixture.holder();

        fixture.stake(&mut alice, 1_000).unwrap();
        // pool lost value outside the program, 1 share is worth < 1 token
        fixture.pool_balance = 999;

        assert_eq!(fixture.unstake(&mut alice, 1).unwrap(), 0);
        assert_eq!(alice.shares, 999);
        assert_eq!(fixture.pool.total_shares, 999);
        assert_eq!(fixture.pool_balance, 999);
    }

    #[test]
    fn test_mint_and_burn_with_external_inflow() {
        let mut fixture = Fixture::unpaused();
        let mut alice = fixture.holder();
        let mut bob = fixture.holder();

        assert_eq!(fixture.stake(&mut alice, 100).unwrap(), 100);
        assert_eq!(fixture.stake(&mut bob, 100).unwrap(), 100);
        assert_eq!(fixture.pool_balance, 200);

        // balance added without staking: 2 tokens per share
        fixture.pool_balance += 200;

        assert_eq!(fixture.stake(&mut bob, 100).unwrap(), 50);
        assert_eq!(bob.shares, 150);
        assert_eq!(fixture.pool.total_shares, 250);
        assert_eq!(fixture.pool_balance, 500);

        assert_eq!(fixture.unstake(&mut bob, 50).unwrap(), 100);
        assert_eq!(bob.shares, 100);
        assert_eq!(fixture.pool.total_shares, 200);

        assert_eq!(fixture.unstake(&mut alice, 100).unwrap(), 200);
        assert_eq!(alice.shares, 0);
        assert_eq!(fixture.pool.total_shares, 100);

        assert_eq!(fixture.unstake(&mut bob, 100).unwrap(), 200);
        assert_eq!(bob.shares, 0);
        assert_eq!(fixture.pool.total_shares, 0);
        assert_eq!(fixture.pool_balance, 0);
    }

    #[test]
    fn test_full_drain_resets_bootstrap() {
        let mut fixture = Fixture::unpaused();
        let mut alice = fixture.holder();
        let mut bob = fixture.holder();

        fixture.stake(&mut alice, 333).unwrap();
        fixture.pool_balance += 1;
        fixture.stake(&mut bob, 1_000).unwrap();

        let alice_shares = alice.shares;
        let bob_shares = bob.shares;
        fixture.unstake(&mut alice, alice_shares).unwrap();
        fixture.unstake(&mut bob, bob_shares).unwrap();
        assert_eq!(fixture.pool.total_shares, 0);

        // dust may remain in the pool but pricing starts over at 1:1
        let mut carol = fixture.holder();
        assert_eq!(fixture.stake(&mut carol, 42).unwrap(), 42);
    }

    #[test]
    fn test_restake_after_full_exit_reopens_account() {
        let mut fixture = Fixture::unpaused();
        let pool_key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let mut alice = StakeAccount {
            pool: Pubkey::default(),
            owner: Pubkey::default(),
            shares: 0,
            bump: 0,
        };
        alice.open(pool_key, owner, 253);
        fixture.stake(&mut alice, 100).unwrap();
        fixture.unstake(&mut alice, 100).unwrap();
        assert_eq!(fixture.pool.total_shares, 0);

        // closed on exit, then created again zeroed by the next stake
        let mut reopened = StakeAccount {
            pool: Pubkey::default(),
            owner: Pubkey::default(),
            shares: 0,
            bump: 0,
        };
        assert!(!reopened.is_initialized());
        reopened.open(pool_key, owner, 253);
        assert_eq!(reopened.owner, owner);
        assert_eq!(reopened.pool, pool_key);
        assert_eq!(fixture.stake(&mut reopened, 70).unwrap(), 70);
        assert_eq!(reopened.shares, 70);

        // a bound account keeps its balance
        reopened.open(Pubkey::new_unique(), Pubkey::new_unique(), 1);
        assert_eq!(reopened.owner, owner);
        assert_eq!(reopened.shares, 70);
    }

    #[test]
    fn test_rounding_never_pays_out_more_than_staked() {
        let mut fixture = Fixture::unpaused();
        let mut holders: Vec<StakeAccount> = (0..3).map(|_| fixture.holder()).collect();
        let deposits = [7u64, 13, 101, 3, 29, 57, 11, 5, 97];

        let mut staked = 0u64;
        let mut paid = 0u64;
        for (i, amount) in deposits.iter().enumerate() {
            let holder = &mut holders[i % 3];
            if fixture.stake(holder, *amount).is_ok() {
                staked += amount;
            }
            // partial exits between deposits
            if i % 2 == 1 && holder.shares > 1 {
                let half = holder.shares / 2;
                paid += fixture.unstake(holder, half).unwrap();
            }
        }

        for holder in holders.iter_mut() {
            let shares = holder.shares;
            if shares > 0 {
                paid += fixture.unstake(holder, shares).unwrap();
            }
        }

        assert!(paid <= staked);
        assert_eq!(paid + fixture.pool_balance, staked);
        assert_eq!(fixture.pool.total_shares, 0);
    }

    #[test]
    fn test_failed_stake_leaves_state_untouched() {
        let mut fixture = Fixture::unpaused();
        let mut alice = fixture.holder();
        fixture.stake(&mut alice, 1).unwrap();

        // the holder's balance is already at the limit
        let total_before = fixture.pool.total_shares;
        let mut whale = fixture.holder();
        whale.shares = u64::MAX;
        assert_eq!(
            fixture.pool.record_stake(&mut whale, 10, 1).unwrap_err(),
            VaultError::MathOverflow.into()
        );
        assert_eq!(fixture.pool.total_shares, total_before);
        assert_eq!(whale.shares, u64::MAX);
    }
}
