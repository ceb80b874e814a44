use anchor_lang::prelude::Pubkey;
use fuzz_accounts::*;
use share_vault::state::{AccessGate, StakeAccount, StakingPool};
use trident_fuzz::fuzzing::*;
mod fuzz_accounts;

const HOLDERS: usize = 4;

/// Mirror of the pool's token balance and cumulative flows for invariant checks
#[derive(Default, Clone)]
struct FlowTracker {
    pool_balance: u64,
    deposited: u64,
    injected: u64,
    paid_out: u64,
}

struct PoolModel {
    admin: Pubkey,
    pool: StakingPool,
    holders: Vec<StakeAccount>,
}

impl PoolModel {
    fn new() -> Self {
        let super_admin = Pubkey::new_unique();
        let admin = Pubkey::new_unique();
        let pool_key = Pubkey::new_unique();
        let mut pool = StakingPool {
            gate: AccessGate::new(super_admin, admin),
            asset_mint: Pubkey::new_unique(),
            asset_vault: Pubkey::new_unique(),
            total_shares: 0,
            pool_id: 0,
            bump: 255,
            _reserved: [0u8; 64],
        };
        pool.gate
            .set_paused(admin, false)
            .expect("admin can unpause");

        let holders = (0..HOLDERS)
            .map(|_| StakeAccount {
                pool: pool_key,
                owner: Pubkey::new_unique(),
                shares: 0,
                bump: 255,
            })
            .collect();

        Self {
            admin,
            pool,
            holders,
        }
    }

    fn sum_of_balances(&self) -> u64 {
        self.holders.iter().map(|holder| holder.shares).sum()
    }
}

#[derive(FuzzTestMethods)]
struct FuzzTest {
    trident: Trident,
    fuzz_accounts: AccountAddresses,
    model: PoolModel,
    tracker: FlowTracker,
}

#[flow_executor]
impl FuzzTest {
    fn new() -> Self {
        Self {
            trident: Trident::default(),
            fuzz_accounts: AccountAddresses::default(),
            model: PoolModel::new(),
            tracker: FlowTracker::default(),
        }
    }

    #[init]
    fn start(&mut self) {
        self.model = PoolModel::new();
        self.tracker = FlowTracker::default();
    }

    /// Stake a random amount from a random holder
    #[flow]
    fn flow_stake(&mut self) {
        let index = rand::random::<usize>() % HOLDERS;
        let amount = rand::random::<u64>() % 1_000_000_000_000;

        let pool_before = self.tracker.pool_balance;
        let total_before = self.model.pool.total_shares;
        let holder_before = self.model.holders[index].shares;
        let paused = self.model.pool.gate.paused;

        let result = self.model.pool.record_stake(
            &mut self.model.holders[index],
            amount,
            pool_before,
        );

        match result {
            Ok(shares) => {
                assert!(!paused, "Invariant: no stake while paused");
                let expected = if total_before == 0 {
                    amount
                } else {
                    ((amount as u128) * (total_before as u128) / (pool_before as u128)) as u64
                };
                assert_eq!(shares, expected, "Invariant: mint follows pro-rata formula");
                assert!(shares > 0, "Invariant: successful stake mints shares");

                self.tracker.pool_balance += amount;
                self.tracker.deposited += amount;
            }
            Err(_) => {
                assert_eq!(self.model.pool.total_shares, total_before);
                assert_eq!(self.model.holders[index].shares, holder_before);
            }
        }

        self.check_invariants();
    }

    /// Unstake part or all of a random holder's balance
    #[flow]
    fn flow_unstake(&mut self) {
        let index = rand::random::<usize>() % HOLDERS;
        let balance = self.model.holders[index].shares;
        if balance == 0 {
            return;
        }
        let shares = rand::random::<u64>() % balance + 1;

        let pool_now = self.tracker.pool_balance;
        let total_before = self.model.pool.total_shares;
        let paused = self.model.pool.gate.paused;

        let result = self.model.pool.record_unstake(
            &mut self.model.holders[index],
            shares,
            pool_now,
        );

        match result {
            Ok(amount) => {
                assert!(!paused, "Invariant: no unstake while paused");
                let expected =
                    ((shares as u128) * (pool_now as u128) / (total_before as u128)) as u64;
                assert_eq!(amount, expected, "Invariant: payout follows pro-rata formula");
                assert!(amount <= pool_now, "Invariant: cannot pay out more than held");
                assert_eq!(self.model.pool.total_shares, total_before - shares);

                self.tracker.pool_balance -= amount;
                self.tracker.paid_out += amount;
            }
            Err(_) => {
                assert!(paused, "Unstake within balance only fails while paused");
                assert_eq!(self.model.pool.total_shares, total_before);
                assert_eq!(self.model.holders[index].shares, balance);
            }
        }

        self.check_invariants();
    }

    /// Tokens land in the pool without a stake
    #[flow]
    fn flow_external_inflow(&mut self) {
        let amount = rand::random::<u64>() % 1_000_000_000;
        self.tracker.pool_balance += amount;
        self.tracker.injected += amount;

        self.check_invariants();
    }

    /// Admin flips the pause switch
    #[flow]
    fn flow_toggle_pause(&mut self) {
        let paused = !self.model.pool.gate.paused;
        self.model
            .pool
            .gate
            .set_paused(self.model.admin, paused)
            .expect("admin can toggle pause");

        let stranger = Pubkey::new_unique();
        assert!(
            self.model.pool.gate.set_paused(stranger, !paused).is_err(),
            "Invariant: only the admin can pause"
        );
        assert_eq!(self.model.pool.gate.paused, paused);
    }

    #[end]
    fn end(&mut self) {
        self.model
            .pool
            .gate
            .set_paused(self.model.admin, false)
            .expect("admin can unpause");

        // Everyone exits
        for index in 0..HOLDERS {
            let shares = self.model.holders[index].shares;
            if shares == 0 {
                continue;
            }
            let amount = self
                .model
                .pool
                .record_unstake(
                    &mut self.model.holders[index],
                    shares,
                    self.tracker.pool_balance,
                )
                .expect("holder can redeem full balance");
            self.tracker.pool_balance -= amount;
            self.tracker.paid_out += amount;
        }

        assert_eq!(
            self.model.pool.total_shares, 0,
            "Invariant: full drain leaves no shares"
        );
        assert!(
            self.tracker.paid_out <= self.tracker.deposited + self.tracker.injected,
            "Invariant: rounding never pays out more than the pool received"
        );

        // Bootstrap pricing is back
        let shares = self
            .model
            .pool
            .record_stake(&mut self.model.holders[0], 1_000, self.tracker.pool_balance)
            .expect("stake into drained pool");
        assert_eq!(shares, 1_000, "Invariant: drained pool mints 1:1");
    }

    fn check_invariants(&self) {
        assert_eq!(
            self.model.pool.total_shares,
            self.model.sum_of_balances(),
            "Invariant: total shares equals the sum of holder balances"
        );
        assert_eq!(
            self.tracker.pool_balance,
            self.tracker.deposited + self.tracker.injected - self.tracker.paid_out,
            "Invariant: pool balance accounts for every flow"
        );

        // Every holder's fair claim is covered by the pool
        if self.model.pool.total_shares > 0 {
            let claims: u128 = self
                .model
                .holders
                .iter()
                .map(|holder| {
                    (holder.shares as u128) * (self.tracker.pool_balance as u128)
                        / (self.model.pool.total_shares as u128)
                })
                .sum();
            assert!(
                claims <= self.tracker.pool_balance as u128,
                "Invariant: pool covers all entitlements"
            );
        }
    }
}

fn main() {
    // Run 1000 iterations with up to 100 flows per iteration
    FuzzTest::fuzz(1000, 100);
}
