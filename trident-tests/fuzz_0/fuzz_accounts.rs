use trident_fuzz::fuzzing::*;

/// Storage for all account addresses used in fuzz testing.
///
/// Docs: https://ackee.xyz/trident/docs/latest/trident-api-macro/trident-types/fuzz-accounts/
#[derive(Default)]
pub struct AccountAddresses {
    pub payer: AddressStorage,

    pub pool: AddressStorage,

    pub asset_mint: AddressStorage,

    pub asset_vault: AddressStorage,

    pub user: AddressStorage,

    pub user_asset_account: AddressStorage,

    pub stake_account: AddressStorage,

    pub caller: AddressStorage,

    pub asset_token_program: AddressStorage,

    pub associated_token_program: AddressStorage,

    pub system_program: AddressStorage,
}
