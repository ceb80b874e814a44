use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Unauthorized - caller does not hold the required role")]
    Unauthorized,

    #[msg("Pool is paused")]
    Paused,

    #[msg("Deposit too small to mint any shares")]
    ZeroShares,

    #[msg("Insufficient shares balance")]
    InsufficientShares,

    #[msg("Asset transfer failed")]
    TransferFailed,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Arithmetic overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Account does not hold the pool's asset")]
    InvalidAssetMint,

    #[msg("Token account is not owned by the signer")]
    InvalidTokenAccountOwner,

    #[msg("Asset vault does not belong to this pool")]
    InvalidAssetVault,

    #[msg("Stake account does not belong to this pool and owner")]
    InvalidStakeAccount,
}
