use thiserror::Error;

use crate::token::TransferError;
use assay_store::StoreError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("insufficient stake: need {needed}, available {available}")]
    InsufficientStake { needed: u128, available: u128 },

    #[error("withdrawal cursor may not move backwards: {current} -> {requested}")]
    CursorRegression { current: u64, requested: u64 },

    #[error("arithmetic overflow in stake accounting")]
    Overflow,

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
