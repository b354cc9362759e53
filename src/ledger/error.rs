use {crate::models::AccountId, rust_decimal::Decimal, thiserror::Error};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("there is no account with id: {0}")]
    AccountNotFound(AccountId),
    #[error("source account {0} does not exist")]
    SourceAccountNotFound(AccountId),
    #[error("destination account {0} does not exist")]
    DestinationAccountNotFound(AccountId),
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("the account id space is exhausted")]
    CapacityExceeded,
    #[error("failed to acquire the ledger state lock")]
    StatePoisoned,
}
