use {
    crate::{
        ledger::error::LedgerError,
        models::{Account, AccountId, TransferInstruction, TxId},
    },
    rust_decimal::Decimal,
};

/// The synchronous call surface of the ledger store. Every operation is
/// fully resolved before it returns; none spawns background work.
pub trait LedgerInterface {
    /// Opens a new zero-balance account and returns its id.
    fn open_account(&self) -> Result<AccountId, LedgerError>;

    /// Gets a read-only snapshot of an account.
    fn account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Increases an account balance by a strictly positive amount and
    /// returns the transaction sequence number.
    fn credit(&self, id: AccountId, amount: Decimal) -> Result<TxId, LedgerError>;

    /// Atomically moves funds between two accounts and returns the
    /// transaction sequence number.
    fn transfer(&self, instruction: &TransferInstruction) -> Result<TxId, LedgerError>;
}
