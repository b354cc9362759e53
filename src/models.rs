use {
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
};

/// Store-assigned account identifier. Ids are handed out sequentially
/// starting at 0 and are never reused.
pub type AccountId = u32;

/// Transaction sequence number, an opaque receipt for a successful mutation.
pub type TxId = u64;

/// A single-currency account. The balance never drops below zero at any
/// point observable outside the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Decimal,
}

impl Account {
    pub fn new(id: AccountId) -> Self {
        Account {
            id,
            balance: Decimal::ZERO,
        }
    }

    pub fn has_funds(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    pub fn increase_by(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    pub fn decrease_by(&mut self, amount: Decimal) {
        self.balance -= amount;
    }
}

/// Caller-supplied instruction to move funds between two accounts.
/// Transient; consumed by a single ledger call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferInstruction {
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Decimal,
}

/// Caller-supplied instruction to top up a single account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpInstruction {
    pub amount: Decimal,
}

/// Receipt returned for every successful mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_id: TxId,
}
