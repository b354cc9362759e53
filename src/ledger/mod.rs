//! The ledger store: owns all account state and the transaction counter,
//! and serializes every mutation.

pub mod error;
pub mod interface;

use {
    crate::{
        ledger::{error::LedgerError, interface::LedgerInterface},
        models::{Account, AccountId, TransferInstruction, TxId},
    },
    rust_decimal::Decimal,
    std::sync::{Mutex, MutexGuard},
};

/// In-memory account store. A single lock covers the account table and the
/// transaction counter, so every operation observes fully consistent state.
#[derive(Default)]
pub struct Ledger {
    state: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    // Account ids are indices into this table; the next id is always len().
    accounts: Vec<Account>,
    sequence: TxId,
}

impl LedgerState {
    fn contains(&self, id: AccountId) -> bool {
        (id as usize) < self.accounts.len()
    }

    fn next_sequence(&mut self) -> TxId {
        self.sequence += 1;
        self.sequence
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire_state_lock(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state.lock().map_err(|_| LedgerError::StatePoisoned)
    }
}

impl LedgerInterface for Ledger {
    fn open_account(&self) -> Result<AccountId, LedgerError> {
        let mut state = self.acquire_state_lock()?;

        if state.accounts.len() == AccountId::MAX as usize {
            return Err(LedgerError::CapacityExceeded);
        }

        let id = state.accounts.len() as AccountId;
        state.accounts.push(Account::new(id));
        state.next_sequence();

        Ok(id)
    }

    fn account(&self, id: AccountId) -> Result<Account, LedgerError> {
        let state = self.acquire_state_lock()?;

        state
            .accounts
            .get(id as usize)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(id))
    }

    fn credit(&self, id: AccountId, amount: Decimal) -> Result<TxId, LedgerError> {
        let mut state = self.acquire_state_lock()?;

        if !state.contains(id) {
            return Err(LedgerError::AccountNotFound(id));
        }

        // The caller-facing layer validates amounts too, but the store is the
        // last line of defense for the non-negative balance invariant.
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }

        state.accounts[id as usize].increase_by(amount);

        Ok(state.next_sequence())
    }

    fn transfer(&self, instruction: &TransferInstruction) -> Result<TxId, LedgerError> {
        let mut state = self.acquire_state_lock()?;

        if !state.contains(instruction.source) {
            return Err(LedgerError::SourceAccountNotFound(instruction.source));
        }

        if !state.contains(instruction.destination) {
            return Err(LedgerError::DestinationAccountNotFound(instruction.destination));
        }

        if instruction.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(instruction.amount));
        }

        if !state.accounts[instruction.source as usize].has_funds(instruction.amount) {
            return Err(LedgerError::InsufficientFunds);
        }

        // A transfer to self nets to zero. Skipping the mutation keeps the
        // balance untouched while still consuming a sequence number.
        if instruction.source != instruction.destination {
            state.accounts[instruction.source as usize].decrease_by(instruction.amount);
            state.accounts[instruction.destination as usize].increase_by(instruction.amount);
        }

        Ok(state.next_sequence())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        rust_decimal_macros::dec,
        std::{sync::Arc, thread},
    };

    fn transfer_of(source: AccountId, destination: AccountId, amount: Decimal) -> TransferInstruction {
        TransferInstruction {
            source,
            destination,
            amount,
        }
    }

    #[test]
    fn opens_accounts_with_sequential_ids() {
        let ledger = Ledger::new();

        assert_eq!(Ok(0), ledger.open_account());
        assert_eq!(Ok(1), ledger.open_account());
        assert_eq!(Ok(2), ledger.open_account());
    }

    #[test]
    fn newly_opened_account_has_zero_balance() {
        let ledger = Ledger::new();
        let id = ledger.open_account().unwrap();

        let account = ledger.account(id).unwrap();
        assert_eq!(id, account.id);
        assert_eq!(Decimal::ZERO, account.balance);
    }

    #[test]
    fn missing_account_is_not_found() {
        let ledger = Ledger::new();

        assert_eq!(Err(LedgerError::AccountNotFound(0)), ledger.account(0));

        ledger.open_account().unwrap();
        assert_eq!(Err(LedgerError::AccountNotFound(100)), ledger.account(100));
    }

    #[test]
    fn repeated_reads_return_identical_snapshots() {
        let ledger = Ledger::new();
        let id = ledger.open_account().unwrap();
        ledger.credit(id, dec!(7.25)).unwrap();

        assert_eq!(ledger.account(id), ledger.account(id));
    }

    #[test]
    fn credit_increases_balance() {
        let ledger = Ledger::new();
        let id = ledger.open_account().unwrap();

        ledger.credit(id, dec!(100)).unwrap();

        assert_eq!(dec!(100), ledger.account(id).unwrap().balance);
    }

    #[test]
    fn credit_rejects_missing_account() {
        let ledger = Ledger::new();

        assert_eq!(
            Err(LedgerError::AccountNotFound(999)),
            ledger.credit(999, dec!(10))
        );
    }

    #[test]
    fn credit_rejects_non_positive_amounts() {
        let ledger = Ledger::new();
        let id = ledger.open_account().unwrap();

        assert_eq!(
            Err(LedgerError::InvalidAmount(dec!(0))),
            ledger.credit(id, dec!(0))
        );
        assert_eq!(
            Err(LedgerError::InvalidAmount(dec!(-5))),
            ledger.credit(id, dec!(-5))
        );
        assert_eq!(Decimal::ZERO, ledger.account(id).unwrap().balance);
    }

    #[test]
    fn transfer_moves_funds() {
        let ledger = Ledger::new();
        let first = ledger.open_account().unwrap();
        let second = ledger.open_account().unwrap();
        ledger.credit(first, dec!(10)).unwrap();

        ledger
            .transfer(&transfer_of(first, second, dec!(5)))
            .unwrap();

        assert_eq!(dec!(5), ledger.account(first).unwrap().balance);
        assert_eq!(dec!(5), ledger.account(second).unwrap().balance);
    }

    #[test]
    fn transfer_requires_existing_source() {
        let ledger = Ledger::new();
        let destination = ledger.open_account().unwrap();

        assert_eq!(
            Err(LedgerError::SourceAccountNotFound(10)),
            ledger.transfer(&transfer_of(10, destination, dec!(10)))
        );
    }

    #[test]
    fn transfer_requires_existing_destination() {
        let ledger = Ledger::new();
        let source = ledger.open_account().unwrap();

        assert_eq!(
            Err(LedgerError::DestinationAccountNotFound(10)),
            ledger.transfer(&transfer_of(source, 10, dec!(10)))
        );
    }

    #[test]
    fn transfer_rejects_insufficient_funds() {
        let ledger = Ledger::new();
        let first = ledger.open_account().unwrap();
        let second = ledger.open_account().unwrap();

        assert_eq!(
            Err(LedgerError::InsufficientFunds),
            ledger.transfer(&transfer_of(first, second, dec!(10)))
        );
        assert_eq!(Decimal::ZERO, ledger.account(first).unwrap().balance);
        assert_eq!(Decimal::ZERO, ledger.account(second).unwrap().balance);
    }

    #[test]
    fn transfer_rejects_non_positive_amounts() {
        let ledger = Ledger::new();
        let first = ledger.open_account().unwrap();
        let second = ledger.open_account().unwrap();
        ledger.credit(first, dec!(10)).unwrap();

        assert_eq!(
            Err(LedgerError::InvalidAmount(dec!(0))),
            ledger.transfer(&transfer_of(first, second, dec!(0)))
        );
        assert_eq!(
            Err(LedgerError::InvalidAmount(dec!(-5))),
            ledger.transfer(&transfer_of(first, second, dec!(-5)))
        );
        assert_eq!(dec!(10), ledger.account(first).unwrap().balance);
        assert_eq!(Decimal::ZERO, ledger.account(second).unwrap().balance);
    }

    #[test]
    fn transfer_to_self_keeps_balance_and_consumes_a_sequence_number() {
        let ledger = Ledger::new();
        let id = ledger.open_account().unwrap();
        ledger.credit(id, dec!(10)).unwrap();

        let before = ledger.transfer(&transfer_of(id, id, dec!(4))).unwrap();
        assert_eq!(dec!(10), ledger.account(id).unwrap().balance);

        // The funds check still applies to a self-transfer.
        assert_eq!(
            Err(LedgerError::InsufficientFunds),
            ledger.transfer(&transfer_of(id, id, dec!(11)))
        );

        let after = ledger.credit(id, dec!(1)).unwrap();
        assert_eq!(before + 1, after);
    }

    #[test]
    fn sequence_numbers_are_strictly_increasing() {
        let ledger = Ledger::new();
        let first = ledger.open_account().unwrap();
        let second = ledger.open_account().unwrap();

        // Opening the two accounts consumed sequence numbers 1 and 2.
        assert_eq!(3, ledger.credit(first, dec!(5)).unwrap());
        assert_eq!(4, ledger.credit(second, dec!(5)).unwrap());
        assert_eq!(
            5,
            ledger
                .transfer(&transfer_of(first, second, dec!(1)))
                .unwrap()
        );
    }

    #[test]
    fn failed_operations_do_not_advance_the_sequence() {
        let ledger = Ledger::new();
        let first = ledger.open_account().unwrap();
        let second = ledger.open_account().unwrap();
        let before = ledger.credit(first, dec!(5)).unwrap();

        assert!(ledger.credit(first, dec!(0)).is_err());
        assert!(ledger.credit(42, dec!(1)).is_err());
        assert!(
            ledger
                .transfer(&transfer_of(first, second, dec!(50)))
                .is_err()
        );

        assert_eq!(before + 1, ledger.credit(second, dec!(1)).unwrap());
    }

    /// After a series of interleaved back-and-forth transfers of the same
    /// amount between two accounts, their sum must stay the same.
    #[test]
    fn interleaved_transfers_conserve_the_total() {
        let ledger = Arc::new(Ledger::new());
        let first = ledger.open_account().unwrap();
        let second = ledger.open_account().unwrap();
        ledger.credit(first, dec!(10)).unwrap();

        let mut instructions = Vec::with_capacity(200);
        for _ in 0..100 {
            instructions.push(transfer_of(first, second, dec!(5)));
            instructions.push(transfer_of(second, first, dec!(5)));
        }

        let mut workers = Vec::new();
        for batch in instructions.chunks(50) {
            let ledger = Arc::clone(&ledger);
            let batch = batch.to_vec();
            workers.push(thread::spawn(move || {
                for instruction in batch {
                    // Insufficient funds is expected on some interleavings.
                    let _ = ledger.transfer(&instruction);
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }

        let first_balance = ledger.account(first).unwrap().balance;
        let second_balance = ledger.account(second).unwrap().balance;
        assert_eq!(dec!(10), first_balance + second_balance);
        assert!(first_balance >= Decimal::ZERO);
        assert!(second_balance >= Decimal::ZERO);
    }
}
