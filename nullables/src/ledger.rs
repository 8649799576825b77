//! Nullable token ledger: programmable balances for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use quorum_governance::TokenWeightOracle;
use quorum_types::{Address, TokenClass};

/// An in-memory token ledger. Unknown holders have a zero balance.
#[derive(Default)]
pub struct NullTokenLedger {
    balances: RwLock<HashMap<(TokenClass, Address), u64>>,
}

impl NullTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`NullTokenLedger::set_balance`].
    pub fn with_balance(self, holder: &Address, token_class: &TokenClass, amount: u64) -> Self {
        self.set_balance(holder, token_class, amount);
        self
    }

    /// Overwrite a holder's balance.
    pub fn set_balance(&self, holder: &Address, token_class: &TokenClass, amount: u64) {
        self.balances
            .write()
            .unwrap()
            .insert((token_class.clone(), holder.clone()), amount);
    }
}

impl TokenWeightOracle for NullTokenLedger {
    fn balance_of(&self, holder: &Address, token_class: &TokenClass) -> u64 {
        self.balances
            .read()
            .unwrap()
            .get(&(token_class.clone(), holder.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self, token_class: &TokenClass) -> u64 {
        self.balances
            .read()
            .unwrap()
            .iter()
            .filter(|((class, _), _)| class == token_class)
            .fold(0u64, |acc, (_, amount)| acc.saturating_add(*amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balances_are_per_token_class() {
        let gov = TokenClass::new("gov");
        let other = TokenClass::new("other");
        let alice = Address::new("qrm_alice");
        let bob = Address::new("qrm_bob");
        let ledger = NullTokenLedger::new()
            .with_balance(&alice, &gov, 100)
            .with_balance(&bob, &gov, 50)
            .with_balance(&alice, &other, 7);

        assert_eq!(ledger.balance_of(&alice, &gov), 100);
        assert_eq!(ledger.balance_of(&alice, &other), 7);
        assert_eq!(ledger.balance_of(&Address::new("qrm_carol"), &gov), 0);
        assert_eq!(ledger.total_supply(&gov), 150);

        ledger.set_balance(&bob, &gov, 0);
        assert_eq!(ledger.total_supply(&gov), 100);
    }
}
