#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub mod ledger;

/// # Prize Ledger
///
/// **Role:** Sells escalating-price entries, pools 95% of every entry into a
/// communal prize balance and keeps 5% as owner fees.  A single owner pays out
/// prizes and administers the ledger.
///
/// ```text
///   ENTRY PRICE:  base_fee + base_fee × step_bps × buy_in_count / 10 000
///   SPLIT:        prize 95%  |  owner 5% (+ rounding remainder)
/// ```
///
/// All accounting lives in [`ledger::Ledger`].  This contract only reads the
/// environment (caller, transferred value, balance), runs the ledger
/// operation and settles the returned receipt: value transfers first, then
/// events.  The ledger has already committed its balances by the time any
/// value leaves the contract.
#[ink::contract]
mod prize_ledger {
    use crate::ledger::{
        Error, Ledger, LedgerEvent, Receipt, DEFAULT_BASE_FEE, DEFAULT_STEP_BPS,
    };

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct PrizeLedger {
        ledger: Ledger,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl PrizeLedger {
        /// Deploys with a 2.5 unit base fee and a 10% escalation step.
        #[ink(constructor)]
        pub fn new() -> Self {
            Self::with_config(DEFAULT_BASE_FEE, DEFAULT_STEP_BPS)
        }

        #[ink(constructor)]
        pub fn with_config(base_fee: Balance, step_bps: u32) -> Self {
            Self {
                ledger: Ledger::new(Self::env().caller(), base_fee, step_bps),
            }
        }

        // =====================================================================
        // ENTRIES & FUNDING
        // =====================================================================

        /// Current price of one entry.
        #[ink(message)]
        pub fn action_cost(&self) -> Balance {
            self.ledger.action_cost()
        }

        /// Buy one entry at `action_cost()`. Any overpayment is refunded to
        /// the caller in the same call.
        #[ink(message, payable)]
        pub fn buy_in(&mut self) -> Result<(), Error> {
            let caller = self.env().caller();
            let payment = self.env().transferred_value();
            let receipt = self.ledger.buy_in(caller, payment)?;
            self.settle(receipt)
        }

        /// Credit the whole transferred value to the prize pool.
        #[ink(message, payable)]
        pub fn fund_prize_pool(&mut self) -> Result<(), Error> {
            let caller = self.env().caller();
            let amount = self.env().transferred_value();
            let receipt = self.ledger.fund_prize_pool(caller, amount)?;
            self.settle(receipt)
        }

        // =====================================================================
        // ADMIN
        // =====================================================================

        #[ink(message)]
        pub fn payout(&mut self, recipient: AccountId, amount: Balance) -> Result<(), Error> {
            let receipt = self.ledger.payout(self.env().caller(), recipient, amount)?;
            self.settle(receipt)
        }

        #[ink(message)]
        pub fn withdraw_owner_fees(&mut self) -> Result<(), Error> {
            let receipt = self.ledger.withdraw_owner_fees(self.env().caller())?;
            self.settle(receipt)
        }

        #[ink(message)]
        pub fn reset_cost(&mut self) -> Result<(), Error> {
            let receipt = self.ledger.reset_cost(self.env().caller())?;
            self.settle(receipt)
        }

        /// Zero the prize pool, owner fees and escalation counter, and send
        /// both balances to the owner.
        #[ink(message)]
        pub fn drain(&mut self) -> Result<(), Error> {
            let receipt = self.ledger.drain(self.env().caller())?;
            self.settle(receipt)
        }

        #[ink(message)]
        pub fn update_base_fee(&mut self, new_fee: Balance) -> Result<(), Error> {
            let receipt = self.ledger.update_base_fee(self.env().caller(), new_fee)?;
            self.settle(receipt)
        }

        /// Pausing blocks `buy_in` and `fund_prize_pool` only.
        #[ink(message)]
        pub fn toggle_pause(&mut self) -> Result<(), Error> {
            let paused = self.ledger.toggle_pause(self.env().caller())?;
            ink::env::debug_println!("prize_ledger: paused = {}", paused);
            Ok(())
        }

        // =====================================================================
        // VIEW FUNCTIONS
        // =====================================================================

        /// Native balance held by this contract.
        #[ink(message)]
        pub fn get_contract_balance(&self) -> Balance {
            self.env().balance()
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.ledger.owner()
        }

        #[ink(message)]
        pub fn base_fee(&self) -> Balance {
            self.ledger.base_fee()
        }

        #[ink(message)]
        pub fn escalation_step_bps(&self) -> u32 {
            self.ledger.step_bps()
        }

        #[ink(message)]
        pub fn buy_in_count(&self) -> u64 {
            self.ledger.buy_in_count()
        }

        #[ink(message)]
        pub fn total_buy_ins(&self) -> u64 {
            self.ledger.total_buy_ins()
        }

        #[ink(message)]
        pub fn prize_pool(&self) -> Balance {
            self.ledger.prize_pool()
        }

        /// Same as `prize_pool`, kept for front-ends that query this name.
        #[ink(message)]
        pub fn prize_pool_amount(&self) -> Balance {
            self.ledger.prize_pool()
        }

        #[ink(message)]
        pub fn owner_fees(&self) -> Balance {
            self.ledger.owner_fees()
        }

        #[ink(message)]
        pub fn paused(&self) -> bool {
            self.ledger.paused()
        }

        // =====================================================================
        // INTERNAL — Settlement
        // =====================================================================

        /// Carry out a committed receipt. A refused transfer fails the whole
        /// message, which reverts the ledger update along with it.
        fn settle(&mut self, receipt: Receipt) -> Result<(), Error> {
            for transfer in &receipt.transfers {
                if self.env().transfer(transfer.to, transfer.amount).is_err() {
                    ink::env::debug_println!(
                        "prize_ledger: transfer of {} refused",
                        transfer.amount
                    );
                    return Err(Error::TransferFailed);
                }
            }

            for event in receipt.events {
                match event {
                    LedgerEvent::BuyIn(e) => self.env().emit_event(e),
                    LedgerEvent::PrizeFunded(e) => self.env().emit_event(e),
                    LedgerEvent::Payout(e) => self.env().emit_event(e),
                    LedgerEvent::OwnerFeesWithdrawn(e) => self.env().emit_event(e),
                    LedgerEvent::CostReset(e) => self.env().emit_event(e),
                    LedgerEvent::ContractDrained(e) => self.env().emit_event(e),
                    LedgerEvent::BaseFeeUpdated(e) => self.env().emit_event(e),
                }
            }

            Ok(())
        }
    }

    impl Default for PrizeLedger {
        fn default() -> Self {
            Self::new()
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

}
