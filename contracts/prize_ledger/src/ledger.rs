//! Ledger core for the Prize Ledger contract.
//!
//! [`Ledger`] is the whole accounting state machine. It never touches the
//! contract environment: every write operation validates its inputs, applies
//! its state changes and hands back a [`Receipt`] describing the value
//! transfers and events the contract shell must carry out afterwards.
//!
//! ```text
//!   caller ──► PrizeLedger (shell) ──► Ledger::op() ──► Receipt
//!                    │                                    │
//!                    └──── transfers, then emit events ◄──┘
//! ```

use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

pub type Balance = u128;

// =========================================================================
// CONSTANTS
// =========================================================================

/// One whole currency unit (18 decimals).
pub const UNIT: Balance = 1_000_000_000_000_000_000;

/// Default entry price floor: 2.5 units.
pub const DEFAULT_BASE_FEE: Balance = 2 * UNIT + UNIT / 2;

/// Default escalation: each entry sold adds 10% of the base fee.
pub const DEFAULT_STEP_BPS: u32 = 1_000;

/// Basis points denominator.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Share of every entry price credited to the prize pool.
pub const PRIZE_SHARE_PERCENT: Balance = 95;

pub const PERCENT_DENOMINATOR: Balance = 100;

// =========================================================================
// EVENTS
// =========================================================================

/// An entry was sold.
#[ink::event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyIn {
    #[ink(topic)]
    pub buyer: AccountId,
    pub cost: Balance,
    pub buy_in_count: u64,
}

#[ink::event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeFunded {
    #[ink(topic)]
    pub funder: AccountId,
    pub amount: Balance,
}

#[ink::event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    #[ink(topic)]
    pub recipient: AccountId,
    pub amount: Balance,
}

#[ink::event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerFeesWithdrawn {
    #[ink(topic)]
    pub owner: AccountId,
    pub amount: Balance,
}

/// Escalation counter returned to zero. `buy_in_count` is always 0.
#[ink::event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostReset {
    pub buy_in_count: u64,
}

/// Carries the balances as they were before the drain.
#[ink::event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDrained {
    pub prize_pool: Balance,
    pub owner_fees: Balance,
}

#[ink::event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseFeeUpdated {
    pub old_fee: Balance,
    pub new_fee: Balance,
}

/// Every record the ledger can append to the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    BuyIn(BuyIn),
    PrizeFunded(PrizeFunded),
    Payout(Payout),
    OwnerFeesWithdrawn(OwnerFeesWithdrawn),
    CostReset(CostReset),
    ContractDrained(ContractDrained),
    BaseFeeUpdated(BaseFeeUpdated),
}

// =========================================================================
// ERRORS
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// Caller is not the contract owner.
    NotOwner,
    /// Buy-ins and prize funding are suspended.
    Paused,
    /// Transferred value is below the current action cost.
    InsufficientPayment,
    /// Prize funding carried no value.
    ZeroAmount,
    /// Payout exceeds the prize pool.
    InsufficientPrizePool,
    /// Arithmetic overflow.
    Overflow,
    /// A native value transfer was refused by the environment.
    TransferFailed,
}

// =========================================================================
// RECEIPTS
// =========================================================================

/// A native value transfer owed by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disbursement {
    pub to: AccountId,
    pub amount: Balance,
}

/// Outcome of one committed ledger operation, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    pub transfers: Vec<Disbursement>,
    pub events: Vec<LedgerEvent>,
}

impl Receipt {
    fn with_event(event: LedgerEvent) -> Self {
        let mut events = Vec::new();
        events.push(event);
        Self {
            transfers: Vec::new(),
            events,
        }
    }

    /// Zero-value transfers are dropped.
    fn pay(mut self, to: AccountId, amount: Balance) -> Self {
        if amount > 0 {
            self.transfers.push(Disbursement { to, amount });
        }
        self
    }

    /// Sum of every transfer in the receipt.
    pub fn outflow(&self) -> Balance {
        self.transfers
            .iter()
            .fold(0, |total: Balance, t| total.saturating_add(t.amount))
    }
}

// =========================================================================
// LEDGER
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct Ledger {
    owner: AccountId,
    base_fee: Balance,
    step_bps: u32,
    buy_in_count: u64,
    total_buy_ins: u64,
    prize_pool: Balance,
    owner_fees: Balance,
    paused: bool,
}

impl Ledger {
    pub fn new(owner: AccountId, base_fee: Balance, step_bps: u32) -> Self {
        Self {
            owner,
            base_fee,
            step_bps,
            buy_in_count: 0,
            total_buy_ins: 0,
            prize_pool: 0,
            owner_fees: 0,
            paused: false,
        }
    }

    // ---------------------------------------------------------------------
    // Pricing
    // ---------------------------------------------------------------------

    /// `base_fee + base_fee * step_bps * buy_in_count / 10_000`.
    ///
    /// Saturates instead of overflowing, so the price never decreases as
    /// `buy_in_count` grows and is exactly `base_fee` at zero entries.
    pub fn action_cost(&self) -> Balance {
        let escalation = self
            .base_fee
            .saturating_mul(Balance::from(self.step_bps))
            .saturating_mul(Balance::from(self.buy_in_count))
            / BPS_DENOMINATOR;
        self.base_fee.saturating_add(escalation)
    }

    /// Splits `cost` into `(prize_share, fee_share)`. The shares always sum
    /// to `cost`; the truncation remainder lands in the fee share.
    pub fn split(cost: Balance) -> (Balance, Balance) {
        let prize_share = (cost / PERCENT_DENOMINATOR) * PRIZE_SHARE_PERCENT
            + (cost % PERCENT_DENOMINATOR) * PRIZE_SHARE_PERCENT / PERCENT_DENOMINATOR;
        (prize_share, cost - prize_share)
    }

    // ---------------------------------------------------------------------
    // Public operations
    // ---------------------------------------------------------------------

    pub fn buy_in(&mut self, buyer: AccountId, payment: Balance) -> Result<Receipt, Error> {
        self.ensure_not_paused()?;

        let cost = self.action_cost();
        if payment < cost {
            return Err(Error::InsufficientPayment);
        }

        let (prize_share, fee_share) = Self::split(cost);
        let prize_pool = self.prize_pool.checked_add(prize_share).ok_or(Error::Overflow)?;
        let owner_fees = self.owner_fees.checked_add(fee_share).ok_or(Error::Overflow)?;
        let buy_in_count = self.buy_in_count.checked_add(1).ok_or(Error::Overflow)?;
        let total_buy_ins = self.total_buy_ins.checked_add(1).ok_or(Error::Overflow)?;

        self.prize_pool = prize_pool;
        self.owner_fees = owner_fees;
        self.buy_in_count = buy_in_count;
        self.total_buy_ins = total_buy_ins;

        Ok(Receipt::with_event(LedgerEvent::BuyIn(BuyIn {
            buyer,
            cost,
            buy_in_count,
        }))
        .pay(buyer, payment - cost))
    }

    pub fn fund_prize_pool(&mut self, funder: AccountId, amount: Balance) -> Result<Receipt, Error> {
        self.ensure_not_paused()?;
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }

        self.prize_pool = self.prize_pool.checked_add(amount).ok_or(Error::Overflow)?;

        Ok(Receipt::with_event(LedgerEvent::PrizeFunded(PrizeFunded {
            funder,
            amount,
        })))
    }

    // ---------------------------------------------------------------------
    // Owner operations
    // ---------------------------------------------------------------------

    pub fn payout(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        amount: Balance,
    ) -> Result<Receipt, Error> {
        self.only_owner(caller)?;

        self.prize_pool = self
            .prize_pool
            .checked_sub(amount)
            .ok_or(Error::InsufficientPrizePool)?;

        Ok(Receipt::with_event(LedgerEvent::Payout(Payout { recipient, amount }))
            .pay(recipient, amount))
    }

    pub fn withdraw_owner_fees(&mut self, caller: AccountId) -> Result<Receipt, Error> {
        self.only_owner(caller)?;

        let amount = core::mem::take(&mut self.owner_fees);

        Ok(
            Receipt::with_event(LedgerEvent::OwnerFeesWithdrawn(OwnerFeesWithdrawn {
                owner: self.owner,
                amount,
            }))
            .pay(self.owner, amount),
        )
    }

    pub fn reset_cost(&mut self, caller: AccountId) -> Result<Receipt, Error> {
        self.only_owner(caller)?;

        self.buy_in_count = 0;

        Ok(Receipt::with_event(LedgerEvent::CostReset(CostReset {
            buy_in_count: 0,
        })))
    }

    pub fn drain(&mut self, caller: AccountId) -> Result<Receipt, Error> {
        self.only_owner(caller)?;

        let prize_pool = core::mem::take(&mut self.prize_pool);
        let owner_fees = core::mem::take(&mut self.owner_fees);
        self.buy_in_count = 0;

        // Both balances are backed by held funds, so their sum fits.
        let total = prize_pool.saturating_add(owner_fees);

        Ok(
            Receipt::with_event(LedgerEvent::ContractDrained(ContractDrained {
                prize_pool,
                owner_fees,
            }))
            .pay(self.owner, total),
        )
    }

    pub fn update_base_fee(&mut self, caller: AccountId, new_fee: Balance) -> Result<Receipt, Error> {
        self.only_owner(caller)?;

        let old_fee = core::mem::replace(&mut self.base_fee, new_fee);

        Ok(Receipt::with_event(LedgerEvent::BaseFeeUpdated(BaseFeeUpdated {
            old_fee,
            new_fee,
        })))
    }

    /// Returns the new pause state.
    pub fn toggle_pause(&mut self, caller: AccountId) -> Result<bool, Error> {
        self.only_owner(caller)?;
        self.paused = !self.paused;
        Ok(self.paused)
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn base_fee(&self) -> Balance {
        self.base_fee
    }

    pub fn step_bps(&self) -> u32 {
        self.step_bps
    }

    pub fn buy_in_count(&self) -> u64 {
        self.buy_in_count
    }

    pub fn total_buy_ins(&self) -> u64 {
        self.total_buy_ins
    }

    pub fn prize_pool(&self) -> Balance {
        self.prize_pool
    }

    pub fn owner_fees(&self) -> Balance {
        self.owner_fees
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Funds the ledger has earmarked. Must never exceed the held balance.
    pub fn committed(&self) -> Balance {
        self.prize_pool.saturating_add(self.owner_fees)
    }

    // ---------------------------------------------------------------------
    // Guards
    // ---------------------------------------------------------------------

    fn only_owner(&self, caller: AccountId) -> Result<(), Error> {
        if caller != self.owner {
            return Err(Error::NotOwner);
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> Result<(), Error> {
        if self.paused {
            return Err(Error::Paused);
        }
        Ok(())
    }
}

// =========================================================================
// UNIT TESTS
// =========================================================================
