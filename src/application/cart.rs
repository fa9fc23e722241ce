//! The cart store: cart state plus its persistence.
//!
//! Every mutation writes a snapshot through the configured
//! [`CartRepository`]. When a write fails the store keeps working from
//! memory for the rest of the session and reports the failure once.

use crate::domain::{CartLineItem, CartState, DomainError, DomainResult, LineInput, Money};
use crate::infrastructure::{CartRepository, MemoryCartRepository};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Durable,
    MemoryOnly,
}

pub struct CartStore {
    state: CartState,
    repository: Box<dyn CartRepository>,
    mode: PersistenceMode,
    warning: Option<DomainError>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("repository", &self.repository.describe())
            .field("mode", &self.mode)
            .finish()
    }
}

impl CartStore {
    /// Rehydrates the cart from the repository.
    ///
    /// A missing or corrupt snapshot yields an empty cart. An unreadable
    /// store also yields an empty cart and switches to memory-only mode.
    pub fn open(repository: Box<dyn CartRepository>) -> Self {
        let mut store = Self {
            state: CartState::new(),
            repository,
            mode: PersistenceMode::Durable,
            warning: None,
        };

        match store.repository.load() {
            Ok(Some(state)) => {
                info!(
                    lines = state.items.len(),
                    source = %store.repository.describe(),
                    "cart restored"
                );
                store.state = state;
            }
            Ok(None) => debug!(source = %store.repository.describe(), "no stored cart"),
            Err(DomainError::PersistenceUnavailable(reason)) => {
                warn!(%reason, "cart storage unreadable, keeping cart in memory");
                store.mode = PersistenceMode::MemoryOnly;
                store.warning = Some(DomainError::PersistenceUnavailable(reason));
            }
            Err(e) => warn!(error = %e, "discarding stored cart"),
        }

        store
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryCartRepository::new()))
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    /// Returns the pending storage failure, at most once per failure.
    pub fn take_persistence_warning(&mut self) -> Option<DomainError> {
        self.warning.take()
    }

    pub fn add_item(&mut self, input: LineInput) -> DomainResult<()> {
        self.add_item_checked(input, |_, line| Ok(line))
    }

    /// Adds a line after `check` has verified (and possibly refreshed) it.
    ///
    /// `check` sees the cart as it stands, with the loading flag raised. An
    /// add that arrives while another is still being checked is refused. If
    /// the check or the add fails, the cart is left exactly as it was.
    pub fn add_item_checked<F>(&mut self, input: LineInput, check: F) -> DomainResult<()>
    where
        F: FnOnce(&CartState, LineInput) -> DomainResult<LineInput>,
    {
        if self.state.is_loading {
            return Err(DomainError::InvalidInput(format!(
                "still adding to cart, '{}' was not added",
                input.product.title
            )));
        }
        self.state.is_loading = true;
        let outcome = check(&self.state, input).and_then(|verified| {
            let variant_id = verified.variant_id.clone();
            let quantity = verified.quantity;
            self.state.add(verified)?;
            debug!(%variant_id, quantity, "line added");
            Ok(())
        });
        self.state.is_loading = false;

        match &outcome {
            Ok(()) => self.persist(),
            Err(e) => warn!(error = %e, "add to cart failed"),
        }
        outcome
    }

    pub fn remove_item(&mut self, variant_id: &str) {
        if self.state.remove(variant_id) {
            debug!(%variant_id, "line removed");
            self.persist();
        }
    }

    pub fn set_quantity(&mut self, variant_id: &str, quantity: u32) {
        if self.state.set_quantity(variant_id, quantity) {
            self.persist();
        }
    }

    pub fn increment_quantity(&mut self, variant_id: &str) {
        if self.state.increment(variant_id) {
            self.persist();
        }
    }

    pub fn decrement_quantity(&mut self, variant_id: &str) {
        if self.state.decrement(variant_id) {
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.state.clear();
        self.persist();
    }

    pub fn total_count(&self) -> u64 {
        self.state.total_count()
    }

    pub fn totals_by_currency(&self) -> Vec<Money> {
        self.state.totals_by_currency()
    }

    pub fn grand_total(&self) -> DomainResult<Option<Money>> {
        self.state.grand_total()
    }

    fn persist(&mut self) {
        if self.mode == PersistenceMode::MemoryOnly {
            return;
        }
        match self.repository.save(&self.state) {
            Ok(()) => debug!(lines = self.state.items.len(), "cart saved"),
            Err(e) => {
                warn!(error = %e, "cart write failed, keeping cart in memory");
                self.mode = PersistenceMode::MemoryOnly;
                self.warning = Some(match e {
                    DomainError::PersistenceUnavailable(reason) => {
                        DomainError::PersistenceUnavailable(reason)
                    }
                    other => DomainError::PersistenceUnavailable(other.to_string()),
                });
            }
        }
    }
}
