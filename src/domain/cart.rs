//! Cart line items and the quantity arithmetic behind them.
//!
//! `CartState` holds lines in insertion order, which is also display order.
//! Totals are always recomputed from the lines.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};
use super::models::{Money, Product, SelectedOption};

/// The parent product of a cart line, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub variant_id: String,
    pub product: ProductRef,
    pub variant_label: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl CartLineItem {
    /// Unit price times quantity. `CartState` refuses any line whose total
    /// would not fit in a `Decimal`, so this never saturates for its lines.
    pub fn line_total(&self) -> Money {
        Money::new(
            self.unit_price.currency_code.clone(),
            self.unit_price.amount.saturating_mul(Decimal::from(self.quantity)),
        )
    }
}

/// Everything needed to put a variant into the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInput {
    pub variant_id: String,
    pub product: ProductRef,
    pub variant_label: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub selected_options: Vec<SelectedOption>,
}

impl LineInput {
    /// Builds an add-to-cart request for the product's first variant.
    pub fn from_product(product: &Product, quantity: u32) -> DomainResult<Self> {
        let variant = product.first_variant().ok_or_else(|| {
            DomainError::NotFound(format!("product '{}' has no variants", product.title))
        })?;
        if !variant.available_for_sale {
            return Err(DomainError::Unavailable(product.title.clone()));
        }
        Ok(Self {
            variant_id: variant.id.clone(),
            product: ProductRef {
                id: product.id.clone(),
                title: product.title.clone(),
                image_url: product.first_image().map(|image| image.url.clone()),
            },
            variant_label: variant.title.clone(),
            unit_price: variant.price.clone(),
            quantity,
            selected_options: variant.selected_options.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLineItem>,
    /// Set while a mutation is in flight. Never persisted.
    #[serde(skip)]
    pub is_loading: bool,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, variant_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.variant_id == variant_id)
    }

    fn position(&self, variant_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.variant_id == variant_id)
    }

    /// Adds a line, or raises the quantity of the line already holding the
    /// same variant. The state is untouched when an error is returned.
    pub fn add(&mut self, input: LineInput) -> DomainResult<()> {
        if input.quantity == 0 {
            return Err(DomainError::InvalidInput(format!(
                "quantity for '{}' must be at least 1",
                input.variant_id
            )));
        }
        if input.variant_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("variant id is empty".to_string()));
        }

        input.unit_price.validate()?;

        if let Some(index) = self.position(&input.variant_id) {
            let previous = self.items[index].quantity;
            let quantity = previous.checked_add(input.quantity).ok_or_else(|| {
                DomainError::InvalidInput(format!("quantity overflow for '{}'", input.variant_id))
            })?;
            self.items[index].quantity = quantity;
            if let Err(e) = self.check_totals() {
                self.items[index].quantity = previous;
                return Err(e);
            }
        } else {
            self.items.push(CartLineItem {
                variant_id: input.variant_id,
                product: input.product,
                variant_label: input.variant_label,
                unit_price: input.unit_price,
                quantity: input.quantity,
                selected_options: input.selected_options,
            });
            if let Err(e) = self.check_totals() {
                self.items.pop();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, variant_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.variant_id != variant_id);
        self.items.len() != before
    }

    /// Sets a line's quantity; zero removes the line. Returns whether
    /// anything changed. A quantity whose totals would overflow is refused.
    pub fn set_quantity(&mut self, variant_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(variant_id);
        }
        let Some(index) = self.position(variant_id) else {
            return false;
        };
        let previous = self.items[index].quantity;
        if previous == quantity {
            return false;
        }
        self.items[index].quantity = quantity;
        if self.check_totals().is_err() {
            self.items[index].quantity = previous;
            return false;
        }
        true
    }

    pub fn increment(&mut self, variant_id: &str) -> bool {
        match self.find(variant_id) {
            Some(item) => {
                let next = item.quantity.saturating_add(1);
                self.set_quantity(variant_id, next)
            }
            None => false,
        }
    }

    pub fn decrement(&mut self, variant_id: &str) -> bool {
        match self.find(variant_id) {
            Some(item) => {
                let next = item.quantity - 1;
                self.set_quantity(variant_id, next)
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Fails when a line total or a per-currency sum would not fit in a
    /// `Decimal`.
    pub fn check_totals(&self) -> DomainResult<()> {
        let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
        for item in &self.items {
            let line = item.unit_price.checked_times(item.quantity)?;
            match totals.get_mut(item.unit_price.currency_code.as_str()) {
                Some(total) => *total = total.checked_add(&line)?,
                None => {
                    totals.insert(item.unit_price.currency_code.as_str(), line);
                }
            }
        }
        Ok(())
    }

    pub fn total_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals per currency, ordered by currency code.
    pub fn totals_by_currency(&self) -> Vec<Money> {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for item in &self.items {
            let total = totals.entry(item.unit_price.currency_code.as_str()).or_default();
            *total = total.saturating_add(item.line_total().amount);
        }
        totals
            .into_iter()
            .map(|(code, amount)| Money::new(code, amount))
            .collect()
    }

    /// Single total for checkout. `None` for an empty cart, and an error
    /// when the lines are priced in more than one currency.
    pub fn grand_total(&self) -> DomainResult<Option<Money>> {
        let mut lines = self.items.iter();
        let Some(first) = lines.next() else {
            return Ok(None);
        };
        let mut total = first.line_total();
        for item in lines {
            total = total.checked_add(&item.line_total())?;
        }
        Ok(Some(total))
    }
}
