//! In-memory shopping carts.
//!
//! Carts live only for the lifetime of the process: nothing is persisted and
//! entries never expire.

use std::{collections::HashMap, sync::Arc};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::pricing::{CartTotals, CategoryRef, PricedLine, ShippingPolicy, summarize};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be greater than 0")]
    InvalidQuantity,

    #[error("only {available} in stock for product {product_id}")]
    InsufficientStock { product_id: Uuid, available: u32 },

    #[error("product {0} is not in the cart")]
    NotInCart(Uuid),
}

/// Product data captured when the item was put in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartProduct {
    pub id: Uuid,
    pub variant_id: Option<Uuid>,
    pub name: String,
    pub price: Option<Decimal>,
    pub base_price: Option<Decimal>,
    pub category: CategoryRef,
    pub stock: Option<u32>,
}

impl CartProduct {
    pub fn effective_price(&self) -> Decimal {
        self.price.or(self.base_price).unwrap_or(Decimal::ZERO)
    }

    fn check_stock(&self, quantity: u32) -> Result<(), CartError> {
        match self.stock {
            Some(available) if quantity > available => Err(CartError::InsufficientStock {
                product_id: self.id,
                available,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartEntry {
    pub product: CartProduct,
    pub quantity: u32,
}

impl PricedLine for CartEntry {
    fn unit_price(&self) -> Decimal {
        self.product.effective_price()
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl CartEntry {
    fn is(&self, product_id: Uuid, variant_id: Option<Uuid>) -> bool {
        self.product.id == product_id && self.product.variant_id == variant_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Cart {
    pub entries: Vec<CartEntry>,
    pub is_open: bool,
}

impl Cart {
    /// Adds `quantity` units, merging with an existing entry for the same
    /// product and variant. Opens the cart panel on success.
    pub fn add(&mut self, product: CartProduct, quantity: u32) -> Result<&CartEntry, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let position = self.position(product.id, product.variant_id);
        let index = match position {
            Some(index) => {
                let entry = &mut self.entries[index];
                let merged = entry.quantity.saturating_add(quantity);
                product.check_stock(merged)?;
                entry.product = product;
                entry.quantity = merged;
                index
            }
            None => {
                product.check_stock(quantity)?;
                self.entries.push(CartEntry { product, quantity });
                self.entries.len() - 1
            }
        };

        self.is_open = true;
        Ok(&self.entries[index])
    }

    /// Sets the quantity of an existing entry. Non-positive quantities are
    /// ignored and return `Ok(None)`.
    pub fn update_quantity(
        &mut self,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        quantity: i64,
    ) -> Result<Option<&CartEntry>, CartError> {
        if quantity <= 0 {
            return Ok(None);
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.is(product_id, variant_id))
            .ok_or(CartError::NotInCart(product_id))?;

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        entry.product.check_stock(quantity)?;
        entry.quantity = quantity;
        Ok(Some(&*entry))
    }

    pub fn remove(
        &mut self,
        product_id: Uuid,
        variant_id: Option<Uuid>,
    ) -> Result<CartEntry, CartError> {
        let index = self
            .position(product_id, variant_id)
            .ok_or(CartError::NotInCart(product_id))?;
        Ok(self.entries.remove(index))
    }

    /// Takes `ordered` quantities out of the cart, dropping entries that reach
    /// zero. Anything added after the snapshot was taken stays.
    pub fn deduct(&mut self, ordered: &[CartEntry]) {
        for line in ordered {
            if let Some(index) = self.position(line.product.id, line.product.variant_id) {
                let entry = &mut self.entries[index];
                entry.quantity = entry.quantity.saturating_sub(line.quantity);
                if entry.quantity == 0 {
                    self.entries.remove(index);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn totals(&self, policy: &ShippingPolicy) -> CartTotals {
        summarize(&self.entries, policy)
    }

    fn position(&self, product_id: Uuid, variant_id: Option<Uuid>) -> Option<usize> {
        self.entries.iter().position(|e| e.is(product_id, variant_id))
    }
}

/// Carts keyed by user id, shared by all request handlers.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    inner: Arc<RwLock<HashMap<Uuid, Cart>>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the user's cart; an unknown user has an empty cart.
    pub async fn get(&self, user_id: Uuid) -> Cart {
        self.inner
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Runs `f` against the user's cart under the write lock.
    pub async fn with_cart<T>(&self, user_id: Uuid, f: impl FnOnce(&mut Cart) -> T) -> T {
        let mut carts = self.inner.write().await;
        f(carts.entry(user_id).or_default())
    }
}
