//! # Cart
//!
//! The shopping cart and the totals the discount rules read from it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Operation               Cart Change           │
//! │  ───────────              ─────────               ───────────           │
//! │                                                                         │
//! │  Add to Cart ────────────► add_product() ───────► qty += 1 or push     │
//! │                                                                         │
//! │  − / + / type qty ───────► update_quantity() ───► qty = clamp(1..=99)  │
//! │                                                                         │
//! │  Remove ─────────────────► remove_item() ───────► items.retain(..)     │
//! │                                                                         │
//! │  Clear Cart ─────────────► clear() ─────────────► items.clear()        │
//! │                                                                         │
//! │  (every change) ─────────► subtotal() ──────────► DiscountEngine        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Category, LineItem, Product};
use crate::validation::{clamp_quantity, validate_price, validate_product_name, validate_quantity};

/// Sum of `price × quantity` over `items`.
pub fn subtotal(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

/// Sum of `price × quantity` over the items of one category.
pub fn category_subtotal(items: &[LineItem], category: Category) -> Money {
    items
        .iter()
        .filter(|i| i.category == category)
        .map(LineItem::line_total)
        .sum()
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Every quantity is within 1..=99
/// - Insertion order is kept (it is the display order)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from existing line items, checking every invariant.
    ///
    /// ## Errors
    /// - `DuplicateItem` if two items share an id
    /// - `Validation` for an empty name, a negative price or a quantity
    ///   outside 1..=99
    pub fn from_items(items: Vec<LineItem>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CoreError::DuplicateItem(item.id));
            }
            validate_product_name(&item.name)?;
            validate_price(item.price)?;
            validate_quantity(i64::from(item.quantity))?;
        }
        Ok(Cart { items })
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity + 1 (stays at 99 once reached)
    /// - Product not in cart: appended with quantity 1
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            item.quantity = clamp_quantity(i64::from(item.quantity) + 1);
            return Ok(());
        }

        validate_product_name(&product.name)?;
        validate_price(product.price)?;
        self.items.push(LineItem::from_product(product, 1));
        Ok(())
    }

    /// Sets the quantity of an item, clamped to 1..=99.
    ///
    /// Returns the quantity actually stored.
    pub fn update_quantity(&mut self, id: u32, requested: i64) -> CoreResult<u32> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(CoreError::ItemNotInCart(id))?;
        item.quantity = clamp_quantity(requested);
        Ok(item.quantity)
    }

    /// Removes an item from the cart by id.
    pub fn remove_item(&mut self, id: u32) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInCart(id))
        } else {
            Ok(())
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: u32) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of all line totals, before discounts.
    pub fn subtotal(&self) -> Money {
        subtotal(&self.items)
    }

    /// Sum of line totals for one category.
    pub fn category_subtotal(&self, category: Category) -> Money {
        category_subtotal(&self.items, category)
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
