//! # Product Catalog
//!
//! The products a customer can add to the cart.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Category, Product};

/// An ordered list of products, unique by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wraps a product list.
    ///
    /// ## Errors
    /// `DuplicateItem` if two products share an id.
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        for (i, p) in products.iter().enumerate() {
            if products[..i].iter().any(|q| q.id == p.id) {
                return Err(CoreError::DuplicateItem(p.id));
            }
        }
        Ok(Catalog { products })
    }

    /// Finds a product by id.
    pub fn find(&self, id: u32) -> CoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))
    }

    /// All products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    /// The store's standard eight-product range.
    fn default() -> Self {
        let p = |id, name: &str, price, category| Product {
            id,
            name: name.to_string(),
            price: Money::from_major(price),
            category,
        };
        Catalog {
            products: vec![
                p(1, "Milk 1L", 55, Category::Grocery),
                p(2, "Basmati Rice 5kg", 620, Category::Grocery),
                p(3, "Headphones", 1499, Category::Electronics),
                p(4, "Smart Watch", 2499, Category::Electronics),
                p(5, "T-Shirt", 499, Category::Fashion),
                p(6, "Jeans", 1199, Category::Fashion),
                p(7, "Notebook Pack", 199, Category::Stationery),
                p(8, "Pen Set", 149, Category::Stationery),
            ],
        }
    }
}
