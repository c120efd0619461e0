//! Minibar stock and consumption records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posada_core::{DomainError, DomainResult, Entity, Money, ProductId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Water,
    Soda,
    Juice,
    Snack,
    Wine,
    Liquor,
    Sparkling,
}

/// One stocked minibar product. Product ids are local to the room's
/// minibar (the catalog seeds the same numbering into every capable
/// room).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinibarProduct {
    id: ProductId,
    name: String,
    category: ProductCategory,
    unit_price: Money,
    stock: u32,
}

impl MinibarProduct {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: ProductCategory,
        unit_price: Money,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            unit_price,
            stock,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ProductCategory {
        self.category
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }
}

impl Entity for MinibarProduct {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A recorded consumption. The subtotal is fixed at recording time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    pub room_id: RoomId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub subtotal: Money,
    pub recorded_at: DateTime<Utc>,
}

/// A room's minibar: stocked products plus the running consumption list.
///
/// Consumptions accumulate against the room identity and are never
/// cleared here; see the ledger documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minibar {
    products: Vec<MinibarProduct>,
    consumptions: Vec<Consumption>,
}

impl Minibar {
    pub(crate) fn stocked(products: Vec<MinibarProduct>) -> Self {
        Self {
            products,
            consumptions: Vec::new(),
        }
    }

    pub fn products(&self) -> &[MinibarProduct] {
        &self.products
    }

    pub fn product(&self, id: ProductId) -> Option<&MinibarProduct> {
        self.products.iter().find(|p| p.id_typed() == id)
    }

    pub fn consumptions(&self) -> &[Consumption] {
        &self.consumptions
    }

    pub fn consumption_total(&self) -> DomainResult<Money> {
        Money::sum(self.consumptions.iter().map(|c| c.subtotal))
    }

    /// Apply one consumption fully, or change nothing.
    pub(crate) fn consume(
        &mut self,
        room_id: RoomId,
        product_id: ProductId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Consumption> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id_typed() == product_id)
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "product {product_id} is not stocked in this minibar"
                ))
            })?;

        if product.stock < quantity {
            return Err(DomainError::insufficient_stock(product.stock, quantity));
        }

        // Subtotal first: an arithmetic failure must not touch stock.
        let subtotal = product.unit_price.checked_mul(i64::from(quantity))?;
        product.stock -= quantity;

        let record = Consumption {
            room_id,
            product_id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.unit_price,
            subtotal,
            recorded_at: now,
        };
        self.consumptions.push(record.clone());
        Ok(record)
    }
}
