//! Catalog products and cart line items.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as delivered by the catalog layer.
///
/// Carries no quantity: quantity bookkeeping belongs entirely to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque stable identity, unique within the catalog.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Display image URL.
    pub image_url: String,
    /// Unit price at the time the product was fetched.
    pub price: Price,
}

/// One distinct product in the cart with its current quantity.
///
/// Descriptive fields are copied from the source [`Product`] when the line
/// is created and are not re-synchronized with later catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Identity of the product this line represents.
    pub id: ProductId,
    /// Display title, copied from the product at add time.
    pub title: String,
    /// Display image URL, copied from the product at add time.
    pub image_url: String,
    /// Unit price, copied from the product at add time.
    pub price: Price,
    /// Always >= 1. A line that would reach 0 is removed from the cart
    /// instead of being stored with quantity 0.
    pub quantity: u32,
}

impl LineItem {
    /// Create the line for a product that just entered the cart.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn shirt() -> Product {
        Product {
            id: ProductId::from("A"),
            title: "Shirt".to_owned(),
            image_url: "https://cdn.example.com/shirt.png".to_owned(),
            price: Price::new(Decimal::new(10, 0)),
        }
    }

    #[test]
    fn test_from_product_starts_at_quantity_one() {
        let line = LineItem::from_product(shirt());
        assert_eq!(line.quantity, 1);
        assert_eq!(line.id, ProductId::from("A"));
        assert_eq!(line.title, "Shirt");
    }

    #[test]
    fn test_line_item_persisted_layout() {
        let line = LineItem::from_product(shirt());
        let json = serde_json::to_value(&line).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "id": "A",
                "title": "Shirt",
                "image_url": "https://cdn.example.com/shirt.png",
                "price": 10.0,
                "quantity": 1,
            })
        );
    }

    #[test]
    fn test_line_item_rejects_negative_quantity() {
        let raw = r#"{"id":"A","title":"Shirt","image_url":"u","price":10,"quantity":-1}"#;
        assert!(serde_json::from_str::<LineItem>(raw).is_err());
    }
}
