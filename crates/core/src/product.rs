//! The `Product` document as published by the CMS.
//!
//! Field names follow the CMS's JSON conventions (`_id`, `_ref`, camelCase),
//! so a product fetched from the content API deserializes directly and a cart
//! snapshot stores products in the same shape.

use serde::{Deserialize, Serialize};

use crate::types::{AssetId, CategoryId, Price, ProductId, Slug};

/// A product record, owned by the content system.
///
/// The cart only ever reads products; it never creates or mutates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique document ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL slug generated from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    /// Unit price.
    pub price: Price,
    /// Plain text description.
    pub description: String,
    /// The category this product belongs to.
    pub category: CategoryRef,
    /// Ordered color variants with their images.
    #[serde(default)]
    pub color_image_map: Vec<ColorImage>,
}

impl Product {
    /// Create a product with no color variants, deriving the slug from `name`.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Price,
        description: impl Into<String>,
        category: impl Into<CategoryId>,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: Some(Slug::from_name(&name)),
            name,
            price,
            description: description.into(),
            category: CategoryRef::new(category),
            color_image_map: Vec::new(),
        }
    }

    /// Add a color variant.
    #[must_use]
    pub fn with_color_image(mut self, entry: ColorImage) -> Self {
        self.color_image_map.push(entry);
        self
    }
}

/// A reference to a `category` document.
///
/// Serialized as `{ "_type": "reference", "_ref": "<category id>" }`. The CMS
/// checks that the target exists; this crate does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "reference")]
pub struct CategoryRef {
    #[serde(rename = "_ref")]
    pub id: CategoryId,
}

impl CategoryRef {
    /// Reference the category with the given ID.
    #[must_use]
    pub fn new(id: impl Into<CategoryId>) -> Self {
        Self { id: id.into() }
    }
}

/// One entry of a product's color-to-image map.
///
/// Both sub-fields are optional in the CMS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// An opaque color picked in the CMS (alpha channel disabled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Hex notation, e.g. `#1e3a8a`.
    pub hex: String,
}

/// An image field pointing at an uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "image")]
pub struct ImageRef {
    pub asset: ImageAsset,
}

/// Reference to an image asset document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_ref")]
    pub id: AssetId,
}

impl ImageRef {
    /// Reference the image asset with the given ID.
    #[must_use]
    pub fn new(asset: impl Into<AssetId>) -> Self {
        Self {
            asset: ImageAsset { id: asset.into() },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product::new(
            "p1",
            "Linen Shirt",
            Price::from_cents(4500).unwrap(),
            "Breathable summer shirt",
            "shirts",
        )
        .with_color_image(ColorImage {
            color: Some(Color {
                hex: "#1e3a8a".to_string(),
            }),
            image: Some(ImageRef::new("image-abc-800x600-jpg")),
        })
    }

    #[test]
    fn test_new_derives_slug() {
        assert_eq!(shirt().slug.unwrap().as_str(), "linen-shirt");
    }

    #[test]
    fn test_serializes_with_cms_field_names() {
        let json = serde_json::to_value(shirt()).unwrap();
        assert_eq!(json["_id"], "p1");
        assert_eq!(json["category"]["_type"], "reference");
        assert_eq!(json["category"]["_ref"], "shirts");
        assert_eq!(json["colorImageMap"][0]["color"]["hex"], "#1e3a8a");
        assert_eq!(json["colorImageMap"][0]["image"]["_type"], "image");
        assert_eq!(
            json["colorImageMap"][0]["image"]["asset"]["_ref"],
            "image-abc-800x600-jpg"
        );
    }

    #[test]
    fn test_deserializes_cms_document() {
        let json = serde_json::json!({
            "_id": "p2",
            "name": "Wool Scarf",
            "price": 30,
            "description": "Warm",
            "category": { "_type": "reference", "_ref": "accessories" },
            "colorImageMap": [{}]
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.id, ProductId::new("p2"));
        assert!(product.slug.is_none());
        assert_eq!(product.color_image_map, vec![ColorImage::default()]);
    }

    #[test]
    fn test_missing_category_is_rejected() {
        let json = serde_json::json!({
            "_id": "p3",
            "name": "Cap",
            "price": 12,
            "description": "Cotton cap"
        });

        assert!(serde_json::from_value::<Product>(json).is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let json = serde_json::json!({
            "_id": "p4",
            "name": "Refund",
            "price": -1,
            "description": "",
            "category": { "_type": "reference", "_ref": "misc" }
        });

        assert!(serde_json::from_value::<Product>(json).is_err());
    }
}
