//! Wire types for the commerce backend's store endpoints.
//!
//! These are read-only projections of backend entities. Every struct ignores
//! unknown fields, so backend additions never break decoding, and optional
//! fields stay `Option` rather than guessing defaults.

use serde::{Deserialize, Serialize};

/// A sellable region: currency, tax and country scoping for carts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// ISO currency code (lower- or upper-case, backend-defined).
    pub currency_code: String,
    /// Tax rate applied in this region, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    /// Countries served by this region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<Country>>,
}

impl Region {
    /// The synthetic region substituted when the backend's region list is
    /// unavailable, so cart creation never blocks on region availability.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            id: "default-region".to_string(),
            name: "默认区域".to_string(),
            currency_code: "CNY".to_string(),
            tax_rate: None,
            countries: None,
        }
    }
}

/// A country entry within a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Country id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Two-letter ISO code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_2: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A shopper's server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart id; the client persists this as a cache key only.
    pub id: String,
    /// Region the cart was created in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    /// Cart currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Line items; absent on freshly created carts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    /// Backend-computed total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

impl Cart {
    /// Sum of line item quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .as_deref()
            .map_or(0, |items| items.iter().map(|item| item.quantity).sum())
    }

    /// Backend total, or 0 when absent.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.total.unwrap_or(0.0)
    }
}

/// One product-variant/quantity pair within a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item id.
    pub id: String,
    /// The product variant this line refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    /// Owning product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Quantity of the variant.
    pub quantity: u32,
    /// Unit price in the cart currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// URL handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Thumbnail image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Purchasable variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ProductVariant>>,
    /// Categories the product belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<ProductCategory>>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant id; this is what goes into a cart line item.
    pub id: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stock-keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Region/currency-scoped price, when the query asked for one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_price: Option<CalculatedPrice>,
}

/// A price calculated for a specific region or currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedPrice {
    /// The calculated amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_amount: Option<f64>,
    /// Currency of the amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    /// Category id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent category, for nested trees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<String>,
}

/// An authenticated customer's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer id.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    pub id: String,
    /// Human-facing order number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_id: Option<i64>,
    /// Order status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Order total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    /// Order currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Purchased items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
}

/// Envelope for `GET /store/products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductListResponse {
    /// The page of products.
    pub products: Vec<Product>,
    /// Total matching products.
    #[serde(default)]
    pub count: u64,
    /// Page offset.
    #[serde(default)]
    pub offset: u64,
    /// Page size.
    #[serde(default)]
    pub limit: u64,
}

/// Envelope for `GET /store/products/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductResponse {
    /// The product detail record.
    pub product: Product,
}

/// Envelope for `GET /store/product-categories`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryListResponse {
    /// The page of categories.
    pub product_categories: Vec<ProductCategory>,
    /// Total matching categories.
    #[serde(default)]
    pub count: u64,
    /// Page offset.
    #[serde(default)]
    pub offset: u64,
    /// Page size.
    #[serde(default)]
    pub limit: u64,
}

/// Envelope wrapping a single cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartResponse {
    /// The cart snapshot.
    pub cart: Cart,
}

/// Envelope for `DELETE .../line-items/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeletedLineItemResponse {
    /// Id of the removed line item.
    #[serde(default)]
    pub id: Option<String>,
    /// Whether deletion took place.
    #[serde(default)]
    pub deleted: Option<bool>,
    /// The owning cart, when the backend returns it. Not trusted: the
    /// cart is re-fetched after removal regardless.
    #[serde(default)]
    pub parent: Option<Cart>,
}

/// Envelope for `GET /store/regions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionListResponse {
    /// All sellable regions.
    #[serde(default)]
    pub regions: Vec<Region>,
}

/// Envelope for `GET /store/regions/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionResponse {
    /// The region detail record.
    pub region: Region,
}

/// Envelope wrapping a single customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerResponse {
    /// The customer profile.
    pub customer: Customer,
}

/// Envelope for the emailpass auth endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    /// The issued bearer token.
    pub token: String,
}

/// Envelope for `GET /store/orders`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderListResponse {
    /// The page of orders.
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Total orders.
    #[serde(default)]
    pub count: u64,
}

/// Envelope for `GET /store/orders/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderResponse {
    /// The order detail record.
    pub order: Order,
}
