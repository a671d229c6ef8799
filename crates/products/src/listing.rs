use serde::Serialize;
use serde_json::Value;

use listingforge_core::{
    CharBounds, FieldError, FieldErrorKind, FieldPath, ObjectReader, ValidationErrors,
    ValidationResult, ValueObject,
};

/// Closed set of product categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    HomeGoods,
    Books,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Electronics,
        ProductCategory::Clothing,
        ProductCategory::HomeGoods,
        ProductCategory::Books,
        ProductCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Electronics => "electronics",
            ProductCategory::Clothing => "clothing",
            ProductCategory::HomeGoods => "home_goods",
            ProductCategory::Books => "books",
            ProductCategory::Other => "other",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    fn choices_message() -> String {
        let quoted: Vec<String> = Self::ALL.iter().map(|c| format!("'{}'", c.as_str())).collect();
        let (last, rest) = quoted.split_last().map(|(l, r)| (l.clone(), r.join(", "))).unwrap_or_default();
        format!("Input should be {rest} or {last}")
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated product.
///
/// Only obtainable through validation; every field satisfies its constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    name: String,
    price: f64,
    category: ProductCategory,
    description: Option<String>,
    brand: Option<String>,
    in_stock: bool,
}

impl Product {
    pub const NAME_BOUNDS: CharBounds = CharBounds::between(1, 100);
    pub const DESCRIPTION_BOUNDS: CharBounds = CharBounds::at_most(500);
    pub const BRAND_BOUNDS: CharBounds = CharBounds::at_most(50);
    pub const MAX_PRICE: f64 = 1_000_000.0;

    /// Validate a standalone product object.
    pub fn validate(raw: &Value) -> ValidationResult<Product> {
        let mut errors = ValidationErrors::new();
        let product = ObjectReader::new(raw, FieldPath::root(), &mut errors)
            .and_then(|reader| Self::read(&reader, &mut errors));
        errors.finish(|| product)
    }

    /// Read every product field, recording all violations.
    ///
    /// Returns `Some` only if no field of this object failed.
    fn read(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<Product> {
        let before = errors.len();

        let name = read_name(reader, errors);
        let price = read_price(reader, errors);
        let category = read_category(reader, errors);
        let description = read_optional_text(reader, "description", Self::DESCRIPTION_BOUNDS, errors);
        let brand = read_optional_text(reader, "brand", Self::BRAND_BOUNDS, errors);
        let in_stock = reader.bool_or("in_stock", true, errors);

        if errors.len() != before {
            return None;
        }

        Some(Product {
            name: name?,
            price: price?,
            category: category?,
            description: description?,
            brand: brand?,
            in_stock: in_stock?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category(&self) -> ProductCategory {
        self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }
}

impl ValueObject for Product {}

fn read_name(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<String> {
    let raw = reader.string("name", errors)?;
    let path = reader.field_path("name");
    if !Product::NAME_BOUNDS.check(&path, raw, errors) {
        return None;
    }
    if !raw.chars().any(char::is_alphabetic) {
        errors.push(FieldError::invalid_value(path, "Name must contain letters"));
        return None;
    }
    Some(raw.trim().to_string())
}

fn read_price(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<f64> {
    let price = reader.number("price", errors)?;
    let path = reader.field_path("price");
    if price <= 0.0 {
        errors.push(FieldError::new(
            path,
            FieldErrorKind::TooSmall,
            "Input should be greater than 0",
        ));
        return None;
    }
    if price > Product::MAX_PRICE {
        errors.push(FieldError::new(path, FieldErrorKind::TooLarge, "Price too high"));
        return None;
    }
    Some(price)
}

fn read_category(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<ProductCategory> {
    let path = reader.field_path("category");
    let Some(value) = reader.get("category") else {
        errors.push(FieldError::missing(path));
        return None;
    };
    let parsed = value.as_str().and_then(ProductCategory::parse);
    if parsed.is_none() {
        errors.push(FieldError::new(
            path,
            FieldErrorKind::InvalidChoice,
            ProductCategory::choices_message(),
        ));
    }
    parsed
}

fn read_optional_text(
    reader: &ObjectReader<'_>,
    key: &str,
    bounds: CharBounds,
    errors: &mut ValidationErrors,
) -> Option<Option<String>> {
    match reader.optional_string(key, errors)? {
        None => Some(None),
        Some(text) => bounds
            .check(&reader.field_path(key), text, errors)
            .then(|| Some(text.to_string())),
    }
}

/// A validated request to generate a listing for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListingRequest {
    product: Product,
    target_audience: String,
    tone: String,
    language: String,
}

impl ProductListingRequest {
    pub const DEFAULT_TARGET_AUDIENCE: &'static str = "general";
    pub const DEFAULT_TONE: &'static str = "professional";
    pub const DEFAULT_LANGUAGE: &'static str = "English";

    /// Validate an untyped JSON value, collecting every violation.
    pub fn validate(raw: &Value) -> ValidationResult<ProductListingRequest> {
        let mut errors = ValidationErrors::new();
        let request = ObjectReader::new(raw, FieldPath::root(), &mut errors)
            .and_then(|reader| Self::read(&reader, &mut errors));
        errors.finish(|| request)
    }

    fn read(reader: &ObjectReader<'_>, errors: &mut ValidationErrors) -> Option<Self> {
        let product = reader
            .object("product", errors)
            .and_then(|product| Product::read(&product, errors));
        let target_audience = reader.string_or("target_audience", Self::DEFAULT_TARGET_AUDIENCE, errors);
        let tone = reader.string_or("tone", Self::DEFAULT_TONE, errors);
        let language = reader.string_or("language", Self::DEFAULT_LANGUAGE, errors);

        Some(Self {
            product: product?,
            target_audience: target_audience?,
            tone: tone?,
            language: language?,
        })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// JSON form, as reported in pipeline results.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl ValueObject for ProductListingRequest {}

/// Validate raw input against the listing request schema.
pub fn validate_input(raw: &Value) -> ValidationResult<ProductListingRequest> {
    ProductListingRequest::validate(raw)
}
