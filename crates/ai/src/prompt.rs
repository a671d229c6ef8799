//! Prompt rendering for listing generation.

use listingforge_products::ProductListingRequest;

/// System instruction sent alongside every listing prompt.
pub const SYSTEM_PROMPT: &str = "You are a marketing expert. Always respond with valid JSON.";

const NO_BRAND: &str = "Not specified";
const NO_DESCRIPTION: &str = "No description provided";

/// Reply shape stated to the model in-band. Must stay in sync with
/// [`crate::ModelResponse`].
const REPLY_FORMAT: &str = r#"{
    "title": "Product title here (catchy, 60 characters max)",
    "description": "Detailed product description (100-300 words)",
    "features": ["Feature 1", "Feature 2", "Feature 3", "Feature 4", "Feature 5"],
    "keywords": "comma, separated, keywords, for, seo"
}"#;

/// Render the user prompt for `request`. Pure and deterministic.
pub fn build_prompt(request: &ProductListingRequest) -> String {
    let product = request.product();

    format!(
        "Create a product listing for marketing purposes.

PRODUCT DETAILS:
- Name: {name}
- Price: ${price}
- Category: {category}
- Brand: {brand}
- Description: {description}
- In Stock: {in_stock}

TARGET AUDIENCE: {audience}
TONE: {tone}
LANGUAGE: {language}

IMPORTANT: Respond with ONLY valid JSON in this exact format:
{format}",
        name = product.name(),
        price = format_price(product.price()),
        category = product.category(),
        brand = product.brand().unwrap_or(NO_BRAND),
        description = product.description().unwrap_or(NO_DESCRIPTION),
        in_stock = if product.in_stock() { "Yes" } else { "No" },
        audience = request.target_audience(),
        tone = request.tone(),
        language = request.language(),
        format = REPLY_FORMAT,
    )
}

/// Whole prices keep one decimal (`100.0`), others print at full precision (`89.99`).
fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.1}")
    } else {
        price.to_string()
    }
}
