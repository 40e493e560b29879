//! Product domain model: seed validation, normalization, and the content
//! blocks the page templates are assembled from.
//!
//! The guardrail here is the field allow-list: the seed record may carry
//! exactly the known dataset fields and nothing else, so no page content can
//! smuggle in facts that were never in the dataset. A disallowed field is a
//! contract violation and aborts the run.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Every field the seed record is allowed to carry.
pub const ALLOWED_FIELDS: [&str; 8] = [
    "product_name",
    "concentration",
    "skin_type",
    "key_ingredients",
    "benefits",
    "how_to_use",
    "side_effects",
    "price_inr",
];

/// Seed validation / normalization failures.
#[derive(Debug, Error, Diagnostic)]
pub enum ProductError {
    /// The seed carried fields outside the allow-list.
    #[error("found disallowed fields in seed input: {}", fields.join(", "))]
    #[diagnostic(
        code(pageloom::product::disallowed_fields),
        help("The seed record may only carry the documented dataset fields.")
    )]
    DisallowedFields { fields: Vec<String> },

    /// The seed is not a JSON object.
    #[error("seed input must be a JSON object")]
    #[diagnostic(code(pageloom::product::not_an_object))]
    NotAnObject,

    /// The seed does not deserialize into the product model shape.
    #[error("seed input does not match the product model shape")]
    #[diagnostic(code(pageloom::product::shape))]
    Shape(#[from] serde_json::Error),
}

/// Normalized product record; all page content derives from these fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductModel {
    pub product_name: String,
    pub concentration: String,
    pub skin_type: Vec<String>,
    pub key_ingredients: Vec<String>,
    pub benefits: Vec<String>,
    pub how_to_use: String,
    pub side_effects: String,
    pub price_inr: i64,
    /// Set only on synthesized competitor models, never on seed input.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fictional: bool,
}

impl ProductModel {
    /// Validates the raw seed against the allow-list and normalizes it.
    pub fn from_raw(raw: &Value) -> Result<Self, ProductError> {
        validate_allowed_fields(raw)?;
        Ok(serde_json::from_value(raw.clone())?)
    }
}

/// Rejects seed records carrying fields outside [`ALLOWED_FIELDS`].
pub fn validate_allowed_fields(raw: &Value) -> Result<(), ProductError> {
    let Some(object) = raw.as_object() else {
        return Err(ProductError::NotAnObject);
    };
    let mut extra: Vec<String> = object
        .keys()
        .filter(|key| !ALLOWED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();
    if extra.is_empty() {
        Ok(())
    } else {
        extra.sort();
        Err(ProductError::DisallowedFields { fields: extra })
    }
}

/// Display form for INR prices.
#[must_use]
pub fn format_price_inr(price: i64) -> String {
    format!("₹{price}")
}

/// Headline/highlights block for the product page.
#[must_use]
pub fn summary_block(product: &ProductModel) -> Value {
    json!({
        "headline": format!("{} — {}", product.product_name, product.concentration),
        "highlights": product.benefits,
        "for_skin_type": product.skin_type,
    })
}

/// Ingredient listing block.
#[must_use]
pub fn ingredients_block(product: &ProductModel) -> Value {
    json!({
        "items": product
            .key_ingredients
            .iter()
            .map(|name| json!({ "name": name }))
            .collect::<Vec<_>>(),
    })
}

/// Benefit listing block.
#[must_use]
pub fn benefits_block(product: &ProductModel) -> Value {
    json!({
        "items": product
            .benefits
            .iter()
            .map(|benefit| json!({ "benefit": benefit }))
            .collect::<Vec<_>>(),
    })
}

/// Usage block. The instruction is carried verbatim from the dataset.
#[must_use]
pub fn usage_block(product: &ProductModel) -> Value {
    json!({ "how_to_use": product.how_to_use })
}

/// Safety block.
#[must_use]
pub fn safety_block(product: &ProductModel) -> Value {
    json!({ "side_effects": product.side_effects })
}

/// Set overlap between two string lists, sorted for stable output.
#[must_use]
pub fn compare_overlap(list_a: &[String], list_b: &[String]) -> Value {
    let a: std::collections::BTreeSet<&String> = list_a.iter().collect();
    let b: std::collections::BTreeSet<&String> = list_b.iter().collect();
    json!({
        "overlap": a.intersection(&b).collect::<Vec<_>>(),
        "only_a": a.difference(&b).collect::<Vec<_>>(),
        "only_b": b.difference(&a).collect::<Vec<_>>(),
    })
}

/// Price, ingredient, and benefit comparison between two products.
#[must_use]
pub fn comparison_analysis(a: &ProductModel, b: &ProductModel) -> Value {
    let price_winner = match a.price_inr.cmp(&b.price_inr) {
        std::cmp::Ordering::Less => "A",
        std::cmp::Ordering::Greater => "B",
        std::cmp::Ordering::Equal => "Tie",
    };
    json!({
        "price": {
            "a": { "value": a.price_inr, "display": format_price_inr(a.price_inr) },
            "b": { "value": b.price_inr, "display": format_price_inr(b.price_inr) },
            "winner": price_winner,
        },
        "ingredients": compare_overlap(&a.key_ingredients, &b.key_ingredients),
        "benefits": compare_overlap(&a.benefits, &b.benefits),
    })
}
