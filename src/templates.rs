//! Structured template engine for the generated page documents.
//!
//! A [`Template`] is data, not markup: a list of [`FieldRule`]s, each naming
//! the context entries it depends on and a builder that assembles the field's
//! JSON value. Rendering checks every declared dependency before running the
//! builder; a missing context entry is a contract violation, not a soft
//! default.
//!
//! # Examples
//!
//! ```
//! use pageloom::templates::{product_page_template, RenderContext, TemplateEngine};
//! use serde_json::json;
//!
//! let mut ctx = RenderContext::default();
//! ctx.insert("product_model".to_string(), json!({
//!     "product_name": "GlowBoost Vitamin C Serum",
//!     "concentration": "10% Vitamin C",
//!     "skin_type": ["Oily"],
//!     "key_ingredients": ["Vitamin C"],
//!     "benefits": ["Brightening"],
//!     "how_to_use": "Apply in the morning.",
//!     "side_effects": "Mild tingling.",
//!     "price_inr": 899
//! }));
//!
//! let page = TemplateEngine.render(&product_page_template(), &ctx).unwrap();
//! assert_eq!(page["title"], "GlowBoost Vitamin C Serum");
//! assert_eq!(page["price"]["display"], "₹899");
//! ```

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::product::{
    benefits_block, comparison_analysis, format_price_inr, ingredients_block, safety_block,
    summary_block, usage_block, ProductModel,
};

/// Named context values a template renders from (e.g. `"product_model"`).
pub type RenderContext = FxHashMap<String, Value>;

/// Errors raised while rendering a template.
#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    /// A field rule's declared dependency was absent from the context.
    #[error("template field '{field}' requires context entry '{dependency}'")]
    #[diagnostic(
        code(pageloom::templates::missing_dependency),
        help("The rendering reactor must gate on its required artifacts before rendering.")
    )]
    MissingDependency { field: &'static str, dependency: &'static str },

    /// A context value did not match the shape the builder expects.
    #[error("context entry '{entry}' does not deserialize into the expected shape")]
    #[diagnostic(code(pageloom::templates::shape))]
    Shape {
        entry: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Builder for one output field. Plain function pointer: builders are pure
/// and hold no environment.
pub type FieldBuilder = fn(&RenderContext) -> Result<Value, TemplateError>;

/// One field of a rendered page: name, declared dependencies, builder.
pub struct FieldRule {
    pub name: &'static str,
    pub depends_on: &'static [&'static str],
    pub builder: FieldBuilder,
}

/// A structured page template.
pub struct Template {
    pub name: &'static str,
    pub version: &'static str,
    pub fields: Vec<FieldRule>,
}

/// Renders [`Template`]s into machine-readable JSON documents.
pub struct TemplateEngine;

impl TemplateEngine {
    /// Renders `template` against `ctx`, checking each field's declared
    /// dependencies first.
    pub fn render(&self, template: &Template, ctx: &RenderContext) -> Result<Value, TemplateError> {
        let mut out = Map::new();
        out.insert(
            "template".to_string(),
            json!({ "name": template.name, "version": template.version }),
        );
        for rule in &template.fields {
            for &dependency in rule.depends_on {
                if !ctx.contains_key(dependency) {
                    return Err(TemplateError::MissingDependency {
                        field: rule.name,
                        dependency,
                    });
                }
            }
            out.insert(rule.name.to_string(), (rule.builder)(ctx)?);
        }
        Ok(Value::Object(out))
    }
}

/// Deserializes a typed model out of a context entry.
fn model(ctx: &RenderContext, entry: &'static str) -> Result<ProductModel, TemplateError> {
    let value = ctx.get(entry).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| TemplateError::Shape { entry, source })
}

/// FAQ page: product name + the composed Q/A list.
pub fn faq_page_template() -> Template {
    Template {
        name: "FAQPage",
        version: "1.0",
        fields: vec![
            FieldRule {
                name: "product_name",
                depends_on: &["product_model"],
                builder: |ctx| Ok(model(ctx, "product_model")?.product_name.into()),
            },
            FieldRule {
                name: "faqs",
                depends_on: &["faq_content"],
                builder: |ctx| {
                    let faq = ctx.get("faq_content").cloned().unwrap_or(Value::Null);
                    Ok(faq.get("qas").cloned().unwrap_or(Value::Null))
                },
            },
        ],
    }
}

/// Product page: title, price, summary, and the content sections.
pub fn product_page_template() -> Template {
    Template {
        name: "ProductPage",
        version: "1.0",
        fields: vec![
            FieldRule {
                name: "title",
                depends_on: &["product_model"],
                builder: |ctx| Ok(model(ctx, "product_model")?.product_name.into()),
            },
            FieldRule {
                name: "price",
                depends_on: &["product_model"],
                builder: |ctx| {
                    let product = model(ctx, "product_model")?;
                    Ok(json!({
                        "currency": "INR",
                        "value": product.price_inr,
                        "display": format_price_inr(product.price_inr),
                    }))
                },
            },
            FieldRule {
                name: "summary",
                depends_on: &["product_model"],
                builder: |ctx| Ok(summary_block(&model(ctx, "product_model")?)),
            },
            FieldRule {
                name: "sections",
                depends_on: &["product_model"],
                builder: |ctx| {
                    let product = model(ctx, "product_model")?;
                    Ok(json!({
                        "ingredients": ingredients_block(&product),
                        "benefits": benefits_block(&product),
                        "usage": usage_block(&product),
                        "safety": safety_block(&product),
                    }))
                },
            },
        ],
    }
}

/// Comparison page: both products, the analysis, and a fixed conclusion.
pub fn comparison_page_template() -> Template {
    Template {
        name: "ComparisonPage",
        version: "1.0",
        fields: vec![
            FieldRule {
                name: "title",
                depends_on: &["product_model", "product_b_model"],
                builder: |ctx| {
                    let a = model(ctx, "product_model")?;
                    let b = model(ctx, "product_b_model")?;
                    Ok(format!("{} vs {}", a.product_name, b.product_name).into())
                },
            },
            FieldRule {
                name: "products",
                depends_on: &["product_model", "product_b_model"],
                builder: |ctx| {
                    Ok(json!({
                        "a": ctx.get("product_model").cloned().unwrap_or(Value::Null),
                        "b": ctx.get("product_b_model").cloned().unwrap_or(Value::Null),
                    }))
                },
            },
            FieldRule {
                name: "analysis",
                depends_on: &["product_model", "product_b_model"],
                builder: |ctx| {
                    let a = model(ctx, "product_model")?;
                    let b = model(ctx, "product_b_model")?;
                    Ok(comparison_analysis(&a, &b))
                },
            },
            FieldRule {
                name: "conclusion",
                depends_on: &["product_model", "product_b_model"],
                builder: |_ctx| {
                    Ok(Value::String(
                        "This comparison is generated deterministically from the provided \
                         dataset and a fictional competitor."
                            .to_string(),
                    ))
                },
            },
        ],
    }
}
