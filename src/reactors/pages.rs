//! The page-rendering reactor: FAQ page, product page, and the comparison
//! page (including the fictional competitor model).

use crate::keys;
use crate::message::{Message, MissingDependency, WorkItem};
use crate::product::ProductModel;
use crate::reactor::{DispatchContext, Reactor, ReactorError};
use crate::templates::{
    comparison_page_template, faq_page_template, product_page_template, RenderContext,
    TemplateEngine,
};

/// The competitor used on the comparison page. Explicitly fictional and
/// fully structured; nothing about it comes from the seed dataset.
#[must_use]
pub fn fictional_competitor() -> ProductModel {
    ProductModel {
        product_name: "RadiantDrop Vitamin C Serum (Fictional)".to_string(),
        concentration: "5% Vitamin C".to_string(),
        skin_type: vec!["Combination".to_string()],
        key_ingredients: vec!["Vitamin C".to_string()],
        benefits: vec!["Brightening".to_string()],
        how_to_use: "Apply a small amount in the morning.".to_string(),
        side_effects: "May cause mild irritation in sensitive skin.".to_string(),
        price_inr: 799,
        fictional: true,
    }
}

/// Renders the three page documents through the template engine.
///
/// Handles `RenderFaqPage`, `RenderProductPage`, and `BuildComparison`;
/// requires are checked in each item's declared order.
#[derive(Debug, Default)]
pub struct PageRenderer;

impl PageRenderer {
    /// Gate: first missing key from `required`, as a report message.
    fn first_missing(
        ctx: &DispatchContext<'_>,
        item: &WorkItem,
        required: &[&str],
    ) -> Option<Message> {
        required
            .iter()
            .find(|key| !ctx.store().has(key))
            .map(|key| MissingDependency::new(*key, item.clone()).into())
    }

    /// Builds a render context from store entries.
    fn context(
        ctx: &DispatchContext<'_>,
        entries: &[&str],
    ) -> Result<RenderContext, ReactorError> {
        let mut render_ctx = RenderContext::default();
        for entry in entries {
            render_ctx.insert(
                (*entry).to_string(),
                ctx.store().require(entry)?.value.clone(),
            );
        }
        Ok(render_ctx)
    }
}

impl Reactor for PageRenderer {
    fn name(&self) -> &'static str {
        "page_renderer"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        let Message::Work(item) = message else {
            return Ok(Vec::new());
        };
        let engine = TemplateEngine;

        match item.name.as_str() {
            keys::work::RENDER_FAQ_PAGE => {
                if let Some(report) =
                    Self::first_missing(ctx, item, &[keys::PRODUCT_MODEL, keys::FAQ_CONTENT])
                {
                    return Ok(vec![report]);
                }
                let render_ctx = Self::context(ctx, &[keys::PRODUCT_MODEL, keys::FAQ_CONTENT])?;
                let page = engine.render(&faq_page_template(), &render_ctx)?;
                ctx.publish_artifact(keys::FAQ_PAGE_JSON, page, self.name());
                Ok(Vec::new())
            }
            keys::work::RENDER_PRODUCT_PAGE => {
                if let Some(report) = Self::first_missing(ctx, item, &[keys::PRODUCT_MODEL]) {
                    return Ok(vec![report]);
                }
                let render_ctx = Self::context(ctx, &[keys::PRODUCT_MODEL])?;
                let page = engine.render(&product_page_template(), &render_ctx)?;
                ctx.publish_artifact(keys::PRODUCT_PAGE_JSON, page, self.name());
                Ok(Vec::new())
            }
            keys::work::BUILD_COMPARISON => {
                if let Some(report) = Self::first_missing(ctx, item, &[keys::PRODUCT_MODEL]) {
                    return Ok(vec![report]);
                }
                let product_b = fictional_competitor();
                ctx.publish_artifact(
                    keys::PRODUCT_B_MODEL,
                    serde_json::to_value(&product_b)?,
                    self.name(),
                );

                let render_ctx =
                    Self::context(ctx, &[keys::PRODUCT_MODEL, keys::PRODUCT_B_MODEL])?;
                let page = engine.render(&comparison_page_template(), &render_ctx)?;
                ctx.publish_artifact(keys::COMPARISON_PAGE_JSON, page, self.name());
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Artifact, ArtifactStore};
    use serde_json::json;

    fn product_value() -> serde_json::Value {
        json!({
            "product_name": "GlowBoost Vitamin C Serum",
            "concentration": "10% Vitamin C",
            "skin_type": ["Oily"],
            "key_ingredients": ["Vitamin C", "Hyaluronic Acid"],
            "benefits": ["Brightening"],
            "how_to_use": "Apply in the morning.",
            "side_effects": "Mild tingling.",
            "price_inr": 899
        })
    }

    #[test]
    fn comparison_publishes_competitor_then_page() {
        let mut renderer = PageRenderer;
        let mut store = ArtifactStore::new();
        store.put(Artifact::new(keys::PRODUCT_MODEL, product_value(), "test"));
        let mut outbox = Vec::new();
        let mut shutdown = None;
        let mut ctx = DispatchContext::new(&mut store, &mut outbox, &mut shutdown, 1);

        let item = WorkItem::new(
            keys::work::BUILD_COMPARISON,
            [keys::PRODUCT_MODEL],
            [keys::PRODUCT_B_MODEL, keys::COMPARISON_PAGE_JSON],
        );
        let emitted = renderer.react(&Message::Work(item), &mut ctx).expect("react");
        assert!(emitted.is_empty());

        assert_eq!(
            outbox,
            vec![
                Message::artifact_produced(keys::PRODUCT_B_MODEL),
                Message::artifact_produced(keys::COMPARISON_PAGE_JSON),
            ]
        );
        let page = &store.require(keys::COMPARISON_PAGE_JSON).expect("page").value;
        assert_eq!(page["analysis"]["price"]["winner"], "B");
        assert_eq!(
            store.require(keys::PRODUCT_B_MODEL).expect("model").value["fictional"],
            json!(true)
        );
    }

    #[test]
    fn faq_page_gates_on_product_model_first() {
        let mut renderer = PageRenderer;
        let mut store = ArtifactStore::new();
        let mut outbox = Vec::new();
        let mut shutdown = None;
        let mut ctx = DispatchContext::new(&mut store, &mut outbox, &mut shutdown, 1);

        let item = WorkItem::new(
            keys::work::RENDER_FAQ_PAGE,
            [keys::PRODUCT_MODEL, keys::FAQ_CONTENT],
            [keys::FAQ_PAGE_JSON],
        );
        let emitted = renderer.react(&Message::Work(item), &mut ctx).expect("react");
        assert!(matches!(
            &emitted[0],
            Message::MissingDependency(need) if need.missing_key == keys::PRODUCT_MODEL
        ));
    }
}
