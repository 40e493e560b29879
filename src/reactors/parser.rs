//! The parsing reactor: validates and normalizes the raw seed record.

use crate::keys;
use crate::message::{Message, MissingDependency};
use crate::product::ProductModel;
use crate::reactor::{DispatchContext, Reactor, ReactorError};

/// Turns `raw_product_input` into a normalized `product_model` artifact.
///
/// Required artifacts, checked in order: `raw_product_input`.
#[derive(Debug, Default)]
pub struct ProductParser;

impl Reactor for ProductParser {
    fn name(&self) -> &'static str {
        "product_parser"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        let Message::Work(item) = message else {
            return Ok(Vec::new());
        };
        if item.name != keys::work::PARSE_PRODUCT {
            return Ok(Vec::new());
        }

        if !ctx.store().has(keys::RAW_PRODUCT_INPUT) {
            return Ok(vec![
                MissingDependency::new(keys::RAW_PRODUCT_INPUT, item.clone()).into(),
            ]);
        }

        let raw = ctx.store().require(keys::RAW_PRODUCT_INPUT)?.value.clone();
        // Guardrail: no facts beyond the dataset's allow-listed fields.
        let product = ProductModel::from_raw(&raw)?;

        ctx.publish_artifact(
            keys::PRODUCT_MODEL,
            serde_json::to_value(product)?,
            self.name(),
        );
        Ok(Vec::new())
    }
}
