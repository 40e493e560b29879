//! The FAQ reactor: composes a deterministic Q/A selection strictly from
//! dataset fields.

use serde::{Deserialize, Serialize};

use crate::keys;
use crate::message::{Message, MissingDependency};
use crate::product::{format_price_inr, ProductModel};
use crate::reactor::{DispatchContext, Reactor, ReactorError};
use crate::reactors::questions::QuestionBank;

/// One composed question/answer pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub category: String,
    pub question: String,
    pub answer: String,
}

/// The `faq_content` artifact payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqContent {
    pub product_name: String,
    pub qas: Vec<FaqEntry>,
}

/// Fixed selection: (category, index into that category's questions).
const CHOSEN: [(&str, usize); 5] = [
    ("Informational", 0),
    ("Usage", 0),
    ("Usage", 1),
    ("Safety", 0),
    ("Purchase", 0),
];

/// Answers a question using only dataset fields, routed by keyword.
fn answer(product: &ProductModel, question: &str) -> String {
    let q = question.to_lowercase();
    if q.contains("price") {
        return format!("The price is {}.", format_price_inr(product.price_inr));
    }
    if q.contains("side effect") || q.contains("tingling") {
        return format!("Possible side effect: {}.", product.side_effects);
    }
    if q.contains("when") || q.contains("apply") || q.contains("drops") {
        return product.how_to_use.clone();
    }
    if q.contains("skin") {
        return format!("Suitable for: {} skin types.", product.skin_type.join(", "));
    }
    format!(
        "{} is a Vitamin C serum ({}) with key ingredients {}.",
        product.product_name,
        product.concentration,
        product.key_ingredients.join(", "),
    )
}

/// Produces the `faq_content` artifact.
///
/// Required artifacts, checked in order: `product_model`, `question_bank`.
#[derive(Debug, Default)]
pub struct FaqComposer;

impl Reactor for FaqComposer {
    fn name(&self) -> &'static str {
        "faq_composer"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        let Message::Work(item) = message else {
            return Ok(Vec::new());
        };
        if item.name != keys::work::COMPOSE_FAQ {
            return Ok(Vec::new());
        }

        for required in [keys::PRODUCT_MODEL, keys::QUESTION_BANK] {
            if !ctx.store().has(required) {
                return Ok(vec![MissingDependency::new(required, item.clone()).into()]);
            }
        }

        let product: ProductModel =
            serde_json::from_value(ctx.store().require(keys::PRODUCT_MODEL)?.value.clone())?;
        let bank: QuestionBank =
            serde_json::from_value(ctx.store().require(keys::QUESTION_BANK)?.value.clone())?;

        let mut qas = Vec::with_capacity(CHOSEN.len());
        for (label, index) in CHOSEN {
            let question = bank
                .category(label)
                .and_then(|category| category.questions.get(index))
                .ok_or_else(|| ReactorError::ContractViolation {
                    reactor: "faq_composer",
                    detail: format!("question bank has no entry {index} in category {label}"),
                })?;
            qas.push(FaqEntry {
                category: label.to_string(),
                question: question.clone(),
                answer: answer(&product, question),
            });
        }

        let content = FaqContent {
            product_name: product.product_name.clone(),
            qas,
        };
        ctx.publish_artifact(
            keys::FAQ_CONTENT,
            serde_json::to_value(content)?,
            self.name(),
        );
        Ok(Vec::new())
    }
}
