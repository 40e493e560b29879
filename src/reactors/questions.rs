//! The question reactor: derives a categorized question bank from the
//! product model.

use serde::{Deserialize, Serialize};

use crate::keys;
use crate::message::{Message, MissingDependency};
use crate::product::ProductModel;
use crate::reactor::{DispatchContext, Reactor, ReactorError};

/// One labeled group of questions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCategory {
    pub label: String,
    pub questions: Vec<String>,
}

/// The full question bank: six categories, three questions each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub total_questions: usize,
    pub categories: Vec<QuestionCategory>,
}

impl QuestionBank {
    /// Looks a category up by label.
    #[must_use]
    pub fn category(&self, label: &str) -> Option<&QuestionCategory> {
        self.categories.iter().find(|c| c.label == label)
    }

    /// Builds the bank for one product. Deterministic; question texts only
    /// interpolate dataset fields.
    #[must_use]
    pub fn for_product(product: &ProductModel) -> Self {
        let categories = vec![
            QuestionCategory {
                label: "Informational".to_string(),
                questions: vec![
                    format!("What is {}?", product.product_name),
                    "What does the concentration mean?".to_string(),
                    "What are the key benefits of this product?".to_string(),
                ],
            },
            QuestionCategory {
                label: "Usage".to_string(),
                questions: vec![
                    "When should I apply this serum?".to_string(),
                    "How many drops should I use?".to_string(),
                    "Can I use it daily?".to_string(),
                ],
            },
            QuestionCategory {
                label: "Safety".to_string(),
                questions: vec![
                    "Are there any side effects?".to_string(),
                    "Is mild tingling normal?".to_string(),
                    "Who should be cautious while using it?".to_string(),
                ],
            },
            QuestionCategory {
                label: "Purchase".to_string(),
                questions: vec![
                    "What is the price of the product?".to_string(),
                    "Is this product good value for money?".to_string(),
                    "What do I get at this price point?".to_string(),
                ],
            },
            QuestionCategory {
                label: "Fitment".to_string(),
                questions: vec![
                    "Which skin types is it suitable for?".to_string(),
                    "Is it suitable for oily skin?".to_string(),
                    "Is it suitable for combination skin?".to_string(),
                ],
            },
            QuestionCategory {
                label: "Comparison".to_string(),
                questions: vec![
                    "How does this compare to a generic Vitamin C serum?".to_string(),
                    "How does price compare to a basic competitor?".to_string(),
                    "How do ingredients compare to a simple competitor?".to_string(),
                ],
            },
        ];
        let total_questions = categories.iter().map(|c| c.questions.len()).sum();
        Self {
            total_questions,
            categories,
        }
    }
}

/// Produces the `question_bank` artifact.
///
/// Required artifacts, checked in order: `product_model`.
#[derive(Debug, Default)]
pub struct QuestionGenerator;

impl Reactor for QuestionGenerator {
    fn name(&self) -> &'static str {
        "question_generator"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        let Message::Work(item) = message else {
            return Ok(Vec::new());
        };
        if item.name != keys::work::GENERATE_QUESTIONS {
            return Ok(Vec::new());
        }

        if !ctx.store().has(keys::PRODUCT_MODEL) {
            return Ok(vec![
                MissingDependency::new(keys::PRODUCT_MODEL, item.clone()).into(),
            ]);
        }

        let product: ProductModel =
            serde_json::from_value(ctx.store().require(keys::PRODUCT_MODEL)?.value.clone())?;
        let bank = QuestionBank::for_product(&product);

        ctx.publish_artifact(
            keys::QUESTION_BANK,
            serde_json::to_value(bank)?,
            self.name(),
        );
        Ok(Vec::new())
    }
}
