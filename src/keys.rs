//! Canonical artifact keys and work item names for the page pipeline.
//!
//! Workers, the planner, the harness, and tests all refer to artifacts by
//! these constants; the engine itself treats keys as opaque strings.

/// The externally supplied seed record, pre-populated before the run starts.
pub const RAW_PRODUCT_INPUT: &str = "raw_product_input";
/// Normalized, validated product model.
pub const PRODUCT_MODEL: &str = "product_model";
/// Categorized question bank derived from the product model.
pub const QUESTION_BANK: &str = "question_bank";
/// Selected Q/A pairs for the FAQ page.
pub const FAQ_CONTENT: &str = "faq_content";
/// Rendered FAQ page document.
pub const FAQ_PAGE_JSON: &str = "faq_page_json";
/// Rendered product page document.
pub const PRODUCT_PAGE_JSON: &str = "product_page_json";
/// Fictional competitor model synthesized for the comparison.
pub const PRODUCT_B_MODEL: &str = "product_b_model";
/// Rendered comparison page document.
pub const COMPARISON_PAGE_JSON: &str = "comparison_page_json";
/// Manifest of files written to disk; its presence marks a successful run.
pub const WRITTEN_FILES: &str = "written_files";

/// Work item names, as created by the planner and recognized by workers.
pub mod work {
    pub const PARSE_PRODUCT: &str = "ParseProduct";
    pub const GENERATE_QUESTIONS: &str = "GenerateQuestions";
    pub const COMPOSE_FAQ: &str = "ComposeFaq";
    pub const RENDER_FAQ_PAGE: &str = "RenderFaqPage";
    pub const RENDER_PRODUCT_PAGE: &str = "RenderProductPage";
    pub const BUILD_COMPARISON: &str = "BuildComparison";
    pub const WRITE_OUTPUTS: &str = "WriteOutputs";
}

/// The artifacts a caller checks to decide whether a run fully succeeded.
pub const FINAL_KEYS: [&str; 4] = [
    FAQ_PAGE_JSON,
    PRODUCT_PAGE_JSON,
    COMPARISON_PAGE_JSON,
    WRITTEN_FILES,
];
