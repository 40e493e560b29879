//! Demo entry point: runs the full page pipeline over an embedded seed
//! record and prints where the documents landed.

use miette::Result;
use serde_json::{json, Value};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pageloom::config::RunConfig;
use pageloom::keys;
use pageloom::runner::PipelineRunner;

fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,pageloom=info"))
        .expect("default filter is valid");

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

fn init_miette() {
    // Pretty panic reports
    miette::set_panic_hook();
}

/// The demo dataset. Exactly the allow-listed fields, nothing else.
fn demo_product() -> Value {
    json!({
        "product_name": "GlowBoost Vitamin C Serum",
        "concentration": "10% Vitamin C",
        "skin_type": ["Oily", "Combination", "Normal"],
        "key_ingredients": ["Vitamin C", "Hyaluronic Acid", "Vitamin E"],
        "benefits": ["Brightening", "Fades dark spots", "Hydration"],
        "how_to_use": "Apply 2-3 drops in the morning before sunscreen.",
        "side_effects": "Mild tingling for first-time users.",
        "price_inr": 899
    })
}

fn main() -> Result<()> {
    init_tracing();
    init_miette();

    let config = RunConfig::from_env();
    let run = PipelineRunner::new(config).run(demo_product())?;

    if run.store.has(keys::WRITTEN_FILES) {
        let manifest = run
            .store
            .require(keys::WRITTEN_FILES)
            .expect("checked above")
            .value
            .clone();
        println!("run {} complete in {} steps", run.run_id, run.report.steps);
        println!("outputs: {manifest}");
    } else {
        println!(
            "run {} ended without outputs; store keys: {:?}",
            run.run_id,
            run.store.keys()
        );
    }

    Ok(())
}
