//! The output reactor: writes the rendered pages to disk and terminates the
//! run once the manifest artifact is stored.

use std::fs;
use std::path::PathBuf;

use serde_json::json;

use crate::keys;
use crate::message::{Message, MissingDependency};
use crate::reactor::{DispatchContext, Reactor, ReactorError};

/// File names for the three page documents, paired with their artifact keys.
const OUTPUTS: [(&str, &str); 3] = [
    (keys::FAQ_PAGE_JSON, "faq.json"),
    (keys::PRODUCT_PAGE_JSON, "product_page.json"),
    (keys::COMPARISON_PAGE_JSON, "comparison_page.json"),
];

/// Writes the page documents as pretty-printed JSON under `out_dir`,
/// publishes the `written_files` manifest, and requests termination.
///
/// Required artifacts, checked in order: `faq_page_json`,
/// `product_page_json`, `comparison_page_json`.
#[derive(Debug)]
pub struct OutputWriter {
    out_dir: PathBuf,
}

impl OutputWriter {
    /// Creates a writer targeting `out_dir` (created on demand).
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl Reactor for OutputWriter {
    fn name(&self) -> &'static str {
        "output_writer"
    }

    fn react(
        &mut self,
        message: &Message,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<Vec<Message>, ReactorError> {
        let Message::Work(item) = message else {
            return Ok(Vec::new());
        };
        if item.name != keys::work::WRITE_OUTPUTS {
            return Ok(Vec::new());
        }

        for (required, _) in OUTPUTS {
            if !ctx.store().has(required) {
                return Ok(vec![MissingDependency::new(required, item.clone()).into()]);
            }
        }

        fs::create_dir_all(&self.out_dir).map_err(|source| ReactorError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(OUTPUTS.len());
        for (key, file_name) in OUTPUTS {
            let payload = &ctx.store().require(key)?.value;
            let path = self.out_dir.join(file_name);
            let rendered = serde_json::to_string_pretty(payload)?;
            fs::write(&path, rendered).map_err(|source| ReactorError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), "page document written");
            written.push(path.display().to_string());
        }

        ctx.publish_artifact(
            keys::WRITTEN_FILES,
            json!({ "files": written }),
            self.name(),
        );
        ctx.terminate("all required page documents written");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::WorkItem;
    use crate::store::{Artifact, ArtifactStore};

    fn write_item() -> WorkItem {
        WorkItem::new(
            keys::work::WRITE_OUTPUTS,
            [
                keys::FAQ_PAGE_JSON,
                keys::PRODUCT_PAGE_JSON,
                keys::COMPARISON_PAGE_JSON,
            ],
            [keys::WRITTEN_FILES],
        )
    }

    #[test]
    fn reports_first_missing_page_in_declared_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut writer = OutputWriter::new(tmp.path());
        let mut store = ArtifactStore::new();
        // Only the product page exists; faq_page_json is the first gap.
        store.put(Artifact::new(keys::PRODUCT_PAGE_JSON, json!({}), "test"));
        let mut outbox = Vec::new();
        let mut shutdown = None;
        let mut ctx = DispatchContext::new(&mut store, &mut outbox, &mut shutdown, 1);

        let emitted = writer
            .react(&Message::Work(write_item()), &mut ctx)
            .expect("react");
        assert!(matches!(
            &emitted[0],
            Message::MissingDependency(need) if need.missing_key == keys::FAQ_PAGE_JSON
        ));
        assert!(shutdown.is_none());
    }

    #[test]
    fn writes_all_pages_and_terminates() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut writer = OutputWriter::new(tmp.path());
        let mut store = ArtifactStore::new();
        for (key, _) in OUTPUTS {
            store.put(Artifact::new(key, json!({ "page": key }), "test"));
        }
        let mut outbox = Vec::new();
        let mut shutdown = None;
        let mut ctx = DispatchContext::new(&mut store, &mut outbox, &mut shutdown, 1);

        let emitted = writer
            .react(&Message::Work(write_item()), &mut ctx)
            .expect("react");
        assert!(emitted.is_empty());
        assert!(shutdown.is_some());
        assert!(store.has(keys::WRITTEN_FILES));

        for (_, file_name) in OUTPUTS {
            let path = tmp.path().join(file_name);
            let contents = fs::read_to_string(&path).expect("file written");
            let parsed: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
            assert!(parsed.is_object());
        }
    }
}
