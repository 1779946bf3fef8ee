use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::command::{EngineCommand, ShapeTextMap};
use crate::config::EngineConfig;
use crate::error::{BridgeError, Result};
use crate::launch::run_engine;
use crate::reconcile::reconcile;

/// Facade over the engine bridge. Holds the immutable configuration; every
/// operation encodes a command, drives one engine process to completion and
/// reconciles its stdout. Concurrent calls each spawn their own process and
/// share nothing but this config.
#[derive(Debug, Clone)]
pub struct OdgProcessor {
    config: EngineConfig,
}

impl OdgProcessor {
    pub fn new(config: EngineConfig) -> Self {
        OdgProcessor { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Query document structure: page count, shape names, shape text.
    pub async fn get_info(&self, path: &Path) -> Result<Value> {
        let command = EngineCommand::GetInfo {
            path: path.to_path_buf(),
        };
        self.invoke("get_info", command).await
    }

    /// Replace the text of several shapes in one engine pass. `output` falls
    /// back to the configured default output path; when both are absent the
    /// engine modifies the document in place. `export_pdf` overrides the
    /// configured default for this call only.
    pub async fn modify_texts(
        &self,
        path: &Path,
        texts: &ShapeTextMap,
        output: Option<&Path>,
        export_pdf: Option<bool>,
    ) -> Result<Value> {
        let command = EngineCommand::ModifyTexts {
            path: path.to_path_buf(),
            texts: texts.clone(),
            output: output
                .map(Path::to_path_buf)
                .or_else(|| self.config.output_path.clone()),
            export_pdf: export_pdf.unwrap_or(self.config.export_pdf),
        };
        self.invoke("modify_texts", command).await
    }

    /// Replace the text of a single shape. A convenience over
    /// [`Self::modify_texts`] with a one-entry map; no independent behavior.
    pub async fn modify_text(
        &self,
        path: &Path,
        shape_name: &str,
        new_text: &str,
        output: Option<&Path>,
        export_pdf: Option<bool>,
    ) -> Result<Value> {
        let mut texts = ShapeTextMap::new();
        texts.insert(shape_name.to_string(), new_text.to_string());
        self.modify_texts(path, &texts, output, export_pdf).await
    }

    /// Create a fresh empty drawing document at `output`.
    pub async fn create_odg(&self, output: &Path) -> Result<Value> {
        let command = EngineCommand::CreateOdg {
            output: output.to_path_buf(),
        };
        self.invoke("create_odg", command).await
    }

    /// Export an existing drawing to PDF.
    pub async fn export_to_pdf(&self, path: &Path, output: &Path) -> Result<Value> {
        let command = EngineCommand::ExportPdf {
            path: path.to_path_buf(),
            output: output.to_path_buf(),
        };
        self.invoke("export_pdf", command).await
    }

    /// Encode, launch, await and reconcile one invocation. Any failure from
    /// the lower layers is re-raised naming the operation; the root cause is
    /// preserved as the error source.
    async fn invoke(&self, op: &'static str, command: EngineCommand) -> Result<Value> {
        let invocation = run_engine(&self.config, &command)
            .await
            .map_err(BridgeError::in_operation(op))?;
        if !invocation.stderr.trim().is_empty() {
            debug!("{op}: engine stderr: {}", invocation.stderr.trim());
        }
        Ok(reconcile(&invocation.stdout))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    fn processor_for(body: &str) -> (tempfile::TempDir, OdgProcessor) {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("engine.sh");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(file, "{body}").unwrap();
        let config = EngineConfig {
            interpreter: PathBuf::from("/bin/sh"),
            script,
            output_path: None,
            export_pdf: true,
        };
        (dir, OdgProcessor::new(config))
    }

    #[tokio::test]
    async fn get_info_reconciles_payload_behind_banner() {
        let (_dir, processor) =
            processor_for("echo 'Loading...'; echo '{\"status\":\"ok\",\"pages\":3}'");
        let result = processor.get_info(Path::new("/tmp/a.odg")).await.unwrap();
        assert_eq!(result, json!({ "status": "ok", "pages": 3 }));
    }

    #[tokio::test]
    async fn unparseable_stdout_on_success_degrades_instead_of_erroring() {
        let (_dir, processor) = processor_for("echo 'plain text, no json'");
        let result = processor.get_info(Path::new("/tmp/a.odg")).await.unwrap();
        assert_eq!(result["success"], json!(true));
        assert_eq!(result["output"].as_str().unwrap().trim(), "plain text, no json");
    }

    #[tokio::test]
    async fn failure_is_wrapped_with_operation_name() {
        let (_dir, processor) = processor_for("echo 'file not found' >&2; exit 1");
        let err = processor
            .get_info(Path::new("/tmp/a.odg"))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("get_info failed"));
        assert!(message.contains("code 1"));
        assert!(message.contains("file not found"));
        match err {
            BridgeError::Operation { op, source } => {
                assert_eq!(op, "get_info");
                assert!(matches!(*source, BridgeError::EngineFailed { .. }));
            }
            other => panic!("expected Operation wrapper, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn spawn_failure_wraps_distinctly_from_engine_failure() {
        let (_dir, processor) = processor_for("exit 0");
        let mut config = processor.config().clone();
        config.interpreter = PathBuf::from("/nonexistent/interpreter-for-tests");
        let processor = OdgProcessor::new(config);
        let err = processor
            .create_odg(Path::new("/tmp/fresh.odg"))
            .await
            .unwrap_err();
        match err {
            BridgeError::Operation { op, source } => {
                assert_eq!(op, "create_odg");
                assert!(matches!(*source, BridgeError::Spawn { .. }));
            }
            other => panic!("expected Operation wrapper, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn modify_text_sends_same_args_as_single_entry_modify_texts() {
        // The fake engine echoes its argv back so both call shapes can be
        // compared invocation-for-invocation. The map argument carries JSON
        // quotes, so it is re-escaped before being embedded.
        let body = "m=$(printf '%s' \"$3\" | sed 's/\"/\\\\\"/g')\n\
                    printf '{\"argv\": [\"%s\", \"%s\", \"%s\", \"%s\", \"%s\"]}' \"$1\" \"$2\" \"$m\" \"$4\" \"$5\"";
        let (_dir, processor) = processor_for(body);

        let single = processor
            .modify_text(Path::new("/tmp/a.odg"), "Shape1", "hello", None, None)
            .await
            .unwrap();

        let mut texts = ShapeTextMap::new();
        texts.insert("Shape1".to_string(), "hello".to_string());
        let batch = processor
            .modify_texts(Path::new("/tmp/a.odg"), &texts, None, None)
            .await
            .unwrap();

        assert_eq!(single, batch);
        assert_eq!(single["argv"][0], json!("modify_texts"));
        assert_eq!(single["argv"][2], json!("{\"Shape1\":\"hello\"}"));
        assert_eq!(single["argv"][3], json!(""));
        assert_eq!(single["argv"][4], json!("true"));
    }

    #[tokio::test]
    async fn configured_output_path_fills_absent_argument() {
        let body = "printf '{\"output_arg\": \"%s\"}' \"$4\"";
        let (dir, processor) = processor_for(body);
        let mut config = processor.config().clone();
        config.output_path = Some(dir.path().join("default-out.odg"));
        let processor = OdgProcessor::new(config);

        let mut texts = ShapeTextMap::new();
        texts.insert("Shape1".to_string(), "x".to_string());
        let result = processor
            .modify_texts(Path::new("/tmp/a.odg"), &texts, None, None)
            .await
            .unwrap();
        assert!(
            result["output_arg"]
                .as_str()
                .unwrap()
                .ends_with("default-out.odg")
        );
    }

    #[tokio::test]
    async fn per_call_export_flag_overrides_configured_default() {
        let body = "printf '{\"export_arg\": \"%s\"}' \"$5\"";
        let (_dir, processor) = processor_for(body);
        assert!(processor.config().export_pdf);

        let mut texts = ShapeTextMap::new();
        texts.insert("Shape1".to_string(), "x".to_string());
        let overridden = processor
            .modify_texts(Path::new("/tmp/a.odg"), &texts, None, Some(false))
            .await
            .unwrap();
        assert_eq!(overridden["export_arg"], json!("false"));

        let defaulted = processor
            .modify_texts(Path::new("/tmp/a.odg"), &texts, None, None)
            .await
            .unwrap();
        assert_eq!(defaulted["export_arg"], json!("true"));
    }
}
