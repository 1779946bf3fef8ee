use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::util::absolutize;

/// Mapping from shape name to replacement text. Serialized as a single JSON
/// argument; the engine does not care about key order.
pub type ShapeTextMap = BTreeMap<String, String>;

/// One logical bridge invocation. Each variant encodes to the exact ordered
/// argument vector the engine script expects for that command name.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    GetInfo {
        path: PathBuf,
    },
    ModifyTexts {
        path: PathBuf,
        texts: ShapeTextMap,
        output: Option<PathBuf>,
        export_pdf: bool,
    },
    CreateOdg {
        output: PathBuf,
    },
    ExportPdf {
        path: PathBuf,
        output: PathBuf,
    },
}

impl EngineCommand {
    /// Command name as the engine script recognizes it.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCommand::GetInfo { .. } => "get_info",
            EngineCommand::ModifyTexts { .. } => "modify_texts",
            EngineCommand::CreateOdg { .. } => "create_odg",
            EngineCommand::ExportPdf { .. } => "export_pdf",
        }
    }

    /// Produce the positional argument vector for this command.
    ///
    /// Argument position is significant and fixed per command: an absent
    /// optional output path becomes the empty string rather than being
    /// omitted, booleans are their literal textual form, and every path is
    /// absolutized so the engine's working directory cannot change what file
    /// it operates on. Shape names and text content are passed through
    /// unvalidated; bad content is the engine's concern.
    pub fn encode(&self) -> Result<Vec<String>> {
        match self {
            EngineCommand::GetInfo { path } => Ok(vec![path_arg(path)?]),
            EngineCommand::ModifyTexts {
                path,
                texts,
                output,
                export_pdf,
            } => {
                let output = match output {
                    Some(p) => path_arg(p)?,
                    None => String::new(),
                };
                Ok(vec![
                    path_arg(path)?,
                    serde_json::to_string(texts)?,
                    output,
                    export_pdf.to_string(),
                ])
            }
            EngineCommand::CreateOdg { output } => Ok(vec![path_arg(output)?]),
            EngineCommand::ExportPdf { path, output } => {
                Ok(vec![path_arg(path)?, path_arg(output)?])
            }
        }
    }
}

fn path_arg(path: &std::path::Path) -> Result<String> {
    Ok(absolutize(path)?.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(pairs: &[(&str, &str)]) -> ShapeTextMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn get_info_takes_one_absolute_path() {
        let cmd = EngineCommand::GetInfo {
            path: PathBuf::from("diagram.odg"),
        };
        assert_eq!(cmd.name(), "get_info");
        let args = cmd.encode().unwrap();
        assert_eq!(args.len(), 1);
        assert!(PathBuf::from(&args[0]).is_absolute());
        assert!(args[0].ends_with("diagram.odg"));
    }

    #[test]
    fn modify_texts_has_fixed_four_arg_shape() {
        let cmd = EngineCommand::ModifyTexts {
            path: PathBuf::from("in.odg"),
            texts: map_of(&[("Shape1", "hello"), ("Shape2", "world")]),
            output: None,
            export_pdf: true,
        };
        assert_eq!(cmd.name(), "modify_texts");
        let args = cmd.encode().unwrap();
        assert_eq!(args.len(), 4);
        // Absent output path is the empty string, never omitted.
        assert_eq!(args[2], "");
        assert_eq!(args[3], "true");
        // The whole map travels as one self-contained JSON argument.
        let decoded: ShapeTextMap = serde_json::from_str(&args[1]).unwrap();
        assert_eq!(decoded, map_of(&[("Shape1", "hello"), ("Shape2", "world")]));
    }

    #[test]
    fn modify_texts_encodes_output_and_flag() {
        let cmd = EngineCommand::ModifyTexts {
            path: PathBuf::from("in.odg"),
            texts: map_of(&[("Shape1", "x")]),
            output: Some(PathBuf::from("out.odg")),
            export_pdf: false,
        };
        let args = cmd.encode().unwrap();
        assert!(PathBuf::from(&args[2]).is_absolute());
        assert!(args[2].ends_with("out.odg"));
        assert_eq!(args[3], "false");
    }

    #[test]
    fn create_odg_takes_one_output_path() {
        let cmd = EngineCommand::CreateOdg {
            output: PathBuf::from("fresh.odg"),
        };
        assert_eq!(cmd.name(), "create_odg");
        let args = cmd.encode().unwrap();
        assert_eq!(args.len(), 1);
        assert!(PathBuf::from(&args[0]).is_absolute());
    }

    #[test]
    fn export_pdf_takes_both_paths_absolutized() {
        let cmd = EngineCommand::ExportPdf {
            path: PathBuf::from("in.odg"),
            output: PathBuf::from("out.pdf"),
        };
        assert_eq!(cmd.name(), "export_pdf");
        let args = cmd.encode().unwrap();
        assert_eq!(args.len(), 2);
        assert!(PathBuf::from(&args[0]).is_absolute());
        assert!(PathBuf::from(&args[1]).is_absolute());
    }

    #[test]
    fn shape_names_and_text_pass_through_unvalidated() {
        let cmd = EngineCommand::ModifyTexts {
            path: PathBuf::from("in.odg"),
            texts: map_of(&[("weird name / 形状", "multi\nline \"text\"")]),
            output: None,
            export_pdf: true,
        };
        let args = cmd.encode().unwrap();
        let decoded: ShapeTextMap = serde_json::from_str(&args[1]).unwrap();
        assert_eq!(decoded["weird name / 形状"], "multi\nline \"text\"");
    }
}
