mod cli;

use std::collections::BTreeMap;

use clap::Parser;
use drawbridge::{EngineConfig, EngineOverrides, OdgProcessor, ShapeTextMap, pdf};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = EngineConfig::resolve(EngineOverrides {
        engine_path: cli.engine,
        python_path: cli.python,
        script_path: cli.script,
        ..Default::default()
    });

    match cli.command {
        Command::Info { path } => {
            let processor = OdgProcessor::new(config);
            let result = processor.get_info(&path).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }

        Command::Modify {
            path,
            sets,
            map,
            output,
            no_pdf,
        } => {
            let texts: ShapeTextMap = parse_assignments(sets, map);
            if texts.is_empty() {
                eprintln!("Nothing to modify: pass --set NAME=TEXT or --map JSON");
                std::process::exit(2);
            }
            let processor = OdgProcessor::new(config);
            let result = processor
                .modify_texts(&path, &texts, output.as_deref(), no_pdf.then_some(false))
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }

        Command::Create { output } => {
            let processor = OdgProcessor::new(config);
            let result = processor.create_odg(&output).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }

        Command::ExportPdf { path, output } => {
            let processor = OdgProcessor::new(config);
            let result = processor.export_to_pdf(&path, &output).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }

        Command::PdfFields { path } => {
            for name in pdf::form_field_names(&path)? {
                println!("{name}");
            }
            Ok(())
        }

        Command::PdfInfo { path } => {
            let info = pdf::document_info(&path)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }

        Command::PdfFill {
            path,
            output,
            sets,
            map,
        } => {
            let values = parse_assignments(sets, map);
            if values.is_empty() {
                eprintln!("Nothing to fill: pass --set NAME=TEXT or --map JSON");
                std::process::exit(2);
            }
            let report = pdf::fill_form_fields(&path, &output, &values)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

/// Merge repeatable `NAME=TEXT` flags with an optional JSON object into one
/// mapping. Explicit `--set` pairs win over the JSON map on collision.
fn parse_assignments(sets: Vec<String>, map: Option<String>) -> BTreeMap<String, String> {
    let mut values: BTreeMap<String, String> = match map {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                eprintln!("Invalid --map JSON: {err}");
                std::process::exit(2);
            }
        },
        None => BTreeMap::new(),
    };
    for pair in sets {
        let Some((name, text)) = pair.split_once('=') else {
            eprintln!("Invalid --set '{pair}': expected NAME=TEXT");
            std::process::exit(2);
        };
        values.insert(name.to_string(), text.to_string());
    }
    values
}
