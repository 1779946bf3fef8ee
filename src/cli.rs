use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "drawbridge")]
#[command(about = "Edit shape text in ODG drawings via LibreOffice; inspect and fill PDF forms", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// LibreOffice-bundled Python interpreter (default: platform install path)
    #[arg(long, global = true)]
    pub(crate) engine: Option<PathBuf>,

    /// Plain Python interpreter used when no engine path is given
    #[arg(long, global = true)]
    pub(crate) python: Option<PathBuf>,

    /// Bridge script location (default: python/odg_bridge.py next to the executable)
    #[arg(long, global = true)]
    pub(crate) script: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print page count, shape names and shape text of a drawing.
    Info { path: PathBuf },

    /// Replace the text of one or more named shapes.
    Modify {
        path: PathBuf,
        /// Shape assignment NAME=TEXT (repeatable)
        #[arg(long = "set", value_name = "NAME=TEXT")]
        sets: Vec<String>,
        /// Full shape→text mapping as one JSON object
        #[arg(long, value_name = "JSON")]
        map: Option<String>,
        /// Write the modified document here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the PDF export that normally accompanies a modification
        #[arg(long)]
        no_pdf: bool,
    },

    /// Create a new empty drawing document.
    Create { output: PathBuf },

    /// Export a drawing to PDF.
    ExportPdf { path: PathBuf, output: PathBuf },

    /// List the form field names of a PDF.
    PdfFields { path: PathBuf },

    /// Print PDF metadata and form field names.
    PdfInfo { path: PathBuf },

    /// Fill PDF form text fields and save the result.
    PdfFill {
        path: PathBuf,
        output: PathBuf,
        /// Field assignment NAME=TEXT (repeatable)
        #[arg(long = "set", value_name = "NAME=TEXT")]
        sets: Vec<String>,
        /// Full field→value mapping as one JSON object
        #[arg(long, value_name = "JSON")]
        map: Option<String>,
    },
}
