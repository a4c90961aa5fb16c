use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "crm-docs")]
#[command(about = "Quote document export and template management", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a quote and write the document
    Export {
        /// Quote JSON file
        quote: PathBuf,
        /// Output directory (defaults to <data dir>/exports)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the sandboxed preview frame for a quote
    Preview {
        /// Quote JSON file
        quote: PathBuf,
        /// Preview an unsaved template file instead of the saved one
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Save a template file as the company's custom template
    #[command(name = "set-template")]
    SetTemplate {
        /// Template file
        template: PathBuf,
    },
    /// Remove the company's custom template
    #[command(name = "clear-template")]
    ClearTemplate,
    /// List the fields a template references
    Placeholders {
        /// Template file (defaults to the company's current template)
        template: Option<PathBuf>,
    },
    /// Choose the shipped fallback template: latest, disabled, or a version
    #[command(name = "set-default")]
    SetDefault {
        choice: String,
    },
}
