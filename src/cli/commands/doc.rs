use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::cli::utils::{output_error, output_success, read_json_input};
use crate::cli::OutputFormat;
use crate::config;
use crate::document::{self, text, Document, ValidationOptions};
use crate::services::ExportFormat;

#[derive(Subcommand)]
pub enum DocCommands {
    #[command(about = "Check a document against the editor schema")]
    Validate {
        #[arg(help = "Path to a JSON document, or - for stdin")]
        file: PathBuf,
        #[arg(long, help = "Reject node and mark types the model does not know")]
        strict: bool,
    },

    #[command(about = "Render a document as HTML, markdown, text or JSON")]
    Render {
        #[arg(help = "Path to a JSON document, or - for stdin")]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = RenderFormat::Html)]
        format: RenderFormat,
    },

    #[command(about = "Word and character counts plus the heading outline")]
    Stats {
        #[arg(help = "Path to a JSON document, or - for stdin")]
        file: PathBuf,
    },

    #[command(about = "Print the built-in welcome document")]
    Sample {
        #[arg(long, help = "Print the empty document instead")]
        empty: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RenderFormat {
    Html,
    Markdown,
    Text,
    Json,
}

impl From<RenderFormat> for ExportFormat {
    fn from(format: RenderFormat) -> Self {
        match format {
            RenderFormat::Html => ExportFormat::Html,
            RenderFormat::Markdown => ExportFormat::Markdown,
            RenderFormat::Text => ExportFormat::Text,
            RenderFormat::Json => ExportFormat::Json,
        }
    }
}

pub async fn handle(cmd: DocCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DocCommands::Validate { file, strict } => {
            let input = read_json_input(&file)?;
            let mut options = ValidationOptions::from(&config::config().document);
            if strict {
                options.allow_unknown_types = false;
            }

            let checked = Document::from_value(input)
                .and_then(|doc| document::validate(&doc, &options).map(|()| doc));
            match checked {
                Ok(doc) => output_success(
                    &output_format,
                    &format!("{} is a valid document ({} nodes)", file.display(), doc.node_count()),
                    Some(json!({ "valid": true, "node_count": doc.node_count() })),
                ),
                Err(err) => {
                    let details: Vec<String> = err.violations().iter().map(ToString::to_string).collect();
                    output_error(&output_format, &err.to_string(), &details)?;
                    anyhow::bail!("{} failed validation", file.display())
                }
            }
        }
        DocCommands::Render { file, format } => {
            let doc = Document::from_value(read_json_input(&file)?)?;
            let exported = ExportFormat::from(format).export("", &doc);
            print!("{}", exported.body);
            Ok(())
        }
        DocCommands::Stats { file } => {
            let doc = Document::from_value(read_json_input(&file)?)?;
            let outline = text::outline(&doc);
            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Document statistics",
                    Some(json!({
                        "node_count": doc.node_count(),
                        "word_count": text::word_count(&doc),
                        "character_count": text::character_count(&doc),
                        "preview": text::preview(&doc, config::config().document.preview_length),
                        "outline": outline,
                    })),
                ),
                OutputFormat::Text => {
                    println!("Nodes:      {}", doc.node_count());
                    println!("Words:      {}", text::word_count(&doc));
                    println!("Characters: {}", text::character_count(&doc));
                    for entry in outline {
                        println!("{}{}", "  ".repeat(entry.level.saturating_sub(1) as usize), entry.text);
                    }
                    Ok(())
                }
            }
        }
        DocCommands::Sample { empty } => {
            let doc = if empty { Document::empty() } else { Document::welcome() };
            println!("{}", serde_json::to_string_pretty(&doc.to_value())?);
            Ok(())
        }
    }
}
