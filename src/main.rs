//! Generate a Nextflow workflow file from a JSON request
//!
//! A request document carries the six records collected for a workflow:
//! project metadata, pipeline parameters, process definitions, container
//! choice, output settings and scheduler settings. The request is validated
//! against an embedded JSON schema set, rendered section by section, and
//! written out as a workflow file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod nxf;
mod request;

use crate::nxf::document::WorkflowDocument;
use crate::request::message::Message;
use crate::request::schema::compile_schema;

#[derive(Parser)]
#[command(name = "nxf-forge", version, about = "Generate a Nextflow workflow file from a JSON request")]
struct Args {
    /// Path to the workflow request JSON
    request: PathBuf,

    /// Where to write the generated workflow
    #[arg(short, long, default_value = "workflow.nf")]
    output: PathBuf,

    /// Print the workflow to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("starting up");

    let message = Message {
        path: args.request,
        compiled_schema: compile_schema(),
    };
    let workflow_request = message.read()?;

    let document = WorkflowDocument::render(&workflow_request);
    match args.dry_run {
        true => {
            info!("--dry-run set, printing workflow instead of writing it");
            print!("{}", document.contents());
        }
        false => {
            document
                .write(&args.output)
                .with_context(|| format!("can't write workflow to {}", args.output.display()))?;
            info!("workflow written to {}", args.output.display());
        }
    }

    Ok(())
}
