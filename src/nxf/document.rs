use std::fs;
use std::io;
use std::path::Path;

use log::warn;
use serde::Serialize;
use tinytemplate::{format_unescaped, TinyTemplate};

use crate::request::workflow::{
    EnvironmentConfig, OutputConfig, Parameter, Process, ProjectInfo, SchedulerConfig,
    WorkflowRequest,
};

/// All rendered sections of a workflow file, in the order they are written
pub struct WorkflowDocument {
    header: Header,
    params: Params,
    environment: Environment,
    output: Output,
    processes: Processes,
    scheduler: Scheduler,
}

impl WorkflowDocument {
    /// Render every section of the workflow file from a request
    ///
    /// Rendering is total: a section without content collapses to an empty
    /// string, so the same request always produces the same document and no
    /// request produces an error.
    pub fn render(request: &WorkflowRequest) -> WorkflowDocument {
        WorkflowDocument {
            header: render_header(&request.project_info),
            params: render_params(&request.parameters),
            environment: render_environment(request.environment.as_ref()),
            output: render_output(request.output_config.as_ref()),
            processes: render_processes(&request.processes),
            scheduler: render_scheduler(request.scheduler.as_ref()),
        }
    }

    /// Concatenate the rendered sections into the final document text
    pub fn contents(&self) -> String {
        // order is important when assembling the file
        [
            self.header.content.as_str(),
            self.params.content.as_str(),
            self.environment.content.as_str(),
            self.output.content.as_str(),
            self.processes.content.as_str(),
            self.scheduler.content.as_str(),
        ]
        .concat()
    }

    /// Write the document to disk, replacing any previous copy
    pub fn write(&self, out_path: &Path) -> Result<(), io::Error> {
        if out_path.exists() {
            warn!("{} already exists, contents will be overwritten", out_path.display());
        }
        fs::write(out_path, self.contents())
    }
}

/// Rendered header comment lines
///
/// Three comment lines carrying the project metadata, always present, even
/// when every field was left empty.
struct Header {
    content: String,
}

/// Rendered params block
struct Params {
    content: String,
}

/// Rendered container directive
///
/// Container choices map to nextflow process settings:
/// - [x] Docker (process.container, image name taken as given)
/// - [x] Conda (process.conda, only once an environment file was supplied)
/// - [ ] Singularity
///
/// "None" and unrecognised choices emit nothing.
struct Environment {
    content: String,
}

/// Rendered output settings
struct Output {
    content: String,
}

/// Rendered process blocks
///
/// One block per retained process definition:
/// - declared inputs and outputs, copied as written
/// - the command wrapped in a triple quoted script body, byte for byte
struct Processes {
    content: String,
}

/// Rendered scheduler settings
struct Scheduler {
    content: String,
}

/// Rendering context for the header comment lines
#[derive(Serialize)]
struct HeaderContext {
    name: String,
    description: String,
    author_name: String,
    author_email: String,
}

/// Rendering context for one process block
#[derive(Serialize)]
struct ProcessContext {
    name: String,
    input: String,
    output: String,
    command: String,
}

/// Render the header comments using TinyTemplate
fn render_header(project: &ProjectInfo) -> Header {
    /// included header template
    static HEADER: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/header.txt"));
    let mut tt = TinyTemplate::new();
    tt.add_template("header", HEADER).expect("Template");
    // project metadata is free text and must reach the file unescaped
    tt.set_default_formatter(&format_unescaped);

    let context = HeaderContext {
        name: project.name.clone(),
        description: project.description.clone(),
        author_name: project.author_name.clone(),
        author_email: project.author_email.clone(),
    };

    Header { content: tt.render("header", &context).expect("Rendered header") }
}

/// Build the params block line by line
///
/// A parameter keeps whatever default it was given: Integer, Boolean and
/// Float defaults are written verbatim with no coercion, only String
/// defaults gain single quotes. The trailing comment always appears, even
/// for an empty description.
fn render_params(parameters: &[Parameter]) -> Params {
    let retained: Vec<&Parameter> = parameters.iter().filter(|p| p.is_complete()).collect();
    if retained.is_empty() {
        return Params { content: String::new() };
    }

    let mut content = String::from("params {\n");
    for param in retained {
        let value = match param.is_quoted() {
            true => format!("'{}'", param.default),
            false => param.default.clone(),
        };
        content.push_str(&format!("  {} = {} // {}\n", param.name, value, param.description));
    }
    content.push_str("}\n\n");

    Params { content }
}

fn render_environment(environment: Option<&EnvironmentConfig>) -> Environment {
    let content = match environment {
        Some(env) => match env.container.as_str() {
            "Docker" => format!(
                "process.container = '{}'\n\n",
                env.docker_image.as_deref().unwrap_or_default()
            ),
            "Conda" => match env.conda_file() {
                Some(file_name) => format!("process.conda = '{}'\n\n", file_name),
                None => String::new(),
            },
            _ => String::new(),
        },
        None => String::new(),
    };

    Environment { content }
}

/// Build the output settings block
///
/// publishDir is always written inside the block; the debug flag and file
/// pattern lines only appear when set.
fn render_output(output: Option<&OutputConfig>) -> Output {
    let config = match output {
        Some(config) => config,
        None => return Output { content: String::new() },
    };

    let mut content = format!("process.publishDir = '{}'\n", config.output_dir);
    if config.generate_logs {
        content.push_str("process.debug = true\n");
    }
    if !config.file_naming.is_empty() {
        content.push_str(&format!("process.filePattern = '{}'\n", config.file_naming));
    }
    content.push('\n');

    Output { content }
}

/// Render the process blocks using TinyTemplate
fn render_processes(processes: &[Process]) -> Processes {
    /// included process block template
    static PROCESS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/process.txt"));
    let mut tt = TinyTemplate::new();
    tt.add_template("process", PROCESS).expect("Template");
    // command text is shell script and must not be HTML escaped
    tt.set_default_formatter(&format_unescaped);

    let mut content = String::new();
    for process in processes.iter().filter(|p| p.is_complete()) {
        let context = ProcessContext {
            name: process.name.clone(),
            input: process.input.clone(),
            output: process.output.clone(),
            command: process.command.clone(),
        };
        content.push_str(&tt.render("process", &context).expect("Rendered process"));
    }

    Processes { content }
}

fn render_scheduler(scheduler: Option<&SchedulerConfig>) -> Scheduler {
    let content = match scheduler {
        Some(config) if config.is_enabled() => {
            let mut block = String::from("// Scheduler Settings\n");
            block.push_str(&format!("process.executor = '{}'\n", config.scheduler));
            if !config.queue.is_empty() {
                block.push_str(&format!("process.queue = '{}'\n", config.queue));
            }
            block.push('\n');
            block
        }
        _ => String::new(),
    };

    Scheduler { content }
}
