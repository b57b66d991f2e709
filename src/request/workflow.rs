use serde::{Deserialize, Serialize};

/// A complete workflow generation request: the six records a request
/// document carries, in the shape the interactive collector produces them.
///
/// Every field tolerates being absent or empty. Rendering a request never
/// fails; missing pieces just drop out of the generated file.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub project_info: ProjectInfo,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub environment: Option<EnvironmentConfig>,
    #[serde(default)]
    pub output_config: Option<OutputConfig>,
    #[serde(default)]
    pub scheduler: Option<SchedulerConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    /// One of String, Integer, Boolean or Float. Carried as text and
    /// compared literally: an unrecognised type is written unquoted, the
    /// same as the numeric ones.
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub description: String,
}

impl Parameter {
    /// The collector only adds a parameter once a name and a default value
    /// were filled in; requests read from disk get the same gate here.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.default.is_empty()
    }

    /// String defaults are single quoted in the rendered file, every other
    /// type is written verbatim.
    pub fn is_quoted(&self) -> bool {
        self.param_type == "String"
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Process {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

impl Process {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.command.is_empty()
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    /// One of None, Docker, Singularity or Conda. Unrecognised values fall
    /// through to "no container directive".
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub docker_image: Option<String>,
    #[serde(default)]
    pub conda_file_name: Option<String>,
}

impl EnvironmentConfig {
    /// The conda environment file name, when one was actually supplied.
    /// A missing key and an empty string both count as "no file".
    pub fn conda_file(&self) -> Option<&str> {
        self.conda_file_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub generate_logs: bool,
    #[serde(default)]
    pub file_naming: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Scheduler selector, "None" meaning no scheduler block. Any other
    /// value is written to process.executor as given.
    #[serde(default = "default_scheduler")]
    pub scheduler: String,
    #[serde(default)]
    pub queue: String,
}

impl SchedulerConfig {
    pub fn is_enabled(&self) -> bool {
        self.scheduler != "None"
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            scheduler: default_scheduler(),
            queue: String::new(),
        }
    }
}

fn default_scheduler() -> String {
    "None".to_string()
}
