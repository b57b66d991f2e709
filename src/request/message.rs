use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use log::{info, warn};
use serde_json::Value;

use crate::request::workflow::WorkflowRequest;

/// Ways a request can fail before any rendering starts
#[derive(Debug)]
pub enum MessageError {
    JSONValidationError,
    JSONDecodeError,
    DeserialisationError,
    MessageReadError,
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MessageError::JSONValidationError => {
                write!(f, "request does not match the workflow request schema")
            }
            MessageError::JSONDecodeError => write!(f, "request is not valid JSON"),
            MessageError::DeserialisationError => {
                write!(f, "request JSON has an unexpected shape")
            }
            MessageError::MessageReadError => write!(f, "request file can't be read"),
        }
    }
}

impl std::error::Error for MessageError {}

/// A workflow request message on disk, plus the schema it has to satisfy
pub struct Message {
    pub path: PathBuf,
    pub compiled_schema: JSONSchema,
}

impl Message {
    /// Read the message and turn it into a typed request: load the file,
    /// parse it as JSON, validate against the schema, then deserialise.
    pub fn read(&self) -> Result<WorkflowRequest, MessageError> {
        let json: Value = self.parse_untyped_json()?;

        match self.validate(&json) {
            Ok(_) => {
                info!("Message is valid");
                self.parse_json(json)
            }
            Err(err) => {
                warn!("Message fails validation");
                Err(err)
            }
        }
    }

    fn validate(&self, json: &Value) -> Result<(), MessageError> {
        info!("Validating raw message against JSON schema");
        match self.compiled_schema.validate(json) {
            Ok(_) => Ok(()),
            Err(errors) => {
                for error in errors {
                    warn!("Validation error: {error}");
                }
                Err(MessageError::JSONValidationError)
            }
        }
    }

    fn read_file(&self) -> Result<String, MessageError> {
        let path: &Path = self.path.as_path();
        info!("Reading message at {}", path.display());
        fs::read_to_string(path).map_err(|err| {
            warn!("Can't read workflow request at path {}: {}", path.display(), err);
            MessageError::MessageReadError
        })
    }

    fn parse_json(&self, value: Value) -> Result<WorkflowRequest, MessageError> {
        info!("Deserialising valid JSON into typed request");
        serde_json::from_value::<WorkflowRequest>(value).map_err(|err| {
            warn!("Can't deserialise request: {err}");
            MessageError::DeserialisationError
        })
    }

    fn parse_untyped_json(&self) -> Result<Value, MessageError> {
        info!("Parsing JSON into untyped structure");
        let json_string = self.read_file()?;
        serde_json::from_str::<Value>(&json_string).map_err(|err| {
            warn!("Request is not parseable JSON: {err}");
            MessageError::JSONDecodeError
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::schema::compile_schema;

    fn message_with(contents: &str) -> (tempfile::TempDir, Message) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("request.json");
        fs::write(&path, contents).expect("write request");
        let message = Message {
            path,
            compiled_schema: compile_schema(),
        };
        (dir, message)
    }

    fn complete_request() -> String {
        r#"{
            "project_info": {
                "name": "RNA_Seq_Analysis",
                "description": "desc",
                "author_name": "Jane Doe",
                "author_email": "jane@x.com"
            },
            "parameters": [
                {"name": "read_length", "type": "Integer", "default": "150", "description": "Read length"}
            ],
            "processes": [],
            "environment": {"container": "Docker", "docker_image": "biocontainers/samtools:v1.9.0"},
            "output_config": {"output_dir": "results/", "generate_logs": true, "file_naming": ""},
            "scheduler": {"scheduler": "SLURM", "queue": "bioq"}
        }"#
        .to_string()
    }

    #[test]
    fn complete_request_is_read_into_typed_records() {
        let (_dir, message) = message_with(&complete_request());
        let request = message.read().expect("valid request");
        assert_eq!(request.project_info.name, "RNA_Seq_Analysis");
        assert_eq!(request.parameters.len(), 1);
        assert_eq!(request.scheduler.expect("scheduler").queue, "bioq");
    }

    #[test]
    fn schema_violations_are_reported() {
        // output_config record missing entirely
        let contents = r#"{
            "project_info": {"name": "", "description": "", "author_name": "", "author_email": ""},
            "parameters": [],
            "processes": [],
            "environment": {"container": "None"},
            "scheduler": {"scheduler": "None", "queue": ""}
        }"#;
        let (_dir, message) = message_with(contents);
        assert!(matches!(message.read(), Err(MessageError::JSONValidationError)));
    }

    #[test]
    fn broken_json_is_reported() {
        let (_dir, message) = message_with("{ not json");
        assert!(matches!(message.read(), Err(MessageError::JSONDecodeError)));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let message = Message {
            path: dir.path().join("nowhere.json"),
            compiled_schema: compile_schema(),
        };
        assert!(matches!(message.read(), Err(MessageError::MessageReadError)));
    }

    #[test]
    fn unknown_container_values_pass_through() {
        let contents = complete_request().replace("\"Docker\"", "\"Podman\"");
        let (_dir, message) = message_with(&contents);
        let request = message.read().expect("request with unknown container");
        assert_eq!(request.environment.expect("environment").container, "Podman");
    }
}
