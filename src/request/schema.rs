use std::sync::Arc;

use anyhow::anyhow;
use jsonschema::{JSONSchema, SchemaResolver, SchemaResolverError};
use serde_json::Value;
use url::Url;

/// Root schema for workflow generation requests
static API: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/api.json"));

/// Compile the embedded schema set into a validator for request messages
pub fn compile_schema() -> JSONSchema {
    let schema = parse_json(API);
    JSONSchema::options()
        .with_resolver(EmbeddedResolver)
        .compile(&schema)
        .expect("Valid schema")
}

fn parse_json(text: &str) -> Value {
    serde_json::from_str(text).expect("Valid JSON")
}

/*
Resolver for the embedded schema set
api.json points at one sibling schema per record with relative references;
the schema files carry no $id, so those references resolve against the
json-schema:/// default base and the original reference is just the file name
*/
struct EmbeddedResolver;

impl SchemaResolver for EmbeddedResolver {
    fn resolve(&self, _root_schema: &Value, url: &Url, original_reference: &str) -> Result<Arc<Value>, SchemaResolverError> {
        match url.scheme() {
            "json-schema" => match embedded_schema(original_reference) {
                Some(text) => Ok(Arc::new(parse_json(text))),
                None => Err(anyhow!("no embedded schema named {original_reference}")),
            },
            _ => Err(anyhow!("scheme is not supported")),
        }
    }
}

/// Schema file for each record in a request, keyed by reference name
fn embedded_schema(name: &str) -> Option<&'static str> {
    match name {
        "project.json" => Some(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/project.json"))),
        "parameter.json" => Some(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/parameter.json"))),
        "process.json" => Some(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/process.json"))),
        "environment.json" => Some(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/environment.json"))),
        "output.json" => Some(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/output.json"))),
        "scheduler.json" => Some(include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/scheduler.json"))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_request() -> Value {
        json!({
            "project_info": {
                "name": "RNA_Seq_Analysis",
                "description": "desc",
                "author_name": "Jane Doe",
                "author_email": "jane@x.com"
            },
            "parameters": [],
            "processes": [],
            "environment": {"container": "None"},
            "output_config": {"output_dir": "results/", "generate_logs": false, "file_naming": ""},
            "scheduler": {"scheduler": "None", "queue": ""}
        })
    }

    #[test]
    fn embedded_schema_set_compiles() {
        compile_schema();
    }

    #[test]
    fn accepts_a_complete_request() {
        assert!(compile_schema().is_valid(&complete_request()));
    }

    #[test]
    fn rejects_a_request_missing_a_record() {
        let mut request = complete_request();
        request.as_object_mut().expect("object").remove("scheduler");
        assert!(!compile_schema().is_valid(&request));
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let mut request = complete_request();
        request["output_config"]["generate_logs"] = json!("yes please");
        assert!(!compile_schema().is_valid(&request));
    }

    #[test]
    fn container_values_are_not_constrained() {
        // unknown container choices must reach the renderer, which ignores
        // them, rather than die in validation
        let mut request = complete_request();
        request["environment"]["container"] = json!("Podman");
        assert!(compile_schema().is_valid(&request));
    }

    #[test]
    fn unknown_reference_has_no_embedded_schema() {
        assert!(embedded_schema("genome.json").is_none());
    }
}
