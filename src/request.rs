//! Workflow requests arrive as JSON documents and are validated before use

/// Read a request message from disk and check it against the schema
pub mod message;
/// Compile the embedded JSON schema set
pub mod schema;
/// Typed records making up a workflow request
pub mod workflow;
