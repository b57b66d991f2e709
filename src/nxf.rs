//! Render Nextflow workflow files from validated requests

/// Section renderers and the assembled workflow document
pub mod document;
