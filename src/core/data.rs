use std::{
    fs::File,
    io::{BufReader, Read},
};

use awc::Client;
use log::{error, info};
use serde_json::Value;

use crate::{
    error::{FolioError, Result},
    types::Document,
};

pub const EXPORT_FILE_NAME: &str = "portfolio.json";

/// A serialized document ready to be handed to the browser as a download.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// Strict parse followed by the top-level shape check and typed decode.
pub fn parse_document(text: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(text).map_err(|error| FolioError::Parse {
        message: error.to_string(),
    })?;
    decode_document(value)
}

fn decode_document(value: Value) -> Result<Document> {
    for section in ["settings", "portfolio"] {
        if value.get(section).map_or(true, Value::is_null) {
            return Err(FolioError::MissingSection(section));
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Pretty-printed JSON with two-space indentation.
pub fn to_pretty_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn export_document(document: &Document) -> Result<ExportFile> {
    let json = to_pretty_json(document)?;
    info!("Exporting {} ({} bytes)", EXPORT_FILE_NAME, json.len());
    Ok(ExportFile {
        file_name: EXPORT_FILE_NAME,
        bytes: json.into_bytes(),
    })
}

pub fn load_from_storage(path: &str) -> Result<Document> {
    let file = File::open(path).map_err(|error| {
        error!("Error opening document file {}: {}", path, error);
        error
    })?;
    let mut buffer = String::new();
    let mut reader = BufReader::new(file);
    let size = reader.read_to_string(&mut buffer)?;
    info!("Local document size: {}", size);
    parse_document(&buffer).map_err(|error| {
        error!("Local document structure is incorrect: {}", error);
        error
    })
}

pub async fn load_from_cdn(url: &str) -> Result<Document> {
    let client = Client::default();
    let mut response = client.get(url).send().await.map_err(|error| {
        error!("Error requesting document from {}: {}", url, error);
        FolioError::Fetch(error.to_string())
    })?;
    if !response.status().is_success() {
        let status = response.status();
        error!("Remote document request failed: HTTP {}", status);
        return Err(FolioError::Fetch(format!("HTTP {}", status)));
    }
    let body = response.body().await.map_err(|error| {
        error!("Remote document could not be read: {}", error);
        FolioError::Fetch(error.to_string())
    })?;
    info!("Remote document size: {}", body.len());
    let text = String::from_utf8_lossy(&body);
    parse_document(&text)
}

/// Loads from a URL when the source looks like one, otherwise from disk.
pub async fn load_document(source: &str) -> Result<Document> {
    if source.starts_with("http://") || source.starts_with("https://") {
        load_from_cdn(source).await
    } else {
        load_from_storage(source)
    }
}
