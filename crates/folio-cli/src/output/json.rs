use folio_core::error::FolioError;
use serde::Serialize;

pub fn render<T: Serialize>(value: &T) -> Result<String, FolioError> {
    Ok(serde_json::to_string_pretty(value)?)
}
