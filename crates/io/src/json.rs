// Library document load/save (JSON)

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use canon_core::model::Library;
use canon_engine::export::ExportPayload;

pub fn load(path: &Path) -> Result<Library, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| e.to_string())
}

/// Save the library, restamping `last_modified`.
pub fn save(library: &mut Library, path: &Path) -> Result<(), String> {
    library.last_modified = chrono::Utc::now().to_rfc3339();
    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, library).map_err(|e| e.to_string())
}

/// Write an export document.
pub fn write_export(payload: &ExportPayload, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, payload).map_err(|e| e.to_string())
}
