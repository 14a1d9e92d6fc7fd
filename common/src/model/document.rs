use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An uploaded compliance document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Stored name on the server.
    pub filename: String,
    /// Name the file had on the user's machine.
    #[serde(default)]
    pub original_filename: String,
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl Document {
    pub fn display_name(&self) -> &str {
        if self.original_filename.trim().is_empty() {
            &self.filename
        } else {
            &self.original_filename
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_file_type(&self.file_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Csv,
    Json,
    Text,
    Other,
}

impl DocumentKind {
    pub fn from_file_type(file_type: &str) -> Self {
        match file_type.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "csv" => DocumentKind::Csv,
            "json" => DocumentKind::Json,
            "txt" | "md" => DocumentKind::Text,
            _ => DocumentKind::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub total: u32,
}

impl DocumentList {
    pub fn ids(&self) -> Vec<String> {
        self.documents.iter().map(|doc| doc.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.iter().any(|doc| doc.id == id)
    }
}
