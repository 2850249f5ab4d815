use serde::Serialize;
use std::fmt;
use std::path::Path;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const XLSX_MIMES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel.sheet.macroenabled.12",
];
const TEXT_MIMES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-yaml",
    "application/toml",
];

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "csv", "tsv", "log", "json", "xml", "yaml", "yml", "toml", "ini",
    "cfg", "conf", "html", "htm", "css", "js", "ts", "rs", "py", "java", "c", "h", "cpp", "sh",
    "sql", "svg",
];

/// How a file is previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Docx,
    Spreadsheet,
    Text,
    Binary,
}

impl FileKind {
    /// Pick a kind from the declared content type and the file name.
    ///
    /// A content type of exactly `application/pdf` always wins. Otherwise
    /// MIME type and extension are checked together, one kind at a time.
    pub fn resolve(content_type: Option<&str>, file_name: &str) -> FileKind {
        let mime = content_type
            .map(|c| c.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .unwrap_or_default();
        if mime == "application/pdf" {
            return FileKind::Pdf;
        }

        let ext = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let ext = ext.as_str();

        // SVG has no raster header to probe, so it is shown as markup
        if mime == "image/svg+xml" {
            FileKind::Text
        } else if mime.starts_with("image/") || IMAGE_EXTENSIONS.contains(&ext) {
            FileKind::Image
        } else if ext == "pdf" {
            FileKind::Pdf
        } else if mime == DOCX_MIME || ext == "docx" {
            FileKind::Docx
        } else if XLSX_MIMES.contains(&mime.as_str()) || matches!(ext, "xlsx" | "xlsm") {
            FileKind::Spreadsheet
        } else if mime.starts_with("text/")
            || TEXT_MIMES.contains(&mime.as_str())
            || TEXT_EXTENSIONS.contains(&ext)
        {
            FileKind::Text
        } else {
            FileKind::Binary
        }
    }

    /// Whether pages of this kind carry edit buffers.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            FileKind::Pdf | FileKind::Text | FileKind::Docx | FileKind::Spreadsheet
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Spreadsheet => "spreadsheet",
            FileKind::Text => "text",
            FileKind::Binary => "binary",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
