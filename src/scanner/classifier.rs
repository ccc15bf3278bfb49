//! Text/binary classification keyed by file name.
//!
//! The scanner only asks one question, "is this name a text file?", so the
//! classifier is a trait that tests and embedders can swap out. The default
//! implementation consults the `mime_guess` database.

use mime_guess::mime;
use std::path::Path;

pub trait ContentClassifier {
    /// Returns `false` only when the name is known to denote non-text content.
    fn is_text(&self, file_name: &str) -> bool;
}

impl<F> ContentClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_text(&self, file_name: &str) -> bool {
        self(file_name)
    }
}

// mime_guess registers `.ts` as MPEG transport stream video and several
// source types under `application/*`; these are always source text here.
const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "mjs", "cjs", "ts", "tsx", "html", "htm", "css", "scss", "sass", "less",
    "java", "kt", "kts", "c", "h", "cpp", "hpp", "cc", "cs", "go", "rs",
];

// Compared after dropping an `x-` prefix: `sql` also covers `application/x-sql`.
const TEXT_LIKE_APPLICATION_SUBTYPES: &[&str] = &[
    "javascript",
    "ecmascript",
    "typescript",
    "json",
    "xml",
    "toml",
    "yaml",
    "sh",
    "csh",
    "sql",
    "httpd-php",
    "perl",
    "ruby",
    "python",
    "tex",
    "latex",
];

/// `text/*`, or an `application/*` type that is plain text in practice.
fn is_text_mime(mime: &mime::Mime) -> bool {
    if mime.type_() == mime::TEXT {
        return true;
    }
    if mime.type_() != mime::APPLICATION {
        return false;
    }
    if let Some(suffix) = mime.suffix() {
        if suffix == mime::XML || suffix == mime::JSON {
            return true;
        }
    }

    let subtype = mime.subtype().as_str();
    let base = subtype.strip_prefix("x-").unwrap_or(subtype);
    TEXT_LIKE_APPLICATION_SUBTYPES.contains(&base)
}

/// Classifier backed by the `mime_guess` extension table.
///
/// Names with no known MIME type are treated as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeClassifier;

impl MimeClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl ContentClassifier for MimeClassifier {
    fn is_text(&self, file_name: &str) -> bool {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        if let Some(ref ext) = extension {
            if SOURCE_EXTENSIONS.contains(&ext.as_str()) {
                return true;
            }
        }

        mime_guess::from_path(file_name)
            .first()
            .map_or(true, |guess| is_text_mime(&guess))
    }
}
