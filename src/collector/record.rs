use std::io::{self, Write};
use std::path::Path;

/// One unit of the dump: either a file's content or an inline read failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Record<'a> {
    File { path: &'a Path, content: &'a str },
    ReadError { path: &'a Path, message: String },
}

impl<'a> Record<'a> {
    /// Write the record in its exact on-disk form and return the bytes written.
    ///
    /// `File: <path>\n<content>\n` or `Error reading <path>: <message>\n`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<u64> {
        let rendered = self.render();
        writer.write_all(rendered.as_bytes())?;
        Ok(rendered.len() as u64)
    }

    pub fn render(&self) -> String {
        match self {
            Record::File { path, content } => {
                format!("File: {}\n{}\n", path.display(), content)
            }
            Record::ReadError { path, message } => {
                format!("Error reading {}: {}\n", path.display(), message)
            }
        }
    }
}
