//! Writes activity exports into a directory.

use std::fs;
use std::path::PathBuf;
use steward_application::{ExportError, ExportWriterPort};

pub struct FileExportWriter {
    dir: PathBuf,
}

impl FileExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportWriterPort for FileExportWriter {
    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, ExportError> {
        let error = |source| ExportError {
            file_name: file_name.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(error)?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents).map_err(error)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_into_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileExportWriter::new(dir.path().join("exports"));
        let path = writer.write("agent_x_logs_1.txt", "hello").unwrap();
        assert_eq!(path, dir.path().join("exports/agent_x_logs_1.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn test_reports_file_name_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let err = FileExportWriter::new(&blocker).write("out.txt", "x").unwrap_err();
        assert_eq!(err.file_name, "out.txt");
    }
}
