//! Export Agent use case - renders the activity log and hands it to a writer.

use crate::ports::export_writer::{ExportError, ExportWriterPort};
use std::path::PathBuf;
use std::sync::Arc;
use steward_domain::{Agent, export_file_name, now_rfc3339, render_export};
use tracing::info;

pub struct ExportAgentUseCase {
    writer: Arc<dyn ExportWriterPort>,
}

impl ExportAgentUseCase {
    pub fn new(writer: Arc<dyn ExportWriterPort>) -> Self {
        Self { writer }
    }

    pub fn execute(&self, agent: &Agent) -> Result<PathBuf, ExportError> {
        let contents = render_export(agent, &now_rfc3339());
        let file_name = export_file_name(agent, chrono::Utc::now().timestamp_millis());
        let path = self.writer.write(&file_name, &contents)?;
        info!(agent = %agent.id, path = %path.display(), "Activity exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MemoryWriter, running_agent};
    use steward_domain::{HistoryRole, parse_export};

    #[test]
    fn test_export_writes_parseable_log() {
        let writer = Arc::new(MemoryWriter::default());
        let mut agent = running_agent(None);
        agent.record(HistoryRole::User, "line one\nline two");

        let path = ExportAgentUseCase::new(writer.clone()).execute(&agent).unwrap();

        let written = writer.written();
        let (file_name, contents) = &written[0];
        assert_eq!(path, PathBuf::from(file_name));
        assert!(file_name.starts_with("agent_Runner_logs_"));
        let entries = parse_export(contents).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "line one\nline two");
    }
}
