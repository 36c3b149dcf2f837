//! Outcome of a (simulated) tool invocation.

/// What the executor reported for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The tool ran; carries the result text stored on the task
    Succeeded(String),
    /// The tool failed; carries the error text stored on the task
    Failed(String),
}

impl ToolOutcome {
    /// Canned success result for a simulated call.
    pub fn simulated_success(tool: &str) -> Self {
        ToolOutcome::Succeeded(format!(
            "Tool {} executed successfully. Output: {{ \"status\": \"ok\" }}",
            tool
        ))
    }

    /// Canned failure result for a simulated call.
    pub fn simulated_failure(tool: &str) -> Self {
        ToolOutcome::Failed(format!(
            "Tool {} failed. Error: Connection timed out.",
            tool
        ))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Succeeded(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ToolOutcome::Succeeded(m) | ToolOutcome::Failed(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_messages() {
        assert_eq!(
            ToolOutcome::simulated_success("SlackAPI").message(),
            r#"Tool SlackAPI executed successfully. Output: { "status": "ok" }"#
        );
        let failure = ToolOutcome::simulated_failure("AWS_S3");
        assert!(!failure.is_success());
        assert_eq!(failure.message(), "Tool AWS_S3 failed. Error: Connection timed out.");
    }
}
