//! Seed dataset used when nothing has been persisted yet.

use crate::agent::entities::{Agent, AgentStatus, Task, TaskDescriptor, TaskStatus};
use crate::history::{HistoryItem, HistoryRole};
use chrono::{Duration, SecondsFormat, Utc};
use std::sync::Arc;

fn ago(duration: Duration) -> String {
    (Utc::now() - duration).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn entry(id: &str, age: Duration, role: HistoryRole, content: &str) -> Arc<HistoryItem> {
    let mut item = HistoryItem::new(role, content).at(ago(age));
    item.id = id.into();
    Arc::new(item)
}

fn seed_task(id: &str, name: &str, description: &str, tool: &str, status: TaskStatus) -> Task {
    Task::from_descriptor(TaskDescriptor::new(name, description, tool))
        .with_id(id)
        .with_status(status)
}

/// Two demo agents: one idle monitor and one processor paused at an approval.
pub fn sample_agents() -> Vec<Agent> {
    let mut escalate = seed_task(
        "t3",
        "Escalate to On-Call",
        "If crashing pods are found, page the on-call engineer via PagerDuty.",
        "PagerDutyAPI",
        TaskStatus::Pending,
    );
    escalate.requires_approval = true;

    let mut monitor = Agent::new(
        "K8s Pod Monitor",
        "Monitor production Kubernetes cluster for unusual pod crash loops and post a summary to Slack.",
        vec![
            seed_task(
                "t1",
                "Connect to Prod Cluster",
                "Authenticate with the production Kubernetes cluster using service account credentials.",
                "KubernetesAPI",
                TaskStatus::Pending,
            ),
            seed_task(
                "t2",
                "Query Pod Status",
                "Execute `kubectl get pods -n production` and filter for pods with high restart counts (> 5).",
                "KubernetesAPI",
                TaskStatus::Pending,
            ),
            escalate,
            seed_task(
                "t4",
                "Post to Slack",
                "Post a summary of findings to the #ops-alerts Slack channel.",
                "SlackAPI",
                TaskStatus::Pending,
            ),
        ],
    )
    .with_id("agent-1");
    monitor.created_at = ago(Duration::days(1));
    monitor.tags = vec!["production".into(), "sre".into(), "monitoring".into()];
    monitor.history = vec![entry("h1", Duration::zero(), HistoryRole::System, "Agent initiated.")];

    let mut crm_update = seed_task(
        "t7",
        "Update CRM Record",
        "Update the corresponding customer record in Salesforce with the analysis summary.",
        "SalesforceAPI",
        TaskStatus::AwaitingApproval,
    );
    crm_update.requires_approval = true;

    let mut processor = Agent::new(
        "Customer Upload Processor",
        "Process new customer file uploads, analyze their content, update CRM, and archive.",
        vec![
            seed_task(
                "t5",
                "Scan S3 Bucket",
                "Scan `s3://customer-uploads` for new files.",
                "AWS_S3",
                TaskStatus::Completed,
            ),
            seed_task(
                "t6",
                "Analyze File Content",
                "Use NLP model to classify the content of new files.",
                "GenericAPI",
                TaskStatus::Completed,
            ),
            crm_update,
            seed_task(
                "t8",
                "Archive File",
                "Move the processed file to `s3://customer-uploads-archive`.",
                "AWS_S3",
                TaskStatus::Pending,
            ),
        ],
    )
    .with_id("agent-2");
    // An approval gate always leaves the agent PAUSED
    processor.status = AgentStatus::Paused;
    processor.created_at = ago(Duration::days(2));
    processor.tags = vec!["data-processing".into(), "aws".into(), "automation".into()];
    processor.history = vec![
        entry("h2-1", Duration::hours(2), HistoryRole::System, "Agent initiated."),
        entry(
            "h2-2",
            Duration::hours(1),
            HistoryRole::User,
            "Can you start processing the files from yesterday?",
        ),
        entry(
            "h2-3",
            Duration::seconds(3500),
            HistoryRole::Agent,
            "Yes, I am beginning the process now.",
        ),
    ];

    vec![monitor, processor]
}
