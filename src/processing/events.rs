//! Status events emitted while a screening run progresses

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineEvent {
    Started { role: String, total: usize },
    Extracted { id: String, name: String },
    Skipped { id: String, name: String, reason: String },
    Scored { id: String, name: String, score: f32 },
    Completed { ranked: usize, skipped: usize },
}

impl PipelineEvent {
    /// One-line description suitable for a progress display or log.
    pub fn message(&self) -> String {
        match self {
            PipelineEvent::Started { role, total } => {
                format!("Screening {} resume(s) for role '{}'", total, role)
            }
            PipelineEvent::Extracted { name, .. } => format!("Extracted text from {}", name),
            PipelineEvent::Skipped { name, reason, .. } => format!("Skipped {}: {}", name, reason),
            PipelineEvent::Scored { name, score, .. } => {
                format!("Scored {} at {:.1}%", name, score * 100.0)
            }
            PipelineEvent::Completed { ranked, skipped } => {
                format!("Ranked {} candidate(s), skipped {}", ranked, skipped)
            }
        }
    }
}

/// Optional sink for [`PipelineEvent`]s. Sending never fails the run; a
/// dropped receiver just silences further events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<PipelineEvent>>,
}

impl EventSink {
    pub fn new(sender: UnboundedSender<PipelineEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: PipelineEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
