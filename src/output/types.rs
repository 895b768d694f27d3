// src/output/types.rs
//! Plans for where rendered output goes, and reports of what happened.

use std::path::PathBuf;

/// An ordered list of deliveries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }

    /// Sends `content` to `path` when given, otherwise to stdout.
    pub fn to_file_or_stdout(path: Option<PathBuf>, content: String) -> Self {
        let target = match path {
            Some(path) => DeliveryTarget::WriteFile { path, content },
            None => DeliveryTarget::PrintToStdout { content },
        };
        Self::new().with_operation(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    WriteFile { path: PathBuf, content: String },
    PrintToStdout { content: String },
}

/// Result of executing an output plan.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
    pub stats: ExecutionStats,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.stats.operations_completed += 1;
        self.stats.bytes_written += operation.bytes_written;
        self.completed.push(operation);
        self
    }

    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.stats.operations_failed += 1;
        self.failed.push(operation);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
}

#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: DeliveryTarget,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub operations_completed: usize,
    pub operations_failed: usize,
    pub bytes_written: usize,
    pub total_duration_ms: u64,
}
