// src/output/writer.rs
//! Executes output plans. The only place in the crate that writes files.

use super::types::*;
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Runs every operation in order, collecting failures instead of stopping.
pub fn deliver(plan: OutputPlan) -> OutputReport {
    let mut report = OutputReport::new();
    let start_time = Instant::now();

    log::debug!("Delivering output plan with {} operations", plan.operations.len());

    for operation in plan.operations {
        match execute_operation(&operation) {
            Ok(bytes_written) => {
                report = report.with_completed(CompletedOperation {
                    operation,
                    bytes_written,
                });
            }
            Err(e) => {
                log::error!("Delivery failed: {}", e);
                report = report.with_failed(FailedOperation {
                    operation,
                    error: e.to_string(),
                });
            }
        }
    }

    report.stats.total_duration_ms = start_time.elapsed().as_millis() as u64;
    log::info!(
        "Delivered {} of {} outputs ({} bytes)",
        report.stats.operations_completed,
        report.stats.operations_completed + report.stats.operations_failed,
        report.stats.bytes_written
    );

    report
}

fn execute_operation(operation: &DeliveryTarget) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::PrintToStdout { content } => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(content.len())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}
