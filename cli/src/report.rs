//! Console summary of a run.

use hotpatch_core::{BackupOutcome, FileAction, FileReport, RunReport};

fn describe(file: &FileReport) -> String {
    let action = match file.action {
        FileAction::AlreadyApplied => "already patched",
        FileAction::Patched => "patched",
        FileAction::WouldPatch => "would patch",
    };
    match &file.backup {
        Some(BackupOutcome::Created(path)) => {
            format!("{:?}: {} (backup: {:?})", file.path, action, path)
        }
        Some(BackupOutcome::Skipped(path)) => {
            format!("{:?}: {} (kept existing backup: {:?})", file.path, action, path)
        }
        None => format!("{:?}: {}", file.path, action),
    }
}

/// Prints one line per target file.
pub fn print_report(report: &RunReport) {
    println!("  -> {}", describe(&report.source));
    println!("  -> {}", describe(&report.workflow));
    if report.committed {
        println!("  -> committed");
    }
}
