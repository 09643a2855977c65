// src/export/logic.rs

use crate::db::attendance::load_records;
use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::AttendanceExport;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export attendance records, oldest first.
    ///
    /// - `file`: absolute path of the output file
    /// - `student`: restrict to one student ID
    ///
    /// Returns the number of rows written; nothing is written when no
    /// records match.
    pub fn export(
        pool: &DbPool,
        format: ExportFormat,
        file: &str,
        student: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let mut records = load_records(&pool.conn, student, None)?;
        if records.is_empty() {
            warning("No attendance records found for the export.");
            return Ok(0);
        }
        records.reverse();

        let rows: Vec<AttendanceExport> = records.iter().map(AttendanceExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        ttlog_soft(
            &pool.conn,
            "export",
            file,
            &format!("{} records exported as {}", rows.len(), format.as_str()),
        );

        Ok(rows.len())
    }
}
