//! Export of application lists as downloadable documents.
//!
//! Only CSV, JSON and plain text are really produced. The "Excel" export is
//! CSV under an `.xlsx` name and the "Word"/"PDF" exports are the plain-text
//! report under `.docx`/`.pdf` names.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::localization::LocalizationManager;
use crate::models::Application;
use crate::pricing::format_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Xlsx,
        ExportFormat::Docx,
        ExportFormat::Pdf,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn extension(self) -> &'static str {
        self.code()
    }

    pub fn button_label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "📄 CSV",
            ExportFormat::Json => "🧾 JSON",
            ExportFormat::Xlsx => "📊 Excel",
            ExportFormat::Docx => "📝 Word",
            ExportFormat::Pdf => "📕 PDF",
        }
    }
}

/// Flat row shared by the CSV and JSON exports
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow<'a> {
    pub id: &'a str,
    pub client_name: &'a str,
    pub client_phone: &'a str,
    pub address: &'a str,
    pub region: &'a str,
    pub status: &'static str,
    pub priority: &'static str,
    pub workflow_type: &'static str,
    pub created_at: String,
    pub updated_at: String,
}

impl<'a> From<&'a Application> for ExportRow<'a> {
    fn from(app: &'a Application) -> Self {
        Self {
            id: &app.id,
            client_name: &app.client_name,
            client_phone: &app.client_phone,
            address: &app.address,
            region: &app.region,
            status: app.status.code(),
            priority: app.priority.code(),
            workflow_type: app.workflow_type.code(),
            created_at: app.created_at.format("%Y-%m-%d %H:%M").to_string(),
            updated_at: app.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// A rendered document ready to upload
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn export_file_name(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "applications_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

pub fn render_csv(apps: &[Application]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if apps.is_empty() {
        // serialize() only writes headers alongside the first record
        writer.write_record([
            "id",
            "client_name",
            "client_phone",
            "address",
            "region",
            "status",
            "priority",
            "workflow_type",
            "created_at",
            "updated_at",
        ])?;
    }
    for app in apps {
        writer.serialize(ExportRow::from(app))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {}", e.error()))
}

pub fn render_json(apps: &[Application]) -> Result<Vec<u8>> {
    let rows: Vec<ExportRow<'_>> = apps.iter().map(ExportRow::from).collect();
    Ok(serde_json::to_vec_pretty(&rows)?)
}

pub fn render_text_report(
    apps: &[Application],
    localization: &LocalizationManager,
    language: &str,
    now: DateTime<Utc>,
) -> String {
    let t = |key: &str| localization.get_message_in_language(key, language, None);

    let mut report = format!(
        "{}\n{}: {}\n{}: {}\n\n",
        t("export-report-title"),
        t("export-generated-at"),
        now.format("%Y-%m-%d %H:%M"),
        t("export-total"),
        apps.len()
    );

    for (i, app) in apps.iter().enumerate() {
        report.push_str(&format!(
            "{}. {}\n   {}: {} ({})\n   {}: {}\n   {}: {}\n   {}: {}\n   {}: {}\n",
            i + 1,
            app.id,
            t("field-client"),
            app.client_name,
            app.client_phone,
            t("field-address"),
            app.address,
            t("field-status"),
            t(app.status.label_key()),
            t("field-priority"),
            t(app.priority.label_key()),
            t("field-created"),
            app.created_at.format("%Y-%m-%d %H:%M"),
        ));
        if let Some(cost) = app.estimated_cost {
            report.push_str(&format!(
                "   {}: {} {}\n",
                t("field-cost"),
                format_amount(cost),
                t("currency")
            ));
        }
        report.push('\n');
    }

    report
}

/// Renders `apps` in `format`
pub fn render_export(
    apps: &[Application],
    format: ExportFormat,
    localization: &LocalizationManager,
    language: &str,
    now: DateTime<Utc>,
) -> Result<ExportFile> {
    let bytes = match format {
        ExportFormat::Csv | ExportFormat::Xlsx => render_csv(apps)?,
        ExportFormat::Json => render_json(apps)?,
        ExportFormat::Docx | ExportFormat::Pdf => {
            render_text_report(apps, localization, language, now).into_bytes()
        }
    };

    Ok(ExportFile {
        file_name: export_file_name(format, now),
        bytes,
    })
}
