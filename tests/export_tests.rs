//! # Export Tests

use chrono::{TimeZone, Utc};
use telecom_manager_bot::export::{export_file_name, render_export, ExportFormat};
use telecom_manager_bot::filters::ApplicationFilter;
use telecom_manager_bot::localization::LocalizationManager;
use telecom_manager_bot::mock_data::seed_applications;
use telecom_manager_bot::models::{Application, ApplicationStatus};

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Vec<Application>, LocalizationManager) {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        (
            seed_applications(now),
            LocalizationManager::new().expect("Failed to create localization manager"),
        )
    }

    #[test]
    fn test_file_names_carry_timestamp_and_extension() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 5, 7).unwrap();
        assert_eq!(
            export_file_name(ExportFormat::Csv, now),
            "applications_20240615_090507.csv"
        );
        assert_eq!(
            export_file_name(ExportFormat::Pdf, now),
            "applications_20240615_090507.pdf"
        );
    }

    #[test]
    fn test_format_codes_parse_back() {
        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::from_code(format.code()), Some(format));
        }
        assert_eq!(ExportFormat::from_code("odt"), None);
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_application() {
        let (apps, loc) = setup();
        let file = render_export(&apps, ExportFormat::Csv, &loc, "uz", Utc::now()).unwrap();

        let mut reader = csv::Reader::from_reader(file.bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "id");
        assert_eq!(&headers[5], "status");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), apps.len());
        assert_eq!(&records[0][0], "CONN-2024-001");
        assert_eq!(&records[0][5], "created");
    }

    #[test]
    fn test_empty_csv_still_has_header() {
        let (_, loc) = setup();
        let file = render_export(&[], ExportFormat::Csv, &loc, "uz", Utc::now()).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(text.starts_with("id,client_name,client_phone"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_excel_export_is_csv_content() {
        let (apps, loc) = setup();
        let now = Utc::now();
        let csv = render_export(&apps, ExportFormat::Csv, &loc, "uz", now).unwrap();
        let xlsx = render_export(&apps, ExportFormat::Xlsx, &loc, "uz", now).unwrap();
        assert_eq!(csv.bytes, xlsx.bytes);
        assert!(xlsx.file_name.ends_with(".xlsx"));
    }

    #[test]
    fn test_json_export_of_filtered_view() {
        let (apps, loc) = setup();
        let completed: Vec<Application> = ApplicationFilter::by_status(ApplicationStatus::Completed)
            .apply(&apps)
            .into_iter()
            .cloned()
            .collect();

        let file = render_export(&completed, ExportFormat::Json, &loc, "ru", Utc::now()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&file.bytes).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "TECH-2024-003");
        assert_eq!(rows[0]["status"], "completed");
        assert_eq!(rows[0]["workflow_type"], "technical_service");
    }

    #[test]
    fn test_text_report_is_localized() {
        let (apps, loc) = setup();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        let uz = render_export(&apps[..2], ExportFormat::Docx, &loc, "uz", now).unwrap();
        let uz = String::from_utf8(uz.bytes).unwrap();
        assert!(uz.starts_with("Arizalar hisoboti"));
        assert!(uz.contains("2024-06-15 12:00"));
        assert!(uz.contains("1. CONN-2024-001"));
        assert!(uz.contains("2. TECH-2024-001"));

        let ru = render_export(&apps[..1], ExportFormat::Pdf, &loc, "ru", now).unwrap();
        let ru = String::from_utf8(ru.bytes).unwrap();
        assert!(ru.starts_with("Отчёт по заявкам"));
        assert!(ru.contains("Новая"));
    }
}
