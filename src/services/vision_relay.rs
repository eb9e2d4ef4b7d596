use std::sync::Arc;

use chrono::Utc;

use crate::{configuration::SheetsSettings, domain::VisionIntake, errors::RelayError};

use super::{GoogleSheetsClient, SheetAppender};

/// Appends each "start your vision" questionnaire as one spreadsheet row.
pub struct VisionRelay {
    sheets: Arc<dyn SheetAppender>,
}

impl VisionRelay {
    pub fn new(sheets: Arc<dyn SheetAppender>) -> Self {
        VisionRelay { sheets }
    }

    pub fn from_settings(settings: &SheetsSettings) -> Self {
        VisionRelay::new(Arc::new(GoogleSheetsClient::new(settings)))
    }

    pub async fn submit(&self, intake: VisionIntake) -> Result<(), RelayError> {
        if intake.is_spam() {
            log::info!("Discarding vision intake with filled honeypot");
            return Ok(());
        }

        let row = intake.to_row(Utc::now());
        self.sheets.append_row(row).await?;
        log::info!("Appended vision intake row");

        Ok(())
    }
}
