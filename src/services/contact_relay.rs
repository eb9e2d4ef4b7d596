use std::sync::Arc;

use crate::{
    configuration::{ApplicationSettings, EmailSettings},
    domain::ContactForm,
    errors::RelayError,
};

use super::{EmailSender, OutboundEmail, ResendClient};

/// Turns a contact dialog submission into one email to the studio.
pub struct ContactRelay {
    mailer: Option<Arc<dyn EmailSender>>,
    from: Option<String>,
    to: Vec<String>,
    site_name: String,
}

impl ContactRelay {
    pub fn new(
        mailer: Option<Arc<dyn EmailSender>>,
        from: Option<String>,
        to: Vec<String>,
        site_name: String,
    ) -> Self {
        ContactRelay {
            mailer,
            from: from.filter(|f| !f.trim().is_empty()),
            to,
            site_name,
        }
    }

    /// No mailer is built when the api key is absent; the first submission
    /// reports it.
    pub fn from_settings(email: &EmailSettings, application: &ApplicationSettings) -> Self {
        let mailer = email
            .api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .map(|api_key| {
                Arc::new(ResendClient::new(&email.base_url, api_key.clone()))
                    as Arc<dyn EmailSender>
            });
        if mailer.is_none() {
            log::warn!("No email api key configured, contact form will fail");
        }

        ContactRelay::new(
            mailer,
            email.from.clone(),
            email.recipients(),
            application.site_name.clone(),
        )
    }

    pub async fn submit(&self, form: ContactForm) -> Result<(), RelayError> {
        if form.is_spam() {
            log::info!("Discarding contact submission with filled honeypot");
            return Ok(());
        }

        let submission = form.validate().ok_or(RelayError::InvalidInput)?;

        let mailer = self.mailer.as_ref().ok_or(RelayError::MissingApiKey)?;
        let from = match (&self.from, self.to.is_empty()) {
            (Some(from), false) => from,
            _ => return Err(RelayError::MissingConfiguration("missing_from_or_to")),
        };

        let email = OutboundEmail {
            from: from.clone(),
            to: self.to.clone(),
            reply_to: submission.email.to_string(),
            subject: submission.subject(&self.site_name),
            text: submission.text_body(),
        };

        mailer.send(&email).await?;
        log::info!("Relayed contact enquiry to {} recipient(s)", self.to.len());

        Ok(())
    }
}
