use serde::Deserialize;

use super::{honeypot_filled, LeadEmail};

/// Raw body of the contact dialog. Absent fields deserialize as empty.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub message: String,
    /// Honeypot, hidden from humans.
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: LeadEmail,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn is_spam(&self) -> bool {
        honeypot_filled(self.website.as_deref())
    }

    /// `None` when the name or message is blank or the email is not shaped
    /// like an address.
    pub fn validate(&self) -> Option<ContactSubmission> {
        let name = self.name.trim();
        let message = self.message.trim();
        if name.is_empty() || message.is_empty() {
            return None;
        }

        let email = LeadEmail::parse(&self.email)?;

        Some(ContactSubmission {
            name: name.to_string(),
            email,
            phone: non_blank(&self.phone),
            project_type: non_blank(&self.project_type),
            budget: non_blank(&self.budget),
            message: message.to_string(),
        })
    }
}

fn non_blank(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| f.to_string())
}

impl ContactSubmission {
    pub fn subject(&self, site_name: &str) -> String {
        format!("New enquiry from {} — {} website", self.name, site_name)
    }

    pub fn text_body(&self) -> String {
        let mut body = format!("From: {} <{}>\n", self.name, self.email);
        if let Some(phone) = &self.phone {
            body.push_str(&format!("Phone: {}\n", phone));
        }
        if let Some(project_type) = &self.project_type {
            body.push_str(&format!("Project type: {}\n", project_type));
        }
        if let Some(budget) = &self.budget {
            body.push_str(&format!("Budget: {}\n", budget));
        }
        body.push('\n');
        body.push_str(&self.message);

        body
    }
}
