// Lead Domain Model (write-only)

use crate::domain::record::lenient_text;
use serde::{Deserialize, Serialize};

pub const LEAD_MODEL: &str = "crm.lead";

/// Contact form as submitted by the storefront
///
/// Fields are free-form: numbers (e.g. a phone typed as `5551234`) are kept
/// as their text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

/// `crm.lead` values passed to `create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRecord {
    pub name: String,
    pub contact_name: String,
    pub email_from: String,
    pub phone: String,
    pub description: String,
    #[serde(rename = "type")]
    pub lead_type: String,
}

impl From<ContactForm> for LeadRecord {
    fn from(form: ContactForm) -> Self {
        let title = form.name.as_deref().unwrap_or("Unknown");
        Self {
            name: format!("Website Inquiry: {}", title),
            contact_name: form.name.unwrap_or_default(),
            email_from: form.email.unwrap_or_default(),
            phone: form.phone.unwrap_or_default(),
            description: form.message.unwrap_or_default(),
            lead_type: "lead".to_string(),
        }
    }
}
