// Contact Service - turns contact-form submissions into ERP leads

use crate::domain::lead::LEAD_MODEL;
use crate::domain::{ContactForm, LeadRecord};
use crate::error::Result;
use crate::port::{ErpGateway, Kwargs};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub struct ContactService {
    gateway: Arc<dyn ErpGateway>,
}

impl ContactService {
    pub fn new(gateway: Arc<dyn ErpGateway>) -> Self {
        Self { gateway }
    }

    /// Create a lead and return the id the ERP assigned to it
    pub async fn submit(&self, form: ContactForm) -> Result<Value> {
        let lead = LeadRecord::from(form);
        let values = serde_json::to_value(&lead)?;

        let lead_id = self
            .gateway
            .call(LEAD_MODEL, "create", vec![values], Kwargs::new())
            .await?;

        info!(lead_id = %lead_id, "Lead created");
        Ok(lead_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::erp_gateway::mocks::FakeGateway;
    use serde_json::json;

    #[tokio::test]
    async fn test_submit_creates_lead() {
        let gateway = Arc::new(FakeGateway::new(|_| Ok(json!(57))));
        let service = ContactService::new(gateway.clone());

        let form = ContactForm {
            name: Some("Dana".into()),
            email: Some("dana@example.com".into()),
            phone: None,
            message: Some("Call me".into()),
        };
        let lead_id = service.submit(form).await.unwrap();
        assert_eq!(lead_id, 57);

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "crm.lead");
        assert_eq!(calls[0].method, "create");
        assert_eq!(calls[0].args[0]["name"], "Website Inquiry: Dana");
        assert_eq!(calls[0].args[0]["phone"], "");
        assert_eq!(calls[0].args[0]["type"], "lead");
    }

    #[tokio::test]
    async fn test_submit_propagates_backend_error() {
        let gateway = Arc::new(FakeGateway::failing("crm.lead: access denied"));
        let service = ContactService::new(gateway);

        let err = service.submit(ContactForm::default()).await.unwrap_err();
        assert!(err.to_string().contains("access denied"));
    }
}
