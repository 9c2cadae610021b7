use serde::Serialize;

use crate::domain::lead::Lead;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub sender_id: String,
    pub recipient: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        sender_id: impl Into<String>,
        recipient: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self { sender_id: sender_id.into(), recipient: recipient.into(), body: body.into() }
    }

    /// Builds the message telling a sales agent to call the lead back.
    pub fn for_lead(sender_id: impl Into<String>, recipient: impl Into<String>, lead: &Lead) -> Self {
        Self::new(sender_id, recipient, lead.message_body())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{lead::LeadForm, notification::Notification};

    #[test]
    fn lead_notification_carries_sender_recipient_and_body() {
        let lead = LeadForm::new("Alice", "555-1234").validate().expect("form is complete");

        let notification = Notification::for_lead("Callme", "+1000", &lead);

        assert_eq!(notification.sender_id, "Callme");
        assert_eq!(notification.recipient, "+1000");
        assert!(notification.body.contains("Alice"));
        assert!(notification.body.contains("555-1234"));
    }
}
