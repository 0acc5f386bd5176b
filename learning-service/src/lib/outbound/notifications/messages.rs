use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::identity::notifications::Notification;

/// Wire form of an outgoing email, consumed by the mail dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event_type", rename = "email_requested")]
pub struct EmailRequestedMessage {
    pub event_id: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub requested_at: DateTime<Utc>,
}

impl EmailRequestedMessage {
    pub fn new(notification: &Notification, requested_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            to: notification.to.clone(),
            subject: notification.subject.clone(),
            html_body: notification.body.clone(),
            requested_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_tagged() {
        let notification = Notification {
            to: "a@x.com".to_string(),
            subject: "Password Reset".to_string(),
            body: "<a href=\"#\">here</a>".to_string(),
        };

        let message = EmailRequestedMessage::new(&notification, Utc::now());
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["event_type"], "email_requested");
        assert_eq!(json["to"], "a@x.com");
        assert_eq!(json["html_body"], "<a href=\"#\">here</a>");
    }
}
