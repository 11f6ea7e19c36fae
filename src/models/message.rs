use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, Entity};
use crate::error::ValidationError;
use crate::form::require;
use crate::postgrest::Order;
use crate::store::Query;

/// A note left through the public contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The public contact form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePayload {
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
}

impl Message {
    /// First `limit` characters, for list rows
    pub fn preview(&self, limit: usize) -> String {
        let mut chars = self.message.chars();
        let head: String = chars.by_ref().take(limit).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

impl Entity for Message {
    type Record = Message;
    type Draft = ContactForm;
    type Payload = MessagePayload;

    const TABLE: &'static str = "messages";
    const LABEL: &'static str = "message";
    const ALLOWS_CREATE: bool = false;
    const ALLOWS_EDIT: bool = false;

    fn id(record: &Message) -> &str {
        &record.id
    }

    fn list_query() -> Query {
        Query::new().order(Order::desc("created_at"))
    }

    fn to_draft(record: &Message) -> ContactForm {
        ContactForm {
            name: record.name.clone(),
            email: record.email.clone(),
            message: record.message.clone(),
        }
    }

    /// New messages always start unread
    fn to_payload(draft: &ContactForm) -> Result<MessagePayload, ValidationError> {
        Ok(MessagePayload {
            name: require("name", &draft.name)?,
            email: require("email", &draft.email)?,
            message: require("message", &draft.message)?,
            is_read: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        let message = Message {
            id: "m1".to_string(),
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            message: "Hello there, I would like a quote".to_string(),
            is_read: false,
            created_at: None,
        };
        assert_eq!(message.preview(5), "Hello...");
        assert_eq!(message.preview(100), message.message);
    }

    #[test]
    fn test_contact_form_is_unread() {
        let form = ContactForm {
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            message: "Hi".to_string(),
        };
        assert!(!Message::to_payload(&form).unwrap().is_read);

        let blank = ContactForm {
            message: " ".to_string(),
            ..form
        };
        assert_eq!(Message::to_payload(&blank), Err(ValidationError::Required("message")));
    }
}
