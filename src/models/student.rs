use super::qr::QrPayload;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub id_number: String, // ⇔ students.id_number (custom ID, unique)
    pub name: String,
    pub class: String,
    pub parent_name: String,
    pub parent_contact: String,
    pub parent_email: String,
    pub parent_address: String,
    pub photo: Option<String>,
    pub qr_value: Option<String>, // serialized QrPayload
    pub bus_id: Option<i64>,
    pub created_at: String,
}

impl Student {
    /// Payload printed on the student's ID card.
    pub fn qr_payload(&self) -> QrPayload {
        QrPayload {
            student_name: self.name.clone(),
            id_number: self.id_number.clone(),
            student_class: Some(self.class.clone()),
            parent_name: Some(self.parent_name.clone()),
            parent_contact: Some(self.parent_contact.clone()),
            parent_address: Some(self.parent_address.clone()),
        }
    }

    /// Best contact to show next to a notification.
    pub fn parent_reference(&self) -> &str {
        if self.parent_email.is_empty() {
            &self.parent_contact
        } else {
            &self.parent_email
        }
    }
}
