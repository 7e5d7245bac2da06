use chrono::NaiveDate;
use serde::Serialize;

use crate::models::registration::RegistrationRequest;

pub const SUBSCRIBED: &str = "subscribed";
pub const WARRANTY_TAGS: [&str; 2] = ["warranty-registration", "2-year-warranty"];

/// Member payload written to the audience on both the create and the update path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRecord {
    pub email_address: String,
    pub status: &'static str,
    pub merge_fields: MergeFields,
    pub tags: [&'static str; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeFields {
    #[serde(rename = "FNAME")]
    pub first_name: String,
    #[serde(rename = "LNAME")]
    pub last_name: String,
    #[serde(rename = "ORDERID")]
    pub order_id: String,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(rename = "REGDATE")]
    pub registration_date: NaiveDate,
}

impl ContactRecord {
    pub fn new(request: &RegistrationRequest, registration_date: NaiveDate) -> Self {
        ContactRecord {
            email_address: request.email.clone(),
            status: SUBSCRIBED,
            merge_fields: MergeFields {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                order_id: request.order_id.clone(),
                registration_date,
            },
            tags: WARRANTY_TAGS,
        }
    }

    pub fn fingerprint(&self) -> String {
        contact_fingerprint(&self.email_address)
    }
}

/// The provider's member id: hex md5 of the lowercased address.
pub fn contact_fingerprint(email: &str) -> String {
    format!("{:x}", md5::compute(email.to_lowercase()))
}
