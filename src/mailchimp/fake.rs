use std::sync::Mutex;
use std::time::Duration;

use super::{MailingListClient, MailingListError};
use crate::models::contact::ContactRecord;

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Ok,
    MemberExists,
    Status(u16),
    Timeout,
}

impl Reply {
    fn into_result(self) -> Result<(), MailingListError> {
        match self {
            Reply::Ok => Ok(()),
            Reply::MemberExists => Err(MailingListError::MemberExists),
            Reply::Status(status) => Err(MailingListError::Rejected {
                status,
                title: Some("Scripted".into()),
                detail: None,
            }),
            Reply::Timeout => Err(MailingListError::Timeout(Duration::from_secs(5))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(ContactRecord),
    Update(String, ContactRecord),
}

/// Records every call and answers with scripted replies.
pub struct FakeMailingList {
    create: Reply,
    update: Reply,
    calls: Mutex<Vec<Call>>,
}

impl FakeMailingList {
    pub fn new(create: Reply, update: Reply) -> Self {
        FakeMailingList {
            create,
            update,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl MailingListClient for FakeMailingList {
    async fn create_member(&self, contact: &ContactRecord) -> Result<(), MailingListError> {
        self.calls.lock().unwrap().push(Call::Create(contact.clone()));
        self.create.into_result()
    }

    async fn update_member(
        &self,
        fingerprint: &str,
        contact: &ContactRecord,
    ) -> Result<(), MailingListError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(fingerprint.to_string(), contact.clone()));
        self.update.into_result()
    }
}
