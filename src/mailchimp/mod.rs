pub mod client;
pub mod constants;
#[cfg(test)]
pub mod fake;

use crate::models::contact::ContactRecord;
use std::future::Future;
use std::time::Duration;

pub use client::MailchimpClient;

#[derive(thiserror::Error, Debug)]
pub enum MailingListError {
    /// The audience already holds this address. Recoverable through an update.
    #[error("member already exists")]
    MemberExists,
    #[error("provider answered {status} (title: {title:?}, detail: {detail:?})")]
    Rejected {
        status: u16,
        title: Option<String>,
        detail: Option<String>,
    },
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no response from provider within {0:?}")]
    Timeout(Duration),
}

/// Write access to the single audience this service registers contacts in.
pub trait MailingListClient: Send + Sync + 'static {
    fn create_member(
        &self,
        contact: &ContactRecord,
    ) -> impl Future<Output = Result<(), MailingListError>> + Send;

    /// Overwrites the member stored under `fingerprint`.
    fn update_member(
        &self,
        fingerprint: &str,
        contact: &ContactRecord,
    ) -> impl Future<Output = Result<(), MailingListError>> + Send;
}
