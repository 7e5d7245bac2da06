use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::mailchimp::{MailingListClient, MailingListError};
use crate::models::contact::{ContactRecord, contact_fingerprint};
use crate::models::registration::{
    Registration, RegistrationRequest, RegistrationSubmission, ValidationError,
};
use crate::notify::{NoopNotifier, Notifier};

pub const GENERIC_FAILURE: &str = "Registration failed. Please try again or contact support.";

#[derive(thiserror::Error, Debug)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("create failed: {0}")]
    CreateFailed(#[source] MailingListError),
    #[error("update failed: {0}")]
    UpdateFailed(#[source] MailingListError),
}

impl RegistrationError {
    /// Message safe to hand back to the caller. Provider details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            RegistrationError::Validation(e) => e.to_string(),
            RegistrationError::CreateFailed(_) | RegistrationError::UpdateFailed(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

/// Validates warranty submissions and upserts them into the mailing list.
pub struct RegistrationHandler<C, N = NoopNotifier> {
    client: C,
    notifier: N,
}

impl<C: MailingListClient> RegistrationHandler<C> {
    pub fn new(client: C) -> Self {
        RegistrationHandler {
            client,
            notifier: NoopNotifier,
        }
    }
}

impl<C: MailingListClient, N: Notifier> RegistrationHandler<C, N> {
    pub fn with_notifier(client: C, notifier: N) -> Self {
        RegistrationHandler { client, notifier }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn register(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<Registration, RegistrationError> {
        self.register_at(submission, Utc::now()).await
    }

    /// Same as [`register`](Self::register) with the handling time supplied by the caller.
    pub async fn register_at(
        &self,
        submission: RegistrationSubmission,
        now: DateTime<Utc>,
    ) -> Result<Registration, RegistrationError> {
        let request = RegistrationRequest::try_from(submission)?;
        let contact = ContactRecord::new(&request, now.date_naive());

        match self.client.create_member(&contact).await {
            Ok(()) => info!(order_id = %request.order_id, "warranty contact created"),
            Err(MailingListError::MemberExists) => {
                let fingerprint = contact_fingerprint(&request.email);
                info!(member_id = %fingerprint, "contact already on the list, updating");

                if let Err(e) = self.client.update_member(&fingerprint, &contact).await {
                    error!(member_id = %fingerprint, "updating existing contact failed: {}", e);
                    return Err(RegistrationError::UpdateFailed(e));
                }
            }
            Err(e) => {
                error!(order_id = %request.order_id, "creating contact failed: {}", e);
                return Err(RegistrationError::CreateFailed(e));
            }
        }

        // the contact is stored at this point, a failed notification does not undo that
        if let Err(e) = self.notifier.notify(&contact).await {
            warn!("post-registration notification failed: {:?}", e);
        }

        Ok(Registration {
            email: request.email,
            registration_date: now,
        })
    }
}
