use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use super::constants::*;
use super::{MailingListClient, MailingListError};
use crate::config::MailchimpConfig;
use crate::models::contact::ContactRecord;

/// Mailchimp Marketing API client bound to one audience.
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    client: reqwest::Client,
    api_key: String,
    members_url: Url,
    timeout: Duration,
}

/// Error body Mailchimp returns with every non-2xx answer.
#[derive(Debug, Default, Deserialize)]
pub struct ProblemDocument {
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl MailchimpClient {
    pub fn new(config: &MailchimpConfig) -> Result<Self> {
        let mut members_url = config.base_url()?;
        members_url
            .path_segments_mut()
            .map_err(|_| anyhow!("api base url cannot take path segments"))?
            .pop_if_empty()
            .extend([LISTS_SEGMENT, config.audience_id.as_str(), MEMBERS_SEGMENT]);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(MailchimpClient {
            client,
            api_key: config.api_key.clone(),
            members_url,
            timeout: config.timeout,
        })
    }

    pub fn members_url(&self) -> &Url {
        &self.members_url
    }

    pub fn member_url(&self, fingerprint: &str) -> Url {
        let mut url = self.members_url.clone();
        // members_url was built from a base that accepts path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(fingerprint);
        }
        url
    }

    async fn post_member(&self, contact: &ContactRecord) -> Result<(), MailingListError> {
        let response = self
            .client
            .post(self.members_url.clone())
            .bearer_auth(&self.api_key)
            .json(contact)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        // any 2xx is a success, the member document only feeds the log
        let member = response.json::<Value>().await?;
        match member.get("id").and_then(Value::as_str) {
            Some(id) => debug!(member_id = %id, "member created"),
            None => debug!("member created"),
        }
        Ok(())
    }

    async fn put_member(
        &self,
        fingerprint: &str,
        contact: &ContactRecord,
    ) -> Result<(), MailingListError> {
        let response = self
            .client
            .put(self.member_url(fingerprint))
            .bearer_auth(&self.api_key)
            .json(contact)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        debug!(member_id = %fingerprint, "member updated");
        Ok(())
    }

    async fn bounded<F>(&self, call: F) -> Result<(), MailingListError>
    where
        F: Future<Output = Result<(), MailingListError>>,
    {
        timeout(self.timeout, call)
            .await
            .unwrap_or_else(|_| Err(MailingListError::Timeout(self.timeout)))
    }
}

/// Maps a non-2xx answer onto the error taxonomy. Only a 400 titled
/// exactly "Member Exists" counts as a duplicate.
pub fn classify_rejection(status: u16, problem: Option<ProblemDocument>) -> MailingListError {
    let ProblemDocument { title, detail } = problem.unwrap_or_default();

    if status == 400 && title.as_deref() == Some(MEMBER_EXISTS_TITLE) {
        MailingListError::MemberExists
    } else {
        MailingListError::Rejected {
            status,
            title,
            detail,
        }
    }
}

async fn rejection(response: reqwest::Response) -> MailingListError {
    let status = response.status().as_u16();
    let problem = response.json::<ProblemDocument>().await.ok();
    classify_rejection(status, problem)
}

impl MailingListClient for MailchimpClient {
    async fn create_member(&self, contact: &ContactRecord) -> Result<(), MailingListError> {
        self.bounded(self.post_member(contact)).await
    }

    async fn update_member(
        &self,
        fingerprint: &str,
        contact: &ContactRecord,
    ) -> Result<(), MailingListError> {
        self.bounded(self.put_member(fingerprint, contact)).await
    }
}
