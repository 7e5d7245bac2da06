use anyhow::{Context, Result, anyhow};
use std::env;
use std::time::Duration;
use url::Url;

use crate::mailchimp::constants::API_VERSION_PATH;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mailchimp: MailchimpConfig,
}

#[derive(Debug, Clone)]
pub struct MailchimpConfig {
    pub api_key: String,
    pub audience_id: String,
    pub server_prefix: String,
    /// Replaces `https://{server_prefix}.api.mailchimp.com/3.0` when set.
    pub api_url: Option<Url>,
    pub timeout: Duration,
}

impl MailchimpConfig {
    pub fn new(api_key: &str, audience_id: &str, server_prefix: &str) -> Self {
        MailchimpConfig {
            api_key: api_key.to_string(),
            audience_id: audience_id.to_string(),
            server_prefix: server_prefix.to_string(),
            api_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn base_url(&self) -> Result<Url> {
        match &self.api_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(&format!(
                "https://{}.api.mailchimp.com/{}",
                self.server_prefix, API_VERSION_PATH
            ))
            .with_context(|| format!("invalid server prefix {:?}", self.server_prefix)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank values count as unset
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| -> Result<String> {
            optional(key).ok_or_else(|| anyhow!("{} must be set", key))
        };

        let port = match optional("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let api_url = match optional("MAILCHIMP_API_URL") {
            Some(raw) => Some(
                Url::parse(raw.trim())
                    .with_context(|| format!("MAILCHIMP_API_URL is not a valid url: {:?}", raw))?,
            ),
            None => None,
        };

        let timeout = match optional("MAILCHIMP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("MAILCHIMP_TIMEOUT_SECS is not a number: {:?}", raw))?;
                if secs == 0 {
                    return Err(anyhow!("MAILCHIMP_TIMEOUT_SECS must be greater than zero"));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Config {
            port,
            mailchimp: MailchimpConfig {
                api_key: required("MAILCHIMP_API_KEY")?,
                audience_id: required("MAILCHIMP_AUDIENCE_ID")?,
                server_prefix: required("MAILCHIMP_SERVER_PREFIX")?,
                api_url,
                timeout,
            },
        })
    }
}
