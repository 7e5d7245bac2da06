use anyhow::Result;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::future::Future;
use tera::Tera;

use crate::models::contact::ContactRecord;

pub const CONFIRMATION_SUBJECT: &str = "Your 2-Year Warranty is Active!";
pub const SUPPORT_ADDRESS: &str = "orders@designer-iwear.com";

const CONFIRMATION_TEMPLATE_NAME: &str = "warranty_confirmation.html";
const CONFIRMATION_TEMPLATE: &str = include_str!("../templates/warranty_confirmation.html");

static TEMPLATES: Lazy<Result<Tera, tera::Error>> = Lazy::new(|| -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(CONFIRMATION_TEMPLATE_NAME, CONFIRMATION_TEMPLATE)?;
    Ok(tera)
});

/// Hook invoked after a contact was written to the audience.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, contact: &ContactRecord) -> impl Future<Output = Result<()>> + Send;
}

/// Sends nothing. Confirmation mails are left to the provider's automations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    async fn notify(&self, _contact: &ContactRecord) -> Result<()> {
        Ok(())
    }
}

/// Confirmation mail for a registered contact, ready to hand to a mail sender.
///
/// Building block for a [`Notifier`] that delivers mail. The service itself
/// wires [`NoopNotifier`] and leaves confirmations to the provider's
/// automations, so nothing in the request path renders this.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationEmail {
    pub to: String,
    pub from: &'static str,
    pub subject: &'static str,
    pub html: String,
}

#[derive(Serialize)]
struct ConfirmationContext<'a> {
    first_name: &'a str,
    order_id: &'a str,
    registration_date: String,
    support_address: &'static str,
}

impl ConfirmationEmail {
    pub fn render(contact: &ContactRecord) -> Result<Self> {
        let templates = TEMPLATES
            .as_ref()
            .map_err(|e| anyhow::anyhow!("confirmation template failed to load: {}", e))?;

        let context = tera::Context::from_serialize(ConfirmationContext {
            first_name: &contact.merge_fields.first_name,
            order_id: &contact.merge_fields.order_id,
            registration_date: contact
                .merge_fields
                .registration_date
                .format("%B %-d, %Y")
                .to_string(),
            support_address: SUPPORT_ADDRESS,
        })?;

        Ok(ConfirmationEmail {
            to: contact.email_address.clone(),
            from: SUPPORT_ADDRESS,
            subject: CONFIRMATION_SUBJECT,
            html: templates.render(CONFIRMATION_TEMPLATE_NAME, &context)?,
        })
    }
}
