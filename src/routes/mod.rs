pub mod health;
pub mod warranty;

use actix_web::web;

use crate::mailchimp::MailingListClient;
use crate::notify::Notifier;

pub fn init<C: MailingListClient, N: Notifier>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::init))
        .service(web::scope("/api").configure(warranty::init::<C, N>));
}
