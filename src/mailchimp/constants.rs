// Marketing API v3
pub const API_VERSION_PATH: &str = "3.0";
pub const LISTS_SEGMENT: &str = "lists";
pub const MEMBERS_SEGMENT: &str = "members";

// problem title Mailchimp sends with a 400 when the address is already on the list
pub const MEMBER_EXISTS_TITLE: &str = "Member Exists";

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
