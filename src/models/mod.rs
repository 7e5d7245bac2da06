pub mod contact;
pub mod registration;
