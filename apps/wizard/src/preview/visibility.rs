//! Visibility rule for the email/phone separator.

use crate::preview::keypath::KeyPath;

pub fn email_path() -> KeyPath {
    KeyPath::root("contact_info").field("email")
}

pub fn phone_path() -> KeyPath {
    KeyPath::root("contact_info").field("phone")
}

/// True for the two fields whose edits re-evaluate the separator.
pub fn is_contact_path(path: &KeyPath) -> bool {
    *path == email_path() || *path == phone_path()
}

/// The separator shows only while both contact fields have non-blank text.
pub fn separator_visible(email: Option<&str>, phone: Option<&str>) -> bool {
    let filled = |text: Option<&str>| text.is_some_and(|t| !t.trim().is_empty());
    filled(email) && filled(phone)
}
