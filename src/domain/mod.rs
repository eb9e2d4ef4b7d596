pub mod contact;
pub mod lead_email;
pub mod vision;

pub use contact::*;
pub use lead_email::*;
pub use vision::*;

/// Bots fill every input, humans never see the `website` field.
pub fn honeypot_filled(website: Option<&str>) -> bool {
    website.is_some_and(|w| !w.is_empty())
}
