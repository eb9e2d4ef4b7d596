pub mod contact_relay;
pub mod email_client;
pub mod service_account;
pub mod sheets_client;
pub mod vision_relay;

pub use contact_relay::*;
pub use email_client::*;
pub use service_account::*;
pub use sheets_client::*;
pub use vision_relay::*;
