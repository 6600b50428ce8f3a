pub mod google;
pub mod oauth;

pub use google::GoogleCalendarClient;
pub use oauth::{OAuthConfig, OAuthTokens};
