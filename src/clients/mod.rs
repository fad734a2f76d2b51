pub mod forms_client;
pub mod oauth;

pub use forms_client::FormsClient;
pub use oauth::{OAuthClient, StoredToken, TokenCache};
