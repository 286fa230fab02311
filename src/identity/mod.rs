//! Clients for the external identity provider: database signup and the
//! authorization-code login flow.

pub mod oauth;
pub mod provisioner;

pub use oauth::{OAuthClient, TokenResponse};
pub use provisioner::{Auth0Provisioner, ProvisionError, ProvisionedUser, UserProvisioner};
