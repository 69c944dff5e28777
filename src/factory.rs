use std::sync::Arc;

use crate::client::EcsClient;
use crate::error::Result;
use crate::traits::DomainApi;
use crate::types::EcsCredentials;

/// Build an ECS API client from credentials.
///
/// Validates the credentials, loads the client certificate identity and
/// returns the client behind the [`DomainApi`] trait.
///
/// # Errors
///
/// Returns [`EcsError::SessionConfiguration`](crate::EcsError::SessionConfiguration)
/// when a credential field is empty or the certificate files cannot be loaded.
pub fn create_client(credentials: &EcsCredentials) -> Result<Arc<dyn DomainApi>> {
    let client = EcsClient::new(credentials)?;
    Ok(Arc::new(client))
}
