//! Client record operations against the remote client API

mod types;

pub use types::*;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::session::Credentials;

/// Path segment of the client resource
const CLIENT_PATH: &str = "/Client";

/// Operations the client screens need from the remote API
#[async_trait]
pub trait ClientApi: Send + Sync {
    /// Fetch the client list under the given server-side constraints
    async fn list(&self, query: &ClientQuery) -> Result<Vec<ClientRecord>, Error>;

    /// Create a new client record
    async fn create(&self, draft: &ClientDraft) -> Result<ClientRecord, Error>;

    /// Replace an existing client record
    async fn update(&self, id: &str, draft: &ClientDraft) -> Result<(), Error>;

    /// Delete a client record
    async fn delete(&self, id: &str) -> Result<(), Error>;
}

/// HTTP implementation of the client API
pub struct ClientService {
    /// Base URL of the remote API
    url: String,
    /// HTTP client used for requests
    client: Client,
    /// Bearer credential slot written by the session manager
    credentials: Credentials,
}

impl ClientService {
    /// Create a new client service
    pub(crate) fn new(url: &str, client: Client, credentials: Credentials) -> Self {
        Self {
            url: url.to_string(),
            client,
            credentials,
        }
    }

    /// Get the URL of the client collection
    fn collection_url(&self) -> String {
        format!("{}{}", self.url, CLIENT_PATH)
    }

    /// Get the URL of a single client record
    fn record_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.url, CLIENT_PATH, id)
    }
}

#[async_trait]
impl ClientApi for ClientService {
    async fn list(&self, query: &ClientQuery) -> Result<Vec<ClientRecord>, Error> {
        let records = Fetch::get(&self.client, &self.collection_url())
            .bearer_auth_opt(self.credentials.current().as_deref())
            .query(query.to_params())
            .execute::<Vec<ClientRecord>>()
            .await?;

        Ok(records)
    }

    async fn create(&self, draft: &ClientDraft) -> Result<ClientRecord, Error> {
        let response = Fetch::post(&self.client, &self.collection_url())
            .bearer_auth_opt(self.credentials.current().as_deref())
            .json(draft)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(format!("Failed to create client: {}", body)));
        }

        let record = response.json::<ClientRecord>().await?;
        Ok(record)
    }

    async fn update(&self, id: &str, draft: &ClientDraft) -> Result<(), Error> {
        let response = Fetch::put(&self.client, &self.record_url(id))
            .bearer_auth_opt(self.credentials.current().as_deref())
            .json(draft)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(format!("Failed to update client: {}", body)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let response = Fetch::delete(&self.client, &self.record_url(id))
            .bearer_auth_opt(self.credentials.current().as_deref())
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(format!("Failed to delete client: {}", body)));
        }

        Ok(())
    }
}
