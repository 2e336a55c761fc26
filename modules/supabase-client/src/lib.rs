pub mod error;

pub use error::{Result, SupabaseError};

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

const REST_PATH: &str = "rest/v1/";

/// Minimal PostgREST client for a Supabase project.
///
/// Authenticates every request with the project key, sent both as `apikey`
/// and as a bearer token.
pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: Url,
    key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            rest_url: rest_url(base_url)?,
            key: key.to_string(),
        })
    }

    /// Fetch every row of a table.
    pub async fn fetch_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let url = self.table_url(table)?;
        let resp = self
            .client
            .get(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let body = resp.text().await?;
        let rows: Vec<T> = serde_json::from_str(&body)?;
        tracing::debug!(table, count = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// Set a single column on the row whose `id` matches.
    ///
    /// PostgREST answers an update that matches nothing with success, so the
    /// updated representation is requested and an empty result is reported as
    /// `NotFound`.
    pub async fn update_field(
        &self,
        table: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let url = row_url(&self.table_url(table)?, id);
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), value);

        let resp = self
            .client
            .patch(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let updated: Vec<serde_json::Value> = serde_json::from_str(&resp.text().await?)?;
        if updated.is_empty() {
            return Err(SupabaseError::NotFound(format!("{table} id={id}")));
        }

        tracing::debug!(table, id, field, "Updated field");
        Ok(())
    }

    /// Insert one row.
    pub async fn insert<T: Serialize + ?Sized>(&self, table: &str, row: &T) -> Result<()> {
        let url = self.table_url(table)?;
        let resp = self
            .client
            .post(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        check_status(resp).await?;
        tracing::debug!(table, "Inserted row");
        Ok(())
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        Ok(self.rest_url.join(table)?)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(SupabaseError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

fn rest_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
    if base.cannot_be_a_base() {
        return Err(SupabaseError::InvalidUrl(base_url.to_string()));
    }
    Ok(base.join(REST_PATH)?)
}

fn row_url(table_url: &Url, id: &str) -> Url {
    let mut url = table_url.clone();
    url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
    url
}
