use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::prelude::*;

/// Build a default client.
pub fn try_new() -> Result<Client> {
    Ok(Client::builder()
        .user_agent("solarcurve")
        .timeout(Duration::from_secs(10))
        .build()?)
}

/// GET the query from each endpoint of the fallback chain in order, once,
/// returning the first successfully parsed response. A best-effort
/// availability measure: no backoff, no repeated attempts.
pub async fn get_json<R, Q>(
    client: &Client,
    source_name: &str,
    endpoints: &[Url],
    query: &Q,
) -> Result<R>
where
    R: DeserializeOwned,
    Q: Serialize,
{
    let mut last_error = None;
    for endpoint in endpoints {
        match try_get_json(client, endpoint.clone(), query).await {
            Ok(response) => return Ok(response),
            Err(error) => {
                warn!(%endpoint, source_name, "request failed, falling back");
                last_error =
                    Some(error.context(format!("{source_name}: request to `{endpoint}` failed")));
            }
        }
    }
    Err(last_error
        .unwrap_or_else(|| Error::msg(format!("{source_name}: no endpoint configured"))))
}

async fn try_get_json<R, Q>(client: &Client, endpoint: Url, query: &Q) -> Result<R>
where
    R: DeserializeOwned,
    Q: Serialize,
{
    client
        .get(endpoint)
        .query(query)
        .send()
        .await
        .context("failed to call")?
        .error_for_status()
        .context("request failed")?
        .json::<R>()
        .await
        .context("failed to deserialize the response")
}
