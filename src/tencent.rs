use color_eyre::eyre::{eyre, Result};
use futures::{future::BoxFuture, FutureExt};
use reqwest::Url;

use crate::{
    provider::{ProviderClient, ProviderError, ProviderFactory, ProviderReply},
    types::tencent::{Geo2AddressParam, Geo2AddressResultObject},
};

pub const DEFAULT_BASE_URL: &str = "https://apis.map.qq.com";
const GEOCODER_PATH: &str = "ws/geocoder/v1/";

/// Tencent Location Service client bound to a single key
pub struct TencentSearch {
    http: reqwest::Client,
    endpoint: Url,
    key: String,
}

impl TencentSearch {
    pub fn new(http: reqwest::Client, base_url: &str, key: &str) -> Result<Self> {
        if key.trim().is_empty() {
            return Err(eyre!("Tencent search needs a non-blank key"));
        }
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        Ok(Self {
            http,
            endpoint: base.join(GEOCODER_PATH)?,
            key: key.to_owned(),
        })
    }
}

impl ProviderClient for TencentSearch {
    fn geo2address<'a>(
        &'a self,
        param: &'a Geo2AddressParam,
    ) -> BoxFuture<'a, Result<ProviderReply, ProviderError>> {
        async move {
            let body = self
                .http
                .get(self.endpoint.clone())
                .query(param)
                .query(&[("key", self.key.as_str())])
                .send()
                .await?
                .error_for_status()?
                .json::<Geo2AddressResultObject>()
                .await?;
            Ok::<_, ProviderError>((body.status, Some(body)))
        }
        .boxed()
    }
}

#[derive(Clone)]
pub struct TencentSearchFactory {
    http: reqwest::Client,
    base_url: String,
}

impl TencentSearchFactory {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl ProviderFactory for TencentSearchFactory {
    type Client = TencentSearch;

    fn create(&self, api_key: &str) -> Result<TencentSearch> {
        TencentSearch::new(self.http.clone(), &self.base_url, api_key)
    }
}
