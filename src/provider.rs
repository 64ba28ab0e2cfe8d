use color_eyre::eyre::Result;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::types::tencent::{Geo2AddressParam, Geo2AddressResultObject};

/// Provider status code plus whatever body came with it
pub type ProviderReply = (i32, Option<Geo2AddressResultObject>);

/// The provider could not be reached or answered with something unusable
#[derive(Error, Debug)]
#[error("geo2address failure code={code} message={message}")]
pub struct ProviderError {
    pub code: i32,
    pub message: String,
    #[source]
    pub cause: Option<reqwest::Error>,
}

impl From<reqwest::Error> for ProviderError {
    fn from(value: reqwest::Error) -> Self {
        let code = value.status().map_or(-1, |status| i32::from(status.as_u16()));
        // the request url carries the api key
        let value = value.without_url();
        Self {
            code,
            message: value.to_string(),
            cause: Some(value),
        }
    }
}

pub trait ProviderClient: Send + Sync {
    fn geo2address<'a>(
        &'a self,
        param: &'a Geo2AddressParam,
    ) -> BoxFuture<'a, Result<ProviderReply, ProviderError>>;
}

/// Builds a provider client bound to one api key
pub trait ProviderFactory: Send + Sync {
    type Client: ProviderClient + 'static;

    fn create(&self, api_key: &str) -> Result<Self::Client>;
}
