use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{geocode::ResolvedAddress, types::query::GeoQuery};

pub const REVERSE_GEOCODE: &str = "reverseGeocode";

/// Arguments of a `reverseGeocode` call as they arrive, any of them may be missing
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodeArgs {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub api_key: Option<String>,
}

impl ReverseGeocodeArgs {
    /// Wrongly typed arguments count as missing
    pub fn from_value(arguments: Value) -> Self {
        serde_json::from_value(arguments).unwrap_or_default()
    }

    pub fn key_present(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl TryFrom<ReverseGeocodeArgs> for GeoQuery {
    type Error = ChannelError;

    fn try_from(value: ReverseGeocodeArgs) -> Result<Self, Self::Error> {
        match (value.latitude, value.longitude, value.api_key) {
            (Some(latitude), Some(longitude), Some(api_key)) if !api_key.trim().is_empty() => {
                Ok(GeoQuery {
                    latitude,
                    longitude,
                    api_key,
                })
            }
            _ => Err(ChannelError::InvalidArguments),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("latitude, longitude and apiKey are required")]
    InvalidArguments,
}

impl ChannelError {
    pub fn code(&self) -> &'static str {
        match self {
            ChannelError::InvalidArguments => "INVALID_ARGUMENTS",
        }
    }
}

/// What gets delivered back to the caller of a method
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelReply {
    Success(ResolvedAddress),
    Error(ChannelError),
    NotImplemented,
}

impl From<Result<ResolvedAddress, ChannelError>> for ChannelReply {
    fn from(value: Result<ResolvedAddress, ChannelError>) -> Self {
        match value {
            Ok(address) => ChannelReply::Success(address),
            Err(err) => ChannelReply::Error(err),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SuccessPayload {
    pub result: ResolvedAddress,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}
