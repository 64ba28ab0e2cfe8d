use std::net::SocketAddr;

use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::{service::FailurePolicy, tencent::DEFAULT_BASE_URL};

pub const ADDR_VAR: &str = "GEOCODE_BRIDGE_ADDR";
pub const PROVIDER_URL_VAR: &str = "GEOCODE_BRIDGE_PROVIDER_URL";
pub const NATIVE_ENABLED_VAR: &str = "GEOCODE_BRIDGE_NATIVE_ENABLED";
pub const FAILURE_POLICY_VAR: &str = "GEOCODE_BRIDGE_FAILURE_POLICY";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub provider_url: String,
    pub native_enabled: bool,
    pub failure_policy: FailurePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = match lookup(ADDR_VAR) {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .wrap_err_with(|| format!("{ADDR_VAR} is not a socket address"))?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };
        let native_enabled = match lookup(NATIVE_ENABLED_VAR) {
            Some(flag) => parse_flag(&flag)
                .ok_or(eyre!("{NATIVE_ENABLED_VAR} must be true or false, got {flag:?}"))?,
            None => true,
        };
        let failure_policy = match lookup(FAILURE_POLICY_VAR) {
            Some(policy) => policy.parse()?,
            None => FailurePolicy::default(),
        };
        Ok(Self {
            addr,
            provider_url: lookup(PROVIDER_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            native_enabled,
            failure_policy,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
