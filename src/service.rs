use std::{str::FromStr, sync::Arc};

use color_eyre::eyre::{eyre, Report};
use serde_json::Value;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, error, instrument, warn};

use crate::{
    clients::ClientCache,
    geocode::{resolve, ResolvedAddress},
    provider::{ProviderClient, ProviderFactory},
    types::{
        dto::channel::{ChannelError, ChannelReply, ReverseGeocodeArgs, REVERSE_GEOCODE},
        query::GeoQuery,
        tencent::Geo2AddressParam,
    },
};

/// What a failed provider call does to later requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Any failure turns the provider off for the lifetime of the service
    #[default]
    DisableOnFailure,
    KeepEnabled,
}

impl FromStr for FailurePolicy {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(FailurePolicy::DisableOnFailure),
            "keep" => Ok(FailurePolicy::KeepEnabled),
            other => Err(eyre!("Unknown failure policy {other:?}, expected disable or keep")),
        }
    }
}

struct ProviderState<C> {
    native_provider_enabled: bool,
    cache: ClientCache<C>,
}

/// Handles `reverseGeocode` calls coming over the channel.
///
/// Everything that goes wrong on the provider side resolves to `None` so the caller can
/// use its own fallback; only bad arguments come back as an error.
pub struct ReverseGeocodeService<F: ProviderFactory> {
    factory: F,
    failure_policy: FailurePolicy,
    state: Mutex<ProviderState<F::Client>>,
}

impl<F> ReverseGeocodeService<F>
where
    F: ProviderFactory + 'static,
{
    pub fn new(factory: F, native_provider_enabled: bool, failure_policy: FailurePolicy) -> Self {
        Self {
            factory,
            failure_policy,
            state: Mutex::new(ProviderState {
                native_provider_enabled,
                cache: ClientCache::new(),
            }),
        }
    }

    pub async fn is_native_provider_enabled(&self) -> bool {
        self.state.lock().await.native_provider_enabled
    }

    async fn disable_native_provider(&self) {
        let mut state = self.state.lock().await;
        state.native_provider_enabled = false;
        state.cache.clear();
    }

    #[instrument(skip_all)]
    pub async fn reverse_geocode(
        &self,
        args: ReverseGeocodeArgs,
    ) -> Result<ResolvedAddress, ChannelError> {
        let (lat, lng, key_present) = (args.latitude, args.longitude, args.key_present());
        let query = GeoQuery::try_from(args).map_err(|err| {
            warn!(?lat, ?lng, key_present, "reverseGeocode missing args");
            err
        })?;
        debug!(lat = query.latitude, lng = query.longitude, "reverseGeocode");

        let client = {
            let mut state = self.state.lock().await;
            if !state.native_provider_enabled {
                debug!("Native reverse geocode disabled; skipping provider attempt");
                return Ok(None);
            }
            let created = state
                .cache
                .get_or_create(&query.api_key, |key| self.factory.create(key));
            match created {
                Ok(client) => client,
                Err(err) => {
                    error!(error = %err, "Failed to initialize provider client; falling back");
                    state.native_provider_enabled = false;
                    return Ok(None);
                }
            }
        };

        let param = Geo2AddressParam::new(query.point());
        debug!(
            location = param.location(),
            coord_type = param.coord_type(),
            "Dispatching geo2address request"
        );
        match client.geo2address(&param).await {
            Ok((status, response)) => {
                if status != 0 || response.is_none() {
                    warn!(
                        status,
                        message = response.as_ref().and_then(|r| r.message.as_deref()),
                        response_null = response.is_none(),
                        "geo2address returned no address"
                    );
                }
                let address = resolve(&query, response.as_ref(), status);
                debug!(resolved = ?address, "geo2address success");
                Ok(address)
            }
            Err(err) => {
                error!(code = err.code, message = %err.message, "geo2address failure");
                if self.failure_policy == FailurePolicy::DisableOnFailure {
                    self.disable_native_provider().await;
                }
                Ok(None)
            }
        }
    }

    /// Start a lookup and return right away; the reply arrives on `completion`
    pub fn dispatch(
        self: &Arc<Self>,
        args: ReverseGeocodeArgs,
        completion: oneshot::Sender<ChannelReply>,
    ) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let reply = ChannelReply::from(service.reverse_geocode(args).await);
            deliver(REVERSE_GEOCODE, completion, reply);
        });
    }

    pub fn handle_method_call(
        self: &Arc<Self>,
        method: &str,
        arguments: Value,
        completion: oneshot::Sender<ChannelReply>,
    ) {
        match method {
            REVERSE_GEOCODE => self.dispatch(ReverseGeocodeArgs::from_value(arguments), completion),
            _ => {
                debug!(method, "Method not implemented");
                deliver(method, completion, ChannelReply::NotImplemented);
            }
        }
    }
}

fn deliver(method: &str, completion: oneshot::Sender<ChannelReply>, reply: ChannelReply) {
    debug!(method, ?reply, "Method call result");
    if completion.send(reply).is_err() {
        warn!("Caller went away before the result was delivered");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::join;
    use serde_json::json;
    use tokio::{sync::Barrier, time::timeout};

    use super::*;
    use crate::provider::fake::{FakeFactory, FakeReply};

    fn args(key: &str) -> ReverseGeocodeArgs {
        ReverseGeocodeArgs {
            latitude: Some(31.23),
            longitude: Some(121.47),
            api_key: Some(key.to_owned()),
        }
    }

    fn service(factory: &FakeFactory) -> Arc<ReverseGeocodeService<FakeFactory>> {
        Arc::new(ReverseGeocodeService::new(
            factory.clone(),
            true,
            FailurePolicy::default(),
        ))
    }

    #[tokio::test]
    async fn resolves_through_provider() {
        let factory = FakeFactory::new(FakeReply::address(" 外滩 "));
        let service = service(&factory);

        let address = service.reverse_geocode(args("key")).await.unwrap();

        assert_eq!(address.as_deref(), Some("外滩"));
        assert_eq!(factory.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_args_never_reach_provider() {
        let factory = FakeFactory::new(FakeReply::address("x"));
        let service = service(&factory);

        let missing_lat = ReverseGeocodeArgs {
            latitude: None,
            ..args("key")
        };
        assert_eq!(
            service.reverse_geocode(missing_lat).await,
            Err(ChannelError::InvalidArguments)
        );
        assert_eq!(
            service.reverse_geocode(args(" ")).await,
            Err(ChannelError::InvalidArguments)
        );
        assert!(factory.created().is_empty());
        assert!(service.is_native_provider_enabled().await);
    }

    #[tokio::test]
    async fn client_is_reused_until_key_changes() {
        let factory = FakeFactory::new(FakeReply::address("x"));
        let service = service(&factory);

        for key in ["a", "a", "b", "b", "a"] {
            service.reverse_geocode(args(key)).await.unwrap();
        }

        assert_eq!(factory.created(), vec!["a", "b", "a"]);
        assert_eq!(factory.calls(), 5);
    }

    #[tokio::test]
    async fn broken_factory_disables_provider() {
        let factory = FakeFactory::broken();
        let service = service(&factory);

        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));
        assert!(!service.is_native_provider_enabled().await);
        assert_eq!(service.reverse_geocode(args("b")).await, Ok(None));
        assert_eq!(factory.created(), vec!["a"]);
    }

    #[tokio::test]
    async fn provider_failure_disables_provider() {
        let factory = FakeFactory::new(FakeReply::Fail);
        let service = service(&factory);

        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));
        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));

        assert!(!service.is_native_provider_enabled().await);
        assert_eq!(factory.calls(), 1);
    }

    #[tokio::test]
    async fn keep_enabled_policy_survives_failures() {
        let factory = FakeFactory::new(FakeReply::Fail);
        let service =
            ReverseGeocodeService::new(factory.clone(), true, FailurePolicy::KeepEnabled);

        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));
        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));

        assert!(service.is_native_provider_enabled().await);
        assert_eq!(factory.calls(), 2);
        assert_eq!(factory.created(), vec!["a"]);
    }

    #[tokio::test]
    async fn non_zero_status_keeps_provider_enabled() {
        let factory = FakeFactory::new(FakeReply::Reply(311, None));
        let service = service(&factory);

        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));
        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));

        assert!(service.is_native_provider_enabled().await);
        assert_eq!(factory.calls(), 2);
    }

    #[tokio::test]
    async fn disabled_from_start_skips_provider() {
        let factory = FakeFactory::new(FakeReply::address("x"));
        let service = ReverseGeocodeService::new(factory.clone(), false, FailurePolicy::default());

        assert_eq!(service.reverse_geocode(args("a")).await, Ok(None));
        assert!(factory.created().is_empty());
    }

    #[tokio::test]
    async fn provider_calls_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let factory = FakeFactory::new(FakeReply::Rendezvous(barrier, String::from("Bund")));
        let service = service(&factory);

        // each call only returns once both are inside the provider
        let both = join(
            service.reverse_geocode(args("a")),
            service.reverse_geocode(args("a")),
        );
        let (first, second) = timeout(Duration::from_secs(5), both)
            .await
            .expect("provider calls were serialized");

        assert_eq!(first, Ok(Some(String::from("Bund"))));
        assert_eq!(second, Ok(Some(String::from("Bund"))));
        assert_eq!(factory.calls(), 2);
        assert_eq!(factory.created(), vec!["a"]);
    }

    #[tokio::test]
    async fn dispatch_delivers_on_completion_channel() {
        let factory = FakeFactory::new(FakeReply::address("Nanjing Road"));
        let service = service(&factory);
        let (tx, rx) = oneshot::channel();

        service.dispatch(args("a"), tx);

        assert_eq!(
            rx.await.unwrap(),
            ChannelReply::Success(Some(String::from("Nanjing Road")))
        );
    }

    #[tokio::test]
    async fn method_calls_route_by_name() {
        let factory = FakeFactory::new(FakeReply::address("x"));
        let service = service(&factory);

        let (tx, rx) = oneshot::channel();
        service.handle_method_call("forwardGeocode", json!({}), tx);
        assert_eq!(rx.await.unwrap(), ChannelReply::NotImplemented);

        let (tx, rx) = oneshot::channel();
        service.handle_method_call(REVERSE_GEOCODE, json!({"latitude": 1.0}), tx);
        assert_eq!(
            rx.await.unwrap(),
            ChannelReply::Error(ChannelError::InvalidArguments)
        );
        assert!(factory.created().is_empty());
    }

    #[test]
    fn failure_policy_parses() {
        assert_eq!(
            "disable".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::DisableOnFailure
        );
        assert_eq!(
            " KEEP ".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::KeepEnabled
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
