use crate::types::{query::GeoQuery, tencent::Geo2AddressResultObject};

/// `None` means the provider had nothing usable and the caller should use its own fallback
pub type ResolvedAddress = Option<String>;

/// Pick the best human readable address out of a geo2address reply.
///
/// Candidates are tried in a fixed order: the recommended formatted address, the raw
/// address, then the first titled address reference (landmark_l1, landmark_l2, town,
/// street, street_number). The first non-blank one wins and is returned trimmed.
/// A non-zero provider status or a missing response always resolves to `None`.
pub fn resolve(
    _query: &GeoQuery,
    response: Option<&Geo2AddressResultObject>,
    status: i32,
) -> ResolvedAddress {
    if status != 0 {
        return None;
    }
    let result = response?.result.as_ref()?;
    let recommended = result
        .formatted_addresses
        .as_ref()
        .and_then(|formatted| formatted.recommend.as_deref());
    let reference = result
        .address_reference
        .as_ref()
        .and_then(|reference| reference.titles().flatten().find(|title| !is_blank(title)));
    [recommended, result.address.as_deref(), reference]
        .into_iter()
        .flatten()
        .find(|candidate| !is_blank(candidate))
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_owned)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
