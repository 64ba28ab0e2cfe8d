use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Tencent's own coordinate system, used when the caller doesn't ask for another one
pub const DEFAULT_COORD_TYPE: u8 = 5;

/// Query parameters of a geocoder/v1 reverse lookup, minus the key
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Geo2AddressParam {
    location: String,
    get_poi: u8,
    coord_type: u8,
}

impl Geo2AddressParam {
    pub fn new(point: Point) -> Self {
        Self {
            // provider wants "lat,lng"
            location: format!("{},{}", point.y(), point.x()),
            get_poi: 0,
            coord_type: DEFAULT_COORD_TYPE,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn coord_type(&self) -> u8 {
        self.coord_type
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Geo2AddressResultObject {
    #[serde(default)]
    pub status: i32,
    pub message: Option<String>,
    pub result: Option<ReverseAddressResult>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReverseAddressResult {
    pub address: Option<String>,
    pub formatted_addresses: Option<FormattedAddresses>,
    pub address_reference: Option<AddressReference>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FormattedAddresses {
    pub recommend: Option<String>,
    pub rough: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AddressReference {
    pub landmark_l1: Option<ReferencePlace>,
    pub landmark_l2: Option<ReferencePlace>,
    pub town: Option<ReferencePlace>,
    pub street: Option<ReferencePlace>,
    pub street_number: Option<ReferencePlace>,
}

impl AddressReference {
    /// Reference titles, most specific landmark first
    pub fn titles(&self) -> impl Iterator<Item = Option<&str>> {
        [
            &self.landmark_l1,
            &self.landmark_l2,
            &self.town,
            &self.street,
            &self.street_number,
        ]
        .into_iter()
        .map(|place| place.as_ref().and_then(|p| p.title.as_deref()))
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReferencePlace {
    pub title: Option<String>,
}

#[cfg(test)]
impl ReferencePlace {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_owned()),
        }
    }
}
