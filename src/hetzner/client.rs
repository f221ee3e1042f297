use std::time::Duration;

use http::{Method, StatusCode};
use itertools::Itertools;
use log::{debug, trace};
use serde::de::DeserializeOwned;

use super::{
    transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport},
    types::{
        CreateRecordRequest, Record, RecordResponse, RecordType, RecordsResponse, Zone,
        ZonesResponse,
    },
    HetznerError,
};
use crate::{
    config::{HETZNER_API_ENDPOINT, TTL},
    domain,
};

/// A small client for the parts of the Hetzner DNS API needed for DNS-01 challenges.
///
/// The client holds no state besides its transport (and with it, the API token).
/// Every call is a fresh request against the API, nothing is cached between calls.
///
/// To create a client against the public API, use [`HetznerClient::new()`].
#[derive(Debug)]
pub struct HetznerClient<T: Transport = ReqwestTransport> {
    transport: T,
}

impl HetznerClient<ReqwestTransport> {
    /// Create a client for the public Hetzner DNS API
    pub fn new(api_token: &str) -> Result<Self, HetznerError> {
        Self::with_base_url(api_token, HETZNER_API_ENDPOINT, None)
    }

    /// Create a client against a custom API base URL, optionally with a request timeout
    pub fn with_base_url(
        api_token: &str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, HetznerError> {
        Ok(Self::from_transport(ReqwestTransport::try_new(
            api_token, base_url, timeout,
        )?))
    }
}

impl<T: Transport> HetznerClient<T> {
    pub fn from_transport(transport: T) -> Self {
        HetznerClient { transport }
    }

    /// Returns the id of the most specific zone in the account that contains `domain`.
    ///
    /// Candidates are tried from most to least specific, so with zones `example.co.uk` and `co.uk`
    /// the domain `a.b.example.co.uk` resolves to `example.co.uk`.
    pub fn find_zone_id(&self, domain: &str) -> Result<String, HetznerError> {
        Ok(self.find_zone(domain)?.id)
    }

    /// Create a record in the zone identified by `zone_id` and return it as reported by the API
    pub fn create_record(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name: &str,
        value: &str,
        ttl: TTL,
    ) -> Result<Record, HetznerError> {
        let body = serde_json::to_value(CreateRecordRequest {
            name,
            value,
            ttl,
            kind: record_type,
            zone_id,
        })?;
        let response = self
            .transport
            .send(ApiRequest::new(Method::POST, "/records").json(body))?;

        if response.status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(HetznerError::UnprocessableEntity(response.body));
        }
        let record = parse::<RecordResponse>(response)?.record;
        debug!("Created record {} in zone {}", record, zone_id);
        Ok(record)
    }

    /// Returns the id of the record called `name` in the zone identified by `zone_id`.
    /// A trailing dot on either side is ignored when comparing names.
    pub fn find_record_id(&self, zone_id: &str, name: &str) -> Result<String, HetznerError> {
        self.list_records(zone_id)?
            .into_iter()
            .find(|r| domain::names_match(&r.name, name))
            .map(|r| r.id)
            .ok_or_else(|| HetznerError::RecordNotFound(name.to_owned()))
    }

    /// Delete the record identified by `record_id`
    pub fn delete_record(&self, record_id: &str) -> Result<(), HetznerError> {
        let response = self.transport.send(ApiRequest::new(
            Method::DELETE,
            format!("/records/{}", record_id),
        ))?;
        match response.status {
            StatusCode::OK => {
                debug!("Deleted record {}", record_id);
                Ok(())
            }
            StatusCode::UNAUTHORIZED => Err(HetznerError::NotAuthorized),
            _ => Err(HetznerError::MalformedResponse(
                "status code not 200".to_owned(),
            )),
        }
    }

    /// Look up the zone of `domain`, find the record called `name` in it and delete that record.
    ///
    /// Besides the fully-qualified form, the record may also be stored under its name relative to the zone.
    /// No delete request is sent if no matching record exists.
    pub fn delete_record_by_name(&self, domain: &str, name: &str) -> Result<(), HetznerError> {
        self.delete_matching_record(domain, name, None)
    }

    /// Create a record in the zone that contains `domain`
    pub fn add_record(
        &self,
        domain: &str,
        record_type: RecordType,
        name: &str,
        value: &str,
        ttl: TTL,
    ) -> Result<Record, HetznerError> {
        let zone_id = self.find_zone_id(domain)?;
        self.create_record(&zone_id, record_type, name, value, ttl)
    }

    /// Create a TXT record in the zone that contains `domain`
    pub fn add_txt_record(
        &self,
        domain: &str,
        name: &str,
        value: &str,
        ttl: TTL,
    ) -> Result<Record, HetznerError> {
        self.add_record(domain, RecordType::Txt, name, value, ttl)
    }

    /// Delete the TXT record called `name` with content `value` from the zone that contains `domain`.
    ///
    /// Several challenges may share a name, e.g. for `example.com` and `*.example.com`.
    /// A record with the same name but a different value is never deleted.
    /// If the listing does not include values, the first record with a matching name is deleted.
    pub fn del_txt_record(&self, domain: &str, name: &str, value: &str) -> Result<(), HetznerError> {
        self.delete_matching_record(domain, name, Some(value))
    }

    fn find_zone(&self, domain: &str) -> Result<Zone, HetznerError> {
        let response = self.transport.send(ApiRequest::new(Method::GET, "/zones"))?;
        let zones = parse::<ZonesResponse>(response)?.zones;
        trace!("Collected zones {:?}", zones);

        let zone = domain::base_domain_candidates(domain)
            .iter()
            .find_map(|candidate| {
                zones
                    .iter()
                    .find(|z| domain::names_match(&z.name, candidate))
            })
            .cloned()
            .ok_or_else(|| HetznerError::ZoneNotFound(domain.to_owned()))?;
        debug!("Domain {} belongs to zone {} ({})", domain, zone.name, zone.id);
        Ok(zone)
    }

    fn delete_matching_record(
        &self,
        domain: &str,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), HetznerError> {
        let zone = self.find_zone(domain)?;
        let relative = domain::relative_to_zone(name, &zone.name);

        let mut candidates = self
            .list_records(&zone.id)?
            .into_iter()
            .filter(|r| {
                domain::names_match(&r.name, name)
                    || relative
                        .as_deref()
                        .is_some_and(|rel| domain::names_match(&r.name, rel))
            })
            .collect_vec();

        let position = match value {
            None => (!candidates.is_empty()).then_some(0),
            Some(v) => candidates
                .iter()
                .position(|r| r.value.as_deref().is_some_and(|rv| txt_value_matches(rv, v)))
                .or_else(|| candidates.iter().position(|r| r.value.is_none())),
        };
        let record = position
            .map(|i| candidates.swap_remove(i))
            .ok_or_else(|| HetznerError::RecordNotFound(name.to_owned()))?;
        trace!("Selected record {} for deletion", record);

        self.delete_record(&record.id)
    }

    fn list_records(&self, zone_id: &str) -> Result<Vec<Record>, HetznerError> {
        let response = self
            .transport
            .send(ApiRequest::new(Method::GET, "/records").query("zone_id", zone_id))?;
        let records = parse::<RecordsResponse>(response)?.records;
        trace!("Collected records {:?}", records);
        Ok(records)
    }
}

// TXT values may come back wrapped in quotes
fn txt_value_matches(stored: &str, value: &str) -> bool {
    stored == value || stored.strip_prefix('"').and_then(|v| v.strip_suffix('"')) == Some(value)
}

// Map the status code of a response and parse its body into the expected shape
fn parse<R: DeserializeOwned>(response: ApiResponse) -> Result<R, HetznerError> {
    if response.status == StatusCode::UNAUTHORIZED {
        return Err(HetznerError::NotAuthorized);
    }
    if !response.status.is_success() {
        return Err(HetznerError::MalformedResponse(format!(
            "unexpected status code {}",
            response.status.as_u16()
        )));
    }
    Ok(serde_json::from_str(&response.body)?)
}
