use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::config::TTL;

/// A DNS zone registered in the Hetzner account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A single DNS record as returned by the API.
///
/// Only `id` and `name` are guaranteed to be present, the record listing may omit the rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub ttl: Option<TTL>,
    #[serde(default)]
    pub zone_id: Option<String>,
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.kind.as_deref().unwrap_or("?"),
            self.name,
            self.id
        )
    }
}

/// Record types this crate is able to manage
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "TXT")]
    Txt,
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Txt => write!(f, "TXT"),
        }
    }
}

// Wire types, not exposed outside the hetzner module

#[derive(Debug, Deserialize)]
pub(super) struct ZonesResponse {
    pub zones: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RecordsResponse {
    pub records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RecordResponse {
    pub record: Record,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRecordRequest<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub ttl: TTL,
    #[serde(rename = "type")]
    pub kind: RecordType,
    pub zone_id: &'a str,
}
