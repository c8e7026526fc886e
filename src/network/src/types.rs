//! Reply types of the node APIs.

use issuer_core::Status;
use serde::{Deserialize, Deserializer};

/// Amounts are sent as decimal strings.
mod json_u64 {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }

    pub mod option {
        use serde::de::Error;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<u64>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) => s.parse().map(Some).map_err(D::Error::custom),
                None => Ok(None),
            }
        }
    }
}

/// A delegation to a primary-network validator.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegator {
    #[serde(rename = "nodeID")]
    pub node_id: String,
    #[serde(with = "json_u64")]
    pub stake_amount: u64,
    #[serde(default, with = "json_u64::option")]
    pub potential_reward: Option<u64>,
}

/// A current primary-network validator.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    #[serde(rename = "nodeID")]
    pub node_id: String,
    #[serde(with = "json_u64")]
    pub stake_amount: u64,
    #[serde(default, with = "json_u64::option")]
    pub potential_reward: Option<u64>,
    /// `None` when the node did not report connectivity
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub delegators: Vec<Delegator>,
}

impl Validator {
    /// Own stake plus every delegated stake, or `None` on overflow.
    pub fn total_stake(&self) -> Option<u64> {
        self.delegators
            .iter()
            .try_fold(self.stake_amount, |total, d| total.checked_add(d.stake_amount))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorsReply {
    pub validators: Vec<Validator>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SupplyReply {
    #[serde(with = "json_u64")]
    pub supply: u64,
}

/// A peer as reported by `info.peers`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub ip: String,
    #[serde(rename = "nodeID")]
    pub node_id: String,
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub benched: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PeersReply {
    #[serde(default)]
    pub peers: Vec<Peer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexReply {
    pub address: String,
    pub utxo: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UtxosReply {
    pub utxos: Vec<String>,
    pub end_index: IndexReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueTxReply {
    #[serde(rename = "txID")]
    pub tx_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TxStatusResponse {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Maps a status name reported by either chain onto [`Status`].
pub fn parse_status(status: &str) -> Status {
    match status {
        "Committed" | "Accepted" => Status::Committed,
        "Aborted" | "Rejected" | "Dropped" => Status::Aborted,
        "Processing" => Status::Processing,
        _ => Status::Unknown,
    }
}
