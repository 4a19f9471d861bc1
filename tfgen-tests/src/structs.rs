//! Native types read by `build.rs`.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tfgen_derive::Terraform;
use tfgen_runtime::chrono::{DateTime, Utc};
use tfgen_runtime::serde_json::Value;

/// A coffee served by the shop.
#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Coffee {
    #[terraform("id,computed")]
    pub id: i32,
    /// Display name.
    #[terraform("name,required")]
    pub name: String,
    #[terraform("teaser")]
    pub teaser: Option<String>,
    #[terraform("ingredients")]
    pub ingredients: Vec<Ingredient>,
    #[terraform("customer")]
    pub customer: Option<Customer>,
    pub internal: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Ingredient {
    #[terraform("id,required")]
    pub id: i32,
    #[terraform("quantity")]
    pub quantity: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Customer {
    #[terraform("id")]
    pub id: i64,
    #[terraform("name")]
    pub name: String,
    #[terraform("vip")]
    pub vip: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Hostname(pub String);

/// A server with its network settings flattened into it.
#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Server {
    #[terraform("name,required")]
    pub name: String,
    #[terraform("-,promoted")]
    pub network: Network,
    #[terraform("disk,block")]
    pub disks: Vec<Disk>,
}

#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Network {
    #[terraform("host")]
    pub host: Hostname,
    #[terraform("port")]
    pub port: u16,
    #[terraform("ipv6")]
    pub ipv6: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Disk {
    #[terraform("size")]
    pub size: u64,
    #[terraform("ratio")]
    pub ratio: f32,
}

/// One field of every supported kind.
#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Everything {
    #[terraform("created_at")]
    pub created_at: DateTime<Utc>,
    #[terraform("expires_at")]
    pub expires_at: Option<DateTime<Utc>>,
    #[terraform("timeout")]
    pub timeout: Duration,
    #[terraform("retry")]
    pub retry: Option<Duration>,
    #[terraform("payload")]
    pub payload: Vec<u8>,
    #[terraform("labels")]
    pub labels: HashMap<String, String>,
    #[terraform("limits")]
    pub limits: BTreeMap<String, i32>,
    #[terraform("extra")]
    pub extra: Value,
    #[terraform("annotations")]
    pub annotations: HashMap<String, Value>,
    #[terraform("matrix")]
    pub matrix: Vec<Vec<String>>,
    #[terraform("aliases")]
    pub aliases: Option<Vec<Hostname>>,
    #[terraform("endpoints")]
    pub endpoints: BTreeMap<String, Endpoint>,
    #[terraform("counter")]
    pub counter: u64,
    #[terraform("weight")]
    pub weight: f64,
    #[terraform("replicas")]
    pub replicas: Option<usize>,
    #[terraform("enabled")]
    pub enabled: bool,
    #[terraform("password,sensitive")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Terraform)]
pub struct Endpoint {
    #[terraform("url,required")]
    pub url: String,
    #[terraform("weight")]
    pub weight: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_terraform_fields() {
        assert_eq!(
            Coffee::TERRAFORM_FIELDS,
            &["id", "name", "teaser", "ingredients", "customer"]
        );
        assert_eq!(Server::TERRAFORM_FIELDS, &["name", "disk"]);
    }
}
