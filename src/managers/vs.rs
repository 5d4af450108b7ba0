//! Virtual servers: listing, detail, cancellation and ordering.

use super::{ensure_accepted, ids_of, query_filter, set_filter_path};
use crate::cli::resolve_ids;
use crate::error::CliError;
use crate::transport::{ApiRequest, RemoteCall};
use serde_json::{json, Map, Value};
use std::net::IpAddr;
use tracing::debug;

const SERVICE: &str = "Virtual_Guest";

const LIST_MASK: &str = "id,globalIdentifier,hostname,domain,fullyQualifiedDomainName,\
primaryBackendIpAddress,primaryIpAddress,lastKnownPowerState.name,powerState,maxCpu,\
maxMemory,datacenter,activeTransaction.transactionStatus[friendlyName,name],status";

const DETAIL_MASK: &str = "id,globalIdentifier,fullyQualifiedDomainName,hostname,domain,\
createDate,modifyDate,provisionDate,notes,dedicatedAccountHostOnlyFlag,\
privateNetworkOnlyFlag,primaryBackendIpAddress,primaryIpAddress,\
networkComponents[id,status,speed,maxSpeed,name,macAddress,primaryIpAddress,port],\
lastKnownPowerState.name,powerState,status,maxCpu,maxMemory,datacenter,\
activeTransaction[id,transactionStatus[friendlyName,name]],lastOperatingSystemReload.id,\
blockDevices,blockDeviceTemplateGroup[id,name,globalId],postInstallScriptUri,\
operatingSystem.softwareLicense.softwareDescription[manufacturer,name,version,referenceCode],\
operatingSystem.passwords[username,password],hourlyBillingFlag,userData,\
billingItem.recurringFee,tagReferences[id,tag[name,id]],networkVlans[id,vlanNumber,networkSpace]";

/// Server-side filters for [`VsManager::list_instances`].
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub hourly: bool,
    pub monthly: bool,
    pub hostname: Option<String>,
    pub domain: Option<String>,
    pub datacenter: Option<String>,
    pub cpus: Option<String>,
    pub memory: Option<String>,
    pub nic_speed: Option<String>,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub tags: Vec<String>,
}

impl ListFilters {
    /// Account method: hourly or monthly when exactly one is asked for.
    fn method(&self) -> &'static str {
        match (self.hourly, self.monthly) {
            (true, false) => "getHourlyVirtualGuests",
            (false, true) => "getMonthlyVirtualGuests",
            _ => "getVirtualGuests",
        }
    }

    fn to_filter(&self) -> Option<Value> {
        let mut filter = Map::new();
        let fields: [(&[&str], &Option<String>); 8] = [
            (&["virtualGuests", "hostname"], &self.hostname),
            (&["virtualGuests", "domain"], &self.domain),
            (&["virtualGuests", "datacenter", "name"], &self.datacenter),
            (&["virtualGuests", "maxCpu"], &self.cpus),
            (&["virtualGuests", "maxMemory"], &self.memory),
            (&["virtualGuests", "networkComponents", "maxSpeed"], &self.nic_speed),
            (&["virtualGuests", "primaryIpAddress"], &self.public_ip),
            (&["virtualGuests", "primaryBackendIpAddress"], &self.private_ip),
        ];
        for (path, value) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                set_filter_path(&mut filter, path, query_filter(value));
            }
        }
        if !self.tags.is_empty() {
            set_filter_path(
                &mut filter,
                &["virtualGuests", "tagReferences", "tag", "name"],
                json!({"operation": "in", "options": [{"name": "data", "value": self.tags}]}),
            );
        }
        if filter.is_empty() {
            None
        } else {
            Some(Value::Object(filter))
        }
    }
}

/// Everything needed to order a virtual server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    pub cpus: i64,
    /// Megabytes
    pub memory: i64,
    pub hostname: String,
    pub domain: String,
    pub hourly: bool,
    pub local_disk: bool,
    pub datacenter: Option<String>,
    pub os_code: Option<String>,
    pub image_id: Option<String>,
    pub dedicated: bool,
    pub private: bool,
    pub public_vlan: Option<i64>,
    pub private_vlan: Option<i64>,
    pub nic_speed: Option<i64>,
    pub disks: Vec<String>,
    pub post_uri: Option<String>,
    pub userdata: Option<String>,
    pub ssh_keys: Vec<i64>,
}

impl CreateOptions {
    /// The `Virtual_Guest` template sent to `createObject`/`generateOrderTemplate`.
    pub fn to_template(&self) -> Result<Value, CliError> {
        if self.cpus <= 0
            || self.memory <= 0
            || self.hostname.is_empty()
            || self.domain.is_empty()
        {
            return Err(CliError::usage("cpu, memory, hostname, and domain are required"));
        }
        if self.os_code.is_some() && self.image_id.is_some() {
            return Err(CliError::usage("Can only specify one of: os, image"));
        }

        let mut data = Map::new();
        data.insert("startCpus".into(), self.cpus.into());
        data.insert("maxMemory".into(), self.memory.into());
        data.insert("hostname".into(), self.hostname.clone().into());
        data.insert("domain".into(), self.domain.clone().into());
        data.insert("localDiskFlag".into(), self.local_disk.into());
        data.insert("hourlyBillingFlag".into(), self.hourly.into());

        if self.dedicated {
            data.insert("dedicatedAccountHostOnlyFlag".into(), true.into());
        }
        if self.private {
            data.insert("privateNetworkOnlyFlag".into(), true.into());
        }
        if let Some(image) = &self.image_id {
            data.insert("blockDeviceTemplateGroup".into(), json!({"globalIdentifier": image}));
        } else if let Some(os) = &self.os_code {
            data.insert("operatingSystemReferenceCode".into(), os.clone().into());
        }
        if let Some(dc) = &self.datacenter {
            data.insert("datacenter".into(), json!({"name": dc}));
        }
        if let Some(vlan) = self.public_vlan {
            data.insert(
                "primaryNetworkComponent".into(),
                json!({"networkVlan": {"id": vlan}}),
            );
        }
        if let Some(vlan) = self.private_vlan {
            data.insert(
                "primaryBackendNetworkComponent".into(),
                json!({"networkVlan": {"id": vlan}}),
            );
        }
        if let Some(userdata) = &self.userdata {
            data.insert("userData".into(), json!([{"value": userdata}]));
        }
        if let Some(speed) = self.nic_speed {
            data.insert("networkComponents".into(), json!([{"maxSpeed": speed}]));
        }
        if !self.disks.is_empty() {
            // device 1 is reserved for swap
            let devices: Vec<Value> = self
                .disks
                .iter()
                .enumerate()
                .map(|(i, capacity)| {
                    let device = if i == 0 { 0 } else { i + 1 };
                    json!({"device": device.to_string(), "diskImage": {"capacity": capacity}})
                })
                .collect();
            data.insert("blockDevices".into(), Value::Array(devices));
        }
        if let Some(uri) = &self.post_uri {
            data.insert("postInstallScriptUri".into(), uri.clone().into());
        }
        if !self.ssh_keys.is_empty() {
            let keys: Vec<Value> = self.ssh_keys.iter().map(|id| json!({"id": id})).collect();
            data.insert("sshKeys".into(), Value::Array(keys));
        }
        Ok(Value::Object(data))
    }
}

/// Memory in megabytes from `2048`, `2` (gigabytes below 1024), `4G` or `1T`.
pub fn parse_memory(text: &str) -> Result<i64, CliError> {
    let text = text.trim();
    let invalid = || CliError::usage(format!("Invalid memory value: '{}'", text));
    if let Ok(n) = text.parse::<i64>() {
        if n <= 0 {
            return Err(invalid());
        }
        return if n < 1024 {
            n.checked_mul(1024).ok_or_else(invalid)
        } else {
            Ok(n)
        };
    }
    let unit = text.chars().last().ok_or_else(invalid)?;
    let n: i64 = text[..text.len() - unit.len_utf8()]
        .trim()
        .parse()
        .map_err(|_| invalid())?;
    if n <= 0 {
        return Err(invalid());
    }
    let factor: i64 = match unit {
        'G' | 'g' => 1024,
        'T' | 't' => 1024 * 1024,
        'M' | 'm' => 1,
        _ => return Err(invalid()),
    };
    n.checked_mul(factor).ok_or_else(invalid)
}

pub struct VsManager<'a> {
    client: &'a dyn RemoteCall,
}

impl<'a> VsManager<'a> {
    pub fn new(client: &'a dyn RemoteCall) -> Self {
        Self { client }
    }

    pub fn list_instances(&self, filters: &ListFilters) -> Result<Vec<Value>, CliError> {
        self.list_with_mask(filters, LIST_MASK)
    }

    fn list_with_mask(&self, filters: &ListFilters, mask: &str) -> Result<Vec<Value>, CliError> {
        let mut request = ApiRequest::new("Account", filters.method()).mask(mask);
        if let Some(filter) = filters.to_filter() {
            request = request.filter(filter);
        }
        debug!(method = %request.method, "Listing virtual servers");
        let guests = self.client.call(&request)?;
        Ok(guests.as_array().cloned().unwrap_or_default())
    }

    pub fn get_instance(&self, id: i64) -> Result<Value, CliError> {
        Ok(self
            .client
            .call(&ApiRequest::new(SERVICE, "getObject").id(id).mask(DETAIL_MASK))?)
    }

    pub fn cancel_instance(&self, id: i64) -> Result<Value, CliError> {
        let result = self.client.call(&ApiRequest::new(SERVICE, "deleteObject").id(id))?;
        ensure_accepted(result, &format!("Cancelling virtual server {}", id))
    }

    /// Price quote for an order without placing it.
    pub fn verify_create_instance(&self, options: &CreateOptions) -> Result<Value, CliError> {
        let template = options.to_template()?;
        Ok(self
            .client
            .call(&ApiRequest::new(SERVICE, "generateOrderTemplate").arg(template))?)
    }

    /// Places the order. This incurs charges.
    pub fn create_instance(&self, options: &CreateOptions) -> Result<Value, CliError> {
        let template = options.to_template()?;
        debug!(hostname = %options.hostname, "Ordering virtual server");
        Ok(self.client.call(&ApiRequest::new(SERVICE, "createObject").arg(template))?)
    }

    /// Candidate ids for an id, IP address or hostname.
    pub fn resolve_ids(&self, identifier: &str) -> Result<Vec<i64>, CliError> {
        resolve_ids(
            identifier,
            &[
                &|ip: &str| self.ids_from_ip(ip),
                &|host: &str| self.ids_from_hostname(host),
            ],
        )
    }

    fn ids_from_hostname(&self, hostname: &str) -> Result<Vec<i64>, CliError> {
        let filters = ListFilters {
            hostname: Some(hostname.to_string()),
            ..Default::default()
        };
        let guests = self.list_with_mask(&filters, "id,hostname")?;
        Ok(ids_of(&Value::Array(exact_matches(guests, &["hostname"], hostname))))
    }

    /// Public address first, then private.
    fn ids_from_ip(&self, ip: &str) -> Result<Vec<i64>, CliError> {
        if ip.parse::<IpAddr>().is_err() {
            return Ok(Vec::new());
        }
        let public = ListFilters {
            public_ip: Some(ip.to_string()),
            ..Default::default()
        };
        let guests = self.list_with_mask(&public, "id,primaryIpAddress")?;
        let ids = ids_of(&Value::Array(exact_matches(guests, &["primaryIpAddress"], ip)));
        if !ids.is_empty() {
            return Ok(ids);
        }
        let private = ListFilters {
            private_ip: Some(ip.to_string()),
            ..Default::default()
        };
        let guests = self.list_with_mask(&private, "id,primaryBackendIpAddress")?;
        Ok(ids_of(&Value::Array(exact_matches(
            guests,
            &["primaryBackendIpAddress"],
            ip,
        ))))
    }
}

/// Drop results whose field does not equal `wanted`; results without the field are kept.
fn exact_matches(items: Vec<Value>, fields: &[&str], wanted: &str) -> Vec<Value> {
    items
        .into_iter()
        .filter(|item| {
            fields.iter().all(|field| match item.get(*field).and_then(Value::as_str) {
                Some(value) => value.eq_ignore_ascii_case(wanted),
                None => true,
            })
        })
        .collect()
}
