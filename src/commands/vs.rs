//! `vs` actions: list, detail, create and cancel virtual servers.

use super::{lookup, lookup_str};
use crate::cli::{
    export_to_template, resolve_id, CliCommand, Environment, ExclusiveGroup, ParamSpec, ParsedArgs,
};
use crate::error::CliError;
use crate::formatting::{
    active_txn, blank, formatted, listing, mb_to_gb, Alignment, KeyValueTable, Output, Table,
};
use crate::managers::vs::parse_memory;
use crate::managers::{CreateOptions, ListFilters, SshKeyManager, VsManager};
use serde_json::Value;
use std::path::Path;

const SORT_COLUMNS: [&str; 7] = [
    "id",
    "datacenter",
    "host",
    "cores",
    "memory",
    "primary_ip",
    "backend_ip",
];

const PRICE_DISCLAIMER: &str = " -- ! Prices reflected here are retail and do not take account \
level discounts and are not guaranteed.";

fn resolve_vs(mgr: &VsManager<'_>, identifier: &str) -> Result<i64, CliError> {
    resolve_id(|id| mgr.resolve_ids(id), identifier, "VS")
}

pub struct List;

impl CliCommand for List {
    fn name(&self) -> Option<&'static str> {
        Some("list")
    }

    fn summary(&self) -> &'static str {
        "List virtual servers"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::flag("hourly", "Show hourly instances"),
            ParamSpec::flag("monthly", "Show monthly instances"),
            ParamSpec::text("cpu", "Number of CPU cores").short('c'),
            ParamSpec::text("domain", "Domain portion of the FQDN").short('D'),
            ParamSpec::text("datacenter", "Datacenter shortname (sng01, dal05, ...)").short('d'),
            ParamSpec::text("hostname", "Host portion of the FQDN").short('H'),
            ParamSpec::text("memory", "Memory in mebibytes").short('m'),
            ParamSpec::text("network", "Network port speed in Mbps").short('n'),
            ParamSpec::text("tags", "Only show instances with one of these comma separated tags"),
            ParamSpec::choice("sortby", &SORT_COLUMNS, "Column to sort by").default("host"),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let filters = ListFilters {
            hourly: args.flag("hourly"),
            monthly: args.flag("monthly"),
            hostname: args.text("hostname").map(str::to_string),
            domain: args.text("domain").map(str::to_string),
            datacenter: args.text("datacenter").map(str::to_string),
            cpus: args.text("cpu").map(str::to_string),
            memory: args.text("memory").map(str::to_string),
            nic_speed: args.text("network").map(str::to_string),
            tags: args
                .text("tags")
                .map(|tags| {
                    tags.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            ..Default::default()
        };

        let client = env.client();
        let guests = VsManager::new(client.as_ref()).list_instances(&filters)?;

        let mut table = Table::new([
            "id",
            "datacenter",
            "host",
            "cores",
            "memory",
            "primary_ip",
            "backend_ip",
            "active_transaction",
        ]);
        table.set_sort_key(Some(args.text("sortby").unwrap_or("host").to_string()));
        for guest in &guests {
            table.add_row([
                Output::from(lookup(guest, &["id"])),
                Output::from(lookup(guest, &["datacenter", "name"])),
                Output::from(lookup(guest, &["fullyQualifiedDomainName"])),
                Output::from(lookup(guest, &["maxCpu"])),
                memory_cell(guest),
                Output::from(lookup(guest, &["primaryIpAddress"])),
                Output::from(lookup(guest, &["primaryBackendIpAddress"])),
                active_txn(guest),
            ])?;
        }
        Ok(Some(table.into()))
    }
}

fn memory_cell(guest: &Value) -> Output {
    match lookup(guest, &["maxMemory"]).and_then(Value::as_i64) {
        Some(mb) => mb_to_gb(mb),
        None => blank(),
    }
}

/// `keyName`/`name` pair as raw/display, or blank.
fn status_cell(item: Option<&Value>) -> Output {
    let Some(item) = item else {
        return blank();
    };
    let name = lookup_str(item, &["name"]);
    let key = lookup_str(item, &["keyName"]);
    match (key, name) {
        (Some(key), Some(name)) => formatted(key, name),
        (None, Some(name)) => Output::from(name),
        (Some(key), None) => Output::from(key),
        (None, None) => blank(),
    }
}

pub struct Detail;

impl CliCommand for Detail {
    fn name(&self) -> Option<&'static str> {
        Some("detail")
    }

    fn summary(&self) -> &'static str {
        "Get details for a virtual server"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional("identifier", "Id, IP address or hostname"),
            ParamSpec::flag("passwords", "Show passwords (check over your shoulder!)"),
            ParamSpec::flag("price", "Show associated prices"),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let client = env.client();
        let mgr = VsManager::new(client.as_ref());
        let vs_id = resolve_vs(&mgr, args.require_text("identifier")?)?;
        let result = mgr.get_instance(vs_id)?;

        let mut table = KeyValueTable::new();
        table
            .add("id", lookup(&result, &["id"]))
            .add("hostname", lookup(&result, &["fullyQualifiedDomainName"]))
            .add("status", status_cell(lookup(&result, &["status"])))
            .add("active_transaction", active_txn(&result))
            .add("state", status_cell(lookup(&result, &["powerState"])))
            .add("datacenter", lookup(&result, &["datacenter", "name"]));

        let os = lookup(&result, &["operatingSystem", "softwareLicense", "softwareDescription"]);
        let os_name = os.and_then(|os| lookup_str(os, &["name"]));
        let os_version = os.and_then(|os| lookup_str(os, &["version"]));
        table
            .add("os", os_name)
            .add("os_version", os_version)
            .add("cores", lookup(&result, &["maxCpu"]))
            .add("memory", memory_cell(&result))
            .add("public_ip", lookup(&result, &["primaryIpAddress"]))
            .add("private_ip", lookup(&result, &["primaryBackendIpAddress"]))
            .add("private_only", lookup(&result, &["privateNetworkOnlyFlag"]))
            .add("private_cpu", lookup(&result, &["dedicatedAccountHostOnlyFlag"]))
            .add("created", lookup(&result, &["createDate"]))
            .add("modified", lookup(&result, &["modifyDate"]));

        if let Some(vlans) = lookup(&result, &["networkVlans"]).and_then(Value::as_array) {
            let mut vlan_table = Table::new(["type", "number", "id"]);
            for vlan in vlans {
                vlan_table.add_row([
                    Output::from(lookup(vlan, &["networkSpace"])),
                    Output::from(lookup(vlan, &["vlanNumber"])),
                    Output::from(lookup(vlan, &["id"])),
                ])?;
            }
            table.add("vlans", vlan_table);
        }

        if let Some(notes) = lookup_str(&result, &["notes"]).filter(|n| !n.is_empty()) {
            table.add("notes", notes);
        }

        if args.flag("price") {
            table.add("price rate", lookup(&result, &["billingItem", "recurringFee"]));
        }

        if args.flag("passwords") {
            let mut pass_table = Table::new(["username", "password"]);
            let passwords = lookup(&result, &["operatingSystem", "passwords"])
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for item in &passwords {
                pass_table.add_row([
                    Output::from(lookup(item, &["username"])),
                    Output::from(lookup(item, &["password"])),
                ])?;
            }
            table.add("users", pass_table);
        }

        let tags: Vec<String> = lookup(&result, &["tagReferences"])
            .and_then(Value::as_array)
            .map(|refs| {
                refs.iter()
                    .filter_map(|r| lookup_str(r, &["tag", "name"]).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        if !tags.is_empty() {
            table.add("tags", listing(tags, ","));
        }

        Ok(Some(table.into()))
    }
}

pub struct Cancel;

impl CliCommand for Cancel {
    fn name(&self) -> Option<&'static str> {
        Some("cancel")
    }

    fn summary(&self) -> &'static str {
        "Cancel a virtual server"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::positional("identifier", "Id, IP address or hostname")]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let client = env.client();
        let mgr = VsManager::new(client.as_ref());
        let vs_id = resolve_vs(&mgr, args.require_text("identifier")?)?;
        if !env.no_going_back(Some(&vs_id.to_string()))? {
            return Err(CliError::aborted());
        }
        mgr.cancel_instance(vs_id)?;
        Ok(None)
    }
}

pub struct Create;

impl Create {
    fn options(env: &Environment<'_>, args: &ParsedArgs) -> Result<CreateOptions, CliError> {
        let userdata = match (args.text("userdata"), args.text("userfile")) {
            (Some(data), _) => Some(data.to_string()),
            (None, Some(file)) => {
                let path = Path::new(file);
                Some(std::fs::read_to_string(path).map_err(|e| CliError::local_io(path, e))?)
            }
            (None, None) => None,
        };

        let client = env.client();
        let keys = SshKeyManager::new(client.as_ref());
        let ssh_keys = args
            .list("key")
            .iter()
            .map(|key| resolve_id(|id| keys.resolve_ids(id), key, "SshKey"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CreateOptions {
            cpus: args.require_int("cpu")?,
            memory: parse_memory(args.require_text("memory")?)?,
            hostname: args.require_text("hostname")?.to_string(),
            domain: args.require_text("domain")?.to_string(),
            hourly: args.flag("hourly") && !args.flag("monthly"),
            local_disk: !args.flag("san"),
            datacenter: args.text("datacenter").map(str::to_string),
            os_code: args.text("os").map(str::to_string),
            image_id: args.text("image").map(str::to_string),
            dedicated: args.flag("dedicated"),
            private: args.flag("private"),
            public_vlan: args.int("vlan-public"),
            private_vlan: args.int("vlan-private"),
            nic_speed: args.int("network"),
            disks: args.list("disk").to_vec(),
            post_uri: args.text("postinstall").map(str::to_string),
            userdata,
            ssh_keys,
        })
    }
}

/// A fee field that may arrive as a number or a decimal string.
fn fee(price: &Value, field: &str) -> f64 {
    match price.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

fn quote_table(quote: &Value, hourly: bool) -> Result<Table, CliError> {
    let mut table = Table::new(["Item", "cost"])
        .align("Item", Alignment::Right)
        .align("cost", Alignment::Right);
    let field = if hourly { "hourlyRecurringFee" } else { "recurringFee" };
    let mut total = 0.0;
    let prices = quote.get("prices").and_then(Value::as_array).cloned().unwrap_or_default();
    for price in &prices {
        let rate = fee(price, field);
        total += rate;
        table.add_row([
            Output::from(lookup(price, &["item", "description"])),
            Output::text(format!("{:.2}", rate)),
        ])?;
    }
    let rate_name = if hourly { "hourly" } else { "monthly" };
    table.add_row([
        Output::text(format!("Total {} cost", rate_name)),
        Output::text(format!("{:.2}", total)),
    ])?;
    Ok(table)
}

impl CliCommand for Create {
    fn name(&self) -> Option<&'static str> {
        Some("create")
    }

    fn summary(&self) -> &'static str {
        "Order/create a virtual server"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::int("cpu", "Number of CPU cores").short('c').required(),
            ParamSpec::text("domain", "Domain portion of the FQDN").short('D').required(),
            ParamSpec::text("hostname", "Host portion of the FQDN").short('H').required(),
            ParamSpec::text("memory", "Memory in mebibytes, or with a G/T suffix")
                .short('m')
                .required(),
            ParamSpec::text("os", "OS install code; <OS>_LATEST picks the newest").short('o'),
            ParamSpec::text("image", "Image GUID"),
            ParamSpec::flag("hourly", "Hourly rate instance type"),
            ParamSpec::flag("monthly", "Monthly rate instance type"),
            ParamSpec::text("datacenter", "Datacenter shortname (sng01, dal05, ...)").short('d'),
            ParamSpec::flag("dedicated", "Create a dedicated virtual server"),
            ParamSpec::flag("san", "Use SAN storage instead of local disk"),
            ParamSpec::flag("private", "Only attach the private network"),
            ParamSpec::flag("test", "Do not create the server, just get a quote"),
            ParamSpec::text("export", "Export options to a template file and exit"),
            ParamSpec::text("userfile", "Read userdata from file").short('F'),
            ParamSpec::text("userdata", "User defined metadata string").short('u'),
            ParamSpec::text("postinstall", "Post-install script to download").short('i'),
            ParamSpec::repeated("key", "SSH key id or label; repeatable").short('k'),
            ParamSpec::repeated("disk", "Disk capacity in GB; repeatable"),
            ParamSpec::int("network", "Network port speed in Mbps").short('n'),
            ParamSpec::int("vlan-public", "Public VLAN id"),
            ParamSpec::int("vlan-private", "Private VLAN id"),
        ]
    }

    fn exclusive_groups(&self) -> Vec<ExclusiveGroup> {
        vec![
            ExclusiveGroup::one_of("billing", &["hourly", "monthly"]),
            ExclusiveGroup::one_of("source", &["os", "image"]),
            ExclusiveGroup::at_most_one("userdata-source", &["userdata", "userfile"]),
        ]
    }

    fn execute(
        &self,
        env: &mut Environment<'_>,
        args: &ParsedArgs,
    ) -> Result<Option<Output>, CliError> {
        let options = Self::options(env, args)?;

        if let Some(path) = args.text("export") {
            export_to_template(Path::new(path), args, &self.params(), &["export", "test"])?;
            return Ok(Some(Output::text(
                "Successfully exported options to a template file.",
            )));
        }

        let client = env.client();
        let mgr = VsManager::new(client.as_ref());

        if args.flag("test") {
            let quote = mgr.verify_create_instance(&options)?;
            return Ok(Some(Output::sequential([
                Output::from(quote_table(&quote, options.hourly)?),
                formatted(Value::Null, PRICE_DISCLAIMER),
            ])));
        }

        if !env.confirm("This action will incur charges on your account. Continue?", false)? {
            return Err(CliError::Aborted("Aborting virtual server order.".to_string()));
        }
        let created = mgr.create_instance(&options)?;
        let mut table = KeyValueTable::new();
        table
            .add("id", lookup(&created, &["id"]))
            .add("created", lookup(&created, &["createDate"]))
            .add("guid", lookup(&created, &["globalIdentifier"]));
        Ok(Some(table.into()))
    }
}
