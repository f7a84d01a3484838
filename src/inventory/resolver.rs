//! Domain and connection resolution for a node.
//!
//! Two strategies live here:
//!
//! - [`resolve_domain`] picks the domain from the `provisioning` network,
//!   overridden by the control-plane network when the node's metadata names one.
//!   It also collects the control-plane addresses.
//! - [`resolve_connection`] scans every attachment for a usable gateway and
//!   derives the address Ansible should connect to.
//!
//! Malformed address strings are skipped without error in both cases.

use super::node::{NodeRecord, PROVISIONING_NETWORK};
use ipnet::IpNet;
use serde::Serialize;
use std::net::IpAddr;

/// Port used for every host.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Result of domain resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainResolution {
    /// Domain to build the FQDN from, if any
    pub domain: Option<String>,

    /// Control-plane details, present only when a valid control-plane network is configured
    pub control_plane: Option<ControlPlane>,
}

/// Control-plane network details surfaced as host variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPlane {
    /// Domain of the control-plane network (may be empty)
    pub domain: String,

    /// Bare addresses parsed from the network's CIDR list, in input order
    pub ips: Vec<IpAddr>,
}

/// Resolve the domain of a node and its control-plane network.
///
/// The control-plane network's domain replaces the provisioning domain, even
/// when it is empty.
pub fn resolve_domain(node: &NodeRecord) -> DomainResolution {
    let mut domain = node
        .network(PROVISIONING_NETWORK)
        .map(|net| net.network.domain.clone());

    let control_plane = node.control_plane_network().map(|cp| {
        domain = Some(cp.network.domain.clone());
        ControlPlane {
            domain: cp.network.domain.clone(),
            ips: cp
                .config
                .ip
                .iter()
                .filter_map(|entry| parse_cidr_addr(entry))
                .collect(),
        }
    });

    DomainResolution {
        domain: domain.filter(|d| !d.is_empty()),
        control_plane,
    }
}

/// Connection parameters for a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// Fully-qualified name, when a domain was resolved
    pub fqdn: Option<String>,

    /// Address Ansible connects to
    pub host: String,

    /// SSH port
    pub port: u16,
}

impl Connection {
    /// Build the connection triple from the resolved pieces.
    ///
    /// Precedence for `host` is FQDN, then address, then bare hostname.
    pub fn from_parts(hostname: &str, domain: Option<&str>, address: Option<IpAddr>) -> Self {
        let fqdn = domain
            .filter(|d| !d.is_empty())
            .map(|d| format!("{}.{}", hostname, d));

        let host = match (&fqdn, address) {
            (Some(fqdn), _) => fqdn.clone(),
            (None, Some(addr)) => addr.to_string(),
            (None, None) => hostname.to_string(),
        };

        Self {
            fqdn,
            host,
            port: DEFAULT_SSH_PORT,
        }
    }
}

/// Resolve the connection triple by scanning network gateways.
///
/// For every attachment, each gateway that parses as an address selects the IP
/// entry at the same index as the primary address and the attachment's domain as
/// the host domain. Both are taken from the same match; an IP entry that does not
/// parse leaves no address. Attachments are visited in network-name order and the last
/// match wins.
///
/// NOTE: when several networks carry a valid gateway the choice between them is
/// only determined by name ordering. There is no documented precedence rule.
pub fn resolve_connection(node: &NodeRecord) -> Connection {
    let mut domain: Option<&str> = None;
    let mut address: Option<IpAddr> = None;
    let mut matched: Vec<&str> = Vec::new();

    for (name, attachment) in &node.networks {
        let mut network_matched = false;

        for (ip, gateway) in attachment.config.pairs() {
            if gateway.trim().parse::<IpAddr>().is_err() {
                continue;
            }
            network_matched = true;
            domain = attachment.domain();
            address = parse_addr(ip);
        }

        if network_matched {
            matched.push(name.as_str());
        }
    }

    if matched.len() > 1 {
        tracing::debug!(
            hostname = %node.hostname,
            networks = ?matched,
            "multiple networks with a valid gateway, using the last one"
        );
    }

    Connection::from_parts(&node.hostname, domain, address)
}

/// Parse `addr/prefix` and return the bare address
pub fn parse_cidr_addr(entry: &str) -> Option<IpAddr> {
    entry.trim().parse::<IpNet>().ok().map(|net| net.addr())
}

/// Parse an address that may or may not carry a prefix
fn parse_addr(entry: &str) -> Option<IpAddr> {
    parse_cidr_addr(entry).or_else(|| entry.trim().parse::<IpAddr>().ok())
}
