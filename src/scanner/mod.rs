// src/scanner/mod.rs
pub mod port;
pub mod service;

use std::net::IpAddr;
use std::time::Duration;
use chrono::Local;
use clap::ValueEnum;
use log::info;
use serde::Serialize;
use crate::error::{Error, Result};

/// 扫描模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanProfile {
    /// TCP connect scan
    Basic,
    /// Connect scan plus banner grabbing and version extraction
    Comprehensive,
    /// One probe at a time with a pause between probes
    Stealth,
}

impl ScanProfile {
    pub fn default_ports(self) -> &'static str {
        match self {
            ScanProfile::Comprehensive => "1-65535",
            _ => "1-1000",
        }
    }

    pub fn workers(self, requested: usize) -> usize {
        match self {
            ScanProfile::Stealth => 1,
            _ => requested.max(1),
        }
    }

    pub fn pacing(self) -> Duration {
        match self {
            ScanProfile::Stealth => Duration::from_millis(400),
            _ => Duration::ZERO,
        }
    }

    pub fn grab_banners(self) -> bool {
        self == ScanProfile::Comprehensive
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenPort {
    pub port: u16,
    pub service: String,
    pub banner: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub target: String,
    pub address: IpAddr,
    pub profile: ScanProfile,
    pub timestamp: String,
    pub ports_scanned: usize,
    pub open_ports: Vec<OpenPort>,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub profile: ScanProfile,
    pub timeout: Duration,
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            profile: ScanProfile::Basic,
            timeout: Duration::from_millis(1000),
            threads: 400,
        }
    }
}

/// 解析目标并扫描端口，按端口号排序返回
pub async fn run_scan(target: &str, ports_spec: &str, options: &ScanOptions) -> Result<ScanResult> {
    let address = resolve(target).await?;
    let ports = port::parse_ports(ports_spec)?;
    if ports.is_empty() {
        return Err(Error::Scan("no valid ports specified".into()));
    }

    info!(
        "Starting {:?} scan on {} ({}) for {} ports",
        options.profile,
        target,
        address,
        ports.len()
    );

    let open = port::scan_ports(address, &ports, options).await;

    let mut open_ports = Vec::with_capacity(open.len());
    for p in open {
        let entry = if options.profile.grab_banners() {
            service::identify(address, p, options.timeout).await
        } else {
            OpenPort {
                port: p,
                service: service::default_service(p).to_string(),
                banner: None,
                version: None,
            }
        };
        open_ports.push(entry);
    }

    Ok(ScanResult {
        target: target.to_string(),
        address,
        profile: options.profile,
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        ports_scanned: ports.len(),
        open_ports,
    })
}

async fn resolve(target: &str) -> Result<IpAddr> {
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(ip);
    }

    let mut addrs = tokio::net::lookup_host((target, 0))
        .await
        .map_err(|e| Error::Scan(format!("cannot resolve {}: {}", target, e)))?;

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| Error::Scan(format!("no address found for {}", target)))
}
