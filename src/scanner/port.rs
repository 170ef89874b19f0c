use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use log::debug;
use crate::common::utils;
use crate::error::{Error, Result};
use super::ScanOptions;

/// 扫描单个地址的一组端口，返回开放端口(升序)
pub async fn scan_ports(ip: IpAddr, ports: &[u16], options: &ScanOptions) -> Vec<u16> {
    if ports.is_empty() {
        return Vec::new();
    }

    let workers = options.profile.workers(options.threads);
    let pacing = options.profile.pacing();
    let timeout_duration = options.timeout;

    let pb = utils::create_progress_bar(ports.len() as u64, "Scanning ports");
    let (tx, mut rx) = mpsc::channel(workers);

    // 分块处理
    let chunk_size = (ports.len() + workers - 1) / workers;
    let chunks: Vec<Vec<u16>> = ports
        .chunks(chunk_size)
        .map(|chunk| chunk.to_vec())
        .collect();

    for chunk in chunks {
        let tx = tx.clone();
        let pb = pb.clone();

        tokio::spawn(async move {
            for port in chunk {
                if check_port(ip, port, timeout_duration).await {
                    let _ = tx.send(port).await;
                }
                pb.inc(1);
                if !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                }
            }
        });
    }

    // 丢弃原始发送者
    drop(tx);

    let mut open_ports = Vec::new();
    while let Some(port) = rx.recv().await {
        open_ports.push(port);
    }
    open_ports.sort_unstable();

    pb.finish_with_message(format!("Found {} open ports", open_ports.len()));

    open_ports
}

/// 从字符串解析端口列表 (e.g. `22`, `1-1000`, `22,80,8000-8100`)
pub fn parse_ports(ports_str: &str) -> Result<Vec<u16>> {
    let mut ports = Vec::new();

    for part in ports_str.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_port(start)?;
            let end = parse_port(end)?;
            if start > end {
                return Err(Error::Scan(format!("invalid port range: {}", part)));
            }
            ports.extend(start..=end);
        } else {
            ports.push(parse_port(part)?);
        }
    }

    // 去重
    ports.sort_unstable();
    ports.dedup();

    Ok(ports)
}

fn parse_port(s: &str) -> Result<u16> {
    match s.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(Error::Scan(format!("invalid port: {}", s.trim()))),
        Ok(port) => Ok(port),
    }
}

async fn check_port(ip: IpAddr, port: u16, timeout_duration: Duration) -> bool {
    let addr = SocketAddr::new(ip, port);
    let result = timeout(timeout_duration, TcpStream::connect(addr)).await;

    match result {
        Ok(Ok(_)) => {
            debug!("Found open port {}:{}", ip, port);
            true
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lists_and_ranges() {
        assert_eq!(parse_ports("22").unwrap(), vec![22]);
        assert_eq!(parse_ports("80, 22,20-23").unwrap(), vec![20, 21, 22, 23, 80]);
        assert_eq!(parse_ports("1-1000").unwrap().len(), 1000);
    }

    #[test]
    fn rejects_bad_specs() {
        assert!(parse_ports("0").is_err());
        assert!(parse_ports("70000").is_err());
        assert!(parse_ports("100-10").is_err());
        assert!(parse_ports("ssh").is_err());
    }
}
