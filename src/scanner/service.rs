use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use log::debug;
use lazy_static::lazy_static;
use regex::Regex;
use super::OpenPort;

lazy_static! {
    // 横幅匹配规则: (服务名, 正则, 版本所在分组)
    static ref BANNER_PATTERNS: Vec<(&'static str, Regex)> = vec![
        ("ssh", Regex::new(r"^SSH-\d+\.\d+-([^\r\n]+)").unwrap()),
        ("http", Regex::new(r"(?is)^HTTP/\d\.\d.*?\r?\nServer: ([^\r\n]+)").unwrap()),
        ("ftp", Regex::new(r"^220[ -](.*FTP[^\r\n]*)").unwrap()),
        ("smtp", Regex::new(r"^220[ -]([^\r\n]*E?SMTP[^\r\n]*)").unwrap()),
        ("pop3", Regex::new(r"^\+OK ?([^\r\n]*)").unwrap()),
        ("imap", Regex::new(r"^\* OK ?([^\r\n]*IMAP[^\r\n]*)").unwrap()),
    ];
}

/// 常见端口的默认服务名
pub fn default_service(port: u16) -> &'static str {
    match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "dns",
        80 | 8080 => "http",
        110 => "pop3",
        143 => "imap",
        443 | 8443 => "https",
        445 => "smb",
        1433 => "mssql",
        3306 => "mysql",
        3389 => "rdp",
        5432 => "postgresql",
        6379 => "redis",
        27017 => "mongodb",
        _ => "unknown",
    }
}

/// 根据横幅识别服务和版本
pub fn match_banner(banner: &str) -> Option<(&'static str, Option<String>)> {
    BANNER_PATTERNS.iter().find_map(|(service, re)| {
        re.captures(banner).map(|caps| {
            let version = caps.get(1).map(|m| m.as_str().trim().to_string());
            (*service, version.filter(|v| !v.is_empty()))
        })
    })
}

/// 连接开放端口并抓取横幅
pub async fn identify(ip: IpAddr, port: u16, timeout_duration: Duration) -> OpenPort {
    let mut entry = OpenPort {
        port,
        service: default_service(port).to_string(),
        banner: None,
        version: None,
    };

    let banner = match grab_banner(ip, port, timeout_duration).await {
        Some(banner) if !banner.is_empty() => banner,
        _ => return entry,
    };
    debug!("Received banner from {}:{} ({} bytes)", ip, port, banner.len());

    if let Some((service, version)) = match_banner(&banner) {
        entry.service = service.to_string();
        entry.version = version;
    }
    entry.banner = Some(banner.lines().next().unwrap_or_default().to_string());

    entry
}

async fn grab_banner(ip: IpAddr, port: u16, timeout_duration: Duration) -> Option<String> {
    let mut stream = timeout(timeout_duration, TcpStream::connect(SocketAddr::new(ip, port)))
        .await
        .ok()?
        .ok()?;

    let mut buffer = vec![0u8; 1024];

    // 有些服务会主动发送横幅
    if let Ok(Ok(n)) = timeout(timeout_duration, stream.read(&mut buffer)).await {
        if n > 0 {
            return Some(String::from_utf8_lossy(&buffer[..n]).to_string());
        }
    }

    // 没有横幅时发一个HTTP探针
    stream.write_all(b"HEAD / HTTP/1.0\r\n\r\n").await.ok()?;
    match timeout(timeout_duration, stream.read(&mut buffer)).await {
        Ok(Ok(n)) if n > 0 => Some(String::from_utf8_lossy(&buffer[..n]).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn ssh_banner_yields_version() {
        let (service, version) = match_banner("SSH-2.0-OpenSSH_8.9p1 Ubuntu-3\r\n").unwrap();
        assert_eq!(service, "ssh");
        assert_eq!(version.as_deref(), Some("OpenSSH_8.9p1 Ubuntu-3"));
    }

    #[test]
    fn http_server_header_is_extracted() {
        let banner = "HTTP/1.1 200 OK\r\nDate: today\r\nServer: nginx/1.24.0\r\n\r\n";
        let (service, version) = match_banner(banner).unwrap();
        assert_eq!(service, "http");
        assert_eq!(version.as_deref(), Some("nginx/1.24.0"));
    }

    #[test]
    fn unknown_banner_does_not_match() {
        assert!(match_banner("hello there").is_none());
        assert_eq!(default_service(22), "ssh");
        assert_eq!(default_service(12345), "unknown");
    }

    #[tokio::test]
    async fn identify_reads_greeting() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let _ = socket.write_all(b"SSH-2.0-TestServer_1.0\r\n").await;
            }
        });

        let entry = identify("127.0.0.1".parse().unwrap(), port, Duration::from_secs(2)).await;
        assert_eq!(entry.service, "ssh");
        assert_eq!(entry.version.as_deref(), Some("TestServer_1.0"));
        assert_eq!(entry.banner.as_deref(), Some("SSH-2.0-TestServer_1.0"));
    }
}
