//! # pentest-rs
//!
//! `pentest-rs` 是一个用Rust编写的渗透测试工具箱，仅用于已授权的测试。
//!
//! ## 特性
//!
//! * SSH口令爆破：单用户+密码字典、`username:password` 组合字典、用户名×密码字典
//! * 逐个顺序尝试，找到第一个有效凭证即停止，可配置尝试间隔
//! * TCP端口扫描 (basic / comprehensive / stealth)
//! * 结果保存到 `results/` 目录
//!
//! ## 用法
//!
//! ```text
//! # 单用户 + 密码字典
//! pentest-rs brute 192.168.1.10 -u root -P passwords.txt
//!
//! # 组合字典
//! pentest-rs brute 192.168.1.10 -C creds.txt -p 2222
//!
//! # 用户名字典 × 密码字典
//! pentest-rs brute 192.168.1.10 -U users.txt -P passwords.txt --delay-ms 250
//!
//! # 端口扫描
//! pentest-rs scan 192.168.1.10 -p 1-1024 -t comprehensive
//! ```

pub mod brute;
pub mod cli;
pub mod common;
pub mod error;
pub mod output;
pub mod scanner;

pub use error::{Error, Result};
