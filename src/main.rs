// src/main.rs
use std::path::Path;
use std::process;
use clap::Parser;
use colored::*;
use log::error;

use pentest_rs::brute::{
    AttemptOutcome, BruteForceEngine, BruteForceSession, CancelHandle, ProbeTarget, SessionState,
    SshProbe,
};
use pentest_rs::cli::{BruteArgs, Cli, Command, ScanArgs, Service};
use pentest_rs::common::{banner, logger, utils};
use pentest_rs::output::{report, FileRecorder};
use pentest_rs::scanner;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose, cli.silent, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if !cli.no_banner && !cli.silent {
        banner::show();
    }

    let result = match &cli.command {
        Command::Brute(args) => handle_brute(args, &cli.results_dir).await,
        Command::Scan(args) => handle_scan(args, &cli.results_dir).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("{}", format!("[!] Error: {:#}", e).red());
        process::exit(1);
    }
}

async fn handle_brute(args: &BruteArgs, results_dir: &Path) -> anyhow::Result<()> {
    // 字典读取失败直接返回，不发起任何尝试
    let source = args.credential_source()?;
    let target = ProbeTarget::new(args.target.clone(), args.port);

    let probe = match args.service {
        Service::Ssh => SshProbe::new(),
    };
    let mut engine = BruteForceEngine::new(probe).with_config(args.engine_config());
    if !args.no_save {
        engine = engine.with_recorder(FileRecorder::new(results_dir));
    }

    println!("{}", format!("[*] Starting SSH brute force attack on {}", target).blue());
    println!("{}", format!("[*] Loaded {}", source.describe()).blue());
    if source.len() > 1000 {
        println!("{}", "[*] This may take some time...".yellow());
    }

    let cancel = CancelHandle::new();
    let on_ctrl_c = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let pb = utils::create_progress_bar(source.len() as u64, "Trying credentials");
    let session = engine
        .run(target, &source, &cancel, |progress| {
            pb.set_position(progress.index as u64);
            if let AttemptOutcome::NetworkError(detail) = progress.outcome {
                pb.println(format!("[!] {} ({}): {}", progress.index, progress.credential.username, detail).yellow().to_string());
            }
            if cancel.is_cancelled() {
                pb.set_message("Cancelling after current attempt...");
            }
        })
        .await;
    pb.finish_and_clear();
    signal_task.abort();

    print_summary(&session);
    Ok(())
}

fn print_summary(session: &BruteForceSession) {
    match session.state {
        SessionState::Found => {
            if let Some(credential) = &session.found {
                println!("\n{}", "[+] Success! Found valid credentials:".green());
                println!("{}", format!("[+] Username: {}", credential.username).green());
                println!("{}", format!("[+] Password: {}", credential.password).green());
            }
            if let Some(path) = &session.artifact {
                println!("\n{}", format!("[*] Results saved to {}", path.display()).blue());
            }
            if let Some(e) = &session.persistence_error {
                println!("\n{}", format!("[!] Warning: could not save results: {}", e).yellow());
            }
        }
        SessionState::Exhausted => {
            println!("\n{}", format!("[!] Failed to find valid credentials for {}", session.target).red());
            if session.attempts > 0 && session.network_errors == session.attempts {
                println!("{}", "[!] Every attempt failed with a network error; the target may be unreachable".red());
            }
        }
        SessionState::Aborted => {
            println!("\n{}", "[!] Operation cancelled by user".red());
        }
        SessionState::Idle | SessionState::Running => {}
    }

    println!(
        "{}",
        format!(
            "[*] Attempts: {}/{}, rejected: {}, network errors: {}, elapsed: {:.2}s",
            session.attempts,
            session.total,
            session.auth_failures,
            session.network_errors,
            session.elapsed.as_secs_f64()
        )
        .blue()
    );
}

async fn handle_scan(args: &ScanArgs, results_dir: &Path) -> anyhow::Result<()> {
    let ports = args.ports_spec();
    println!("{}", format!("[*] Starting {:?} scan on {} for ports {}...", args.scan_type, args.target, ports).blue());

    let result = scanner::run_scan(&args.target, ports, &args.options()).await?;

    println!("\n{}", format!("[+] Scan Results for {} ({}):", result.target, result.address).green());
    if result.open_ports.is_empty() {
        println!("{}", "[!] No open ports found".red());
    }
    for open in &result.open_ports {
        let mut info = open.service.clone();
        if let Some(version) = &open.version {
            info.push_str(&format!(" ({})", version));
        }
        println!("{}", format!("[+] Port {}/tcp: open - {}", open.port, info).green());
    }

    match report::save_scan(results_dir, &result) {
        Ok(path) => println!("\n{}", format!("[*] Results saved to {}", path.display()).blue()),
        Err(e) => println!("\n{}", format!("[!] Warning: {}", e).yellow()),
    }

    Ok(())
}
