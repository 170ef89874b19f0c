use colored::*;

pub fn show() {
    let banner = r#"
    ██████╗ ███████╗███╗   ██╗████████╗███████╗███████╗████████╗
    ██╔══██╗██╔════╝████╗  ██║╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
    ██████╔╝█████╗  ██╔██╗ ██║   ██║   █████╗  ███████╗   ██║
    ██╔═══╝ ██╔══╝  ██║╚██╗██║   ██║   ██╔══╝  ╚════██║   ██║
    ██║     ███████╗██║ ╚████║   ██║   ███████╗███████║   ██║
    ╚═╝     ╚══════╝╚═╝  ╚═══╝   ╚═╝   ╚══════╝╚══════╝   ╚═╝
    "#;

    println!("{}", banner.bright_red());
    println!("    {}", "Penetration Testing Toolkit".bright_green());
    println!("    {}", "Network Scanning & SSH Brute Force".bright_yellow());
    println!("    {}", format!("Version: {}", env!("CARGO_PKG_VERSION")).bright_yellow());
    println!("    {}", "Use only against systems you are authorized to test".bright_yellow());
    println!();
}
