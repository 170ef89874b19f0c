use log::{LevelFilter, info};
use std::path::Path;
use std::fs::File;
use std::io::Write;
use chrono::Local;
use env_logger::{Builder, Target};

/// 根据命令行选项选择日志级别
pub fn level_for(verbose: bool, silent: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if silent {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    }
}

pub fn init(verbose: bool, silent: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(level_for(verbose, silent));

    if let Some(log_path) = log_file {
        let file = File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(file)));
    } else {
        // 进度条占用stdout，日志走stderr
        builder.target(Target::Stderr);
    }

    builder.format(|buf, record| {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(
            buf,
            "[{}] [{}] {}",
            timestamp,
            record.level(),
            record.args()
        )
    });

    builder.try_init()?;

    if let Some(log_path) = log_file {
        info!("Logging to file: {}", log_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_silent() {
        assert_eq!(level_for(true, true), LevelFilter::Debug);
        assert_eq!(level_for(false, true), LevelFilter::Error);
        assert_eq!(level_for(false, false), LevelFilter::Info);
    }
}
