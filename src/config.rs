use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::category_logger::DEFAULT_FLUSH_INTERVAL;

/// Baud rate used when none is given on the command line.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Default serial read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug, Clone)]
#[command(name = "sentence_logger")]
#[command(about = "Serial port data logger for NMEA, AIS and debug sentences")]
pub struct CliArgs {
    #[arg(help = "Serial port device (e.g., /dev/ttyUSB0)")]
    pub serial_port: String,

    #[arg(
        short = 'b',
        long = "baud_rate",
        default_value_t = DEFAULT_BAUD_RATE,
        help = "Serial port baud rate"
    )]
    pub baud_rate: u32,

    #[arg(long, default_value = ".", help = "Directory the run logs are written to")]
    pub log_dir: PathBuf,

    #[arg(long, default_value_t = 1_000, help = "Serial read timeout in milliseconds")]
    pub read_timeout_ms: u64,

    #[arg(long, default_value_t = 5, help = "Seconds between flushes of the run logs")]
    pub flush_interval_secs: u64,

    #[arg(long, help = "Do not draw the live terminal view")]
    pub no_display: bool,
}

impl CliArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}

/// Resolved settings for one logging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub serial_port: String,
    pub baud_rate: u32,
    pub log_dir: PathBuf,
    pub read_timeout: Duration,
    pub flush_interval: Duration,
    pub display: bool,
}

impl LoggerConfig {
    pub fn new(serial_port: impl Into<String>) -> Self {
        Self {
            serial_port: serial_port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            log_dir: PathBuf::from("."),
            read_timeout: DEFAULT_READ_TIMEOUT,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            display: true,
        }
    }
}

impl From<CliArgs> for LoggerConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            serial_port: args.serial_port,
            baud_rate: args.baud_rate,
            log_dir: args.log_dir,
            read_timeout: Duration::from_millis(args.read_timeout_ms),
            flush_interval: Duration::from_secs(args.flush_interval_secs),
            display: !args.no_display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> LoggerConfig {
        CliArgs::try_parse_from(args).unwrap().into()
    }

    #[test]
    fn test_defaults_match_builder() {
        let config = parse(&["sentence_logger", "/dev/ttyUSB0"]);
        assert_eq!(config, LoggerConfig::new("/dev/ttyUSB0"));
    }

    #[test]
    fn test_baud_rate_short_and_long() {
        assert_eq!(parse(&["sentence_logger", "/dev/ttyS0", "-b", "9600"]).baud_rate, 9_600);
        assert_eq!(
            parse(&["sentence_logger", "/dev/ttyS0", "--baud_rate", "115200"]).baud_rate,
            115_200
        );
    }

    #[test]
    fn test_optional_flags() {
        let config = parse(&[
            "sentence_logger",
            "COM3",
            "--log-dir",
            "/tmp/runs",
            "--read-timeout-ms",
            "250",
            "--flush-interval-secs",
            "2",
            "--no-display",
        ]);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/runs"));
        assert_eq!(config.read_timeout, Duration::from_millis(250));
        assert_eq!(config.flush_interval, Duration::from_secs(2));
        assert!(!config.display);
    }

    #[test]
    fn test_serial_port_is_required() {
        assert!(CliArgs::try_parse_from(["sentence_logger"]).is_err());
    }
}
