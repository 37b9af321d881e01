use std::path::PathBuf;

use clap::Parser;

/// Wayfarer browser view lifecycle host.
///
/// Reads UI commands as JSON lines on stdin and writes notifications as
/// JSON lines on stdout. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "wayfarer", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. `wayfarer=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Initial window content width.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial window content height.
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["wayfarer"]);
        assert_eq!(args.width, 1280.0);
        assert_eq!(args.height, 800.0);
        assert!(args.config.is_none());
        assert!(!args.print_config);
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "wayfarer",
            "--config",
            "/tmp/w.toml",
            "--log-level",
            "wayfarer=debug",
            "--width",
            "800",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/w.toml")));
        assert_eq!(args.log_level.as_deref(), Some("wayfarer=debug"));
        assert_eq!(args.width, 800.0);
    }
}
