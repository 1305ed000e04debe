use clap::Parser;

/// Parley: a terminal client for a conversational assistant service.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter directive (e.g. `parley=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Assistant service base URL, overriding `server.base_url`.
    #[arg(long)]
    pub server: Option<String>,

    /// Probe the service health endpoint and exit.
    #[arg(long)]
    pub health: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::parse_from([
            "parley",
            "--config",
            "/tmp/parley.toml",
            "--log-level",
            "parley=debug",
            "--server",
            "http://example.com/api/v1",
            "--health",
        ]);
        assert_eq!(args.config.as_deref(), Some("/tmp/parley.toml"));
        assert_eq!(args.log_level.as_deref(), Some("parley=debug"));
        assert_eq!(args.server.as_deref(), Some("http://example.com/api/v1"));
        assert!(args.health);
    }

    #[test]
    fn defaults_are_empty() {
        let args = Args::parse_from(["parley"]);
        assert!(args.config.is_none());
        assert!(args.server.is_none());
        assert!(!args.health);
    }
}
