use tracing_subscriber::EnvFilter;

/// Workspace crate targets that receive log output.
const CRATE_TARGETS: &[&str] = &["montecarlo", "ar1_study", "ma1_study"];

/// Initialize tracing at `info` for the workspace crates.
///
/// `RUST_LOG` overrides the default filter if set.
pub fn init() {
    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}=info"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
