use std::process::{Command, Stdio};

/// Reports whether a camera's host can be reached at all.
///
/// The probe runs before any HTTP traffic; an unreachable camera is skipped
/// entirely.
pub(crate) trait ReachabilityProbe {
    fn is_reachable(&self, host: &str) -> bool;
}

/// Probes with a single system `ping`
pub(crate) struct PingProbe;

impl ReachabilityProbe for PingProbe {
    fn is_reachable(&self, host: &str) -> bool {
        // Addresses may carry a port, ping wants the bare host
        let host = host.split(':').next().unwrap_or(host);
        Command::new("ping")
            .arg("-c")
            .arg("1")
            .arg(host)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}
