//! CLI configuration: thin wrapper around `domotic_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--base-url, --timeout, --insecure).

use std::time::Duration;

use domotic_api::TlsMode;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use domotic_config::{
    Config, Profile, ResolvedProfile, config_path, load_config, load_config_or_default,
    save_config, storage_paths,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the active profile, then apply flag overrides.
///
/// Flags beat env vars, which beat the profile, which beats defaults.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<ResolvedProfile, CliError> {
    let mut resolved = domotic_config::resolve_profile(config, global.profile.as_deref())?;

    if let Some(ref base_url) = global.base_url {
        resolved.base_url.clone_from(base_url);
    }
    if let Some(secs) = global.timeout {
        resolved.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        resolved.tls = TlsMode::DangerAcceptInvalid;
    }

    Ok(resolved)
}
