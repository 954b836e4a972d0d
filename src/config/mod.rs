//! Configuration tables.
//!
//! The tool is fully interactive and keeps no config file; the only
//! configuration is the built-in table of known mail providers.

mod providers;

pub use providers::{
    detect, detection_banner, resolve_manual_entry, KnownProvider, ProviderResolution,
    KNOWN_PROVIDERS, MANUAL_PROVIDER_LABEL,
};
