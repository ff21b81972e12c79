//! Service profiles
//!
//! One module per supported service. Each exposes `profile()`, the full
//! per-service configuration the generic agent runs with.

pub mod nammayatri;
pub mod ola;
pub mod rapido;
pub mod uber;

use fare_core::ServiceKind;

use crate::profile::ServiceProfile;

/// Profile for one service
pub fn profile_for(service: ServiceKind) -> ServiceProfile {
    match service {
        ServiceKind::Ola => ola::profile(),
        ServiceKind::Uber => uber::profile(),
        ServiceKind::Rapido => rapido::profile(),
        ServiceKind::NammaYatri => nammayatri::profile(),
    }
}

/// Profiles for a configured service list, preserving its order
pub fn profiles_for(services: &[ServiceKind]) -> Vec<ServiceProfile> {
    services.iter().copied().map(profile_for).collect()
}

/// Profiles for every supported service, in the default comparison order
pub fn default_profiles() -> Vec<ServiceProfile> {
    profiles_for(&ServiceKind::ALL)
}
