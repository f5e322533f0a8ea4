use std::sync::Arc;

use caravan_core::store::HotelStore;
use caravan_core::supplier::{FlightSupplier, RatehawkSupplier, TboSupplier};

/// Readiness labels reported by `/health`, fixed at startup.
#[derive(Clone)]
pub struct ProviderHealth {
    pub store: &'static str,
    pub ratehawk: &'static str,
    pub tbo: &'static str,
    pub duffel: &'static str,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HotelStore>,
    pub ratehawk: Arc<dyn RatehawkSupplier>,
    pub tbo: Arc<dyn TboSupplier>,
    pub flights: Arc<dyn FlightSupplier>,
    pub health: ProviderHealth,
}
