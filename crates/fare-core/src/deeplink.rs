//! Deep-link builders
//!
//! Pure string transforms from a route to per-service URLs. Every
//! user-supplied text segment is percent-encoded so downstream consumers
//! always receive syntactically valid URLs, including for addresses with
//! commas, slashes or non-ASCII text. No network or browser interaction.

use serde::{Deserialize, Serialize};
use serde_json::json;
use urlencoding::encode;

use crate::model::Route;
use crate::Result;

/// App-oriented deep links, one per service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLinks {
    pub ola: String,
    pub uber: String,
    pub rapido: String,
    pub nammayatri: String,
}

/// Web booking links for the services that expose one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingLinks {
    pub uber: String,
    pub ola: String,
    pub rapido: String,
}

/// Build the app deep link for each service.
///
/// Uber gets its native app URI when usable coordinates are present and a
/// mobile-web fallback otherwise. Zero coordinates count as absent: they
/// are what callers send when geocoding failed.
pub fn app_links(route: &Route) -> DeepLinks {
    let pickup = encode(&route.pickup);
    let drop = encode(&route.drop);

    let has_coords = [
        route.pickup_lat,
        route.pickup_lng,
        route.drop_lat,
        route.drop_lng,
    ]
    .iter()
    .all(|v| v.is_finite() && *v != 0.0);

    let uber = if has_coords {
        format!(
            "uber://?action=setPickup&pickup[latitude]={}&pickup[longitude]={}&dropoff[latitude]={}&dropoff[longitude]={}",
            route.pickup_lat, route.pickup_lng, route.drop_lat, route.drop_lng
        )
    } else {
        format!(
            "https://m.uber.com/ul/?action=setPickup&pickup=my_location&dropoff={}",
            drop
        )
    };

    DeepLinks {
        ola: format!("https://book.olacabs.com/?pickup={}&drop={}", pickup, drop),
        uber,
        rapido: format!("https://www.rapido.bike/ride?pickup={}&drop={}", pickup, drop),
        nammayatri: format!("nammayatri://ride?pickup={}&drop={}", pickup, drop),
    }
}

/// Build the richer web booking links.
///
/// Uber's mobile web accepts full place objects, JSON-encoded into the
/// query string, with the address split on its first comma.
pub fn booking_links(route: &Route) -> Result<BookingLinks> {
    let uber_pickup = place_object(&route.pickup, route.pickup_lat, route.pickup_lng);
    let uber_drop = place_object(&route.drop, route.drop_lat, route.drop_lng);

    let uber = format!(
        "https://m.uber.com/looking?pickup={}&drop[0]={}",
        encode(&serde_json::to_string(&uber_pickup)?),
        encode(&serde_json::to_string(&uber_drop)?),
    );

    let ola = format!(
        "https://book.olacabs.com/?pickup_name={}&lat={}&lng={}&drop_lat={}&drop_lng={}&drop_name={}",
        encode(&route.pickup),
        route.pickup_lat,
        route.pickup_lng,
        route.drop_lat,
        route.drop_lng,
        encode(&route.drop),
    );

    let rapido = format!(
        "https://m.rapido.bike/unup-home/seo/{}/{}?version=v3",
        encode(&route.pickup),
        encode(&route.drop),
    );

    Ok(BookingLinks { uber, ola, rapido })
}

fn place_object(address: &str, lat: f64, lng: f64) -> serde_json::Value {
    let (line1, line2) = match address.split_once(',') {
        Some((head, rest)) => (head.trim(), rest.trim()),
        None => (address.trim(), ""),
    };
    json!({
        "addressLine1": line1,
        "addressLine2": line2,
        "fullAddress": address,
        "latitude": lat,
        "longitude": lng,
        "provider": "google_places",
    })
}
