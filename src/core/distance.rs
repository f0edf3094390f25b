use crate::error::{RecommendError, RecommendResult};
use crate::models::VenueAttributes;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
///
/// Coordinates are not range-checked. Floating error can push the inner
/// term just outside [0, 1] (negative for mirrored out-of-range latitudes),
/// so it is clamped before `sqrt` and `asin`.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Select the venues lying within `radius_km` of a center point
///
/// The boundary is inclusive and input order is preserved. A radius of
/// zero keeps only venues sitting exactly on the center.
///
/// # Errors
/// `InvalidArgument` when the radius is negative or not a number.
pub fn select_near(
    venues: &[VenueAttributes],
    center_lat: f64,
    center_lng: f64,
    radius_km: f64,
) -> RecommendResult<Vec<VenueAttributes>> {
    if radius_km.is_nan() || radius_km < 0.0 {
        return Err(RecommendError::InvalidArgument(format!(
            "radius must be non-negative, got {}",
            radius_km
        )));
    }

    Ok(venues
        .iter()
        .filter(|venue| is_within_radius(venue, center_lat, center_lng, radius_km))
        .cloned()
        .collect())
}

#[inline]
fn is_within_radius(venue: &VenueAttributes, lat: f64, lng: f64, radius_km: f64) -> bool {
    haversine_distance(lat, lng, venue.latitude, venue.longitude) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Ambience, BudgetTier, InstaWorthiness, Lighting, NoiseLevel, SeatingStyle, WifiQuality,
    };

    fn venue_at(id: &str, latitude: f64, longitude: f64) -> VenueAttributes {
        VenueAttributes {
            venue_id: id.to_string(),
            name: format!("Cafe {}", id),
            latitude,
            longitude,
            budget_tier: BudgetTier::Mid,
            ambience: Ambience::Cozy,
            noise_level: NoiseLevel::Moderate,
            lighting: Lighting::Natural,
            seating_style: SeatingStyle::Tables,
            work_friendly: false,
            wifi_quality: WifiQuality::Good,
            pet_friendly: false,
            insta_worthiness: InstaWorthiness::Low,
            plug_available: false,
        }
    }

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 180.0);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_coordinates_do_not_crash() {
        let distance = haversine_distance(120.0, 400.0, -95.0, -200.0);
        assert!(distance.is_finite());
        assert!(distance >= 0.0);
    }

    #[test]
    fn test_mirrored_out_of_range_latitude_is_the_same_point() {
        // (100, 0) lies past the pole, on top of (80, 180)
        let distance = haversine_distance(100.0, 0.0, 80.0, 180.0);
        assert!(distance.is_finite(), "got {}", distance);
        assert!(distance < 0.01, "got {}", distance);

        let mut lat = 90.001;
        while lat < 101.0 {
            let distance = haversine_distance(lat, 0.0, 180.0 - lat, 180.0);
            assert!(distance.is_finite(), "NaN for lat {}", lat);
            lat += 0.0137;
        }

        let venues = vec![venue_at("over-the-pole", 80.0, 180.0)];
        let near = select_near(&venues, 100.0, 0.0, 1.0).unwrap();
        assert_eq!(near.len(), 1);
    }

    #[test]
    fn test_select_near_filters_by_radius() {
        // Bengaluru MG Road, Indiranagar (~3.5km), Mysuru (~125km)
        let venues = vec![
            venue_at("mg-road", 12.9756, 77.6066),
            venue_at("indiranagar", 12.9784, 77.6408),
            venue_at("mysuru", 12.2958, 76.6394),
        ];

        let near = select_near(&venues, 12.9756, 77.6066, 5.0).unwrap();
        let ids: Vec<&str> = near.iter().map(|v| v.venue_id.as_str()).collect();
        assert_eq!(ids, vec!["mg-road", "indiranagar"]);
    }

    #[test]
    fn test_zero_radius_keeps_coincident_points_only() {
        let venues = vec![venue_at("here", 12.9756, 77.6066), venue_at("there", 12.9757, 77.6066)];

        let near = select_near(&venues, 12.9756, 77.6066, 0.0).unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].venue_id, "here");
    }

    #[test]
    fn test_negative_radius_is_rejected() {
        let result = select_near(&[], 0.0, 0.0, -1.0);
        assert!(matches!(result, Err(RecommendError::InvalidArgument(_))));

        let result = select_near(&[], 0.0, 0.0, f64::NAN);
        assert!(matches!(result, Err(RecommendError::InvalidArgument(_))));
    }
}
