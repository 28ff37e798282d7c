/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::geo::distance_between_in_meters;
use super::types::*;

fn to_point(vertex: &GeoVertex) -> Point {
    Point {
        lat: Latitude(vertex[0]),
        lon: Longitude(vertex[1]),
    }
}

/// Ray-casting parity test over an ordered ring of [lat, lon] vertices.
/// The ring is treated as a flat 2-D polygon in the lat/lon plane, consistent
/// with how fences are authored. Rings with fewer than 3 vertices contain
/// nothing.
pub fn point_in_polygon(Latitude(lat): Latitude, Longitude(lon): Longitude, ring: &[GeoVertex]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];

        let intersect =
            ((yi > lon) != (yj > lon)) && lat < (xj - xi) * (lon - yi) / (yj - yi) + xi;

        if intersect {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inside iff the haversine distance to the center is within the radius,
/// boundary inclusive.
pub fn point_in_circle(lat: Latitude, lon: Longitude, circle: &CircleBounds) -> bool {
    let distance =
        distance_between_in_meters(&Point { lat, lon }, &to_point(&circle.center));
    distance <= circle.radius
}

/// Whether a point lies within the route's allowed region.
///
/// Fail-open : no fence and unknown fence kinds are "inside". Tracking is
/// never blocked by missing or bad fence config, a route without a fence
/// simply produces no out-of-route alerts.
pub fn check_geofence(lat: Latitude, lon: Longitude, geofence: Option<&Geofence>) -> bool {
    match geofence {
        Some(Geofence::Polygon(ring)) => point_in_polygon(lat, lon, ring),
        Some(Geofence::Circle(circle)) => point_in_circle(lat, lon, circle),
        Some(Geofence::Unknown) | None => true,
    }
}

/// Distance in meters from a point to the fence boundary, 0 if inside or if
/// there is no evaluable fence.
///
/// For polygons this is the minimum haversine distance to any fence *vertex*,
/// not to the nearest edge. The approximation overestimates near long edges
/// but is kept deliberately : it only feeds alert-severity bucketing, which
/// does not need precise boundary metrics.
pub fn distance_from_geofence(lat: Latitude, lon: Longitude, geofence: Option<&Geofence>) -> f64 {
    if check_geofence(lat, lon, geofence) {
        return 0.0;
    }

    let point = Point { lat, lon };

    match geofence {
        Some(Geofence::Circle(circle)) => {
            let distance = distance_between_in_meters(&point, &to_point(&circle.center));
            (distance - circle.radius).max(0.0)
        }
        Some(Geofence::Polygon(ring)) => ring
            .iter()
            .map(|vertex| distance_between_in_meters(&point, &to_point(vertex)))
            .fold(f64::INFINITY, f64::min),
        Some(Geofence::Unknown) | None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_around_origin() -> Geofence {
        Geofence::Polygon(vec![
            [-1.0, -1.0],
            [-1.0, 1.0],
            [1.0, 1.0],
            [1.0, -1.0],
        ])
    }

    #[test]
    fn polygon_contains_interior_point_and_excludes_exterior() {
        let Geofence::Polygon(ring) = square_around_origin() else {
            unreachable!()
        };

        assert!(point_in_polygon(Latitude(0.0), Longitude(0.0), &ring));
        assert!(point_in_polygon(Latitude(0.9), Longitude(-0.9), &ring));
        assert!(!point_in_polygon(Latitude(2.0), Longitude(0.0), &ring));
        assert!(!point_in_polygon(Latitude(0.0), Longitude(-3.0), &ring));
    }

    #[test]
    fn degenerate_ring_contains_nothing() {
        assert!(!point_in_polygon(
            Latitude(0.0),
            Longitude(0.0),
            &[[0.0, 0.0], [1.0, 1.0]]
        ));
        assert!(!point_in_polygon(Latitude(0.0), Longitude(0.0), &[]));
    }

    #[test]
    fn circle_membership_is_boundary_inclusive() {
        let center = Point {
            lat: Latitude(0.0),
            lon: Longitude(0.0),
        };
        let on_boundary = Point {
            lat: Latitude(0.0),
            lon: Longitude(0.01),
        };
        let radius = distance_between_in_meters(&center, &on_boundary);
        let circle = CircleBounds {
            center: [0.0, 0.0],
            radius,
        };

        assert!(point_in_circle(Latitude(0.0), Longitude(0.005), &circle));
        assert!(point_in_circle(on_boundary.lat, on_boundary.lon, &circle));
        assert!(!point_in_circle(Latitude(0.0), Longitude(0.011), &circle));
    }

    #[test]
    fn absent_and_unknown_fences_are_inside() {
        assert!(check_geofence(Latitude(89.0), Longitude(179.0), None));
        assert!(check_geofence(
            Latitude(89.0),
            Longitude(179.0),
            Some(&Geofence::Unknown)
        ));
        assert_eq!(
            distance_from_geofence(Latitude(89.0), Longitude(179.0), None),
            0.0
        );
    }

    #[test]
    fn unknown_fence_kind_survives_deserialization() {
        let fence: Geofence = serde_json::from_str(r#"{"type": "corridor"}"#)
            .expect("unknown fence kinds must deserialize");
        assert_eq!(fence, Geofence::Unknown);
    }

    #[test]
    fn circle_distance_is_distance_to_center_minus_radius() {
        let circle = CircleBounds {
            center: [0.0, 0.0],
            radius: 500.0,
        };
        let fence = Geofence::Circle(circle.clone());

        let point = Point {
            lat: Latitude(0.0),
            lon: Longitude(0.02),
        };
        let to_center = distance_between_in_meters(
            &point,
            &Point {
                lat: Latitude(0.0),
                lon: Longitude(0.0),
            },
        );

        let d = distance_from_geofence(point.lat, point.lon, Some(&fence));
        assert!((d - (to_center - circle.radius)).abs() < 1e-9);

        // Inside clamps to 0.
        assert_eq!(
            distance_from_geofence(Latitude(0.0), Longitude(0.001), Some(&fence)),
            0.0
        );
    }

    #[test]
    fn polygon_distance_uses_nearest_vertex() {
        let fence = square_around_origin();

        let outside = Point {
            lat: Latitude(1.5),
            lon: Longitude(1.0),
        };
        let nearest_vertex = Point {
            lat: Latitude(1.0),
            lon: Longitude(1.0),
        };

        let d = distance_from_geofence(outside.lat, outside.lon, Some(&fence));
        let expected = distance_between_in_meters(&outside, &nearest_vertex);
        assert!((d - expected).abs() < 1e-9);
    }
}
