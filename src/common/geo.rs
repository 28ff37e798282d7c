/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::types::*;
use std::f64::consts::PI;

fn deg2rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Great-circle distance between two points in meters, haversine formula.
pub fn distance_between_in_meters(latlong1: &Point, latlong2: &Point) -> f64 {
    // Radius of Earth in meters
    let r: f64 = 6371000.0;

    let Latitude(lat1) = latlong1.lat;
    let Longitude(lon1) = latlong1.lon;
    let Latitude(lat2) = latlong2.lat;
    let Longitude(lon2) = latlong2.lon;

    let dlat = deg2rad(lat2 - lat1);
    let dlon = deg2rad(lon2 - lon1);

    let rlat1 = deg2rad(lat1);
    let rlat2 = deg2rad(lat2);

    let sq = |x: f64| x * x;

    // Calculated distance is real (not imaginary) when 0 <= h <= 1
    // Ideally in our use case h wouldn't go out of bounds
    let h = sq((dlat / 2.0).sin()) + rlat1.cos() * rlat2.cos() * sq((dlon / 2.0).sin());

    2.0 * r * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sum of pairwise haversine distances over consecutive trail points.
/// A trail of fewer than 2 points has no extent, so 0.
pub fn total_distance(points: &[TripPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|pair| distance_between_in_meters(&pair[0].pt, &pair[1].pt))
        .sum()
}

fn reported_speeds(points: &[TripPoint]) -> Vec<f64> {
    points
        .iter()
        .filter_map(|point| point.speed)
        .map(|SpeedInKmPerHour(speed)| speed)
        .filter(|speed| *speed > 0.0)
        .collect()
}

/// Average speed over a trail in km/h.
///
/// Prefers the mean of reported positive speeds. When no point carries a
/// usable speed, falls back to trail distance over elapsed time between the
/// first and last fix. Trails with fewer than 2 points or zero elapsed time
/// average to 0.
pub fn average_speed(points: &[TripPoint]) -> SpeedInKmPerHour {
    if points.len() < 2 {
        return SpeedInKmPerHour(0.0);
    }

    let speeds = reported_speeds(points);

    if speeds.is_empty() {
        let TimeStamp(first) = points[0].ts;
        let TimeStamp(last) = points[points.len() - 1].ts;
        let distance_km = total_distance(points) / 1000.0;
        let elapsed_hours = (last - first).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0);
        if elapsed_hours > 0.0 {
            return SpeedInKmPerHour(distance_km / elapsed_hours);
        }
        return SpeedInKmPerHour(0.0);
    }

    SpeedInKmPerHour(speeds.iter().sum::<f64>() / speeds.len() as f64)
}

/// Maximum reported positive speed over a trail in km/h, 0 when none.
pub fn max_speed(points: &[TripPoint]) -> SpeedInKmPerHour {
    SpeedInKmPerHour(
        reported_speeds(points)
            .into_iter()
            .fold(0.0, f64::max),
    )
}
