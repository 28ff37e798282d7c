/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::detection::{
    DetectionContext, DetectionResult, OUT_OF_ROUTE_HIGH_DISTANCE_METERS,
    OVERSPEED_HIGH_MULTIPLIER,
};
use crate::common::types::*;
use crate::environment::AppState;
use crate::outbound::publisher::publish_event;
use crate::outbound::types::Topic;
use crate::tools::error::AppError;
use crate::tools::prometheus::ALERTS_EMITTED;
use actix_web::web::Data;
use chrono::Utc;
use tracing::error;
use uuid::Uuid;

/// Evaluates every registered detection handler against one appended trip
/// point. Checks are independent, so a single sample can emit zero, one or
/// two alerts. Any failure while persisting or publishing an alert is logged
/// and swallowed : alerting is best-effort and must never degrade the
/// availability of core tracking.
pub async fn check_trip_point(data: &Data<AppState>, trip: &Trip, sample: &DriverLocation) {
    let route = match data.routes.find(&trip.route_id).await {
        Ok(route) => route,
        Err(err) => {
            error!(tag = "[Route Lookup Failed]", error = %err.message());
            None
        }
    };

    let context = DetectionContext {
        driver_id: trip.driver_id.clone(),
        trip_id: trip.trip_id.clone(),
        route,
        location: sample.pt.clone(),
        timestamp: sample.ts,
        speed: sample.speed,
    };

    for handler in &data.detection_handlers {
        if !handler.is_enabled(&context) {
            continue;
        }
        if let Some(result) = handler.check(&context) {
            if let Err(err) = emit_alert(data, &context, result).await {
                error!(
                    tag = "[Alert Emission Failed]",
                    detection = handler.name(),
                    error = %err.message()
                );
            }
        }
    }
}

async fn emit_alert(
    data: &Data<AppState>,
    context: &DetectionContext,
    result: DetectionResult,
) -> Result<(), AppError> {
    let alert = build_alert(context, result);
    let alert = data.alerts.create(alert).await?;

    let (alert_type, severity) = (alert.alert_type.to_string(), alert.severity.to_string());
    ALERTS_EMITTED
        .with_label_values(&[alert_type.as_str(), severity.as_str()])
        .inc();
    publish_event(&*data.publisher, Topic::AlertNew, &alert);

    Ok(())
}

fn build_alert(context: &DetectionContext, result: DetectionResult) -> Alert {
    let base = Alert {
        alert_id: AlertId(Uuid::new_v4().to_string()),
        alert_type: AlertType::Other,
        driver_id: context.driver_id.clone(),
        trip_id: Some(context.trip_id.clone()),
        route_id: context.route.as_ref().map(|route| route.route_id.clone()),
        location: context.location.clone(),
        speed: None,
        speed_limit: None,
        distance_from_route: None,
        message: String::new(),
        severity: Severity::Medium,
        acknowledged: false,
        acknowledged_by: None,
        acknowledged_at: None,
        created_at: TimeStamp(Utc::now()),
    };

    match result {
        DetectionResult::OverspeedingDetected {
            speed, speed_limit, ..
        } => Alert {
            alert_type: AlertType::Overspeed,
            speed: Some(SpeedInKmPerHour(speed)),
            speed_limit: Some(SpeedInKmPerHour(speed_limit)),
            message: format!(
                "Driver exceeded speed limit: {speed:.1} km/h (limit: {speed_limit:.1} km/h)"
            ),
            severity: if speed > speed_limit * OVERSPEED_HIGH_MULTIPLIER {
                Severity::High
            } else {
                Severity::Medium
            },
            ..base
        },
        DetectionResult::OutOfRouteDetected {
            distance_from_route,
            ..
        } => Alert {
            alert_type: AlertType::OutOfRoute,
            distance_from_route: Some(distance_from_route),
            message: format!("Driver is out of route. Distance: {distance_from_route:.0}m"),
            severity: if distance_from_route > OUT_OF_ROUTE_HIGH_DISTANCE_METERS {
                Severity::High
            } else {
                Severity::Medium
            },
            ..base
        },
    }
}
