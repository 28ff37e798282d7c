/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

pub static LOCATION_UPDATES: once_cell::sync::Lazy<IntCounter> = once_cell::sync::Lazy::new(|| {
    register_int_counter!("location_updates", "Ingested driver location samples")
        .expect("Failed to register location updates metrics")
});

pub static BULK_LOCATION_ERRORS: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!(
            "bulk_location_errors",
            "Rejected samples within bulk location batches"
        )
        .expect("Failed to register bulk location errors metrics")
    });

pub static TRIP_POINTS_APPENDED: once_cell::sync::Lazy<IntCounter> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter!("trip_points_appended", "Points appended to ongoing trips")
            .expect("Failed to register trip points metrics")
    });

pub static ALERTS_EMITTED: once_cell::sync::Lazy<IntCounterVec> =
    once_cell::sync::Lazy::new(|| {
        register_int_counter_vec!(
            "alerts_emitted",
            "Safety alerts emitted by the detection engine",
            &["type", "severity"]
        )
        .expect("Failed to register alerts emitted metrics")
    });

pub fn prometheus_metrics() -> PrometheusMetrics {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create prometheus middleware")
}
