/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use std::sync::Arc;

use crate::common::detection::{DetectionHandler, OverspeedingHandler, RouteDeviationHandler};
use crate::common::types::*;
use crate::outbound::publisher::BroadcastEventPublisher;
use crate::storage::{
    AlertRepository, InMemoryStore, LocationRepository, RouteRepository, TripRepository,
};
use crate::tools::logger::LoggerConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub workers: usize,
    pub logger_cfg: LoggerConfig,
    /// Overspeed threshold in km/h for routes without their own limit.
    pub default_speed_limit_kmph: f64,
    pub location_history_limit: usize,
    pub bulk_location_limit: usize,
    pub event_buffer_size: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub locations: Arc<dyn LocationRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub routes: Arc<dyn RouteRepository>,
    pub alerts: Arc<dyn AlertRepository>,
    pub publisher: Arc<BroadcastEventPublisher>,
    pub detection_handlers: Vec<Arc<dyn DetectionHandler>>,
    pub location_history_limit: usize,
    pub bulk_location_limit: usize,
}

impl AppState {
    pub fn new(app_config: &AppConfig) -> AppState {
        let store = Arc::new(InMemoryStore::new());
        let publisher = Arc::new(BroadcastEventPublisher::new(app_config.event_buffer_size));
        Self::with_parts(store, publisher, app_config)
    }

    /// Wires the state from explicit collaborators. The publisher and the
    /// store are always injected here, never reached through ambient state.
    pub fn with_parts(
        store: Arc<InMemoryStore>,
        publisher: Arc<BroadcastEventPublisher>,
        app_config: &AppConfig,
    ) -> AppState {
        let detection_handlers: Vec<Arc<dyn DetectionHandler>> = vec![
            Arc::new(OverspeedingHandler::new(SpeedInKmPerHour(
                app_config.default_speed_limit_kmph,
            ))),
            Arc::new(RouteDeviationHandler::new()),
        ];

        AppState {
            locations: store.clone(),
            trips: store.clone(),
            routes: store.clone(),
            alerts: store,
            publisher,
            detection_handlers,
            location_history_limit: app_config.location_history_limit,
            bulk_location_limit: app_config.bulk_location_limit,
        }
    }
}
