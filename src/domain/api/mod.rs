/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
pub mod internal;
pub mod ui;

use actix_web::web::ServiceConfig;

pub fn handler(config: &mut ServiceConfig) {
    config
        .service(ui::location::update_driver_location)
        .service(ui::location::bulk_driver_location)
        .service(ui::location::stop_tracking)
        .service(ui::location::get_driver_location)
        .service(ui::location::get_live_buses)
        .service(ui::trip::start_trip)
        .service(ui::trip::end_trip)
        .service(ui::trip::get_ongoing_trip)
        .service(ui::trip::get_recent_trips)
        .service(ui::healthcheck::health_check)
        .service(internal::location::get_latest_locations)
        .service(internal::trip::trip_details)
        .service(internal::trip::trip_locations)
        .service(internal::route::upsert_route)
        .service(internal::route::get_route)
        .service(internal::alert::list_alerts)
        .service(internal::alert::acknowledge_alert)
        .service(internal::alert::unacknowledged_count);
}
