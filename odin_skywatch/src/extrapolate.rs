/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/// dead reckoning of aircraft positions from the last position fix, assuming constant track and
/// ground speed along a great circle

use chrono::{DateTime,Utc};
use uom::si::{length::meter, velocity::knot};
use odin_common::{
    sin, cos, asin, atan2, deg, rad,
    angle::{normalize_180, is_valid_latitude, is_valid_longitude},
    datetime::{self, elapsed_secs_f64},
    geo::GeoPoint3,
    geo_constants::MEAN_EARTH_RADIUS_NM
};
use crate::{aircraft::AircraftState, errors::InsufficientData};

/// the state values we need to extrapolate
struct Fix {
    time: DateTime<Utc>,
    lat: f64,   // degrees
    lon: f64,   // degrees
    alt: f64,   // meters
    track: f64, // degrees
    speed: f64  // knots
}

fn get_fix (state: &AircraftState)->Result<Fix,InsufficientData> {
    use InsufficientData::MissingField;

    let time = state.last_position_update.ok_or( MissingField("last_position_update"))?;
    let track = state.track.ok_or( MissingField("track"))?;
    let speed = state.ground_speed.ok_or( MissingField("ground_speed"))?;
    let lat = state.latitude.ok_or( MissingField("latitude"))?;
    let lon = state.longitude.ok_or( MissingField("longitude"))?;
    let alt = state.altitude.ok_or( MissingField("altitude"))?;

    Ok( Fix { time, lat, lon, alt: alt.get::<meter>(), track: track.degrees(), speed: speed.get::<knot>() })
}

/// project the current position of an aircraft. If `elapsed_secs` is None we use the wall clock time
/// since the last position update. The returned altitude is the last reported altitude in meters
pub fn extrapolate (state: &AircraftState, elapsed_secs: Option<f64>)->Result<GeoPoint3,InsufficientData> {
    let fix = get_fix( state)?;

    let elapsed = match elapsed_secs {
        Some(secs) => {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err( InsufficientData::OutOfDomain( format!("elapsed time {secs}s")))
            }
            secs
        }
        None => elapsed_secs_f64( &datetime::utc_now(), &fix.time).max(0.0)
    };

    project( &fix, elapsed)
}

/// extrapolate to a given time, which is how the tracker gets a consistent snapshot for all aircraft.
/// A `now` before the last position update (clock skew) counts as zero elapsed time
pub fn extrapolate_at (state: &AircraftState, now: &DateTime<Utc>)->Result<GeoPoint3,InsufficientData> {
    let fix = get_fix( state)?;
    let elapsed = elapsed_secs_f64( now, &fix.time).max(0.0);
    project( &fix, elapsed)
}

fn project (fix: &Fix, elapsed_secs: f64)->Result<GeoPoint3,InsufficientData> {
    if !is_valid_latitude( fix.lat) || !is_valid_longitude( fix.lon) {
        return Err( InsufficientData::OutOfDomain( format!("last position [{},{}]", fix.lat, fix.lon)))
    }
    if !(fix.speed.is_finite() && fix.speed >= 0.0) {
        return Err( InsufficientData::OutOfDomain( format!("ground speed {}kn", fix.speed)))
    }
    if !fix.track.is_finite() || !fix.alt.is_finite() {
        return Err( InsufficientData::OutOfDomain( format!("track {} or altitude {}", fix.track, fix.alt)))
    }

    let dist_nm = fix.speed * elapsed_secs / 3600.0;
    if dist_nm == 0.0 {
        return Ok( GeoPoint3::from_lon_lat_degrees_alt_meters( fix.lon, fix.lat, fix.alt))
    }

    let (lat, lon) = dead_reckon( fix.lat, fix.lon, fix.track, dist_nm);
    Ok( GeoPoint3::from_lon_lat_degrees_alt_meters( lon, lat, fix.alt))
}

/// great circle destination from start point (degrees), initial course (degrees clockwise from north)
/// and distance (nautical miles). Returns (lat,lon) in degrees with lon normalized to [-180,180]
pub fn dead_reckon (lat: f64, lon: f64, track: f64, dist_nm: f64)->(f64,f64) {
    let φ1 = rad(lat);
    let λ1 = rad(lon);
    let θ = rad(track);
    let δ = dist_nm / MEAN_EARTH_RADIUS_NM; // angular distance

    let φ2 = asin( sin(φ1)*cos(δ) + cos(φ1)*sin(δ)*cos(θ));
    let λ2 = λ1 + atan2( sin(θ)*sin(δ)*cos(φ1), cos(δ) - sin(φ1)*sin(φ2));

    (deg(φ2), normalize_180( deg(λ2)))
}
