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

use std::{fmt, str::FromStr};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::{kilometer, meter}};
use odin_common::{
    atan2, deg, pow2, sqrt,
    angle::Angle360,
    errors::OdinCommonError,
    geo::GeoPoint3,
    geo_constants::{MEAN_EARTH_RADIUS, MER_SQUARED}
};
use crate::{
    aircraft::AircraftState,
    errors::{InsufficientData, OdinSkywatchError, Result, parse_error},
    extrapolate::extrapolate_at
};

/// the fixed ground location we compute look angles from. This can only be constructed from valid
/// coordinates (lat in [-90,90], lon in [-180,180], all finite)
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(try_from="GeoPoint3", into="GeoPoint3")]
pub struct ObserverLocation (GeoPoint3);

impl ObserverLocation {
    pub fn new (lat_deg: f64, lon_deg: f64, height_m: f64)->Result<Self> {
        let p = GeoPoint3::from_lon_lat_degrees_alt_meters( lon_deg, lat_deg, height_m).check()?;
        Ok( ObserverLocation(p) )
    }

    pub fn position (&self)->&GeoPoint3 { &self.0 }
    pub fn latitude_degrees (&self)->f64 { self.0.latitude_degrees() }
    pub fn longitude_degrees (&self)->f64 { self.0.longitude_degrees() }
    pub fn height_meters (&self)->f64 { self.0.altitude_meters() }
}

impl TryFrom<GeoPoint3> for ObserverLocation {
    type Error = OdinCommonError;

    fn try_from (p: GeoPoint3)->std::result::Result<Self,Self::Error> {
        Ok( ObserverLocation( p.check()?) )
    }
}

impl From<ObserverLocation> for GeoPoint3 {
    fn from (o: ObserverLocation)->Self { o.0 }
}

/// parse "LAT,LON,HEIGHT" (degrees, degrees, meters) as used on the command line
impl FromStr for ObserverLocation {
    type Err = OdinSkywatchError;

    fn from_str (s: &str)->Result<Self> {
        let vs: Vec<&str> = s.split(',').map( str::trim).collect();
        if vs.len() != 3 {
            return Err( parse_error!("observer location not in LAT,LON,HEIGHT format: '{}'", s))
        }

        let mut coords = [0.0f64; 3];
        for (i,v) in vs.iter().enumerate() {
            coords[i] = v.parse().map_err( |_| parse_error!("invalid observer coordinate '{}'", v))?;
        }
        ObserverLocation::new( coords[0], coords[1], coords[2])
    }
}

impl fmt::Display for ObserverLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Observer( lat: {}, lon: {}, height: {}m)", self.latitude_degrees(), self.longitude_degrees(), self.height_meters())
    }
}

/// the observer relative look angles for an aircraft, recomputed each tracking cycle
#[derive(Debug,Clone,Serialize)]
pub struct Target {
    pub aircraft_id: String,
    #[serde(skip_serializing_if="odin_common::is_none")]
    pub callsign: Option<String>,

    #[serde(rename="azimuth_degrees")]
    pub azimuth: Angle360,   // clockwise from true north
    pub distance_km: f64,    // along the ellipsoid surface
    pub elevation_degrees: f64, // positive above horizon

    /// the (estimated) aircraft position these values were computed for
    pub position: GeoPoint3
}

impl Target {
    pub fn distance (&self)->Length { Length::new::<kilometer>( self.distance_km) }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Target( {}: az: {:.1}, dist: {:.1}km, el: {:.2})",
            self.aircraft_id, self.azimuth.degrees(), self.distance_km, self.elevation_degrees)
    }
}

/// the additional height a target at ground distance `dist_m` sits below the observer's tangent plane
/// because of earth curvature. Only defined for distances up to the earth radius
pub fn curvature_drop (dist_m: f64)->std::result::Result<f64,InsufficientData> {
    if !dist_m.is_finite() || dist_m < 0.0 {
        Err( InsufficientData::OutOfDomain( format!("ground distance {dist_m}m")))
    } else if dist_m > MEAN_EARTH_RADIUS {
        Err( InsufficientData::BeyondHorizonDomain( dist_m))
    } else {
        Ok( MEAN_EARTH_RADIUS - sqrt( MER_SQUARED - pow2( dist_m)))
    }
}

/// compute azimuth, ground distance and elevation of an aircraft at `pos` as seen from `observer`.
/// Azimuth and distance come from the inverse geodesic on the WGS84 ellipsoid, elevation is corrected
/// for earth curvature
pub fn estimate (observer: &ObserverLocation, aircraft_id: &str, pos: &GeoPoint3)->std::result::Result<Target,InsufficientData> {
    if !pos.is_valid() {
        return Err( InsufficientData::OutOfDomain( format!("aircraft position {pos}")))
    }

    let inv = observer.position().geodesic_inverse( pos);
    let d = inv.distance.get::<meter>();
    let dh = pos.altitude_meters() - observer.height_meters();

    let (azimuth, elevation_degrees) = if d > 0.0 {
        let drop = curvature_drop( d)?;
        (inv.azimuth, deg( atan2( dh - drop, d)))
    } else if d == 0.0 { // straight up or down, azimuth is undefined
        (Angle360::from_degrees(0.0), if dh >= 0.0 { 90.0 } else { -90.0 })
    } else {
        return Err( InsufficientData::OutOfDomain( format!("geodesic distance {d}m")))
    };

    Ok( Target {
        aircraft_id: aircraft_id.to_string(),
        callsign: None,
        azimuth,
        distance_km: d / 1000.0,
        elevation_degrees,
        position: *pos
    })
}

/// extrapolate the position of `state` to `now` and estimate its target values
pub fn estimate_target (observer: &ObserverLocation, state: &AircraftState, now: &DateTime<Utc>)->std::result::Result<Target,InsufficientData> {
    let pos = extrapolate_at( state, now)?;
    let mut target = estimate( observer, &state.hex_id, &pos)?;
    target.callsign = state.callsign.clone();
    Ok(target)
}
