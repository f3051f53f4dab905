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

use std::fmt;
use chrono::{DateTime,Utc};
use uom::si::{f64::{Length,Velocity}, length::foot, velocity::{foot_per_minute,knot}};
use odin_common::angle::Angle360;
use crate::sbs::{AircraftReport, SbsMessageType};

/// the merged state of a tracked aircraft. Each field holds the last value any report supplied
/// for it, i.e. absent report columns never clear a known value
#[derive(Debug,Clone,PartialEq)]
pub struct AircraftState {
    pub hex_id: String,

    pub msg_type: Option<SbsMessageType>,
    pub transmission_type: Option<u8>,
    pub session_id: Option<String>,
    pub aircraft_id: Option<String>,
    pub flight_id: Option<String>,
    pub generated_date: Option<String>,
    pub generated_time: Option<String>,
    pub logged_date: Option<String>,
    pub logged_time: Option<String>,

    pub callsign: Option<String>,
    pub altitude: Option<Length>, // barometric, as reported
    pub ground_speed: Option<Velocity>,
    pub track: Option<Angle360>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub vertical_rate: Option<Velocity>,

    pub squawk: Option<String>,
    pub alert: Option<bool>,
    pub emergency: Option<bool>,
    pub spi: Option<bool>,
    pub on_ground: Option<bool>,

    /// wall clock time of the last report that contained both latitude and longitude
    pub last_position_update: Option<DateTime<Utc>>,
    /// wall clock time of the last merged report
    pub last_update: DateTime<Utc>,
    pub n_reports: u64,
}

macro_rules! merge_fields {
    ($state:ident <- $report:ident : $( $field:ident ),* ) => {
        $( if let Some(v) = &$report.$field { $state.$field = Some(v.clone()); } )*
    }
}

impl AircraftState {
    pub fn new (hex_id: String, now: DateTime<Utc>)->Self {
        AircraftState {
            hex_id,
            msg_type: None,
            transmission_type: None,
            session_id: None,
            aircraft_id: None,
            flight_id: None,
            generated_date: None,
            generated_time: None,
            logged_date: None,
            logged_time: None,
            callsign: None,
            altitude: None,
            ground_speed: None,
            track: None,
            latitude: None,
            longitude: None,
            vertical_rate: None,
            squawk: None,
            alert: None,
            emergency: None,
            spi: None,
            on_ground: None,
            last_position_update: None,
            last_update: now,
            n_reports: 0
        }
    }

    /// sticky merge of a report that was processed at `now` (wall clock, feed time stamps are not used)
    pub fn merge (&mut self, report: &AircraftReport, now: DateTime<Utc>) {
        merge_fields!{ self <- report :
            msg_type, transmission_type, session_id, aircraft_id, flight_id,
            generated_date, generated_time, logged_date, logged_time,
            callsign, latitude, longitude, squawk, alert, emergency, spi, on_ground
        }

        if let Some(alt) = report.altitude { self.altitude = Some( Length::new::<foot>( alt as f64)); }
        if let Some(spd) = report.ground_speed { self.ground_speed = Some( Velocity::new::<knot>( spd)); }
        if let Some(trk) = report.track { self.track = Some( Angle360::from_degrees( trk)); }
        if let Some(vr) = report.vertical_rate { self.vertical_rate = Some( Velocity::new::<foot_per_minute>( vr as f64)); }

        if report.has_position() {
            self.last_position_update = Some(now);
        }
        self.last_update = now;
        self.n_reports += 1;
    }

    pub fn has_position (&self)->bool {
        self.last_position_update.is_some()
    }
}

impl fmt::Display for AircraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Aircraft( hex_id: {}", self.hex_id)?;
        if let Some(cs) = &self.callsign { write!( f, ", cs: \"{cs}\"")?; }
        if let Some(lat) = self.latitude && let Some(lon) = self.longitude { write!( f, ", pos: [{lat},{lon}]")?; }
        if let Some(gs) = self.ground_speed { write!( f, ", spd: {:.0}", gs.get::<knot>())?; }
        if let Some(vr) = self.vertical_rate { write!( f, ", vr: {:.0}", vr.get::<foot_per_minute>())?; }
        if let Some(trk) = self.track { write!( f, ", trk: {:.0}", trk.degrees())?; }
        if let Some(alt) = self.altitude { write!( f, ", alt: {:.0}", alt.get::<foot>())?; }
        if let Some(sq) = &self.squawk { write!( f, ", sqk: {sq}")?; }
        write!( f, ", n: {}, time: {})", self.n_reports, self.last_update)
    }
}
