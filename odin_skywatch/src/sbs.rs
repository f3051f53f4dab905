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
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;
use odin_common::{
    extract_fields,
    angle::{is_valid_latitude, is_valid_longitude},
    datetime::local_date_time_to_utc,
    u8extractor::{CsvFieldExtractor, CsvReadable, CsvRecord, CsvStr}
};
use crate::errors::{OdinSkywatchError, Result};

/// SBS (BaseStation) column names, in wire order
pub const SBS_COLUMNS: [&'static str; 22] = [
    "message_type", "transmission_type", "session_id", "aircraft_id", "hex_id", "flight_id",
    "generated_date", "generated_time", "logged_date", "logged_time",
    "callsign", "altitude", "ground_speed", "track", "latitude", "longitude", "vertical_rate",
    "squawk", "alert", "emergency", "spi", "on_ground"
];

const SBS_DATE_FMT: &'static str = "%Y/%m/%d";
const SBS_TIME_FMT: &'static str = "%H:%M:%S%.3f";

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
pub enum SbsMessageType { Msg, Sel, Id, Air, Sta, Clk }

impl FromStr for SbsMessageType {
    type Err = OdinSkywatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MSG" => Ok(SbsMessageType::Msg),
            "SEL" => Ok(SbsMessageType::Sel),
            "ID"  => Ok(SbsMessageType::Id),
            "AIR" => Ok(SbsMessageType::Air),
            "STA" => Ok(SbsMessageType::Sta),
            "CLK" => Ok(SbsMessageType::Clk),
            _ => Err( OdinSkywatchError::ParseError( format!("unknown SBS message type '{s}'")))
        }
    }
}

impl<'a> CsvReadable<'a> for SbsMessageType {
    fn from_csv (s: &'a str)->Option<Self> { s.parse().ok() }
}

impl fmt::Display for SbsMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SbsMessageType::Msg => "MSG",
            SbsMessageType::Sel => "SEL",
            SbsMessageType::Id => "ID",
            SbsMessageType::Air => "AIR",
            SbsMessageType::Sta => "STA",
            SbsMessageType::Clk => "CLK",
        };
        f.write_str(s)
    }
}

/// one decoded SBS record. Every column except the hex id is optional since feeds send
/// short records and only populate the columns of the respective transmission type.
/// Units are as on the wire: altitude in ft, ground speed in kn, track in degrees, vertical rate in ft/min
#[derive(Debug,Clone,Default,PartialEq)]
pub struct AircraftReport {
    pub msg_type: Option<SbsMessageType>,
    pub transmission_type: Option<u8>,
    pub session_id: Option<String>,
    pub aircraft_id: Option<String>,
    pub hex_id: String,
    pub flight_id: Option<String>,
    pub generated_date: Option<String>,
    pub generated_time: Option<String>,
    pub logged_date: Option<String>,
    pub logged_time: Option<String>,
    pub callsign: Option<String>,
    pub altitude: Option<i64>,
    pub ground_speed: Option<f64>,
    pub track: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub vertical_rate: Option<i64>,
    pub squawk: Option<String>,
    pub alert: Option<bool>,
    pub emergency: Option<bool>,
    pub spi: Option<bool>,
    pub on_ground: Option<bool>,

    /// names of columns that were present but could not be parsed
    pub invalid_fields: Vec<&'static str>
}

impl AircraftReport {
    pub fn new (hex_id: impl Into<String>)->Self {
        AircraftReport { hex_id: hex_id.into(), ..Default::default() }
    }

    /// do we have a full position pair
    pub fn has_position (&self)->bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// the generated date/time columns converted to UTC. SBS feeds such as dump1090 report local
    /// time of the receiver, hence we need its timezone. Returns None if either column is missing
    pub fn generated_utc (&self, tz: &Tz)->Option<Result<DateTime<Utc>>> {
        if let Some(date) = &self.generated_date && let Some(time) = &self.generated_time {
            Some( local_date_time_to_utc( date, SBS_DATE_FMT, time, SBS_TIME_FMT, tz).map_err( |e| e.into()))
        } else {
            None
        }
    }
}

impl fmt::Display for AircraftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "AircraftReport( hex_id: {}", self.hex_id)?;
        if let Some(mt) = &self.msg_type { write!( f, ", type: {mt}")?; }
        if let Some(tt) = &self.transmission_type { write!( f, ", tt: {tt}")?; }
        if let Some(cs) = &self.callsign { write!( f, ", cs: \"{cs}\"")?; }
        if let Some(alt) = self.altitude { write!( f, ", alt: {alt}")?; }
        if let Some(spd) = self.ground_speed { write!( f, ", spd: {spd}")?; }
        if let Some(trk) = self.track { write!( f, ", trk: {trk}")?; }
        if let Some(lat) = self.latitude { write!( f, ", lat: {lat}")?; }
        if let Some(lon) = self.longitude { write!( f, ", lon: {lon}")?; }
        if let Some(vr) = self.vertical_rate { write!( f, ", vr: {vr}")?; }
        if let Some(sq) = &self.squawk { write!( f, ", sqk: {sq}")?; }
        if let Some(true) = self.on_ground { write!( f, ", on_ground")?; }
        if !self.invalid_fields.is_empty() { write!( f, ", invalid: {:?}", self.invalid_fields)?; }
        write!( f, ")")
    }
}

/// SBS as documented on http://woodair.net/SBS/Article/Barebones42_Socket_Data.htm
///
/// Message examples:
///  MSG,1,111,11111,AA2BC2,111111,2016/03/11,13:07:16.663,2016/03/11,13:07:16.626,UAL814  ,,,,,,,,,,,0
///  MSG,3,111,11111,A04424,111111,2016/03/11,13:07:05.343,2016/03/11,13:07:05.288,,11025,,,37.17274,-122.03935,,,,,,0
///  MSG,4,111,11111,AC1FCC,111111,2016/03/11,13:07:07.777,2016/03/11,13:07:07.713,,,316,106,,,1536,,,,,0
///
/// fields:
///   0: message type (MSG, SEL, ID, AIR, STA, CLK)
///   1: transmission type (MSG only: 1-8, 3: ES Airborne Position Message)
///   2: DB session id
///   3: DB aircraft id
///   4: ICAO 24 bit id (mode S transponder code) - this is our hex id
///   5: DB flight id
///   6: date generated
///   7: time generated
///   8: date logged
///   9: time logged
///  10: callsign
///  11: mode-C altitude (relative to 1013.2mb (Flight Level), *not* AMSL)
///  12: ground speed
///  13: track (from vx,vy, *not* heading)
///  14: latitude
///  15: longitude
///  16: vertical rate (ft/min - 64ft resolution)
///  17: squawk (mode-A squawk code)
///  18: alert (flag indicating squawk has changed)
///  19: emergency (flag)
///  20: spi (flag, transponder ident activated)
///  21: on ground (flag)
///
/// Trailing columns might be missing and empty columns are treated as absent. Columns that are present
/// but cannot be parsed are left absent and recorded in `invalid_fields`. Only a missing hex id is fatal
pub fn parse_report<T> (csv: &T)->Result<AircraftReport> where T: CsvFieldExtractor {
    extract_fields!{ csv ?
        let hex_id: CsvStr = [4] => {
            let mut invalid: Vec<&'static str> = Vec::new();

            let transmission_type = typed_field::<u8,T>( csv, 1, &mut invalid).filter( |tt| {
                if (1..=8).contains(tt) { true } else { invalid.push( SBS_COLUMNS[1]); false }
            });
            let latitude = typed_field::<f64,T>( csv, 14, &mut invalid).filter( |lat| {
                if is_valid_latitude(*lat) { true } else { invalid.push( SBS_COLUMNS[14]); false }
            });
            let longitude = typed_field::<f64,T>( csv, 15, &mut invalid).filter( |lon| {
                if is_valid_longitude(*lon) { true } else { invalid.push( SBS_COLUMNS[15]); false }
            });

            let report = AircraftReport {
                msg_type: typed_field( csv, 0, &mut invalid),
                transmission_type,
                session_id: csv.field(2),
                aircraft_id: csv.field(3),
                hex_id: hex_id.to_ascii_uppercase(),
                flight_id: csv.field(5),
                generated_date: csv.field(6),
                generated_time: csv.field(7),
                logged_date: csv.field(8),
                logged_time: csv.field(9),
                callsign: csv.field(10),
                altitude: typed_field( csv, 11, &mut invalid),
                ground_speed: typed_field( csv, 12, &mut invalid),
                track: typed_field( csv, 13, &mut invalid),
                latitude,
                longitude,
                vertical_rate: typed_field( csv, 16, &mut invalid),
                squawk: csv.field(17),
                alert: typed_field( csv, 18, &mut invalid),
                emergency: typed_field( csv, 19, &mut invalid),
                spi: typed_field( csv, 20, &mut invalid),
                on_ground: typed_field( csv, 21, &mut invalid),
                invalid_fields: invalid
            };

            if !report.invalid_fields.is_empty() {
                debug!("invalid fields {:?} in SBS record: {}", report.invalid_fields, csv.line());
            }
            Ok(report)
        } else {
            Err( OdinSkywatchError::MissingIdentity( csv.line().to_string()))
        }
    }
}

/// convenience function to parse a single line
pub fn parse_line (line: &str)->Result<AircraftReport> {
    parse_report( &CsvRecord::from_line( line))
}

fn typed_field<'a,V,T> (csv: &'a T, idx: usize, invalid: &mut Vec<&'static str>)->Option<V>
    where V: CsvReadable<'a>, T: CsvFieldExtractor
{
    match csv.try_field::<V>( idx) {
        Ok(v) => v,
        Err(_) => { invalid.push( SBS_COLUMNS[idx]); None }
    }
}
