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

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono::offset::LocalResult;
use std::time::Duration;

use crate::errors::{OdinCommonError, Result};

/// this should be used wherever we might have to use sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// fractional seconds from `dt_earlier` to `dt_later` (negative if `dt_later` precedes `dt_earlier`)
pub fn elapsed_secs_f64 (dt_later: &DateTime<Utc>, dt_earlier: &DateTime<Utc>)->f64 {
    let delta: TimeDelta = *dt_later - *dt_earlier;
    delta.num_microseconds()
        .map( |us| us as f64 / 1_000_000.0)
        .unwrap_or( delta.num_milliseconds() as f64 / 1000.0) // only overflows for spans of >290k years
}

/// saturating std Duration between two dates (zero if `dt_later` is not later)
pub fn duration_since (dt_later: &DateTime<Utc>, dt_earlier: &DateTime<Utc>)->Duration {
    (*dt_later - *dt_earlier).to_std().unwrap_or( Duration::ZERO)
}

/// combine separate date and time strings of given formats that refer to the local time of `tz` into a DateTime<Utc>.
/// Ambiguous local times (DST fold) map to the later instant
pub fn local_date_time_to_utc<Tz: TimeZone> (date: &str, date_fmt: &str, time: &str, time_fmt: &str, tz: &Tz)->Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str( date, date_fmt)?;
    let time = NaiveTime::parse_from_str( time, time_fmt)?;
    let ndt = NaiveDateTime::new( date, time);

    match tz.from_local_datetime( &ndt) {
        LocalResult::Single(dt) => Ok( dt.with_timezone( &Utc)),
        LocalResult::Ambiguous(_, dt2) => Ok( dt2.with_timezone( &Utc)), // we don't care about that precision
        LocalResult::None => Err( OdinCommonError::OpFailed( "forward time jump cannot be mapped to UTC".into()))
    }
}
