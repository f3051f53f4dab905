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
#![allow(unused)]

use std::{thread, time::Duration};
use chrono::{TimeDelta, TimeZone, Utc};
use uom::si::length::foot;
use odin_skywatch::{AircraftStore, sbs::parse_line};

// run with "cargo test --test test_store -- --nocapture"

#[test]
fn test_sticky_merge() {
    let store = AircraftStore::new();
    let t0 = Utc.with_ymd_and_hms( 2025, 6, 1, 12, 0, 0).unwrap();
    let t1 = t0 + TimeDelta::seconds(1);
    let t2 = t0 + TimeDelta::seconds(2);

    assert!( store.update_at( &parse_line("MSG,5,111,11111,4CA2D6,111111,,,,,,10000").unwrap(), t0));
    let ac = store.get("4CA2D6").unwrap();
    println!("{ac}");
    assert!( (ac.altitude.unwrap().get::<foot>() - 10000.0).abs() < 1e-9);
    assert!( ac.last_position_update.is_none()); // altitude known before position

    // velocity report without altitude does not clobber it
    assert!( !store.update_at( &parse_line("MSG,4,111,11111,4CA2D6,111111,,,,,,,450,90,,,0").unwrap(), t1));
    let ac = store.get("4CA2D6").unwrap();
    println!("{ac}");
    assert!( (ac.altitude.unwrap().get::<foot>() - 10000.0).abs() < 1e-9);
    assert_eq!( ac.track.unwrap().degrees(), 90.0);
    assert!( ac.last_position_update.is_none());
    assert_eq!( ac.n_reports, 2);
    assert_eq!( ac.last_update, t1);

    // only a full position pair sets the position time
    store.update_at( &parse_line("MSG,3,111,11111,4CA2D6,111111,,,,,,,,,52.0").unwrap(), t1);
    assert!( store.get("4CA2D6").unwrap().last_position_update.is_none());

    store.update_at( &parse_line("MSG,3,111,11111,4CA2D6,111111,,,,,,,,,52.0,-1.5").unwrap(), t2);
    let ac = store.get("4CA2D6").unwrap();
    println!("{ac}");
    assert_eq!( ac.last_position_update, Some(t2));
    assert_eq!( ac.latitude, Some(52.0));
    assert_eq!( ac.longitude, Some(-1.5));
    assert_eq!( store.len(), 1);
}

#[test]
fn test_idempotent_merge() {
    let store = AircraftStore::new();
    let t0 = Utc.with_ymd_and_hms( 2025, 6, 1, 12, 0, 0).unwrap();
    let report = parse_line("MSG,3,111,11111,4CA2D6,111111,,,,,BAW123,37000,450,270,51.5,-0.5,-64,1234,0,0,0,0").unwrap();

    store.update_at( &report, t0);
    let s1 = store.get("4CA2D6").unwrap();

    store.update_at( &report, t0 + TimeDelta::seconds(10));
    let mut s2 = store.get("4CA2D6").unwrap();
    assert_eq!( s2.last_position_update, Some(t0 + TimeDelta::seconds(10)));

    // everything but the bookkeeping fields has to be the same
    s2.last_position_update = s1.last_position_update;
    s2.last_update = s1.last_update;
    s2.n_reports = s1.n_reports;
    assert_eq!( s1, s2);
}

#[test]
fn test_snapshot_and_eviction() {
    let store = AircraftStore::new();
    let t0 = Utc.with_ymd_and_hms( 2025, 6, 1, 12, 0, 0).unwrap();

    store.update_at( &parse_line("MSG,1,111,11111,AAAAAA,111111,,,,,AAL1").unwrap(), t0);
    store.update_at( &parse_line("MSG,1,111,11111,BBBBBB,111111,,,,,BAW2").unwrap(), t0 + TimeDelta::seconds(70));
    store.update_at( &parse_line("MSG,1,111,11111,CCCCCC,111111,,,,,CCA3").unwrap(), t0 + TimeDelta::seconds(100));

    let mut ids: Vec<String> = store.snapshot().into_iter().map( |ac| ac.hex_id).collect();
    ids.sort();
    assert_eq!( ids, vec!["AAAAAA", "BBBBBB", "CCCCCC"]);

    let dropped = store.remove_stale( Duration::from_secs(60), t0 + TimeDelta::seconds(120));
    println!("dropped: {dropped:?}");
    assert_eq!( dropped, vec!["AAAAAA".to_string()]);
    assert_eq!( store.len(), 2);
    assert!( !store.contains("AAAAAA"));

    assert!( store.remove_stale( Duration::from_secs(60), t0 + TimeDelta::seconds(120)).is_empty());
}

#[test]
fn test_shared_handle() {
    let store = AircraftStore::new();
    let writer = store.clone();

    let handle = thread::spawn( move || {
        for i in 0..100 {
            let line = format!("MSG,4,111,11111,{:06X},111111,,,,,,,{},90,,,0", i % 10, 100 + i);
            writer.update( &parse_line( &line).unwrap());
        }
    });
    handle.join().unwrap();

    assert_eq!( store.len(), 10);
    let ac = store.get("000009").unwrap();
    assert_eq!( ac.n_reports, 10);
}
