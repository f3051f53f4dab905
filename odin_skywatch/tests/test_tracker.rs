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

use std::time::Duration;
use chrono::{TimeDelta, Utc};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use odin_skywatch::{
    AircraftStore, ObserverLocation, Tracker,
    sbs::parse_line,
    sink::{ConsoleSink, JsonLinesSink, TargetSink, WatchSink, format_table}
};

// run with "cargo test --test test_tracker -- --nocapture"

fn observer ()->ObserverLocation { ObserverLocation::new( 52.388137, -2.304576, 67.0).unwrap() }

/// one aircraft with full data, one without speed and one that is too far away
fn populated_store ()->AircraftStore {
    let store = AircraftStore::new();
    for line in [
        "MSG,1,111,11111,400A1B,111111,,,,,BAW123",
        "MSG,3,111,11111,400A1B,111111,,,,,,36000,,,52.6,-1.8,,,,,,0",
        "MSG,4,111,11111,400A1B,111111,,,,,,,420,95,,,0,,,,,0",

        "MSG,3,111,11111,3C6586,111111,,,,,,28000,,,52.1,-2.9,,,,,,0", // no velocity yet

        "MSG,3,111,11111,A0B1C2,111111,,,,,,38000,,,-33.9,151.2,,,,,,0", // Sydney, beyond earth radius distance
        "MSG,4,111,11111,A0B1C2,111111,,,,,,,480,60,,,0,,,,,0",
    ] {
        store.update( &parse_line(line).unwrap());
    }
    store
}

#[test]
fn test_compute_targets() {
    let store = populated_store();
    let (sink,_rx) = WatchSink::new();
    let tracker = Tracker::new( store.clone(), observer(), Duration::from_secs(5), None, sink).unwrap();

    let targets = tracker.compute_targets( &Utc::now());
    for t in &targets { println!("{t}") }

    assert_eq!( store.len(), 3);
    assert_eq!( targets.len(), 1);
    let t = &targets[0];
    assert_eq!( t.aircraft_id, "400A1B");
    assert_eq!( t.callsign.as_deref(), Some("BAW123"));
    assert!( t.distance_km > 30.0 && t.distance_km < 60.0);

    // skipped for this cycle but still tracked
    assert!( targets.iter().all( |t| t.aircraft_id != "A0B1C2"));
    assert!( store.get("A0B1C2").unwrap().has_position());
    assert!( store.contains("3C6586"));
    assert!( t.elevation_degrees > 0.0);
}

#[test]
fn test_zero_interval() {
    let (sink,_rx) = WatchSink::new();
    assert!( Tracker::new( AircraftStore::new(), observer(), Duration::ZERO, None, sink).is_err());
}

#[tokio::test]
async fn test_run_and_cancel() {
    let store = populated_store();
    let (sink, mut rx) = WatchSink::new();
    let tracker = Tracker::new( store, observer(), Duration::from_millis(20), None, sink).unwrap();

    let cancel = CancellationToken::new();
    let task = tokio::spawn( tracker.run( cancel.clone()));

    timeout( Duration::from_secs(5), rx.changed()).await.expect("no snapshot published").unwrap();
    let snapshot = rx.borrow_and_update().clone();
    println!("snapshot at {:?}: {:?}", snapshot.date, snapshot.targets);
    assert!( snapshot.date.is_some());
    assert_eq!( snapshot.targets.len(), 1);

    cancel.cancel();
    let tracker = timeout( Duration::from_secs(5), task).await.expect("tracker did not terminate").unwrap().unwrap();
    println!("tracker ran {} cycles", tracker.n_cycles());
    assert!( tracker.n_cycles() >= 1);
    assert_eq!( tracker.observer(), &observer());

    // late subscribers still get the last snapshot
    let late_rx = tracker.sink().subscribe();
    assert_eq!( late_rx.borrow().targets.len(), 1);

    let sink = tracker.into_sink();
    assert_eq!( sink.subscribe().borrow().targets[0].aircraft_id, "400A1B");
}

#[tokio::test]
async fn test_eviction_before_cycle() {
    let store = populated_store();
    let old = Utc::now() - TimeDelta::seconds(600);
    store.update_at( &parse_line("MSG,1,111,11111,DEAD01,111111,,,,,OLD1").unwrap(), old);
    assert_eq!( store.len(), 4);

    let (sink,_rx) = WatchSink::new();
    let mut tracker = Tracker::new( store.clone(), observer(), Duration::from_secs(1), Some(Duration::from_secs(300)), sink).unwrap();
    let n = tracker.cycle().await.unwrap();

    assert_eq!( n, 1);
    assert_eq!( store.len(), 3);
    assert!( !store.contains("DEAD01"));
}

#[tokio::test]
async fn test_console_and_json_sinks() {
    let store = populated_store();
    let (sink,_rx) = WatchSink::new();
    let tracker = Tracker::new( store, observer(), Duration::from_secs(5), None, sink).unwrap();
    let now = Utc::now();
    let targets = tracker.compute_targets( &now);

    let mut console = ConsoleSink::new( Vec::<u8>::new());
    console.publish( now, &targets).await.unwrap();
    let text = String::from_utf8( console.into_inner()).unwrap();
    println!("{text}");
    assert!( text.contains("(1 targets)"));
    assert!( text.contains("400A1B"));
    assert!( text.contains("BAW123"));

    let mut buf = String::new();
    format_table( &mut buf, now, &[]);
    assert_eq!( buf.lines().count(), 2); // header only

    let mut json = JsonLinesSink::new( Vec::<u8>::new());
    json.publish( now, &targets).await.unwrap();
    json.publish( now, &[]).await.unwrap();
    let out = String::from_utf8( json.into_inner()).unwrap();
    println!("{out}");

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!( lines.len(), 2);
    let v: serde_json::Value = serde_json::from_str( lines[0]).unwrap();
    assert_eq!( v["targets"][0]["aircraft_id"], "400A1B");
    assert!( v["targets"][0]["elevation_degrees"].is_f64());
    assert_eq!( v["targets"][0]["position"]["alt"].as_f64().map( |a| a.round()), Some(10973.0));
}
