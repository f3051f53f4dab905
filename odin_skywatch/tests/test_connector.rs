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
use tokio::{io::{AsyncWriteExt, BufReader, duplex}, net::TcpListener, time::{sleep, timeout}};
use tokio_util::sync::CancellationToken;
use odin_skywatch::{
    AircraftStore, ObserverLocation, SkywatchConfig, DisconnectPolicy, run_skywatch, connector::{IngestEnd, ingest},
    run_with_reader, sink::WatchSink
};

// run with "cargo test --test test_connector -- --nocapture"

const FEED: &str = "\
MSG,1,111,11111,400A1B,111111,2024/05/01,12:00:00.000,2024/05/01,12:00:00.000,BAW123,,,,,,,,,,,0\r
MSG,3,111,11111,400A1B,111111,2024/05/01,12:00:01.000,2024/05/01,12:00:01.000,,36000,,,52.6,-1.8,,,0,0,0,0\r
\r
MSG,4,111,11111,400A1B,111111,2024/05/01,12:00:02.000,2024/05/01,12:00:02.000,,,420,95,,,0,,,,,0\r
MSG,3,111,11111,,111111,2024/05/01,12:00:03.000,2024/05/01,12:00:03.000,,28000,,,52.1,-2.9,,,0,0,0,0\r
MSG,3,111,11111,3c6586,111111,2024/05/01,12:00:04.000,2024/05/01,12:00:04.000,,28000,,,52.1,-2.9,,,0,0,0,0\r
";

fn observer ()->ObserverLocation { ObserverLocation::new( 52.388137, -2.304576, 67.0).unwrap() }

#[tokio::test]
async fn test_ingest_to_eof() {
    let store = AircraftStore::new();
    let cancel = CancellationToken::new();

    let stats = ingest( FEED.as_bytes(), &store, &cancel).await.unwrap();
    println!("{stats}");

    assert_eq!( stats.end, IngestEnd::Eof);
    assert_eq!( stats.n_lines, 5);
    assert_eq!( stats.n_merged, 4);
    assert_eq!( stats.n_rejected, 1);
    assert_eq!( stats.n_new, 2);
    assert_eq!( stats.n_oversized, 0);

    assert_eq!( store.len(), 2);
    let ac = store.get("400A1B").unwrap();
    assert_eq!( ac.callsign.as_deref(), Some("BAW123"));
    assert_eq!( ac.n_reports, 3);
    assert!( ac.has_position());
    assert!( store.contains("3C6586"));
}

#[tokio::test]
async fn test_ingest_oversized_line() {
    let store = AircraftStore::new();
    let cancel = CancellationToken::new();

    // a garbled feed that does not send newlines for a long time
    let input = format!("{}\n{FEED}", "4CA2D6,".repeat(2000));
    let stats = ingest( input.as_bytes(), &store, &cancel).await.unwrap();
    println!("{stats}");

    assert_eq!( stats.n_oversized, 1);
    assert_eq!( stats.n_lines, 5);
    assert_eq!( stats.n_merged, 4);
    assert!( !store.contains("4CA2D6"));
    assert!( store.contains("400A1B"));
}

#[tokio::test]
async fn test_ingest_cancel() {
    let store = AircraftStore::new();
    let cancel = CancellationToken::new();
    let (mut tx, rx) = duplex(1024);

    let task = {
        let store = store.clone();
        let cancel = cancel.clone();
        tokio::spawn( async move { ingest( BufReader::new(rx), &store, &cancel).await })
    };

    tx.write_all( b"MSG,1,111,11111,400A1B,111111,,,,,BAW123\n").await.unwrap();
    tx.flush().await.unwrap();

    // wait until the record is merged, the writer stays open
    timeout( Duration::from_secs(5), async { while store.is_empty() { sleep( Duration::from_millis(5)).await } }).await.unwrap();
    cancel.cancel();

    let stats = timeout( Duration::from_secs(5), task).await.unwrap().unwrap().unwrap();
    println!("{stats}");
    assert_eq!( stats.end, IngestEnd::Cancelled);
    assert_eq!( stats.n_merged, 1);
}

#[tokio::test]
async fn test_run_continue_after_disconnect() {
    let mut config = SkywatchConfig::new( "localhost:30003", observer());
    config.update_interval = Duration::from_millis(20);
    config.on_disconnect = DisconnectPolicy::Continue;

    let (sink, mut rx) = WatchSink::new();
    let cancel = CancellationToken::new();
    let task = tokio::spawn( run_with_reader( config, FEED.as_bytes(), sink, cancel.clone()));

    // feed is already at EOF but the tracker keeps publishing
    let targets = timeout( Duration::from_secs(5), async {
        loop {
            rx.changed().await.unwrap();
            let snapshot = rx.borrow_and_update().clone();
            if !snapshot.targets.is_empty() { break snapshot.targets }
        }
    }).await.unwrap();

    println!("{:?}", targets);
    assert_eq!( targets.len(), 1); // 3C6586 has no velocity
    assert_eq!( targets[0].aircraft_id, "400A1B");
    assert!( !cancel.is_cancelled());

    cancel.cancel();
    timeout( Duration::from_secs(5), task).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn test_run_shutdown_on_disconnect() {
    let mut config = SkywatchConfig::new( "localhost:30003", observer());
    config.update_interval = Duration::from_millis(20);

    let (sink, _rx) = WatchSink::new();
    let cancel = CancellationToken::new();

    // terminates on its own once the feed is exhausted
    timeout( Duration::from_secs(5), run_with_reader( config, FEED.as_bytes(), sink, cancel.clone())).await.unwrap().unwrap();
    assert!( cancel.is_cancelled());
}

#[tokio::test]
async fn test_run_skywatch_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn( async move {
        let (mut socket,_) = listener.accept().await.unwrap();
        socket.write_all( FEED.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    let mut config = SkywatchConfig::new( addr.to_string(), observer());
    config.update_interval = Duration::from_millis(20);

    let (sink, rx) = WatchSink::new();
    let cancel = CancellationToken::new();
    timeout( Duration::from_secs(5), run_skywatch( config, sink, cancel.clone())).await.unwrap().unwrap();
    assert!( cancel.is_cancelled());
}

#[tokio::test]
async fn test_connect_failure() {
    // grab a free port and release it again so that nobody is listening
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let config = SkywatchConfig::new( addr.to_string(), observer());
    let (sink, _rx) = WatchSink::new();
    assert!( run_skywatch( config, sink, CancellationToken::new()).await.is_err());
}
