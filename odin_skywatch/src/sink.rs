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

use std::{fmt::Write as _, sync::Arc};
use async_trait::async_trait;
use chrono::{DateTime,SecondsFormat,Utc};
use serde::Serialize;
use tokio::{io::{AsyncWrite, AsyncWriteExt}, sync::watch};
use crate::{errors::Result, target::Target};

/// the consumer of target snapshots. Each tracker cycle publishes the complete list of targets
/// it could compute, in no particular order
#[async_trait]
pub trait TargetSink: Send {
    async fn publish (&mut self, date: DateTime<Utc>, targets: &[Target])->Result<()>;
}

/* #region console **********************************************************************************************/

/// prints a text table per snapshot
pub struct ConsoleSink<W> where W: AsyncWrite + Unpin + Send {
    writer: W,
    buf: String
}

impl ConsoleSink<tokio::io::Stdout> {
    pub fn stdout ()->Self { ConsoleSink::new( tokio::io::stdout()) }
}

impl<W> ConsoleSink<W> where W: AsyncWrite + Unpin + Send {
    pub fn new (writer: W)->Self {
        ConsoleSink { writer, buf: String::with_capacity(4096) }
    }

    pub fn into_inner (self)->W { self.writer }
}

#[async_trait]
impl<W> TargetSink for ConsoleSink<W> where W: AsyncWrite + Unpin + Send {
    async fn publish (&mut self, date: DateTime<Utc>, targets: &[Target])->Result<()> {
        self.buf.clear();
        format_table( &mut self.buf, date, targets);
        self.writer.write_all( self.buf.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// append a fixed width table for `targets` to `buf`
pub fn format_table (buf: &mut String, date: DateTime<Utc>, targets: &[Target]) {
    let _ = writeln!( buf, "-- {}  ({} targets)", date.to_rfc3339_opts( SecondsFormat::Secs, true), targets.len());
    let _ = writeln!( buf, "{:<8} {:<9} {:>10} {:>11} {:>8} {:>9} {:>8}",
        "HEX_ID", "CALLSIGN", "LAT", "LON", "AZ[deg]", "DIST[km]", "EL[deg]");

    for t in targets {
        let _ = writeln!( buf, "{:<8} {:<9} {:>10.5} {:>11.5} {:>8.1} {:>9.1} {:>8.2}",
            t.aircraft_id,
            t.callsign.as_deref().unwrap_or("-"),
            t.position.latitude_degrees(),
            t.position.longitude_degrees(),
            t.azimuth.degrees(),
            t.distance_km,
            t.elevation_degrees
        );
    }
}

/* #endregion console */

/* #region json lines *******************************************************************************************/

#[derive(Serialize)]
struct Snapshot<'a> {
    date: DateTime<Utc>,
    targets: &'a [Target]
}

/// writes one JSON object per snapshot and line
pub struct JsonLinesSink<W> where W: AsyncWrite + Unpin + Send {
    writer: W
}

impl<W> JsonLinesSink<W> where W: AsyncWrite + Unpin + Send {
    pub fn new (writer: W)->Self { JsonLinesSink { writer } }

    pub fn into_inner (self)->W { self.writer }
}

#[async_trait]
impl<W> TargetSink for JsonLinesSink<W> where W: AsyncWrite + Unpin + Send {
    async fn publish (&mut self, date: DateTime<Utc>, targets: &[Target])->Result<()> {
        let mut line = serde_json::to_vec( &Snapshot{ date, targets })?;
        line.push( b'\n');
        self.writer.write_all( &line).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/* #endregion json lines */

/* #region watch ************************************************************************************************/

/// the latest snapshot, shared with any number of independent consumers
#[derive(Debug,Clone,Default)]
pub struct TargetSnapshot {
    pub date: Option<DateTime<Utc>>,
    pub targets: Arc<Vec<Target>>
}

/// publishes through a `tokio::sync::watch` channel so that presentation can run in its own task.
/// Consumers only see the latest snapshot
pub struct WatchSink {
    tx: watch::Sender<TargetSnapshot>
}

impl WatchSink {
    pub fn new ()->(Self, watch::Receiver<TargetSnapshot>) {
        let (tx,rx) = watch::channel( TargetSnapshot::default());
        (WatchSink{tx}, rx)
    }

    pub fn subscribe (&self)->watch::Receiver<TargetSnapshot> { self.tx.subscribe() }
}

#[async_trait]
impl TargetSink for WatchSink {
    async fn publish (&mut self, date: DateTime<Utc>, targets: &[Target])->Result<()> {
        // no receivers is not an error, somebody might subscribe later
        self.tx.send_replace( TargetSnapshot { date: Some(date), targets: Arc::new( targets.to_vec()) });
        Ok(())
    }
}

/* #endregion watch */
