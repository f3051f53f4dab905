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
#![allow(uncommon_codepoints)]

//! odin_skywatch tracks aircraft from a SBS (BaseStation) feed and periodically computes their
//! azimuth, ground distance and elevation as seen from a fixed observer location.
//!
//! The system consists of an ingest task that reads and merges SBS records into a shared
//! [`AircraftStore`], and a [`Tracker`] task that extrapolates positions by dead reckoning and
//! publishes the resulting [`Target`] list to a [`TargetSink`] in fixed intervals.

use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;
use tracing::{info,warn,error};

pub mod errors;
pub mod sbs;
pub mod aircraft;
pub mod store;
pub mod extrapolate;
pub mod target;
pub mod sink;
pub mod tracker;
pub mod connector;
pub mod config;

pub use aircraft::AircraftState;
pub use sbs::AircraftReport;
pub use store::AircraftStore;
pub use target::{ObserverLocation, Target};
pub use sink::TargetSink;
pub use tracker::Tracker;
pub use config::{SkywatchConfig, DisconnectPolicy, load_config};

use crate::errors::{OdinSkywatchError, Result};

/// connect to the configured feed and run ingest and tracker tasks until `cancel` is triggered or,
/// with `DisconnectPolicy::Shutdown`, the feed connection ends. Only a failed connect is an error
pub async fn run_skywatch<S> (config: SkywatchConfig, sink: S, cancel: CancellationToken)->Result<()>
    where S: TargetSink + 'static
{
    config.check()?;
    let reader = connector::connect( &config.url).await?;
    run_with_reader( config, reader, sink, cancel).await
}

/// the task setup of `run_skywatch` for an already opened feed
pub async fn run_with_reader<R,S> (config: SkywatchConfig, reader: R, sink: S, cancel: CancellationToken)->Result<()>
    where R: AsyncBufRead + Unpin + Send + 'static, S: TargetSink + 'static
{
    let store = AircraftStore::new();
    let tracker = Tracker::new( store.clone(), config.observer, config.update_interval, config.drop_after, sink)?;

    let ingest_task = {
        let store = store.clone();
        let cancel = cancel.clone();
        let policy = config.on_disconnect;

        tokio::spawn( async move {
            match connector::ingest( reader, &store, &cancel).await {
                Ok(stats) => info!("feed input ended: {}", stats),
                Err(e) => error!("feed input failed: {}", e)
            }
            if policy == DisconnectPolicy::Shutdown && !cancel.is_cancelled() {
                info!("shutting down after feed disconnect");
                cancel.cancel();
            } else if !cancel.is_cancelled() {
                warn!("feed disconnected, continue tracking {} aircraft", store.len());
            }
        })
    };

    let tracker_task = tokio::spawn( tracker.run( cancel.clone()));

    let (ingest_res, tracker_res) = tokio::join!( ingest_task, tracker_task);
    ingest_res.map_err( |e| OdinSkywatchError::OpFailedError( format!("ingest task: {e}")))?;
    tracker_res.map_err( |e| OdinSkywatchError::OpFailedError( format!("tracker task: {e}")))??;

    Ok(())
}
