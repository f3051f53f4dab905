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

use std::time::Duration;
use chrono::{DateTime,Utc};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{trace,debug,info,warn};
use odin_common::datetime;
use crate::{
    errors::{Result, config_error, OdinSkywatchError},
    sink::TargetSink,
    store::AircraftStore,
    target::{ObserverLocation, Target, estimate_target}
};

/// periodically computes the targets for all aircraft in the store and publishes them to a sink
pub struct Tracker<S> where S: TargetSink {
    store: AircraftStore,
    observer: ObserverLocation,
    interval: Duration,
    drop_after: Option<Duration>,
    sink: S,
    n_cycles: u64
}

impl<S> Tracker<S> where S: TargetSink {
    pub fn new (store: AircraftStore, observer: ObserverLocation, interval: Duration, drop_after: Option<Duration>, sink: S)->Result<Self> {
        if interval.is_zero() {
            return Err( config_error!("tracker interval must not be zero"))
        }
        Ok( Tracker { store, observer, interval, drop_after, sink, n_cycles: 0 })
    }

    pub fn observer (&self)->&ObserverLocation { &self.observer }

    pub fn sink (&self)->&S { &self.sink }

    pub fn into_sink (self)->S { self.sink }

    pub fn n_cycles (&self)->u64 { self.n_cycles }

    /// compute one snapshot for the given time. Aircraft without enough data are skipped
    pub fn compute_targets (&self, now: &DateTime<Utc>)->Vec<Target> {
        let mut targets: Vec<Target> = Vec::with_capacity( self.store.len());

        self.store.for_each( |ac| {
            match estimate_target( &self.observer, ac, now) {
                Ok(target) => targets.push( target),
                Err(e) => trace!("skipping {}: {}", ac.hex_id, e)
            }
        });

        targets
    }

    /// one tracking cycle: evict stale aircraft (if configured), compute and publish targets
    pub async fn cycle (&mut self)->Result<usize> {
        let now = datetime::utc_now();

        if let Some(drop_after) = self.drop_after {
            self.store.remove_stale( drop_after, now);
        }

        let targets = self.compute_targets( &now);
        self.n_cycles += 1;
        self.sink.publish( now, &targets).await?;

        Ok( targets.len())
    }

    /// run cycles until `cancel` is triggered. Cancellation is only checked between cycles
    pub async fn run (mut self, cancel: CancellationToken)->Result<Self> {
        let mut timer = time::interval( self.interval);
        timer.set_missed_tick_behavior( MissedTickBehavior::Skip);
        info!("tracker started for {} with interval {:?}", self.observer, self.interval);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {
                    match self.cycle().await {
                        Ok(n) => debug!("tracker cycle {} published {} targets", self.n_cycles, n),
                        Err(e) => warn!("tracker cycle {} failed to publish: {}", self.n_cycles, e)
                    }
                }
            }
        }

        info!("tracker terminated after {} cycles", self.n_cycles);
        Ok(self)
    }
}
