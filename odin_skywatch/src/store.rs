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

use std::{sync::Arc, time::Duration};
use chrono::{DateTime,Utc};
use dashmap::{DashMap, mapref::entry::Entry}; // papaya or whirlwind can be async alternatives
use tracing::debug;
use odin_common::datetime::{self, duration_since};
use crate::{aircraft::AircraftState, sbs::AircraftReport};

/// the shared aircraft state. This is a cheap handle that is cloned into the ingest task (writer)
/// and the tracker (reader). Merges only lock the shard of the respective aircraft, snapshots
/// read shard by shard, i.e. a snapshot is not atomic across aircraft
#[derive(Debug,Clone,Default)]
pub struct AircraftStore {
    aircraft: Arc<DashMap<String,AircraftState>>
}

impl AircraftStore {
    pub fn new ()->Self {
        AircraftStore { aircraft: Arc::new( DashMap::new()) }
    }

    /// merge report at the current wall clock time. Returns true if this was a new aircraft
    pub fn update (&self, report: &AircraftReport)->bool {
        self.update_at( report, datetime::utc_now())
    }

    pub fn update_at (&self, report: &AircraftReport, now: DateTime<Utc>)->bool {
        match self.aircraft.entry( report.hex_id.clone()) {
            Entry::Occupied(mut e) => {
                e.get_mut().merge( report, now);
                false
            }
            Entry::Vacant(e) => {
                let mut ac = AircraftState::new( report.hex_id.clone(), now);
                ac.merge( report, now);
                debug!("new aircraft {}", ac.hex_id);
                e.insert( ac);
                true
            }
        }
    }

    pub fn get (&self, hex_id: &str)->Option<AircraftState> {
        self.aircraft.get( hex_id).map( |e| e.value().clone())
    }

    pub fn contains (&self, hex_id: &str)->bool { self.aircraft.contains_key( hex_id) }

    pub fn len (&self)->usize { self.aircraft.len() }

    pub fn is_empty (&self)->bool { self.aircraft.is_empty() }

    /// clones of all current states, in (unspecified) map iteration order
    pub fn snapshot (&self)->Vec<AircraftState> {
        self.aircraft.iter().map( |e| e.value().clone()).collect()
    }

    /// call `f` for each aircraft without cloning. Do not update the store from within `f`
    pub fn for_each<F> (&self, mut f: F) where F: FnMut(&AircraftState) {
        for e in self.aircraft.iter() {
            f( e.value())
        }
    }

    /// remove all aircraft that have not been updated within `drop_after` and return their ids
    pub fn remove_stale (&self, drop_after: Duration, now: DateTime<Utc>)->Vec<String> {
        let mut dropped: Vec<String> = Vec::new();

        self.aircraft.retain( |hex_id, ac| {
            if duration_since( &now, &ac.last_update) > drop_after {
                dropped.push( hex_id.clone());
                false
            } else {
                true
            }
        });

        if !dropped.is_empty() {
            debug!("dropped stale aircraft {:?}", dropped);
        }
        dropped
    }
}
