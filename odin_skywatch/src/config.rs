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

use std::{env, fs, path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use tracing::debug;
use crate::{errors::{OdinSkywatchError, Result, config_error}, target::ObserverLocation};

/// what to do when the feed connection closes or fails
#[derive(Deserialize,Serialize,Debug,Clone,Copy,PartialEq,Eq,Default)]
pub enum DisconnectPolicy {
    /// stop the tracker and terminate
    #[default]
    Shutdown,
    /// keep publishing targets from the last known states until cancelled
    Continue
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct SkywatchConfig {
    pub url: String, // host:port of the SBS socket
    pub observer: ObserverLocation,

    #[serde(default="default_update_interval")]
    pub update_interval: Duration, // tracker cycle

    #[serde(default)]
    pub drop_after: Option<Duration>, // evict aircraft that were not updated for this long (None: keep forever)

    #[serde(default)]
    pub on_disconnect: DisconnectPolicy,
}

fn default_update_interval ()->Duration { Duration::from_secs(5) }

impl SkywatchConfig {
    pub fn new (url: impl Into<String>, observer: ObserverLocation)->Self {
        SkywatchConfig {
            url: url.into(),
            observer,
            update_interval: default_update_interval(),
            drop_after: None,
            on_disconnect: DisconnectPolicy::default()
        }
    }

    pub fn check (&self)->Result<()> {
        if self.url.trim().is_empty() { return Err( config_error!("no feed url")) }
        if self.update_interval.is_zero() { return Err( config_error!("update_interval must not be zero")) }
        if let Some(d) = self.drop_after && d.is_zero() { return Err( config_error!("drop_after must not be zero")) }
        Ok(())
    }
}

/// look up a config file. Explicit paths are used as is, otherwise we check (in this order)
/// `$ODIN_HOME/configs/<crate>/`, `~/.odin/configs/<crate>/` and finally the `configs/` dir of this crate
pub fn find_config_file (filename: &str)->Option<PathBuf> {
    let resource_crate = env!("CARGO_PKG_NAME");

    let path = Path::new( filename);
    if path.is_file() { return Some( path.to_path_buf()) }

    let mut candidates: Vec<PathBuf> = Vec::with_capacity(3);
    if let Ok(odin_home) = env::var("ODIN_HOME") {
        candidates.push( [odin_home.as_str(), "configs", resource_crate, filename].iter().collect());
    }
    if let Ok(home) = env::var("HOME") {
        candidates.push( [home.as_str(), ".odin", "configs", resource_crate, filename].iter().collect());
    }
    candidates.push( [env!("CARGO_MANIFEST_DIR"), "configs", filename].iter().collect());

    candidates.into_iter().find( |p| p.is_file())
}

pub fn load_config_path<C,P> (path: P)->Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let data = fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// load a RON config using `find_config_file` lookup
pub fn load_config<C> (filename: &str)->Result<C> where C: for <'a> Deserialize<'a> {
    let path = find_config_file( filename).ok_or_else( || config_error!("config file not found: {}", filename))?;
    debug!("loading config {:?}", path);
    load_config_path( path)
}
