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

use thiserror::Error;

pub type Result<T> = std::result::Result<T,OdinSkywatchError>;

#[derive(Error,Debug)]
pub enum OdinSkywatchError {

    #[error("parse error {0}")]
    ParseError(String),

    #[error("record without aircraft identity: {0}")]
    MissingIdentity(String),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("RON error {0}")]
    RonError( #[from] ron::error::SpannedError),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("chrono parse error {0}")]
    ChronoParseError( #[from] chrono::ParseError),

    #[error("common error {0}")]
    CommonError( #[from] odin_common::errors::OdinCommonError),

    #[error("insufficient data {0}")]
    InsufficientData( #[from] InsufficientData),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

/// the reasons why we cannot compute a position or target for an aircraft (yet).
/// These are not errors of the system, the aircraft is just skipped for the current cycle
#[derive(Error,Debug,Clone,PartialEq)]
pub enum InsufficientData {

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("out of domain: {0}")]
    OutOfDomain(String),

    #[error("ground distance {0:.0}m exceeds earth radius")]
    BeyondHorizonDomain(f64)
}

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        OdinSkywatchError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        OdinSkywatchError::ConfigError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;
