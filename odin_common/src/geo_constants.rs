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

/// common geodetic constants that should be consistent through ODIN applications

/// mean earth radius in meters
pub const MEAN_EARTH_RADIUS: f64 = 6371000.0;
pub const MER_SQUARED: f64 = MEAN_EARTH_RADIUS * MEAN_EARTH_RADIUS;

/// mean earth radius in nautical miles, as used for great circle dead reckoning
pub const MEAN_EARTH_RADIUS_NM: f64 = 3440.065;

