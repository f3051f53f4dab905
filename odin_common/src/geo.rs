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

/// this module provides support for point geometries on the WGS84 ellipsoid surface
/// Following odin-rs design principles we try to use existing crates, which in this domain
/// is mostly [geo](https://docs.rs/geo/latest/geo/index.html). The `geo` crate does not directly support
/// units-of measure (e.g. for lengths) via the [uom](https://docs.rs/uom/latest/uom/) crate, nor
/// a vertical dimension, which is why we wrap its `Point` type.

use std::fmt;

use serde::ser::{Serialize as SerializeTrait, Serializer, SerializeStruct};
use serde::de::{self, Deserialize as DeserializeTrait, Deserializer, Visitor, SeqAccess, MapAccess};

use geo::{Point, Bearing, Distance, Geodesic};

use uom::si::f64::Length;
use uom::si::length::meter;

use crate::impl_deserialize_struct;
use crate::angle::{Angle360, Latitude, Longitude, is_valid_latitude, is_valid_longitude, normalize_360};
use crate::errors::OdinCommonError;

/* #region GeoPoint3 ***********************************************************************************************/

/// 3 dimensional point given by longitude, latitude and altitude above ellipsoid surface.
/// Note that the underlying `geo::Point` uses x = longitude, y = latitude
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoPoint3 {
    point: Point,
    alt: f64
}

impl GeoPoint3 {
    pub fn from_lon_lat_alt(lon: Longitude, lat: Latitude, alt: Length) -> Self {
        GeoPoint3 {
            point: Point::new( lon.degrees(), lat.degrees()),
            alt: alt.get::<meter>()
        }
    }

    /// note this does not normalize or check - use [`GeoPoint3::check`] for input that is not known to be valid
    pub fn from_lon_lat_degrees_alt_meters (lon: f64, lat: f64, alt: f64) -> Self {
        GeoPoint3 {
            point: Point::new( lon, lat),
            alt
        }
    }

    #[inline] pub fn longitude(&self) -> Longitude { Longitude::from_degrees( self.point.x()) }
    #[inline] pub fn latitude(&self) -> Latitude { Latitude::from_degrees( self.point.y()) }
    #[inline] pub fn altitude(&self) -> Length { Length::new::<meter>(self.alt) }

    pub fn longitude_degrees(&self) -> f64 { self.point.x() }
    pub fn latitude_degrees(&self) -> f64 { self.point.y() }
    pub fn altitude_meters(&self) -> f64 { self.alt }

    pub fn point (&self) -> &Point { &self.point }

    pub fn is_valid (&self)->bool {
        is_valid_latitude( self.point.y()) && is_valid_longitude( self.point.x()) && self.alt.is_finite()
    }

    /// return self if all coordinates are finite and within the geodetic domain
    pub fn check (self)->crate::errors::Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err( OdinCommonError::OutOfRange( format!("invalid geodetic position {self}")))
        }
    }

    /// solve the inverse geodesic problem on the WGS84 ellipsoid for the surface projections of self and `other`.
    /// The azimuth is the forward azimuth at self. Coincident points have an azimuth of 0.
    pub fn geodesic_inverse (&self, other: &GeoPoint3)->GeodesicInverse {
        let dist = Geodesic.distance( self.point, other.point);
        let azimuth = if dist > 0.0 { normalize_360( Geodesic.bearing( self.point, other.point)) } else { 0.0 };

        GeodesicInverse {
            azimuth: Angle360::from_degrees( azimuth),
            distance: Length::new::<meter>(dist)
        }
    }
}

impl fmt::Display for GeoPoint3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.longitude_degrees(),self.latitude_degrees(), self.altitude_meters())
    }
}

impl SerializeTrait for GeoPoint3 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        let mut state = serializer.serialize_struct("GeoPoint3", 3)?;
        state.serialize_field("lon", &self.longitude_degrees())?;
        state.serialize_field("lat", &self.latitude_degrees())?;
        state.serialize_field("alt", &self.altitude_meters())?;
        state.end()
    }
}

impl_deserialize_struct!{ GeoPoint3::from_lon_lat_degrees_alt_meters(
    lon | longitude | x,
    lat | latitude | y,
    alt | altitude | height | z = 0.0
)}

/* #endregion GeoPoint3 */

/// result of an inverse geodesic computation
#[derive(Debug,Clone,Copy)]
pub struct GeodesicInverse {
    pub azimuth: Angle360, // forward azimuth at start point, clockwise from true north
    pub distance: Length   // along the ellipsoid surface
}
