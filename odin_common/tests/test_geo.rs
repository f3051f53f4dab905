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

use chrono::{TimeZone, Utc};
use uom::si::length::{meter, kilometer, foot};
use uom::si::f64::Length;
use odin_common::angle::*;
use odin_common::geo::*;
use odin_common::datetime::{elapsed_secs_f64, duration_since, local_date_time_to_utc};

// run with "cargo test --test test_geo -- --nocapture"

#[test]
fn test_angles() {
    let lon = Longitude::from_degrees(200.0);
    println!("display lon = {}", lon);
    println!("debug lon = {:?}", lon);
    assert_eq!( lon, Longitude::from_degrees(-160.0));

    let az = Angle360::from_degrees(-90.0);
    assert_eq!( az.degrees(), 270.0);
    assert_eq!( Angle360::from_degrees(370.0).degrees(), 10.0);

    assert!( is_valid_latitude( 90.0));
    assert!( !is_valid_latitude( 90.1));
    assert!( !is_valid_longitude( f64::NAN));
    assert!( is_valid_longitude( -180.0));
}

#[test]
fn test_geo_point3() {
    let input = r#"{ "lat": 51.5074, "lon": -0.1278, "alt": 50.0 }"#;
    let p: GeoPoint3 = serde_json::from_str(input).unwrap();
    println!("deserialized GeoPoint3: {p}");
    assert_eq!( p.latitude_degrees(), 51.5074);
    assert_eq!( p.longitude_degrees(), -0.1278);
    assert_eq!( p.altitude_meters(), 50.0);

    // alternative keys, default altitude
    let p: GeoPoint3 = ron::from_str("( y: 37.0, x: -122.0 )").unwrap();
    assert_eq!( p.altitude_meters(), 0.0);

    let s = serde_json::to_string(&p).unwrap();
    println!("serialized: {s}");
    assert!( s.contains("\"lat\":37.0"));

    assert!( GeoPoint3::from_lon_lat_degrees_alt_meters( 0.0, 91.0, 0.0).check().is_err());
    assert!( GeoPoint3::from_lon_lat_degrees_alt_meters( 181.0, 0.0, 0.0).check().is_err());
    assert!( GeoPoint3::from_lon_lat_degrees_alt_meters( 0.0, 0.0, f64::INFINITY).check().is_err());
}

#[test]
fn test_geodesic_inverse() {
    let london = GeoPoint3::from_lon_lat_degrees_alt_meters( -0.1278, 51.5074, 50.0);
    let eiffel = GeoPoint3::from_lon_lat_alt(
        Longitude::from_degrees( 2.294351), Latitude::from_degrees( 48.858844), Length::new::<foot>(1000.0)
    );

    let inv = london.geodesic_inverse( &eiffel);
    let d_km = inv.distance.get::<kilometer>();
    println!("London -> Eiffel Tower: az = {:.2}, dist = {:.3}km", inv.azimuth.degrees(), d_km);
    assert!( d_km > 338.0 && d_km < 346.0); // ~341km on the ellipsoid
    assert!( inv.azimuth.degrees() > 140.0 && inv.azimuth.degrees() < 155.0);

    let back = eiffel.geodesic_inverse( &london);
    assert!( (back.distance.get::<meter>() - inv.distance.get::<meter>()).abs() < 1e-3);

    let same = london.geodesic_inverse( &london);
    assert_eq!( same.distance.get::<meter>(), 0.0);
    assert_eq!( same.azimuth.degrees(), 0.0);

    // due east on the equator
    let p0 = GeoPoint3::from_lon_lat_degrees_alt_meters( 0.0, 0.0, 0.0);
    let p1 = GeoPoint3::from_lon_lat_degrees_alt_meters( 1.0, 0.0, 0.0);
    let inv = p0.geodesic_inverse( &p1);
    println!("equator 1deg: az = {}, dist = {}m", inv.azimuth.degrees(), inv.distance.get::<meter>());
    assert!( (inv.azimuth.degrees() - 90.0).abs() < 1e-6);
    assert!( (inv.distance.get::<meter>() - 111_319.49).abs() < 1.0);
}

#[test]
fn test_datetime() {
    let t0 = Utc.with_ymd_and_hms( 2025, 3, 1, 12, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms( 2025, 3, 1, 12, 0, 30).unwrap();

    assert_eq!( elapsed_secs_f64( &t1, &t0), 30.0);
    assert_eq!( elapsed_secs_f64( &t0, &t1), -30.0);
    assert_eq!( duration_since( &t0, &t1).as_secs(), 0);

    let tz: chrono_tz::Tz = "America/Los_Angeles".parse().unwrap();
    let dt = local_date_time_to_utc( "2016/03/11", "%Y/%m/%d", "13:07:05.343", "%H:%M:%S%.3f", &tz).unwrap();
    println!("2016/03/11 13:07:05.343 PST = {dt}");
    assert_eq!( dt.to_rfc3339(), "2016-03-11T21:07:05.343+00:00");

    assert!( local_date_time_to_utc( "2016-03-11", "%Y/%m/%d", "13:07:05.343", "%H:%M:%S%.3f", &tz).is_err());
}
