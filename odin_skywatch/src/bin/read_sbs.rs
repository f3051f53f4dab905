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

use anyhow::Result;
use chrono_tz::Tz;
use odin_common::{define_cli, check_cli, u8extractor::{AsyncCsvExtractor, CsvFieldExtractor}};
use odin_skywatch::{connector::connect, sbs::parse_report};

define_cli! { ARGS [about="SBS socket monitoring tool"] =
    url: String [help="host:port from where to read SBS messages"],
    tz: String [help="timezone of message source (e.g. America/Los_Angeles)"]
}

#[tokio::main]
async fn main() -> Result<()> {
    check_cli!(ARGS);
    let tz: Tz = ARGS.tz.parse()?;
    let mut csv = AsyncCsvExtractor::new( connect( &ARGS.url).await?);

    while csv.next_line().await? {
        match parse_report( &csv) {
            Ok(report) => {
                match report.generated_utc( &tz) {
                    Some(Ok(date)) => println!("{date}: {report}"),
                    _ => println!("{report}")
                }
            }
            Err(e) => println!("PARSE ERROR for {}: {}", csv.line(), e)
        }
    }
    Ok(())
}
