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

use anyhow::{Result, anyhow};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use odin_common::{define_cli, check_cli};
use odin_skywatch::{
    run_skywatch, load_config, ObserverLocation, SkywatchConfig,
    config::find_config_file, sink::{ConsoleSink, JsonLinesSink}
};

define_cli! { ARGS [about="track ADS-B aircraft look angles from a fixed observer location"] =
    json: bool [help="print target snapshots as JSON lines", long],
    url: Option<String> [help="host:port of the SBS feed (overrides config)", long],
    observer: Option<String> [help="observer location as LAT,LON,HEIGHT in degrees and meters (overrides config)", long, allow_hyphen_values=true],
    config: String [help="config file", long, default_value="skywatch.ron"]
}

fn get_config ()->Result<SkywatchConfig> {
    let observer: Option<ObserverLocation> = ARGS.observer.as_deref().map( |s| s.parse::<ObserverLocation>()).transpose()?;

    let mut config = if find_config_file( &ARGS.config).is_some() {
        load_config::<SkywatchConfig>( &ARGS.config)?
    } else if let Some(url) = &ARGS.url && let Some(observer) = observer {
        SkywatchConfig::new( url.clone(), observer)
    } else {
        return Err( anyhow!("no config file '{}' and no --url and --observer options given", ARGS.config))
    };

    if let Some(url) = &ARGS.url { config.url = url.clone() }
    if let Some(observer) = observer { config.observer = observer }

    Ok(config)
}

#[tokio::main]
async fn main()->Result<()> {
    check_cli!(ARGS);

    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .with_writer( std::io::stderr)
        .init();

    let config = get_config()?;
    info!("tracking {} from {}", config.url, config.observer);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn( async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received ctrl-c, terminating");
                cancel.cancel();
            }
        });
    }

    if ARGS.json {
        run_skywatch( config, JsonLinesSink::new( tokio::io::stdout()), cancel).await?;
    } else {
        run_skywatch( config, ConsoleSink::stdout(), cancel).await?;
    }

    Ok(())
}
