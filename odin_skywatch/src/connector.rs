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

use std::fmt;
use tokio::{io::{AsyncBufRead, BufReader}, net::TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};
use odin_common::u8extractor::{AsyncCsvExtractor, CsvFieldExtractor};
use crate::{errors::Result, sbs::parse_report, store::AircraftStore};

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum IngestEnd { Eof, Cancelled }

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct IngestStats {
    pub n_lines: u64,
    pub n_merged: u64,
    pub n_rejected: u64,
    pub n_new: u64,
    pub n_oversized: u64, // lines dropped for exceeding the max line length
    pub end: IngestEnd
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{:?} after {} lines ({} merged, {} rejected, {} oversized, {} aircraft)",
            self.end, self.n_lines, self.n_merged, self.n_rejected, self.n_oversized, self.n_new)
    }
}

/// open the TCP connection to a SBS feed (e.g. dump1090 port 30003)
pub async fn connect (url: &str)->Result<BufReader<TcpStream>> {
    let stream = TcpStream::connect( url).await?;
    info!("connected to SBS feed {}", url);
    Ok( BufReader::with_capacity( 8192, stream))
}

/// read lines from `reader` until EOF or cancellation, parsing each line and merging it into the store.
/// Records without identity and lines longer than `MAX_LINE_LEN` are dropped. The reader (and hence
/// the connection) is dropped on return, including read errors
pub async fn ingest<R> (reader: R, store: &AircraftStore, cancel: &CancellationToken)->Result<IngestStats>
    where R: AsyncBufRead + Unpin
{
    let mut csv = AsyncCsvExtractor::new( reader);
    let mut stats = IngestStats { n_lines: 0, n_merged: 0, n_rejected: 0, n_new: 0, n_oversized: 0, end: IngestEnd::Eof };

    loop {
        let has_line = tokio::select! {
            biased;
            _ = cancel.cancelled() => { stats.end = IngestEnd::Cancelled; break }
            res = csv.next_line() => res?
        };
        if !has_line { break }

        if csv.line().trim().is_empty() { continue }
        stats.n_lines += 1;

        match parse_report( &csv) {
            Ok(report) => {
                if store.update( &report) { stats.n_new += 1 }
                stats.n_merged += 1;
            }
            Err(e) => {
                stats.n_rejected += 1;
                warn!("dropping record: {}", e);
            }
        }
    }

    stats.n_oversized = csv.n_oversized();
    if stats.n_oversized > 0 {
        warn!("dropped {} oversized lines", stats.n_oversized);
    }
    debug!("ingest ended: {}", stats);
    Ok(stats)
}
