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

//! this module provides support to extract positional, comma separated fields from line oriented
//! text input such as the SBS BaseStation format.
//!
//! We keep one line buffer per extractor and only store the field boundaries, i.e. there is no per-field
//! allocation. Typed values are parsed on demand through the [`CsvReadable`] trait. Field semantics are:
//!   - a column that does not exist in the line (short record) is *absent*
//!   - a column that is empty or only contains whitespace is *absent*
//!   - a column that is present but cannot be parsed into the requested type is *invalid*
//!
//! ```
//!     use odin_common::u8extractor::{CsvRecord,CsvFieldExtractor,CsvStr};
//!
//!     let rec = CsvRecord::from_line("MSG,3,1,1,4CA2D6,1,,,,,,37000,,,51.5,-0.12");
//!     let icao24: Option<CsvStr> = rec.field(4);
//!     let alt: Option<i64> = rec.field(11);
//!     let spd: Option<f64> = rec.field(12); // empty column
//!
//!     assert_eq!( icao24.map(|s| s.as_str()), Some("4CA2D6"));
//!     assert_eq!( alt, Some(37000));
//!     assert!( spd.is_none());
//! ```

use std::{io::{BufRead, Read}, ops::Deref};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use memchr::{memchr, memchr_iter};

use crate::errors::{OdinCommonError, Result};

/// a type that can be parsed from a (trimmed, non-empty) CSV column and lives at least as long as the line buffer
pub trait CsvReadable<'a>: Sized {
    fn from_csv (s: &'a str)->Option<Self>;
}

/// a zero-copy string column value
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct CsvStr<'a>(pub &'a str);

impl<'a> CsvStr<'a> {
    pub fn as_str (&self)->&'a str { self.0 }
}

impl<'a> Deref for CsvStr<'a> {
    type Target = &'a str;
    fn deref(&self) -> &Self::Target { &self.0 }
}

/* #region CsvReadable impls ************************************************************************************/

impl<'a> CsvReadable<'a> for CsvStr<'a> {
    fn from_csv (s: &'a str)->Option<Self> { Some(CsvStr(s)) }
}

impl<'a> CsvReadable<'a> for String {
    fn from_csv (s: &'a str)->Option<Self> { Some(s.to_string()) }
}

impl<'a> CsvReadable<'a> for u8 {
    fn from_csv (s: &'a str)->Option<Self> { s.parse().ok() }
}

impl<'a> CsvReadable<'a> for u64 {
    fn from_csv (s: &'a str)->Option<Self> { s.parse().ok() }
}

impl<'a> CsvReadable<'a> for i64 {
    fn from_csv (s: &'a str)->Option<Self> { s.parse().ok() }
}

impl<'a> CsvReadable<'a> for f64 {
    fn from_csv (s: &'a str)->Option<Self> {
        s.parse::<f64>().ok().filter( |v| v.is_finite()) // no "NaN" or "inf" columns
    }
}

/// flags are encoded as "0" (false) and "-1" or "1" (true)
impl<'a> CsvReadable<'a> for bool {
    fn from_csv (s: &'a str)->Option<Self> {
        match s {
            "0" => Some(false),
            "1" | "-1" => Some(true),
            _ => None
        }
    }
}

/* #endregion CsvReadable impls */

/// the generic interface to access fields of the current line
pub trait CsvFieldExtractor {
    /// the current line (without line terminator)
    fn line (&self)->&str;

    /// number of columns in the current line
    fn num_fields (&self)->usize;

    /// the untrimmed column content, or None if the line has fewer columns
    fn raw_field (&self, idx: usize)->Option<&str>;

    /// the trimmed column content, or None if the column is missing or blank
    fn field_str (&self, idx: usize)->Option<&str> {
        self.raw_field( idx).map( str::trim).filter( |s| !s.is_empty())
    }

    /// the typed value of a column, or None if the column is absent or invalid
    fn field<'a,T> (&'a self, idx: usize)->Option<T> where T: CsvReadable<'a> {
        self.field_str( idx).and_then( T::from_csv)
    }

    /// the typed value of a column if it is present and valid, Ok(None) if it is absent and
    /// an error if it is present but cannot be parsed as a T
    fn try_field<'a,T> (&'a self, idx: usize)->Result<Option<T>> where T: CsvReadable<'a> {
        match self.field_str( idx) {
            Some(s) => match T::from_csv( s) {
                Some(v) => Ok(Some(v)),
                None => Err( OdinCommonError::FieldError( format!("invalid {} value in column {}: '{}'", std::any::type_name::<T>(), idx, s)))
            }
            None => Ok(None)
        }
    }
}

/// a single line with pre-computed field boundaries
#[derive(Debug,Clone,Default)]
pub struct CsvRecord {
    line: String,
    bounds: Vec<(usize,usize)>
}

impl CsvRecord {
    pub fn new ()->Self {
        CsvRecord { line: String::with_capacity(256), bounds: Vec::with_capacity(24) }
    }

    pub fn from_line (line: &str)->Self {
        let mut rec = CsvRecord::new();
        rec.set_line( line);
        rec
    }

    pub fn set_line (&mut self, line: &str) {
        self.line.clear();
        self.line.push_str( line.trim_end_matches( ['\r','\n']));
        self.split();
    }

    /// set from raw bytes, replacing invalid UTF-8 sequences so that a garbled line does not stop the input
    pub fn set_bytes (&mut self, bytes: &[u8]) {
        let s = String::from_utf8_lossy( bytes);
        self.set_line( &s);
    }

    pub fn clear (&mut self) {
        self.line.clear();
        self.bounds.clear();
    }

    fn split (&mut self) {
        self.bounds.clear();

        let mut i0 = 0;
        for i in memchr_iter( b',', self.line.as_bytes()) {
            self.bounds.push( (i0,i));
            i0 = i+1;
        }
        self.bounds.push( (i0, self.line.len()));
    }
}

impl CsvFieldExtractor for CsvRecord {
    fn line (&self)->&str { self.line.as_str() }

    fn num_fields (&self)->usize { self.bounds.len() }

    fn raw_field (&self, idx: usize)->Option<&str> {
        self.bounds.get(idx).map( |(i0,i1)| &self.line[*i0..*i1]) // ',' is ASCII so bounds are always char boundaries
    }
}

/// default upper bound for line length in bytes. Longer lines are dropped
pub const MAX_LINE_LEN: usize = 4096;

/// extractor for blocking line input
pub struct CsvExtractor<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    record: CsvRecord,
    max_len: usize,
    n_oversized: u64
}

impl<R: BufRead> CsvExtractor<R> {
    pub fn new (reader: R)->Self { Self::with_max_line_len( reader, MAX_LINE_LEN) }

    pub fn with_max_line_len (reader: R, max_len: usize)->Self {
        CsvExtractor { reader, buf: Vec::with_capacity(256), record: CsvRecord::new(), max_len: max_len.max(1), n_oversized: 0 }
    }

    /// read the next line, returning false at end of input. Lines exceeding the max length are skipped
    pub fn next_line (&mut self)->Result<bool> {
        loop {
            self.buf.clear();
            let n = self.reader.by_ref().take( self.max_len as u64).read_until( b'\n', &mut self.buf)?;
            if n == 0 {
                self.record.clear();
                return Ok(false)
            }

            if n == self.max_len && self.buf.last() != Some(&b'\n') {
                self.n_oversized += 1;
                self.skip_rest_of_line()?;
            } else {
                self.record.set_bytes( &self.buf);
                return Ok(true)
            }
        }
    }

    fn skip_rest_of_line (&mut self)->Result<()> {
        loop {
            let avail = self.reader.fill_buf()?;
            if avail.is_empty() { return Ok(()) }

            let (n, eol) = match memchr( b'\n', avail) {
                Some(i) => (i+1, true),
                None => (avail.len(), false)
            };
            self.reader.consume( n);
            if eol { return Ok(()) }
        }
    }

    pub fn record (&self)->&CsvRecord { &self.record }

    /// number of lines that were dropped because they exceeded the max line length
    pub fn n_oversized (&self)->u64 { self.n_oversized }
}

impl<R: BufRead> CsvFieldExtractor for CsvExtractor<R> {
    fn line (&self)->&str { self.record.line() }
    fn num_fields (&self)->usize { self.record.num_fields() }
    fn raw_field (&self, idx: usize)->Option<&str> { self.record.raw_field( idx) }
}

/// extractor for async (tokio) line input
pub struct AsyncCsvExtractor<R: AsyncBufRead + Unpin> {
    reader: R,
    buf: Vec<u8>,
    record: CsvRecord,
    max_len: usize,
    n_oversized: u64
}

impl<R: AsyncBufRead + Unpin> AsyncCsvExtractor<R> {
    pub fn new (reader: R)->Self { Self::with_max_line_len( reader, MAX_LINE_LEN) }

    pub fn with_max_line_len (reader: R, max_len: usize)->Self {
        AsyncCsvExtractor { reader, buf: Vec::with_capacity(256), record: CsvRecord::new(), max_len: max_len.max(1), n_oversized: 0 }
    }

    /// read the next line, returning false at end of input. Lines exceeding the max length are skipped.
    /// Note this is not cancel safe - if the future is dropped before completion partial line data is lost
    pub async fn next_line (&mut self)->Result<bool> {
        loop {
            self.buf.clear();
            let n = (&mut self.reader).take( self.max_len as u64).read_until( b'\n', &mut self.buf).await?;
            if n == 0 {
                self.record.clear();
                return Ok(false)
            }

            if n == self.max_len && self.buf.last() != Some(&b'\n') {
                self.n_oversized += 1;
                self.skip_rest_of_line().await?;
            } else {
                self.record.set_bytes( &self.buf);
                return Ok(true)
            }
        }
    }

    async fn skip_rest_of_line (&mut self)->Result<()> {
        loop {
            let avail = self.reader.fill_buf().await?;
            if avail.is_empty() { return Ok(()) }

            let (n, eol) = match memchr( b'\n', avail) {
                Some(i) => (i+1, true),
                None => (avail.len(), false)
            };
            self.reader.consume( n);
            if eol { return Ok(()) }
        }
    }

    pub fn record (&self)->&CsvRecord { &self.record }

    pub fn n_oversized (&self)->u64 { self.n_oversized }

    pub fn into_inner (self)->R { self.reader }
}

impl<R: AsyncBufRead + Unpin> CsvFieldExtractor for AsyncCsvExtractor<R> {
    fn line (&self)->&str { self.record.line() }
    fn num_fields (&self)->usize { self.record.num_fields() }
    fn raw_field (&self, idx: usize)->Option<&str> { self.record.raw_field( idx) }
}
