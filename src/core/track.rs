//! Recorded ride tracks.
//!
//! One fix per line: `<RFC 3339 timestamp> <lat>,<lon>`, e.g.
//! `2024-07-13T08:15:00Z 47.11504,-122.42719`. Blank lines and `#` comments
//! are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;

use super::model::{Coordinate, CoordinateError, LocationSample};

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("failed to read track: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected `<timestamp> <lat>,<lon>`, got {content:?}")]
    Malformed { line: usize, content: String },
    #[error("line {line}: bad timestamp {value:?}: {source}")]
    Timestamp {
        line: usize,
        value: String,
        source: chrono::ParseError,
    },
    #[error("line {line}: {source}")]
    InvalidCoordinate {
        line: usize,
        source: CoordinateError,
    },
}

pub struct TrackParser {
    line_regex: Regex,
}

impl TrackParser {
    pub fn new() -> Self {
        let line_regex = Regex::new(
            r"^(\S+)\s+([-+]?\d+(?:\.\d+)?)\s*,\s*([-+]?\d+(?:\.\d+)?)$",
        )
        .expect("Invalid track line regex");

        Self { line_regex }
    }

    /// Parse one line. `Ok(None)` for blank lines and comments.
    pub fn parse_line(&self, line_no: usize, line: &str) -> Result<Option<LocationSample>, TrackError> {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let malformed = || TrackError::Malformed {
            line: line_no,
            content: line.to_string(),
        };
        let caps = self.line_regex.captures(line).ok_or_else(malformed)?;

        let time_str = &caps[1];
        let timestamp = DateTime::parse_from_rfc3339(time_str)
            .map_err(|source| TrackError::Timestamp {
                line: line_no,
                value: time_str.to_string(),
                source,
            })?
            .with_timezone(&Utc);

        // Regex admits only plain decimals
        let lat: f64 = caps[2].parse().map_err(|_| malformed())?;
        let lon: f64 = caps[3].parse().map_err(|_| malformed())?;
        let coordinate = Coordinate::new(lat, lon)
            .map_err(|source| TrackError::InvalidCoordinate { line: line_no, source })?;

        Ok(Some(LocationSample::new(coordinate, timestamp)))
    }

    pub fn parse_lines<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<LocationSample>, TrackError> {
        let mut samples = Vec::new();
        for (idx, line) in lines.into_iter().enumerate() {
            if let Some(sample) = self.parse_line(idx + 1, line)? {
                samples.push(sample);
            }
        }
        Ok(samples)
    }
}

impl Default for TrackParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a complete track file.
pub fn read_track(path: impl AsRef<Path>) -> Result<Vec<LocationSample>, TrackError> {
    let content = std::fs::read_to_string(path)?;
    TrackParser::new().parse_lines(content.lines())
}

/// Result of one tail poll: good fixes plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct TailBatch {
    pub samples: Vec<LocationSample>,
    pub rejected: Vec<TrackError>,
}

/// Follows a track file that is still being written.
pub struct TrackTailer {
    file: File,
    position: u64,
    lines_read: usize,
    parser: TrackParser,
    path: PathBuf,
}

impl TrackTailer {
    /// Open at the start of the file so existing fixes are replayed first.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref)?;
        Ok(Self {
            file,
            position: 0,
            lines_read: 0,
            parser: TrackParser::new(),
            path: path_ref.to_path_buf(),
        })
    }

    /// Every complete line appended since the last call.
    ///
    /// A trailing line without its newline is left for the next call. Bad
    /// lines (unparsable or not UTF-8) are consumed and reported in
    /// `rejected`.
    pub fn read_new_samples(&mut self) -> Result<TailBatch, TrackError> {
        let mut batch = TailBatch::default();

        self.file.seek(SeekFrom::Start(self.position))?;
        let mut reader = BufReader::new(&self.file);
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            let bytes_read = match reader.read_until(b'\n', &mut buffer) {
                Ok(n) => n,
                Err(e) if batch.samples.is_empty() && batch.rejected.is_empty() => {
                    return Err(e.into())
                }
                Err(e) => {
                    batch.rejected.push(e.into());
                    break;
                }
            };
            if bytes_read == 0 || buffer.last() != Some(&b'\n') {
                break;
            }
            self.position += bytes_read as u64;
            self.lines_read += 1;

            let parsed = match std::str::from_utf8(&buffer) {
                Ok(line) => self.parser.parse_line(self.lines_read, line),
                Err(_) => Err(TrackError::Malformed {
                    line: self.lines_read,
                    content: String::from_utf8_lossy(&buffer).trim().to_string(),
                }),
            };
            match parsed {
                Ok(Some(sample)) => batch.samples.push(sample),
                Ok(None) => {}
                Err(e) => batch.rejected.push(e),
            }
        }

        Ok(batch)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
