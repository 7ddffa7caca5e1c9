//! Resolution shell table
//!
//! Extraction of the intensity statistics by resolution shell from the loggraph
//! tables written by TRUNCATE (and related CCP4 programs) into their log files.

use regex::{Regex, RegexSet};
use std::{
    fs, io,
    ops::Deref,
    path::{Path, PathBuf},
};

mod columns;
use columns::{fields, Columns};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("no resolution table found in the log")]
    NoTable,
    #[error("malformed row at line {line}: {details}")]
    MalformedRow { line: usize, details: String },
    #[error("failed to read {path:?}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid table pattern")]
    Pattern(#[from] regex::Error),
}
type Result<T> = std::result::Result<T, ParseError>;

/// Lines announcing the resolution table, depending on the program version
const MARKERS: [&str; 6] = [
    "$TABLE: Intensity statistics",
    "$TABLE: Wilson plot",
    "Wilson Plot - Suggested Bfactor",
    "Range N_obs",
    "i  nref  N_unq",
    "$   i   nref",
];
/// Number of lines, from the marker, searched for the column header
const HEADER_LOOKAHEAD: usize = 10;

/// A resolution shell
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionBin {
    low: f64,
    high: f64,
    mean_intensity: f64,
    completeness: Option<f64>,
    i_over_sigma: Option<f64>,
}
impl ResolutionBin {
    /// Creates a shell from its low & high resolution bounds [Å] and its mean intensity
    pub fn new(low: f64, high: f64, mean_intensity: f64) -> Self {
        Self {
            low,
            high,
            mean_intensity,
            completeness: None,
            i_over_sigma: None,
        }
    }
    pub fn with_completeness(self, completeness: f64) -> Self {
        Self {
            completeness: Some(completeness),
            ..self
        }
    }
    pub fn with_i_over_sigma(self, i_over_sigma: f64) -> Self {
        Self {
            i_over_sigma: Some(i_over_sigma),
            ..self
        }
    }
    /// Low resolution bound [Å]
    pub fn low(&self) -> f64 {
        self.low
    }
    /// High resolution bound, the shell limit [Å]
    pub fn high(&self) -> f64 {
        self.high
    }
    pub fn mean_intensity(&self) -> f64 {
        self.mean_intensity
    }
    /// Completeness [%]
    pub fn completeness(&self) -> Option<f64> {
        self.completeness
    }
    pub fn i_over_sigma(&self) -> Option<f64> {
        self.i_over_sigma
    }
}

/// Compiled patterns of the table scanner
struct Scanner {
    markers: RegexSet,
    separator: Regex,
}
impl Scanner {
    fn new() -> Result<Self> {
        Ok(Self {
            markers: RegexSet::new(
                MARKERS
                    .iter()
                    .map(|marker| format!("(?i){}", regex::escape(marker))),
            )?,
            separator: Regex::new(r"^\s*[-=]{3,}\s*$")?,
        })
    }
    /// Whether the line closes the table, the end of the log included
    fn ends_table(&self, line: Option<&&str>) -> bool {
        match line {
            None => true,
            Some(line) => {
                let row = fields(line);
                row.is_empty()
                    || self.separator.is_match(line)
                    || row[0].parse::<f64>().is_err()
            }
        }
    }
    /// Collects the rows following the header at index `start`
    ///
    /// A last row with a different field count, such as a numeric total, is left out.
    fn rows(
        &self,
        lines: &[&str],
        start: usize,
        columns: &Columns,
    ) -> Result<Vec<ResolutionBin>> {
        let mut bins = vec![];
        for (i, line) in lines.iter().enumerate().skip(start) {
            let row = fields(line);
            if row.is_empty() || self.separator.is_match(line) {
                if bins.is_empty() {
                    continue;
                }
                break;
            }
            if row[0].parse::<f64>().is_err() {
                if bins.is_empty() && line.trim_start().starts_with('$') {
                    continue;
                }
                break;
            }
            if !bins.is_empty()
                && row.len() != columns.count()
                && self.ends_table(lines.get(i + 1))
            {
                log::debug!("table closed by a summary row at line {}", i + 1);
                break;
            }
            let bin = columns
                .bin(&row)
                .map_err(|details| ParseError::MalformedRow {
                    line: i + 1,
                    details,
                })?;
            bins.push(bin);
        }
        Ok(bins)
    }
}

/// Resolution shells in table order
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionTable {
    bins: Vec<ResolutionBin>,
    header_line: usize,
}
impl Deref for ResolutionTable {
    type Target = [ResolutionBin];

    fn deref(&self) -> &Self::Target {
        &self.bins
    }
}
impl ResolutionTable {
    /// Loads the resolution table from a log file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Processing {:?}...", path);
        let contents = fs::read(path).map_err(|source| ParseError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_log(&String::from_utf8_lossy(&contents))
    }
    /// Parses the first resolution table found in the log text
    pub fn from_log(log: &str) -> Result<Self> {
        let scanner = Scanner::new()?;
        let lines: Vec<&str> = log.lines().collect();
        let mut k = 0;
        while k < lines.len() {
            if !scanner.markers.is_match(lines[k]) {
                k += 1;
                continue;
            }
            // legacy markers are the column header themselves
            let header = lines
                .iter()
                .enumerate()
                .skip(k)
                .take(HEADER_LOOKAHEAD + 1)
                .find_map(|(i, line)| {
                    Columns::from_header(line).map(|columns| (i, columns))
                });
            let Some((i, columns)) = header else {
                log::debug!("no column header after marker at line {}", k + 1);
                k += 1;
                continue;
            };
            log::debug!(
                "column header at line {} with {} columns",
                i + 1,
                columns.count()
            );
            let bins = scanner.rows(&lines, i + 1, &columns)?;
            if !bins.is_empty() {
                log::info!("{} resolution shells found", bins.len());
                return Ok(Self {
                    bins,
                    header_line: i + 1,
                });
            }
            k = i + 1;
        }
        Err(ParseError::NoTable)
    }
    /// Line number (starting at 1) of the table column header
    pub fn header_line(&self) -> usize {
        self.header_line
    }
    pub fn into_bins(self) -> Vec<ResolutionBin> {
        self.bins
    }
    pub fn summary(&self) {
        let optional =
            |x: Option<f64>| x.map_or_else(|| "-".to_string(), |x| format!("{:.2}", x));
        println!("SUMMARY:");
        println!(" - # of resolution shells: {}", self.len());
        if let (Some(first), Some(last)) = (self.first(), self.last()) {
            println!(
                " - resolution range: [{:.2}-{:.2}]Å",
                first.low(),
                last.high()
            );
        }
        println!(
            "    {:^8} {:^8} {:^12} {:^8} {:^8}",
            "LOW", "HIGH", "<I>", "COMPL", "I/SIG"
        );
        self.iter().for_each(|bin| {
            println!(
                "    {:>8.2} {:>8.2} {:>12.3} {:>8} {:>8}",
                bin.low(),
                bin.high(),
                bin.mean_intensity(),
                optional(bin.completeness()),
                optional(bin.i_over_sigma())
            );
        });
    }
}
