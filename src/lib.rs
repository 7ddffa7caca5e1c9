//! # Wilson plot
//!
//! Reads the intensity statistics by resolution shell from a crystallographic
//! data-reduction log (CCP4 TRUNCATE loggraph tables) and draws the Wilson plot,
//! ln(<I>) versus 1/d^2.
//!
//! ```no_run
//! use wilson_plot::{wilson, PlotSpec, Representative, ResolutionTable};
//!
//! let table = ResolutionTable::from_path("3173d_1_truncate.log")?;
//! let points = wilson::points(&table, Representative::High);
//! PlotSpec::new("3173d_1-WilsonPlot.png").render(&points)?;
//! # Ok::<(), wilson_plot::Error>(())
//! ```

mod error;
pub mod plot;
pub mod table;
pub mod wilson;

pub use error::Error;
pub use plot::{PlotError, PlotSpec};
pub use table::{ParseError, ResolutionBin, ResolutionTable};
pub use wilson::{Representative, WilsonPoint};
