use crate::{plot::PlotError, table::ParseError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to extract the resolution table from the log")]
    Parse(#[from] ParseError),
    #[error("failed to render the Wilson plot")]
    Plot(#[from] PlotError),
    #[error("failed to export the Wilson plot points")]
    Csv(#[from] csv::Error),
}
