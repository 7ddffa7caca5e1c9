use std::path::PathBuf;

use structopt::StructOpt;
use wilson_plot::{wilson, Error, PlotSpec, Representative, ResolutionTable};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "wilson-plot",
    about = "Wilson plot of the resolution table of a TRUNCATE log"
)]
struct Opt {
    /// Path to the data-reduction log file
    #[structopt(parse(from_os_str))]
    log: PathBuf,
    /// Path to the Wilson plot image, the format follows the extension (png, svg, jpg, bmp, tif)
    #[structopt(parse(from_os_str))]
    image: PathBuf,
    /// Shell resolution used for 1/d^2: high, low or mean
    #[structopt(short, long, default_value = "high")]
    resolution: Representative,
    /// Image width in pixels
    #[structopt(long, default_value = "1200")]
    width: u32,
    /// Image height in pixels
    #[structopt(long, default_value = "900")]
    height: u32,
    /// Draw the points only
    #[structopt(long)]
    no_line: bool,
    /// Remove the resolution axis at the top of the plot
    #[structopt(long)]
    no_resolution_axis: bool,
    /// Save the Wilson plot points to CSV file
    #[structopt(long, parse(from_os_str))]
    csv: Option<PathBuf>,
    /// Display the resolution table summary
    #[structopt(short, long)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let table = ResolutionTable::from_path(&opt.log).map_err(Error::from)?;
    if opt.summary {
        table.summary();
    }

    let points = wilson::points(&table, opt.resolution);
    PlotSpec::new(&opt.image)
        .size(opt.width, opt.height)
        .connect(!opt.no_line)
        .resolution_axis(!opt.no_resolution_axis)
        .render(&points)
        .map_err(Error::from)?;

    if let Some(filename) = opt.csv {
        wilson::to_csv(&points, filename).map_err(Error::from)?;
    }

    Ok(())
}
