use docopt::Docopt;
use log::info;
use maze_carver::{
    analysis::MazeStats,
    cells::LogicalCell,
    grid::MazeGrid,
    pathing,
    renderers,
    settings::MazeSettings,
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{
    fs::{self, File},
    io::{self, prelude::*},
    path::Path,
};

const USAGE: &str = "Maze Carver

Usage:
    maze_driver -h | --help
    maze_driver [options]

Options:
    -h --help              Show this screen.
    --rows=<n>             Logical cell rows [default: 15].
    --cols=<n>             Logical cell columns [default: 15].
    --inner-rows=<n>       Rows of the open room in the middle, 0 for no room [default: 5].
    --inner-cols=<n>       Columns of the open room in the middle, 0 for no room [default: 5].
    --drop=<p>             Probability of removing each remaining interior wall [default: 0.02].
    --ratio=<r>            Chance of growing from the newest frontier cell, higher is windier [default: 0.75].
    --seed=<s>             Seed for a reproducible maze. Random when not given.
    --unclamped            Use the dimensions as given instead of clamping sides to 5..26.
    --no-entrances         Do not open the entrance above the first cell and the exit below the last.
    --from-file=<path>     Load a maze in text form ('#' wall, '.' open) instead of generating one.
    --show-path            Draw the route from entrance to exit, or the longest route without entrances.
    --stats                Print structural statistics of the maze.
    --text-out=<path>      Write the text rendering to a file instead of standard output.
    --image-out=<path>     Also render the maze as a PNG image.
    --cell-pixels=<n>      Pixel side length of one grid position in the image [default: 10].
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_rows: usize,
    flag_cols: usize,
    flag_inner_rows: usize,
    flag_inner_cols: usize,
    flag_drop: f32,
    flag_ratio: f32,
    flag_seed: Option<u64>,
    flag_unclamped: bool,
    flag_no_entrances: bool,
    flag_from_file: String,
    flag_show_path: bool,
    flag_stats: bool,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u8,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::maze_carver::errors::Error, ::maze_carver::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let (grid, has_entrances) = if args.flag_from_file.is_empty() {
        generate_maze(&args)?
    } else {
        (load_maze(&args.flag_from_file)?, false)
    };

    let path = if args.flag_show_path {
        Some(solution_path(&grid, has_entrances))
    } else {
        None
    };

    let text = renderers::render_text(&grid, path.as_ref().map(|p| p.as_slice()));
    if args.flag_text_out.is_empty() {
        print!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_image_out.is_empty() {
        let render_options = renderers::RenderOptionsBuilder::new()
            .cell_side_pixels(args.flag_cell_pixels)
            .path(path.as_ref().map(|p| p.as_slice()))
            .output_file(Some(Path::new(&args.flag_image_out)))
            .build();
        renderers::render_png(&grid, &render_options)
            .chain_err(|| format!("Failed to render maze image {}", args.flag_image_out))?;
        info!("Wrote maze image to {}", args.flag_image_out);
    }

    if args.flag_stats {
        println!("{}", MazeStats::of(&grid));
    }

    Ok(())
}

fn generate_maze(args: &MazeArgs) -> Result<(MazeGrid, bool)> {
    let requested = MazeSettings {
        rows: args.flag_rows,
        cols: args.flag_cols,
        inner_rows: args.flag_inner_rows,
        inner_cols: args.flag_inner_cols,
        drop_probability: args.flag_drop,
        ratio: args.flag_ratio,
        entrances: !args.flag_no_entrances,
    };
    let settings = if args.flag_unclamped {
        requested
    } else {
        requested.clamped()
    };
    if settings != requested {
        info!("Clamped maze settings to {:?}", settings);
    }

    let seed = args.flag_seed.unwrap_or_else(rand::random);
    info!("Generating maze with seed {}", seed);
    let mut rng = XorShiftRng::seed_from_u64(seed);

    let grid = settings.build_maze(&mut rng)?;
    Ok((grid, settings.entrances))
}

fn load_maze(file_path_str: &str) -> Result<MazeGrid> {
    let text = fs::read_to_string(file_path_str)
        .chain_err(|| format!("Failed to read maze file {}", file_path_str))?;
    Ok(MazeGrid::from_debug_str(&text)?)
}

/// Entrance to exit when the default entrances are open, otherwise the longest route.
fn solution_path(grid: &MazeGrid, has_entrances: bool) -> Vec<LogicalCell> {
    if has_entrances {
        let entrance = LogicalCell::new(0, 0);
        let exit = LogicalCell::new(grid.rows().0 - 1, grid.columns().0 - 1);
        let route = pathing::Distances::new(grid, entrance)
            .and_then(|distances| pathing::shortest_path(grid, &distances, exit));
        if let Some(route) = route {
            return route;
        }
        info!("No route from {} to {}, showing the longest route instead", entrance, exit);
    }
    pathing::longest_path(grid)
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
