//! Isocity Studio CLI
//!
//! Usage:
//!   isocity-studio <COMMAND> [OPTIONS] <PROJECT_DIR>
//!
//! Commands:
//!   render    Render the map, grid and assignments to SVG
//!   locate    Find the cell at a map coordinate
//!   assign    Assign cells to a zone and print the updated assignments
//!   unassign  Remove a zone's assignment and print the updated assignments
//!   stats     Print assignment counters
//!   zones     List zones grouped by district
//!
//! Set `RUST_LOG=info` to see progress on stderr.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use isocity_studio::grid::find_cell_at;
use isocity_studio::{
    open, AssignError, CellId, SceneConfig, Size, Studio, StudioError, Theme, ViewOptions,
};

#[derive(Parser)]
#[command(name = "isocity-studio")]
#[command(about = "Assign city zones to cells of an isometric grid")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Session {
    /// Project directory containing project.json
    project: PathBuf,

    /// Assignments file to load before running the command
    #[arg(short, long)]
    assignments: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the map, grid and assignments to SVG
    Render {
        #[command(flatten)]
        session: Session,

        /// Theme file for the color palette (TOML format)
        #[arg(short, long)]
        theme: Option<PathBuf>,

        /// Canvas width in pixels (defaults to the map width)
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height in pixels (defaults to the map height)
        #[arg(long)]
        height: Option<f64>,

        /// Hide cell numbers
        #[arg(long)]
        no_numbers: bool,

        /// Grid line opacity between 0 and 1
        #[arg(long)]
        grid_opacity: Option<f64>,

        /// Cells to show as selected
        #[arg(long, value_delimiter = ',')]
        select: Vec<u32>,

        /// Layers to hide
        #[arg(long, value_delimiter = ',')]
        hide_layer: Vec<String>,

        /// Layers to show even if the project hides them
        #[arg(long, value_delimiter = ',')]
        show_layer: Vec<String>,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find the cell at a map coordinate
    Locate {
        #[command(flatten)]
        session: Session,

        x: f64,
        y: f64,
    },

    /// Assign cells to a zone and print the updated assignments
    Assign {
        #[command(flatten)]
        session: Session,

        /// Zone id from the project
        zone: String,

        /// Cell ids to assign
        #[arg(required = true)]
        cells: Vec<u32>,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove a zone's assignment and print the updated assignments
    Unassign {
        #[command(flatten)]
        session: Session,

        zone: String,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print assignment counters
    Stats {
        #[command(flatten)]
        session: Session,
    },

    /// List zones grouped by district
    Zones {
        #[command(flatten)]
        session: Session,

        /// Case-insensitive filter on zone or district names
        #[arg(short, long, default_value = "")]
        filter: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), StudioError> {
    match command {
        Command::Render {
            session,
            theme,
            width,
            height,
            no_numbers,
            grid_opacity,
            select,
            hide_layer,
            show_layer,
            output,
        } => {
            let mut studio = open_session(&session)?;

            let toggles = hide_layer
                .iter()
                .map(|id| (id, false))
                .chain(show_layer.iter().map(|id| (id, true)));
            for (layer, visible) in toggles {
                if !studio.set_layer_visible(layer, visible) {
                    tracing::warn!(layer = %layer, "unknown layer");
                }
            }

            let map = studio.project().map_size();
            studio.set_canvas(Size::new(
                width.unwrap_or(map.width),
                height.unwrap_or(map.height),
            ));

            let mut options = ViewOptions::default().with_numbers(!no_numbers);
            if let Some(opacity) = grid_opacity {
                options = options.with_grid_opacity(opacity);
            }
            studio.set_options(options);

            for cell in select {
                studio.on_cell_click(CellId(cell));
            }

            let mut config = SceneConfig::default();
            if let Some(path) = &theme {
                config = config.with_theme(Theme::from_file(path)?);
            }

            let frame = studio.render(&config);
            write_output(output.as_deref(), &frame.svg)
        }

        Command::Locate { session, x, y } => {
            let mut studio = open_session(&session)?;
            let found = find_cell_at(x, y, studio.cells()).copied();
            match found {
                Some(cell) => {
                    let owner = studio
                        .store()
                        .zone_for_cell(cell.id)
                        .map(|z| studio.project().zone_name(z).to_string());
                    match owner {
                        Some(name) => println!(
                            "cell {} at ({}, {}) assigned to \"{}\"",
                            cell.id, cell.cx, cell.cy, name
                        ),
                        None => println!("cell {} at ({}, {})", cell.id, cell.cx, cell.cy),
                    }
                }
                None => println!("no cell at ({}, {})", x, y),
            }
            Ok(())
        }

        Command::Assign {
            session,
            zone,
            cells,
            output,
        } => {
            let mut studio = open_session(&session)?;
            let group = studio
                .project()
                .zone(&zone)
                .map(|z| z.group.id.clone())
                .ok_or_else(|| AssignError::UnknownZone(zone.clone()))?;
            studio.on_assign_request(&zone, &group, cells.into_iter().map(CellId))?;
            write_output(output.as_deref(), &studio.export_json()?)
        }

        Command::Unassign {
            session,
            zone,
            output,
        } => {
            let mut studio = open_session(&session)?;
            if !studio.on_unassign_request(&zone) {
                tracing::warn!(zone = %zone, "zone has no assignment");
            }
            write_output(output.as_deref(), &studio.export_json()?)
        }

        Command::Stats { session } => {
            let mut studio = open_session(&session)?;
            let stats = studio.stats();
            println!(
                "zones: {}/{}  cells: {}/{}",
                stats.assigned_zones, stats.total_zones, stats.used_cells, stats.total_cells
            );
            Ok(())
        }

        Command::Zones { session, filter } => {
            let studio = open_session(&session)?;
            for group in studio.zone_list(&filter) {
                println!(
                    "{} ({}/{})",
                    group.name,
                    group.assigned_count(),
                    group.zones.len()
                );
                for zone in &group.zones {
                    let mark = if zone.assigned { "x" } else { " " };
                    println!(
                        "  [{}] {} ({}) {} cells",
                        mark, zone.name, zone.id, zone.cell_count
                    );
                }
            }
            Ok(())
        }
    }
}

fn open_session(session: &Session) -> Result<Studio, StudioError> {
    open(&session.project, session.assignments.as_deref())
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), StudioError> {
    match path {
        Some(path) => fs::write(path, content).map_err(|e| StudioError::io(path, e)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
