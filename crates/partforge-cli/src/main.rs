//! partforge CLI - parametric part generator
//!
//! Builds a part family from command-line dimensions and writes one binary
//! STL file per printable component.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use partforge::parts::{
    AdapterConfig, CapsuleConfig, ContainerConfig, EnclosureConfig, VentStyle,
};
use partforge::Part;

#[derive(Parser)]
#[command(name = "partforge")]
#[command(about = "Parametric 3D-printable part generator", long_about = None)]
struct Cli {
    /// Output file prefix; components are written as <prefix>_<part>.stl
    #[arg(short, long, global = true, default_value = "part")]
    output: String,

    /// Directory to write STL files into
    #[arg(long, global = true, default_value = ".")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum VentKind {
    Hex,
    Slots,
    None,
}

#[derive(Subcommand)]
enum Commands {
    /// Threaded EDC capsule (body + screw cap)
    Capsule {
        #[arg(long, default_value_t = 15.0)]
        inner_diameter: f64,
        #[arg(long, default_value_t = 1.5)]
        wall_thickness: f64,
        #[arg(long, default_value_t = 60.0)]
        height: f64,
        /// Sag of the domed ends
        #[arg(long, default_value_t = 4.0)]
        dent: f64,
        #[arg(long, default_value_t = 6)]
        turns: u32,
        /// Skip the knurled grip texture
        #[arg(long)]
        no_knurl: bool,
    },
    /// Screw-cap storage container (body + cap)
    Container {
        #[arg(long, default_value_t = 40.0)]
        inner_diameter: f64,
        #[arg(long, default_value_t = 2.0)]
        wall_thickness: f64,
        #[arg(long, default_value_t = 50.0)]
        inner_height: f64,
        #[arg(long, default_value_t = 10.0)]
        cap_height: f64,
        /// Bottom dome sag; 0 gives a flat bottom
        #[arg(long, default_value_t = 5.0)]
        dent: f64,
        #[arg(long, default_value_t = 3)]
        turns: u32,
        #[arg(long, default_value_t = 0.6)]
        thread_clearance: f64,
        #[arg(long)]
        no_knurl: bool,
    },
    /// Snap-lid electronics enclosure (bottom + top)
    Enclosure {
        #[arg(long, default_value_t = 45.0)]
        inner_width: f64,
        #[arg(long, default_value_t = 39.99)]
        inner_depth: f64,
        #[arg(long, default_value_t = 18.0)]
        inner_height: f64,
        #[arg(long, default_value_t = 1.5)]
        wall_thickness: f64,
        #[arg(long, default_value_t = 6.0)]
        latch_width: f64,
        #[arg(long, default_value_t = 2)]
        num_latches: usize,
        /// Rubber feet recess diameter; 0 disables
        #[arg(long, default_value_t = 10.0)]
        feet_diameter: f64,
        /// Skip the mounting ears
        #[arg(long)]
        no_ears: bool,
        /// Lid ventilation pattern
        #[arg(long, value_enum, default_value_t = VentKind::Hex)]
        vent: VentKind,
    },
    /// Stash-jar adapter (container + outer cap + core cap)
    Adapter {
        #[arg(long, default_value_t = 62.0)]
        outer_diameter: f64,
        #[arg(long, default_value_t = 2.5)]
        wall_thickness: f64,
        #[arg(long, default_value_t = 25.0)]
        height: f64,
        #[arg(long, default_value_t = 11.0)]
        dent: f64,
        #[arg(long, default_value_t = 0.2)]
        container_wall: f64,
        #[arg(long, default_value_t = 0.8)]
        thread_clearance: f64,
        #[arg(long)]
        no_knurl: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let parts: Vec<(&str, Part)> = match cli.command {
        Commands::Capsule {
            inner_diameter,
            wall_thickness,
            height,
            dent,
            turns,
            no_knurl,
        } => {
            let config = CapsuleConfig {
                inner_diameter,
                wall_thickness,
                height,
                dent,
                turns,
                knurled: !no_knurl,
            };
            let built = config.build()?;
            vec![("body", built.body), ("cap", built.cap)]
        }
        Commands::Container {
            inner_diameter,
            wall_thickness,
            inner_height,
            cap_height,
            dent,
            turns,
            thread_clearance,
            no_knurl,
        } => {
            let config = ContainerConfig {
                inner_diameter,
                wall_thickness,
                inner_height,
                cap_height,
                dent,
                thread_clearance,
                turns,
                knurled_cap: !no_knurl,
            };
            let built = config.build()?;
            vec![("body", built.body), ("cap", built.cap)]
        }
        Commands::Enclosure {
            inner_width,
            inner_depth,
            inner_height,
            wall_thickness,
            latch_width,
            num_latches,
            feet_diameter,
            no_ears,
            vent,
        } => {
            let config = EnclosureConfig {
                inner_width,
                inner_depth,
                inner_height,
                wall_thickness,
                latch_width,
                num_latches,
                rubber_feet_diameter: feet_diameter,
                mounting_ears: !no_ears,
                vent: match vent {
                    VentKind::Hex => Some(VentStyle::HexGrid {
                        columns: 6,
                        rows: 5,
                        hex_radius: 1.5,
                        wall_thickness: 2.0,
                    }),
                    VentKind::Slots => Some(VentStyle::SlantedSlots {
                        count: 16,
                        fill_ratio: 0.5,
                    }),
                    VentKind::None => None,
                },
                ..EnclosureConfig::default()
            };
            let built = config.build()?;
            vec![("bottom", built.bottom), ("top", built.top)]
        }
        Commands::Adapter {
            outer_diameter,
            wall_thickness,
            height,
            dent,
            container_wall,
            thread_clearance,
            no_knurl,
        } => {
            let config = AdapterConfig {
                outer_diameter,
                wall_thickness,
                height,
                dent,
                container_wall_thickness: container_wall,
                thread_clearance,
                knurled: !no_knurl,
            };
            let built = config.build()?;
            vec![
                ("container", built.container),
                ("cap_outer", built.cap_external),
                ("cap_core", built.cap_internal),
            ]
        }
    };

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    for (suffix, part) in &parts {
        let path = cli.out_dir.join(format!("{}_{}.stl", cli.output, suffix));
        let bytes = part.to_stl()?;
        fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        let (min, max) = part.bounding_box();
        println!(
            "Wrote {} ({:.1} x {:.1} x {:.1} mm, {} KiB)",
            path.display(),
            max[0] - min[0],
            max[1] - min[1],
            max[2] - min[2],
            bytes.len() / 1024
        );
    }

    Ok(())
}
