use std::env;
use std::io;
use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use log::info;
use rusttype::Font;

use flightdeck::panel::{Panel, PanelConfig};
use flightdeck::telemetry::spawn_reader;
use flightdeck::{AltimeterConfig, CompassConfig, FaceStyle, UnitStep};

const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

struct Args {
    title: String,
    inverse_color: bool,
    no_shading: bool,
    meters: bool,
    step: UnitStep,
    font_path: String,
    demo: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut parsed = Self {
            title: "Ground station".to_string(),
            inverse_color: false,
            no_shading: false,
            meters: false,
            step: UnitStep::default(),
            font_path: DEFAULT_FONT.to_string(),
            demo: false,
        };
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--title" => {
                    parsed.title = args.next().context("--title needs a value")?;
                }
                "--inverse-color" => parsed.inverse_color = true,
                "--no-shading" => parsed.no_shading = true,
                "--meters" => parsed.meters = true,
                "--step" => {
                    let raw = args.next().context("--step needs a value")?;
                    let value: i64 = raw.parse().with_context(|| format!("bad step {raw:?}"))?;
                    parsed.step = UnitStep::from_value(value)?;
                }
                "--font" => {
                    parsed.font_path = args.next().context("--font needs a path")?;
                }
                "--demo" => parsed.demo = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown argument {other:?} (try --help)"),
            }
        }
        Ok(parsed)
    }
}

fn print_usage() {
    println!(
        "usage: flightdeck [options]\n\
         \n\
         Reads telemetry lines from stdin: altitude [heading] [gauge]\n\
         \n\
         options:\n\
         \x20 --title TEXT      window title\n\
         \x20 --inverse-color   light instrument faces\n\
         \x20 --no-shading      flat fills instead of radial shading\n\
         \x20 --meters          altimeter in meters instead of feet\n\
         \x20 --step N          altimeter unit step: 1, 10 or 100\n\
         \x20 --font PATH       TTF/OTF font file\n\
         \x20 --demo            built-in sweep instead of stdin"
    );
}

fn load_font(path: &str) -> Result<Font<'static>> {
    let data = std::fs::read(path).with_context(|| format!("reading font {path}"))?;
    Font::try_from_vec(data).with_context(|| format!("{path} is not a usable font"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse()?;

    let style = FaceStyle {
        color_inverted: args.inverse_color,
        radial_shading: !args.no_shading,
    };
    let panel_config = PanelConfig::builder()
        .title(args.title.clone())
        .style(style)
        .altimeter(
            AltimeterConfig::builder()
                .style(style)
                .unit_is_feet(!args.meters)
                .unit_step(args.step)
                .build(),
        )
        .compass(CompassConfig::builder().style(style).build())
        .demo(args.demo)
        .build();

    let font = load_font(&args.font_path)?;
    let panel = Panel::new(panel_config)?;

    let receiver = if args.demo {
        None
    } else {
        let (tx, rx) = mpsc::channel();
        // Detached: the worker exits on stdin EOF or when the panel
        // drops `rx`, but a silent stdin would block a join forever.
        drop(spawn_reader(io::BufReader::new(io::stdin()), tx));
        Some(rx)
    };

    info!("starting panel ({})", if args.demo { "demo" } else { "stdin" });
    panel
        .run(font, receiver)
        .map_err(|err| anyhow::anyhow!("{err}"))
}
