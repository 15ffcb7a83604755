//! Ground-control flight instruments drawn from scratch.
//!
//! Each instrument is split into three pure layers: configuration
//! ([`config`]), value-to-geometry mapping ([`geometry`]) and a
//! retained draw-command list ([`scene`]) replayed by the software
//! rasterizer ([`render`]). The [`panel`] ties the widgets to a
//! `winit` window with a `pixels` framebuffer and a telemetry channel.
//!
//! ```no_run
//! use flightdeck::panel::{Panel, PanelConfig};
//!
//! let config = PanelConfig::builder().demo(true).build();
//! let panel = Panel::new(config)?;
//! # let font = unimplemented!();
//! panel.run(font, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod geometry;
pub mod panel;
pub mod render;
pub mod scene;
pub mod telemetry;
pub mod widgets;

pub use config::{
    AltimeterConfig, Color, CompassConfig, ConfigError, FaceStyle, GaugeConfig, StripThresholds,
    UnitStep,
};
pub use panel::{Panel, PanelConfig};
pub use telemetry::{spawn_reader, TelemetrySample};
pub use widgets::{Altimeter, Compass, Gauge, Tile};
