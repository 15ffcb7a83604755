//! The instrument panel: owns every widget, drains telemetry once per
//! frame and drives the window loop.
//!
//! Ownership is single-threaded: the UI thread owns the `Panel`, the
//! telemetry worker only ever talks to it through the channel. Samples
//! are applied in arrival order before each redraw.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use bon::Builder;
use log::debug;
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::{
    palette, AltimeterConfig, CompassConfig, FaceStyle, GaugeConfig, StripThresholds,
};
use crate::render::{render_scene, Canvas};
use crate::scene::{DrawCommand, Scene};
use crate::telemetry::TelemetrySample;
use crate::widgets::{Altimeter, Compass, Gauge, Tile};

/// Margin between a tile edge and the instrument case.
const TILE_MARGIN: f64 = 5.0;

#[derive(Debug, Clone, Builder)]
pub struct PanelConfig {
    #[builder(default = "Ground station".to_string())]
    pub title: String,
    #[builder(default = 640)]
    pub window_width: usize,
    #[builder(default = 640)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default)]
    pub style: FaceStyle,
    #[builder(default)]
    pub altimeter: AltimeterConfig,
    #[builder(default)]
    pub compass: CompassConfig,
    pub battery: Option<GaugeConfig>,
    pub velocity: Option<GaugeConfig>,
    /// Drive the instruments from a built-in sawtooth instead of
    /// telemetry.
    #[builder(default = false)]
    pub demo: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_battery(style: FaceStyle) -> Result<GaugeConfig, crate::config::ConfigError> {
    let config = GaugeConfig::builder()
        .style(style)
        .name("BATTERY".to_string())
        .unit_label("V".to_string())
        .range((0.0, 12.6))
        .drawing_step(2.0)
        .sub_step(0.5)
        .strips(StripThresholds::new(0.0, 9.0, 10.5)?)
        .build();
    config.validate()?;
    Ok(config)
}

fn default_velocity(style: FaceStyle) -> Result<GaugeConfig, crate::config::ConfigError> {
    let config = GaugeConfig::builder()
        .style(style)
        .name("VELOCITY".to_string())
        .unit_label("m/s".to_string())
        .range((0.0, 20.0))
        .drawing_step(5.0)
        .sub_step(1.0)
        .build();
    config.validate()?;
    Ok(config)
}

/// Deterministic sawtooth used by demo mode: climbs, wraps, and sweeps
/// the other instruments off the same phase.
#[derive(Debug, Clone, Copy, Default)]
struct DemoState {
    phase: f64,
}

impl DemoState {
    fn tick(&mut self) -> TelemetrySample {
        self.phase = (self.phase + 12.5) % 15_000.0;
        TelemetrySample {
            altitude: self.phase,
            heading: Some((self.phase / 10.0) % 360.0),
            gauge: Some(12.6 - (self.phase / 15_000.0) * 4.0),
        }
    }
}

pub struct Panel {
    config: PanelConfig,
    altimeter: Altimeter,
    compass: Compass,
    battery: Gauge,
    velocity: Gauge,
    demo: Option<DemoState>,
}

impl Panel {
    pub fn new(config: PanelConfig) -> Result<Self, crate::config::ConfigError> {
        let battery = match &config.battery {
            Some(gauge) => {
                gauge.validate()?;
                gauge.clone()
            }
            None => default_battery(config.style)?,
        };
        let velocity = match &config.velocity {
            Some(gauge) => {
                gauge.validate()?;
                gauge.clone()
            }
            None => default_velocity(config.style)?,
        };
        let demo = config.demo.then(DemoState::default);
        Ok(Self {
            altimeter: Altimeter::new(config.altimeter.clone()),
            compass: Compass::new(config.compass.clone()),
            battery: Gauge::new(battery),
            velocity: Gauge::new(velocity),
            config,
            demo,
        })
    }

    /// Apply one sample. Fields a sample does not carry leave the
    /// corresponding instrument untouched.
    pub fn apply_sample(&mut self, sample: TelemetrySample) {
        self.altimeter.set_value(sample.altitude);
        if let Some(heading) = sample.heading {
            self.compass.set_heading(heading);
        }
        if let Some(gauge) = sample.gauge {
            self.battery.set_value(gauge);
        }
    }

    /// Drain everything queued since the last frame, in arrival order.
    pub fn drain(&mut self, receiver: &Receiver<TelemetrySample>) {
        let mut applied = 0usize;
        while let Ok(sample) = receiver.try_recv() {
            self.apply_sample(sample);
            applied += 1;
        }
        if applied > 0 {
            debug!("applied {applied} telemetry samples");
        }
    }

    pub fn altimeter(&self) -> &Altimeter {
        &self.altimeter
    }

    pub fn compass(&self) -> &Compass {
        &self.compass
    }

    pub fn battery(&self) -> &Gauge {
        &self.battery
    }

    /// 2x2 tile layout over the current framebuffer size.
    fn tiles(width: usize, height: usize) -> [Tile; 4] {
        let tile_w = width as f64 / 2.0;
        let tile_h = height as f64 / 2.0;
        let radius = (tile_w.min(tile_h) / 2.0 - TILE_MARGIN).max(1.0);
        [
            Tile::new(tile_w / 2.0, tile_h / 2.0, radius),
            Tile::new(tile_w * 1.5, tile_h / 2.0, radius),
            Tile::new(tile_w / 2.0, tile_h * 1.5, radius),
            Tile::new(tile_w * 1.5, tile_h * 1.5, radius),
        ]
    }

    /// Build the whole frame: background, then each instrument in its
    /// tile.
    pub fn scene(&self, width: usize, height: usize) -> Scene {
        let mut scene = Scene::new();
        scene.push(DrawCommand::Clear(
            self.config.style.trim(palette::WINDOW_BACKGROUND),
        ));
        let [a, b, c, d] = Self::tiles(width, height);
        self.altimeter.scene_into(&mut scene, a);
        self.compass.scene_into(&mut scene, b);
        self.battery.scene_into(&mut scene, c);
        self.velocity.scene_into(&mut scene, d);
        scene
    }

    /// Run the window loop until the window is closed. Dropping the
    /// receiver on return is what stops the telemetry worker.
    pub fn run(
        mut self,
        font: Font<'static>,
        receiver: Option<Receiver<TelemetrySample>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = std::time::Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            self.drain(receiver);
                        }
                        if let Some(ref mut demo) = self.demo {
                            let sample = demo.tick();
                            self.altimeter.set_value(sample.altitude);
                            if let Some(heading) = sample.heading {
                                self.compass.set_heading(heading);
                            }
                            if let Some(gauge) = sample.gauge {
                                self.battery.set_value(gauge);
                            }
                            self.velocity.set_value(sample.altitude / 750.0);
                        }
                        let scene = self.scene(fb_width, fb_height);
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        render_scene(&mut canvas, &scene, Some(&font));
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
