// ============================================================================
// WINDOW HOST
// ============================================================================
//
// A reference host: owns the event loop, a wall-clock tick source and the
// pixel buffer, and redraws the gauge at a capped frame rate.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::Builder;
use pixels::{Pixels, SurfaceTexture};
use tracing::{error, info};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::animation::IntervalTicks;
use crate::canvas::{load_font, render_frame, Canvas, RasterStyle};
use crate::{Gauge, GaugeCommand};

#[derive(Debug, Clone, Builder)]
pub struct WindowConfig {
    #[builder(default, into)]
    pub title: String,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// Window size relative to the gauge's own width and height
    #[builder(default = 2.0)]
    pub zoom: f64,
    /// TrueType font for labels; without one no text is drawn
    pub font_path: Option<PathBuf>,
    #[builder(default)]
    pub style: RasterStyle,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Gauge {
    pub fn show(&mut self, window: &WindowConfig) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(window, None)
    }

    pub fn show_with_commands(
        &mut self,
        window: &WindowConfig,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(window, Some(receiver))
    }

    fn run_window(
        &mut self,
        window_config: &WindowConfig,
        receiver: Option<Receiver<GaugeCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let font = window_config
            .font_path
            .as_deref()
            .map(load_font)
            .transpose()?;
        if font.is_none() {
            info!("no font configured, labels are not drawn");
        }

        let logical_width = self.config().width * window_config.zoom;
        let logical_height = self.config().height * window_config.zoom;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&window_config.title)
            .with_inner_size(LogicalSize::new(logical_width, logical_height))
            .with_resizable(true)
            .build(&event_loop)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let mut ticks = IntervalTicks::new();
        let frame_duration = Duration::from_secs_f64(1.0 / window_config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let window_clone = window.clone();

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
                        if let Err(err) = pixels
                            .resize_buffer(new_size.width, new_size.height)
                            .and_then(|_| pixels.resize_surface(new_size.width, new_size.height))
                        {
                            error!(error = %err, "resize failed");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(receiver) = &receiver {
                            for command in receiver.try_iter() {
                                self.apply(command, &mut ticks);
                            }
                        }
                        for handle in ticks.due(Instant::now()) {
                            self.on_tick(handle, &mut ticks);
                        }

                        let frame = self.redraw();
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        render_frame(&mut canvas, &frame, &window_config.style, font.as_ref());
                        if let Err(err) = pixels.render() {
                            error!(error = %err, "render failed");
                            window_target.exit();
                        }
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
