//! Native OpenGL 3.3 window drawing a cellgrid background grid.
//!
//! Run with:
//! ```sh
//! cargo run -p native-grid -- --font-size 18
//! ```

mod cli;
mod demo_screen;
mod logging;
mod window;

use cellgrid_core::{GlslVersion, GridConfig, GridRenderer, ScreenSize};
use cellgrid_font::FontMetrics;
use clap::Parser;
use color_eyre::eyre::{Context, Report, Result};
use glow::HasContext;
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::WindowId,
};

use crate::{
    cli::Cli,
    demo_screen::DemoScreen,
    logging::{LoggingConfig, init_logging},
    window::GlWindow,
};

const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.validate()?;

    let mut logging_config = LoggingConfig::from_env();
    logging_config.json_format |= cli.json_logs;
    init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    info!(version = env!("CARGO_PKG_VERSION"), "native-grid starting up");

    let font = match &cli.font {
        Some(path) => FontMetrics::from_path(path, cli.font_size),
        None => FontMetrics::system_monospace(cli.font_size),
    }
    .wrap_err("Failed to load font")?;

    let event_loop = EventLoop::new().wrap_err("Failed to create event loop")?;
    let mut app = App::new(cli, font);
    event_loop.run_app(&mut app).wrap_err("Event loop failed")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    cli: Cli,
    font: FontMetrics,
    state: Option<AppState>,
    failure: Option<Report>,
}

struct AppState {
    win: GlWindow,
    renderer: GridRenderer<glow::Context>,
}

impl App {
    fn new(cli: Cli, font: FontMetrics) -> Self {
        Self { cli, font, state: None, failure: None }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Report) {
        error!(error = %err, "shutting down");
        self.shutdown(event_loop);
        self.failure = Some(err);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            state.renderer.destroy(&state.win.gl);
        }
        event_loop.exit();
    }
}

impl AppState {
    fn new(event_loop: &ActiveEventLoop, cli: &Cli, font: &mut FontMetrics) -> Result<Self> {
        let win = GlWindow::new(
            event_loop,
            "cellgrid - native OpenGL 3.3",
            (cli.width, cli.height),
        )?;

        let config = GridConfig { glsl_version: GlslVersion::Gl330 };
        let renderer = GridRenderer::initialize(&win.gl, font, &config)
            .wrap_err("Failed to initialize grid renderer")?;

        let mut state = Self { win, renderer };
        let size = state.win.window.inner_size();
        state.resize(ScreenSize::new(size.width, size.height))?;
        Ok(state)
    }

    fn resize(&mut self, screen: ScreenSize) -> Result<()> {
        self.renderer.set_screen_size(&self.win.gl, screen)?;

        let grid = self.renderer.grid_size();
        self.renderer.rebuild_cells(&DemoScreen::new(grid))?;
        info!(rows = grid.rows, columns = grid.columns, "grid resized");
        Ok(())
    }

    fn redraw(&self) -> Result<()> {
        let screen = self.renderer.screen_size();
        let [r, g, b, a] = CLEAR_COLOR;
        unsafe {
            self.win.gl.viewport(0, 0, screen.width as i32, screen.height as i32);
            self.win.gl.clear_color(r, g, b, a);
            self.win.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        self.renderer.render(&self.win.gl)?;
        self.win.swap_buffers()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match AppState::new(event_loop, &self.cli, &mut self.font) {
            Ok(state) => {
                info!(glyphs = self.font.cached_glyphs(), "glyph cache warmed");
                state.win.window.request_redraw();
                self.state = Some(state);
            },
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let result = match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
                return;
            },
            WindowEvent::Resized(new_size) => {
                state.win.resize_surface(new_size);
                let resized = state.resize(ScreenSize::new(new_size.width, new_size.height));
                state.win.window.request_redraw();
                resized
            },
            WindowEvent::RedrawRequested => state.redraw(),
            _ => Ok(()),
        };

        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }
}
