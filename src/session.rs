// Walks the batch: load an image, let the user pick boxes, burn them in,
// export, move on. One image (its Draw Context) is alive at a time.
//
//   Loaded -> Interacting -> Committing -> Loaded | Done

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::codec;
use crate::config::{Config, Job};
use crate::draw::{FrameInput, Surface};
use crate::error::Error;
use crate::geometry::{Rect, Vec2, hull};
use crate::picks::PickStack;
use crate::raster;
use crate::types::{Color, PixelBuffer};
use crate::viewport::Viewport;

/// Behind the letterboxed image.
pub const BACKGROUND: Color = Color::DARK_GRAY;
/// Opacity of the box that follows the pointer before the second click.
pub const PREVIEW_ALPHA: f32 = 0.7;
const CROSSHAIR_SIZE: i32 = 10;
const CROSSHAIR_COLOR: Color = Color::rgba(255, 204, 51, 220);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Interacting,
    Committing,
    Done,
}

/// The image being edited plus everything the user did to it so far.
pub struct DrawContext {
    pub job: Job,
    pub image: PixelBuffer,
    pub picks: PickStack,
    pub viewport: Viewport,
}

impl DrawContext {
    pub fn load(job: Job) -> Result<Self, Error> {
        let image = codec::load(&job.input)?;
        info!(
            "Loaded '{}' ({}x{})",
            job.input.display(),
            image.width(),
            image.height()
        );
        let viewport = Viewport::new(image.width(), image.height());
        Ok(Self { job, image, picks: PickStack::new(), viewport })
    }

    /// Apply one frame of input. `screen` is the window rectangle.
    pub fn handle_input(&mut self, input: &FrameInput, screen: Rect) {
        if input.undo && self.picks.undo() {
            debug!("undo -> {}/{} picks", self.picks.cursor(), self.picks.count());
        }
        if input.redo && self.picks.redo() {
            debug!("redo -> {}/{} picks", self.picks.cursor(), self.picks.count());
        }

        if let Some(mouse) = input.mouse {
            if input.pick {
                if let Some(p) = self.viewport.screen_to_image(screen, mouse) {
                    // Off-image clicks snap to the border, so boxes can reach the edges.
                    let p = self.viewport.full().clamp_point(p);
                    self.picks.push(p);
                    debug!("pick ({:.1}, {:.1}) -> {} picks", p.x, p.y, self.picks.cursor());
                }
            }
            if input.wheel.abs() > 0.1 {
                self.viewport.zoom(screen, mouse, input.wheel.signum());
                debug!("zoom -> {:?}", self.viewport.part());
            }
        }

        for dir in &input.pan {
            self.viewport.pan(*dir);
        }
    }

    /// Draw the current view into `frame`: image, committed boxes,
    /// the live preview box and the pointer crosshair.
    pub fn render(&self, frame: &mut PixelBuffer, mouse: Option<Vec2>, color: Color) {
        frame.fill(BACKGROUND);
        let screen = frame.bounds();
        let display = self.viewport.display_rect(screen);
        raster::draw_image(frame, &self.image, self.viewport.part(), display);

        let Some(to_screen) = self.viewport.image_to_screen_map(screen) else {
            return;
        };
        for r in self.picks.rects() {
            raster::draw_rectangle(frame, to_screen.transform_rect(&r), color);
        }
        if let Some(mouse) = mouse {
            if let Some(first) = self.picks.pending() {
                let preview = hull(to_screen.transform(first), mouse);
                raster::draw_rectangle(frame, preview, color.with_alpha(PREVIEW_ALPHA));
            }
            raster::draw_crosshair(
                frame,
                mouse.x as i32,
                mouse.y as i32,
                CROSSHAIR_SIZE,
                CROSSHAIR_COLOR,
            );
        }
    }

    /// Burn every complete box into the image itself. Returns how many.
    pub fn burn_in(&mut self, color: Color) -> usize {
        let solid = color.with_alpha(1.0);
        let bounds = self.image.bounds();
        let mut count = 0;
        for r in self.picks.rects() {
            // Picks are clamped on entry; clip anyway so a box can never index outside.
            let r = r.intersect(&bounds);
            raster::draw_rectangle(&mut self.image, r, solid);
            count += 1;
        }
        count
    }
}

pub struct Session {
    jobs: Vec<Job>,
    color: Color,
    quality: u8,
    index: usize,
    ctx: Option<DrawContext>,
    stage: Stage,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            jobs: config.jobs,
            color: config.color,
            quality: config.quality,
            index: 0,
            ctx: None,
            stage: Stage::Loaded,
        }
    }

    #[cfg(test)]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn context(&self) -> Option<&DrawContext> {
        self.ctx.as_ref()
    }

    /// Title for the window: file name and position in the batch.
    pub fn title(&self) -> String {
        match &self.ctx {
            Some(ctx) => format!(
                "Bloc: {} [{}/{}]",
                ctx.job.input.display(),
                self.index + 1,
                self.jobs.len()
            ),
            None => "Bloc".to_string(),
        }
    }

    /// Make sure the current image is loaded (Loaded state).
    pub fn load_current(&mut self) -> Result<(), Error> {
        if self.ctx.is_some() || self.stage == Stage::Done {
            return Ok(());
        }
        match self.jobs.get(self.index) {
            Some(job) => {
                self.ctx = Some(DrawContext::load(job.clone())?);
                self.stage = Stage::Loaded;
            }
            None => self.stage = Stage::Done,
        }
        Ok(())
    }

    /// Burn in and export the current image, then drop it.
    fn commit(&mut self) -> Result<(), Error> {
        let Some(mut ctx) = self.ctx.take() else {
            return Ok(());
        };
        self.stage = Stage::Committing;

        if ctx.picks.pending().is_some() {
            warn!(
                "'{}': discarding an unfinished box (only one corner picked)",
                ctx.job.input.display()
            );
        }
        let boxes = ctx.burn_in(self.color);
        ctx.picks.reset();
        codec::save(&ctx.job.output, &ctx.image, self.quality)?;
        info!(
            "Exported '{}' -> '{}' ({} box{})",
            ctx.job.input.display(),
            ctx.job.output.display(),
            boxes,
            if boxes == 1 { "" } else { "es" }
        );
        Ok(())
    }

    /// Commit the current image and load the next one, if any.
    pub fn advance(&mut self) -> Result<(), Error> {
        self.commit()?;
        self.index += 1;
        if self.index >= self.jobs.len() {
            self.stage = Stage::Done;
            info!("All {} image(s) done", self.jobs.len());
            return Ok(());
        }
        self.load_current()
    }

    /// End the session early: export what we have for the current image.
    pub fn finish(&mut self) -> Result<(), Error> {
        if self.stage == Stage::Done {
            return Ok(());
        }
        self.commit()?;
        let left = self.jobs.len().saturating_sub(self.index + 1);
        if left > 0 {
            warn!("Stopped early; {left} image(s) were not processed");
        }
        self.stage = Stage::Done;
        Ok(())
    }

    /// One tick: input, state change, then draw into `frame`.
    pub fn frame(&mut self, input: &FrameInput, frame: &mut PixelBuffer) -> Result<Stage, Error> {
        self.load_current()?;

        if input.quit {
            self.finish()?;
            return Ok(self.stage);
        }
        let color = self.color;
        if input.advance {
            self.advance()?;
            // The confirm frame's other input belongs to the image just exported.
            if let Some(ctx) = self.ctx.as_ref() {
                ctx.render(frame, input.mouse, color);
            }
            return Ok(self.stage);
        }

        if let Some(ctx) = self.ctx.as_mut() {
            self.stage = Stage::Interacting;
            ctx.handle_input(input, frame.bounds());
            ctx.render(frame, input.mouse, color);
        }
        Ok(self.stage)
    }

    /// Drive the whole batch against a window until done or closed.
    pub fn run<S: Surface>(&mut self, surface: &mut S) -> Result<(), Error> {
        self.load_current()?;
        let mut frame = PixelBuffer::new(0, 0, BACKGROUND);

        let mut last_fps_time = Instant::now();
        let mut frames_this_second: u32 = 0;

        while surface.is_open() {
            let input = surface.poll_input();
            let (w, h) = surface.size();
            frame.resize(w, h);

            if self.frame(&input, &mut frame)? == Stage::Done {
                return Ok(());
            }
            surface.set_title(&self.title());
            surface.present(&frame)?;

            frames_this_second += 1;
            let now = Instant::now();
            if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
                let secs = now.duration_since(last_fps_time).as_secs_f32();
                debug!("FPS: {:.1}", frames_this_second as f32 / secs);
                frames_this_second = 0;
                last_fps_time = now;
            }
        }

        // Window closed: same as quitting.
        self.finish()
    }
}
