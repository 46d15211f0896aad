use crate::{
    assets::store::{AssetLoader, ImageSource, PreparedImage},
    foundation::core::{Canvas, Point, Rect, Rgba8},
    render::surface::{StrokeStyle, Surface},
    sticker::model::{Sticker, StickerId},
    sticker::trigger::RenderTrigger,
};

/// Radius of the transform handle circle.
pub const HANDLE_RADIUS: f64 = 10.0;
const HANDLE_DOT_RADIUS: f64 = 4.0;
const HANDLE_REACH: f64 = HANDLE_RADIUS * 2.0;
const OUTLINE_DASH: [f64; 2] = [5.0, 5.0];

/// Where a pointer event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    /// Mouse or pen.
    Mouse,
    /// Touch screen; `touches` is the number of active contacts.
    Touch {
        /// Active contact count.
        touches: usize,
    },
}

/// Pointer event phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// Press or first contact.
    Down,
    /// Motion.
    Move,
    /// Release.
    Up,
    /// Gesture aborted by the host.
    Cancel,
}

/// A pointer sample in client (display) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Phase.
    pub phase: PointerPhase,
    /// Position in client coordinates.
    pub position: Point,
    /// Device.
    pub source: PointerSource,
}

impl PointerEvent {
    /// Mouse event at `(x, y)`.
    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            source: PointerSource::Mouse,
        }
    }

    /// Touch event with `touches` contacts, tracking the first at `(x, y)`.
    pub fn touch(phase: PointerPhase, x: f64, y: f64, touches: usize) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            source: PointerSource::Touch { touches },
        }
    }

    fn is_multi_touch(&self) -> bool {
        matches!(self.source, PointerSource::Touch { touches } if touches != 1)
    }
}

/// Gesture state. The sticker being manipulated is carried by the variant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Interaction {
    /// No gesture.
    #[default]
    Idle,
    /// Moving a sticker by pointer deltas.
    Dragging {
        /// Sticker being moved.
        sticker: StickerId,
        /// Previous pointer position in canvas coordinates.
        last: Point,
    },
    /// Scaling and rotating a sticker through its handle.
    Transforming {
        /// Sticker being transformed.
        sticker: StickerId,
        /// Previous pointer position in canvas coordinates.
        last: Point,
    },
}

impl Interaction {
    /// Whether a drag or transform is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Ordered sticker collection bound to one canvas and one repaint trigger.
///
/// The last sticker paints on top. Every mutation that changes what would be painted calls the
/// trigger exactly once before returning; queries never call it.
pub struct StickerEngine {
    canvas: Canvas,
    display: Option<Rect>,
    loader: AssetLoader,
    stickers: Vec<Sticker>,
    active: Option<StickerId>,
    interaction: Interaction,
    next_id: u64,
    trigger: Box<dyn RenderTrigger>,
}

impl std::fmt::Debug for StickerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickerEngine")
            .field("canvas", &self.canvas)
            .field("display", &self.display)
            .field("stickers", &self.stickers.len())
            .field("active", &self.active)
            .field("interaction", &self.interaction)
            .finish()
    }
}

impl StickerEngine {
    /// Engine for a canvas of the given size.
    pub fn new(canvas: Canvas, trigger: impl RenderTrigger + 'static) -> Self {
        Self {
            canvas,
            display: None,
            loader: AssetLoader::default(),
            stickers: Vec::new(),
            active: None,
            interaction: Interaction::Idle,
            next_id: 1,
            trigger: Box::new(trigger),
        }
    }

    /// Resolve relative sticker paths against `loader`'s root.
    pub fn with_loader(mut self, loader: AssetLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Canvas the engine is bound to.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Stickers in paint order.
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Selected sticker, always the last one painted.
    pub fn active(&self) -> Option<StickerId> {
        self.active
    }

    /// Current gesture state.
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Look up a sticker.
    pub fn get(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    /// Transform handle of a sticker, in canvas coordinates.
    pub fn handle_position(&self, id: StickerId) -> Option<Point> {
        self.get(id).map(Sticker::handle_position)
    }

    /// Topmost sticker under a canvas point.
    pub fn hit_test(&self, point: Point) -> Option<StickerId> {
        self.stickers
            .iter()
            .rev()
            .find(|s| s.contains(point))
            .map(|s| s.id)
    }

    /// Decode `source` and add it centered on the canvas as the active sticker.
    ///
    /// A decode failure is logged and nothing is added.
    pub fn add_sticker(&mut self, source: &ImageSource, initial_scale: f64) -> Option<StickerId> {
        match self.loader.load(source) {
            Ok(image) => Some(self.add_prepared(image, initial_scale)),
            Err(err) => {
                tracing::warn!(error = %err, "sticker image failed to load; skipped");
                None
            }
        }
    }

    /// Add an already decoded image centered on the canvas as the active sticker.
    pub fn add_prepared(&mut self, image: PreparedImage, initial_scale: f64) -> StickerId {
        let id = StickerId(self.next_id);
        self.next_id += 1;
        self.stickers
            .push(Sticker::new(id, image, self.canvas.center(), initial_scale));
        self.active = Some(id);
        self.trigger.request_render();
        id
    }

    /// Move sticker `id` to `center` and set its rotation, as a scripted placement. Returns
    /// whether the sticker exists.
    pub fn place(&mut self, id: StickerId, center: Point, rotation: f64) -> bool {
        let Some(s) = self.stickers.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        s.x = center.x;
        s.y = center.y;
        s.rotation = rotation;
        self.trigger.request_render();
        true
    }

    /// Client rectangle the canvas is displayed in; pointer positions are mapped through it.
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.display = (rect.width() > 0.0 && rect.height() > 0.0).then_some(rect);
    }

    /// Map a client position to canvas coordinates.
    pub fn to_canvas(&self, client: Point) -> Point {
        match self.display {
            Some(r) => Point::new(
                (client.x - r.x0) * f64::from(self.canvas.width) / r.width(),
                (client.y - r.y0) * f64::from(self.canvas.height) / r.height(),
            ),
            None => client,
        }
    }

    /// Feed one pointer event. Returns whether a gesture is in progress afterwards, in which case
    /// hosts should suppress scrolling.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event.phase {
            PointerPhase::Down | PointerPhase::Move if event.is_multi_touch() => {}
            PointerPhase::Down => self.pointer_down(self.to_canvas(event.position)),
            PointerPhase::Move => self.pointer_move(self.to_canvas(event.position)),
            PointerPhase::Up | PointerPhase::Cancel => self.interaction = Interaction::Idle,
        }
        self.interaction.is_active()
    }

    fn pointer_down(&mut self, p: Point) {
        if let Some(active) = self.active
            && self
                .get(active)
                .is_some_and(|s| s.handle_contains(p, HANDLE_REACH))
        {
            self.interaction = Interaction::Transforming {
                sticker: active,
                last: p,
            };
            return;
        }

        if let Some(idx) = self.stickers.iter().rposition(|s| s.contains(p)) {
            let sticker = self.stickers.remove(idx);
            let id = sticker.id;
            self.stickers.push(sticker);
            self.active = Some(id);
            self.interaction = Interaction::Dragging {
                sticker: id,
                last: p,
            };
            self.trigger.request_render();
            return;
        }

        self.interaction = Interaction::Idle;
        if self.active.take().is_some() {
            self.trigger.request_render();
        }
    }

    fn pointer_move(&mut self, p: Point) {
        let (id, transforming) = match self.interaction {
            Interaction::Idle => return,
            Interaction::Dragging { sticker, .. } => (sticker, false),
            Interaction::Transforming { sticker, .. } => (sticker, true),
        };
        let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == id) else {
            self.interaction = Interaction::Idle;
            return;
        };

        if transforming {
            sticker.aim_handle(p);
            self.interaction = Interaction::Transforming { sticker: id, last: p };
        } else {
            if let Interaction::Dragging { last, .. } = self.interaction {
                let delta = p - last;
                sticker.x += delta.x;
                sticker.y += delta.y;
            }
            self.interaction = Interaction::Dragging { sticker: id, last: p };
        }
        self.trigger.request_render();
    }

    /// Paint every sticker in order; with `show_handles`, outline the active one and draw its
    /// transform handle.
    pub fn render(&self, surface: &mut Surface, show_handles: bool) {
        for s in &self.stickers {
            surface.draw_image_affine(&s.image, s.image_transform());
            if show_handles && self.active == Some(s.id) {
                draw_handles(surface, s);
            }
        }
    }
}

fn draw_handles(surface: &mut Surface, s: &Sticker) {
    let frame = s.local_transform();
    let bounds = s.local_bounds();
    surface.stroke_rect(bounds, frame, StrokeStyle::solid(Rgba8::WHITE, 2.0));
    surface.stroke_rect(
        bounds,
        frame,
        StrokeStyle::dashed(Rgba8::BLACK, 1.0, OUTLINE_DASH),
    );

    let handle = s.handle_position();
    surface.fill_circle(handle, HANDLE_RADIUS, Rgba8::WHITE);
    surface.stroke_circle(handle, HANDLE_RADIUS, StrokeStyle::solid(Rgba8::BLACK, 1.0));
    surface.fill_circle(handle, HANDLE_DOT_RADIUS, Rgba8::BLACK);
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/engine.rs"]
mod tests;
