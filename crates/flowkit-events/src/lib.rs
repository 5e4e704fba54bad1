use crossbeam_channel::{Receiver, Sender, unbounded};
use flowkit_core::{ControlEvent, ControlProps, FlowProps, clamp_zoom};
use serde::{Deserialize, Serialize};

pub mod telemetry;

pub use telemetry::{CommandOutcome, CommandRecord, CommandSpan};

/// Zoom factor applied per zoom-in / zoom-out step.
pub const ZOOM_STEP: f32 = 1.2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Emitted by the controls panel.
    Control(ControlEvent),

    // Harness lifecycle
    ComponentMounted {
        component: String,
        key: Option<String>,
    },
    ComponentUnmounted {
        component: String,
    },

    ViewportChanged {
        zoom: f32,
        x: f32,
        y: f32,
    },

    /// A harness command finished.
    Command(CommandRecord),
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }

    /// Drain pending events without handling them.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

/// The controls panel: turns button presses into [`ControlEvent`]s.
///
/// Buttons hidden by [`ControlProps`] publish nothing.
pub struct Controls {
    props: ControlProps,
    interactive: bool,
    event_bus: EventBus,
}

impl Controls {
    pub fn new(props: ControlProps, event_bus: EventBus) -> Self {
        Self {
            props,
            interactive: true,
            event_bus,
        }
    }

    pub fn zoom_in(&self) -> bool {
        self.emit_if(self.props.shows_zoom(), ControlEvent::ZoomIn)
    }

    pub fn zoom_out(&self) -> bool {
        self.emit_if(self.props.shows_zoom(), ControlEvent::ZoomOut)
    }

    pub fn fit_view(&self) -> bool {
        self.emit_if(self.props.shows_fit_view(), ControlEvent::FitView)
    }

    /// Flip interactivity (node dragging, connecting, selecting) on or off.
    pub fn toggle_interactive(&mut self) -> bool {
        if !self.props.shows_interactive() {
            return false;
        }
        self.interactive = !self.interactive;
        self.emit_if(
            true,
            ControlEvent::InteractionChange {
                active: self.interactive,
            },
        )
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn emit_if(&self, visible: bool, event: ControlEvent) -> bool {
        if visible {
            tracing::debug!(event = %event, "Control event");
            self.event_bus.publish(Event::Control(event));
        }
        visible
    }
}

/// Viewport transform driven by control events.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub zoom: f32,
    pub x: f32,
    pub y: f32,
    pub interactive: bool,
    pub pending_zoom_to_fit: bool,
    min_zoom: f32,
    max_zoom: f32,
}

impl ViewportState {
    pub fn from_props(props: &FlowProps) -> Self {
        let (min_zoom, max_zoom) = props.zoom_bounds();
        let [x, y] = props.default_position.unwrap_or([0.0, 0.0]);
        Self {
            zoom: props.initial_zoom(),
            x,
            y,
            interactive: true,
            pending_zoom_to_fit: props.fit_view_on_init.unwrap_or(false),
            min_zoom,
            max_zoom,
        }
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = clamp_zoom(self.zoom * factor, self.min_zoom, self.max_zoom);
    }

    /// CSS transform of the transformation pane.
    pub fn transform(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.x, self.y, self.zoom)
    }
}

impl EventListener for ViewportState {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Control(ControlEvent::ZoomIn) => self.zoom_by(ZOOM_STEP),
            Event::Control(ControlEvent::ZoomOut) => self.zoom_by(1.0 / ZOOM_STEP),
            Event::Control(ControlEvent::FitView) => self.pending_zoom_to_fit = true,
            Event::Control(ControlEvent::InteractionChange { active }) => {
                self.interactive = *active;
            }
            Event::ViewportChanged { zoom, x, y } => {
                self.zoom = clamp_zoom(*zoom, self.min_zoom, self.max_zoom);
                self.x = *x;
                self.y = *y;
            }
            _ => {}
        }
    }
}
