//! Isolated test DOM the fixture mounts components into.
//!
//! [`TestDom`] is the seam to the real rendering infrastructure. [`MemoryDom`]
//! is the in-process implementation used by the harness tests: it renders the
//! flow component's structural elements (root, viewport, transformation pane,
//! nodes, edges) without drawing anything.

use crate::error::{HarnessError, Result};
use crate::mount::{Attrs, MountOptions};
use flowkit_core::{
    BackgroundProps, ControlProps, CustomConnectionLineProps, EdgeTextProps, FlowElement,
    FlowProps, MiniMapNodeProps, MiniMapProps, Style, Validate, props_from_value,
};
use flowkit_events::{Event, EventBus, ViewportState};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Name of the root flow component.
pub const FLOW_COMPONENT: &str = "Flow";
pub const BACKGROUND_COMPONENT: &str = "Background";
pub const CONTROLS_COMPONENT: &str = "Controls";
pub const MINIMAP_COMPONENT: &str = "MiniMap";
pub const MINIMAP_NODE_COMPONENT: &str = "MiniMapNode";
pub const EDGE_TEXT_COMPONENT: &str = "EdgeText";
pub const CONNECTION_LINE_COMPONENT: &str = "ConnectionLine";

pub const ROOT_CLASS: &str = "flowkit";
pub const VIEWPORT_CLASS: &str = "flowkit__viewport";
pub const TRANSFORMATION_PANE_CLASS: &str = "flowkit__transformationpane";
pub const NODE_CLASS: &str = "flowkit__node";
pub const EDGE_CLASS: &str = "flowkit__edge";

/// Reference to a mountable component, by registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(pub String);

impl ComponentRef {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn flow() -> Self {
        Self::new(FLOW_COMPONENT)
    }

    pub fn is_flow(&self) -> bool {
        self.0 == FLOW_COMPONENT
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one rendered element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementHandle {
    pub id: usize,
    pub mount_id: usize,
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: Style,
    pub parent: Option<usize>,
}

impl ElementHandle {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MountedComponent {
    pub mount_id: usize,
    pub component: ComponentRef,
    pub root: ElementHandle,
}

/// A supported CSS selector: `.class`, `#id` or a bare tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Class(String),
    Id(String),
    Tag(String),
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self> {
        let selector = selector.trim();
        let is_ident = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if let Some(class) = selector.strip_prefix('.')
            && is_ident(class)
        {
            return Ok(Selector::Class(class.to_string()));
        }
        if let Some(id) = selector.strip_prefix('#')
            && is_ident(id)
        {
            return Ok(Selector::Id(id.to_string()));
        }
        if is_ident(selector) && selector.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(Selector::Tag(selector.to_ascii_lowercase()));
        }
        Err(HarnessError::UnsupportedSelector(selector.to_string()))
    }

    pub fn matches(&self, element: &ElementHandle) -> bool {
        match self {
            Selector::Class(class) => element.has_class(class),
            Selector::Id(id) => element.attr("id") == Some(id.as_str()),
            Selector::Tag(tag) => element.tag == *tag,
        }
    }
}

pub trait TestDom: Send + Sync {
    fn mount(&self, component: &ComponentRef, options: &MountOptions) -> Result<MountedComponent>;

    /// First element in document order matching `selector`.
    fn query(&self, selector: &str) -> Result<ElementHandle>;

    fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>>;

    /// Remove everything mounted so far.
    fn unmount_all(&self);
}

struct RenderedElement {
    handle: ElementHandle,
    visible_at: Instant,
}

#[derive(Default)]
struct DomState {
    elements: Vec<RenderedElement>,
    mounts: Vec<ComponentRef>,
}

impl DomState {
    fn push(
        &mut self,
        mount_id: usize,
        tag: &str,
        classes: Vec<String>,
        attributes: BTreeMap<String, String>,
        style: Style,
        parent: Option<usize>,
        visible_at: Instant,
    ) -> ElementHandle {
        let handle = ElementHandle {
            id: self.elements.len(),
            mount_id,
            tag: tag.to_string(),
            classes,
            attributes,
            style,
            parent,
        };
        self.elements.push(RenderedElement {
            handle: handle.clone(),
            visible_at,
        });
        handle
    }
}

/// In-memory [`TestDom`].
///
/// With a render delay, elements only become queryable that long after their
/// mount, which is what the retrying assertions in tests wait out.
#[derive(Clone)]
pub struct MemoryDom {
    state: Arc<Mutex<DomState>>,
    render_delay: Duration,
    event_bus: EventBus,
}

impl MemoryDom {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            state: Arc::new(Mutex::new(DomState::default())),
            render_delay: Duration::ZERO,
            event_bus,
        }
    }

    #[must_use]
    pub fn with_render_delay(mut self, delay: Duration) -> Self {
        self.render_delay = delay;
        self
    }

    pub fn mount_count(&self) -> usize {
        self.state.lock().mounts.len()
    }

    pub fn mounted_components(&self) -> Vec<ComponentRef> {
        self.state.lock().mounts.clone()
    }

    fn render_flow(
        state: &mut DomState,
        mount_id: usize,
        props: &FlowProps,
        root: &ElementHandle,
        visible_at: Instant,
    ) {
        let viewport = state.push(
            mount_id,
            "div",
            vec![VIEWPORT_CLASS.to_string()],
            BTreeMap::new(),
            Style::new(),
            Some(root.id),
            visible_at,
        );
        let transform = ViewportState::from_props(props).transform();
        let pane = state.push(
            mount_id,
            "div",
            vec![TRANSFORMATION_PANE_CLASS.to_string()],
            BTreeMap::new(),
            Style::new().with("transform", &transform),
            Some(viewport.id),
            visible_at,
        );

        for element in props.elements() {
            match element {
                FlowElement::Node(node) if node.hidden != Some(true) => {
                    let mut classes = vec![NODE_CLASS.to_string()];
                    classes.extend(node.class.iter().cloned());
                    let mut attributes = BTreeMap::new();
                    attributes.insert("data-id".to_string(), node.id.0.clone());
                    if let Some(label) = &node.label {
                        attributes.insert("aria-label".to_string(), label.clone());
                    }
                    let (x, y) = props.snap(node.position.x, node.position.y);
                    state.push(
                        mount_id,
                        "div",
                        classes,
                        attributes,
                        Style::new().with("transform", &format!("translate({x}px, {y}px)")),
                        Some(pane.id),
                        visible_at,
                    );
                }
                FlowElement::Edge(edge) if edge.hidden != Some(true) => {
                    let mut classes = vec![EDGE_CLASS.to_string()];
                    if edge.animated == Some(true) {
                        classes.push("animated".to_string());
                    }
                    let attributes = BTreeMap::from([
                        ("data-id".to_string(), edge.id.0.clone()),
                        ("data-source".to_string(), edge.source.0.clone()),
                        ("data-target".to_string(), edge.target.0.clone()),
                    ]);
                    state.push(
                        mount_id,
                        "g",
                        classes,
                        attributes,
                        Style::new(),
                        Some(pane.id),
                        visible_at,
                    );
                }
                _ => {}
            }
        }
    }

    fn visible(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        let selector = Selector::parse(selector)?;
        let now = Instant::now();
        let state = self.state.lock();
        Ok(state
            .elements
            .iter()
            .filter(|e| e.visible_at <= now && selector.matches(&e.handle))
            .map(|e| e.handle.clone())
            .collect())
    }
}

/// Check `props` against the contract of a built-in component. Props of a
/// flow are returned for rendering; components without a contract accept
/// any props.
fn check_props(component: &ComponentRef, props: &Value) -> Result<Option<FlowProps>> {
    fn check<T: DeserializeOwned + Validate>(component: &ComponentRef, props: &Value) -> Result<T> {
        props_from_value(props.clone()).map_err(|source| HarnessError::InvalidProps {
            component: component.to_string(),
            source,
        })
    }

    match component.0.as_str() {
        FLOW_COMPONENT => return check::<FlowProps>(component, props).map(Some),
        BACKGROUND_COMPONENT => {
            check::<BackgroundProps>(component, props)?;
        }
        CONTROLS_COMPONENT => {
            check::<ControlProps>(component, props)?;
        }
        MINIMAP_COMPONENT => {
            check::<MiniMapProps>(component, props)?;
        }
        MINIMAP_NODE_COMPONENT => {
            check::<MiniMapNodeProps>(component, props)?;
        }
        EDGE_TEXT_COMPONENT => {
            check::<EdgeTextProps>(component, props)?;
        }
        CONNECTION_LINE_COMPONENT => {
            check::<CustomConnectionLineProps>(component, props)?;
        }
        other => tracing::debug!(component = other, "No prop contract, props unchecked"),
    }
    Ok(None)
}

fn root_attributes(attrs: &Attrs) -> (Vec<String>, BTreeMap<String, String>, Style) {
    let mut classes = vec![ROOT_CLASS.to_string()];
    if let Some(class) = &attrs.class {
        classes.extend(class.split_whitespace().map(str::to_string));
    }
    let mut attributes = BTreeMap::new();
    if let Some(key) = &attrs.key {
        attributes.insert("data-key".to_string(), key.clone());
    }
    (classes, attributes, attrs.style.clone().unwrap_or_default())
}

impl TestDom for MemoryDom {
    fn mount(&self, component: &ComponentRef, options: &MountOptions) -> Result<MountedComponent> {
        // Validate before touching the DOM so a bad mount leaves no partial tree.
        let flow_props = check_props(component, &options.props)?;

        let visible_at = Instant::now() + self.render_delay;
        let mut state = self.state.lock();
        let mount_id = state.mounts.len();
        state.mounts.push(component.clone());

        let (classes, mut attributes, style) = root_attributes(&options.attrs);
        attributes.insert("data-component".to_string(), component.0.clone());
        if let Some(id) = flow_props.as_ref().and_then(|p| p.id.as_ref()) {
            attributes.insert("id".to_string(), id.clone());
        }
        let root = state.push(mount_id, "div", classes, attributes, style, None, visible_at);

        if let Some(props) = &flow_props {
            Self::render_flow(&mut state, mount_id, props, &root, visible_at);
        }
        drop(state);

        tracing::info!(component = %component, mount_id, "Mounted component");
        self.event_bus.publish(Event::ComponentMounted {
            component: component.0.clone(),
            key: options.attrs.key.clone(),
        });

        Ok(MountedComponent {
            mount_id,
            component: component.clone(),
            root,
        })
    }

    fn query(&self, selector: &str) -> Result<ElementHandle> {
        self.visible(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| HarnessError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        self.visible(selector)
    }

    fn unmount_all(&self) {
        let mut state = self.state.lock();
        let components = std::mem::take(&mut state.mounts);
        state.elements.clear();
        drop(state);
        for component in components {
            self.event_bus.publish(Event::ComponentUnmounted {
                component: component.0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flow_options(props: serde_json::Value) -> MountOptions {
        MountOptions {
            props,
            attrs: Attrs::default(),
        }
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!(
            Selector::parse(".flowkit__viewport").unwrap(),
            Selector::Class("flowkit__viewport".to_string())
        );
        assert_eq!(Selector::parse("#test").unwrap(), Selector::Id("test".to_string()));
        assert_eq!(Selector::parse("DIV").unwrap(), Selector::Tag("div".to_string()));
        assert!(matches!(
            Selector::parse("div > .x"),
            Err(HarnessError::UnsupportedSelector(_))
        ));
        assert!(Selector::parse(".").is_err());
    }

    #[test]
    fn test_mount_flow_renders_structure() {
        let bus = EventBus::new();
        let dom = MemoryDom::new(bus.clone());
        let props = json!({
            "id": "main",
            "modelValue": [
                {"id": "1", "position": {"x": 0, "y": 0}, "label": "A"},
                {"id": "2", "position": {"x": 100, "y": 0}, "hidden": true},
                {"id": "e1-2", "source": "1", "target": "2", "animated": true}
            ]
        });

        let mounted = dom.mount(&ComponentRef::flow(), &flow_options(props)).unwrap();
        assert_eq!(mounted.root.attr("id"), Some("main"));

        let viewport = dom.query(".flowkit__viewport").unwrap();
        let pane = dom.query(".flowkit__transformationpane").unwrap();
        assert_eq!(pane.parent, Some(viewport.id));
        assert_eq!(pane.style.get("transform"), Some("translate(0px, 0px) scale(1)"));

        let nodes = dom.query_all(".flowkit__node").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].attr("aria-label"), Some("A"));

        let edge = dom.query(".flowkit__edge").unwrap();
        assert!(edge.has_class("animated"));
        assert_eq!(edge.tag, "g");

        assert!(matches!(
            bus.drain().as_slice(),
            [Event::ComponentMounted { component, .. }] if component == "Flow"
        ));
    }

    #[test]
    fn test_invalid_flow_props_leave_dom_untouched() {
        let dom = MemoryDom::new(EventBus::new());
        let err = dom
            .mount(&ComponentRef::flow(), &flow_options(json!({"zoomy": true})))
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidProps { .. }));
        assert_eq!(dom.mount_count(), 0);
        assert!(dom.query(".flowkit").is_err());
    }

    #[test]
    fn test_other_components_render_root_only() {
        let dom = MemoryDom::new(EventBus::new());
        let mounted = dom
            .mount(
                &ComponentRef::new(MINIMAP_COMPONENT),
                &MountOptions {
                    props: json!({"nodeColor": "red", "nodeStrokeWidth": 1}),
                    attrs: Attrs {
                        class: Some("mini dark".to_string()),
                        ..Default::default()
                    },
                },
            )
            .unwrap();
        assert!(mounted.root.has_class("dark"));
        assert_eq!(mounted.root.attr("data-component"), Some("MiniMap"));
        assert!(dom.query(".flowkit__viewport").is_err());
    }

    #[test]
    fn test_component_props_are_checked_against_their_contract() {
        let dom = MemoryDom::new(EventBus::new());
        let cases = [
            (MINIMAP_COMPONENT, json!({"nodeColr": "red"})),
            (MINIMAP_COMPONENT, json!({"nodeStrokeWidth": -4})),
            (BACKGROUND_COMPONENT, json!({"gap": -1})),
            (CONTROLS_COMPONENT, json!({"showZom": false})),
            (MINIMAP_NODE_COMPONENT, json!({"width": -10})),
            (EDGE_TEXT_COMPONENT, json!({"label": "no coordinates"})),
            (CONNECTION_LINE_COMPONENT, json!({"sourceX": 1})),
        ];
        for (component, props) in cases {
            let err = dom
                .mount(
                    &ComponentRef::new(component),
                    &MountOptions {
                        props,
                        attrs: Attrs::default(),
                    },
                )
                .unwrap_err();
            assert!(
                matches!(&err, HarnessError::InvalidProps { component: c, .. } if c == component),
                "{component}: {err}"
            );
        }
        assert_eq!(dom.mount_count(), 0);
    }

    #[test]
    fn test_custom_components_accept_any_props() {
        let dom = MemoryDom::new(EventBus::new());
        dom.mount(
            &ComponentRef::new("CustomNode"),
            &MountOptions {
                props: json!({"anything": 1}),
                attrs: Attrs::default(),
            },
        )
        .unwrap();
        assert_eq!(dom.mount_count(), 1);
    }

    #[test]
    fn test_unmount_all_clears_elements() {
        let bus = EventBus::new();
        let dom = MemoryDom::new(bus.clone());
        dom.mount(&ComponentRef::flow(), &flow_options(json!({}))).unwrap();
        bus.drain();

        dom.unmount_all();
        assert_eq!(dom.mount_count(), 0);
        assert!(dom.query(".flowkit__viewport").is_err());
        assert!(matches!(
            bus.drain().as_slice(),
            [Event::ComponentUnmounted { .. }]
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_delay_hides_elements_until_elapsed() {
        let dom = MemoryDom::new(EventBus::new()).with_render_delay(Duration::from_millis(50));
        dom.mount(&ComponentRef::flow(), &flow_options(json!({}))).unwrap();

        assert!(matches!(
            dom.query(".flowkit__viewport"),
            Err(HarnessError::ElementNotFound { .. })
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(dom.query(".flowkit__viewport").is_ok());
    }
}
