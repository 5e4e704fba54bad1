use crate::config::FlowMountSettings;
use crate::error::{HarnessError, Result};
use flowkit_core::{FlowProps, Style, Validate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributes placed on a mounted component's root element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attrs {
    /// Identity key; remounting with a different key forces a fresh instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl Attrs {
    /// Shallow spread: every field set on `self` wins over `defaults`.
    ///
    /// A caller `style` replaces the default style as a whole.
    pub fn over(self, defaults: Attrs) -> Attrs {
        Attrs {
            key: self.key.or(defaults.key),
            class: self.class.or(defaults.class),
            style: self.style.or(defaults.style),
        }
    }
}

/// Props and attributes for one mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountOptions {
    /// Component props as a JSON object; the component decides their shape.
    #[serde(default = "empty_object")]
    pub props: Value,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            props: empty_object(),
            attrs: Attrs::default(),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Default props and attributes of a flow mount: `{ id, fitViewOnInit }` and
/// `{ key, style: { height, width } }`.
pub fn default_flow_props(settings: &FlowMountSettings) -> FlowProps {
    FlowProps {
        id: Some(settings.id.clone()),
        fit_view_on_init: Some(settings.fit_view_on_init),
        ..Default::default()
    }
}

pub fn default_flow_attrs(settings: &FlowMountSettings) -> Attrs {
    Attrs {
        key: Some(settings.key.clone()),
        class: None,
        style: Some(
            Style::new()
                .with("height", &settings.height)
                .with("width", &settings.width),
        ),
    }
}

/// Build the mount options of a flow: caller props and attrs override the
/// defaults key by key.
pub fn flow_mount_options(
    settings: &FlowMountSettings,
    props: Option<FlowProps>,
    attrs: Option<Attrs>,
) -> Result<MountOptions> {
    let defaults = to_object(&default_flow_props(settings))?;
    let overrides = match props {
        Some(props) => to_object(&props)?,
        None => Map::new(),
    };
    let merged = spread(defaults, overrides);

    let merged_props: FlowProps = serde_json::from_value(Value::Object(merged.clone()))
        .map_err(|source| HarnessError::InvalidArguments {
            command: "flow".to_string(),
            source,
        })?;
    merged_props
        .validate()
        .map_err(|source| HarnessError::InvalidProps {
            component: crate::dom::FLOW_COMPONENT.to_string(),
            source,
        })?;

    let attrs = attrs
        .unwrap_or_default()
        .over(default_flow_attrs(settings));

    Ok(MountOptions {
        props: Value::Object(merged),
        attrs,
    })
}

/// `{ ...defaults, ...overrides }` over JSON objects.
pub fn spread(mut defaults: Map<String, Value>, overrides: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overrides {
        defaults.insert(key, value);
    }
    defaults
}

fn to_object(props: &FlowProps) -> Result<Map<String, Value>> {
    match serde_json::to_value(props) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(source) => Err(HarnessError::InvalidArguments {
            command: "flow".to_string(),
            source,
        }),
    }
}
