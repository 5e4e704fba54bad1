//! Component-mounting fixture handed to each test.

use crate::config::HarnessConfig;
use crate::dom::{
    ComponentRef, ElementHandle, MemoryDom, MountedComponent, Selector, TestDom,
    TRANSFORMATION_PANE_CLASS, VIEWPORT_CLASS,
};
use crate::error::{HarnessError, Result};
use crate::mount::{Attrs, MountOptions, flow_mount_options};
use crate::registry::{CommandName, CommandRegistry};
use crate::retry::{self, RetryOptions, saturating_millis};
use flowkit_core::FlowProps;
use flowkit_events::{CommandRecord, CommandSpan, Event, EventBus};
use parking_lot::Mutex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Mounts components into a [`TestDom`] and locates the flow's structural
/// elements.
///
/// One fixture per test. Cloning the DOM handle via [`Fixture::dom`] lets
/// retrying assertions query it from a closure.
pub struct Fixture {
    dom: Arc<dyn TestDom>,
    config: HarnessConfig,
    registry: CommandRegistry,
    event_bus: EventBus,
    history: Mutex<Vec<CommandRecord>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    /// Fixture over a fresh [`MemoryDom`] honouring `config.flow.render_delay_ms`.
    pub fn with_config(config: HarnessConfig) -> Self {
        let event_bus = EventBus::new();
        let dom = MemoryDom::new(event_bus.clone())
            .with_render_delay(Duration::from_millis(config.flow.render_delay_ms));
        Self::with_dom(Arc::new(dom), config, event_bus)
    }

    pub fn with_dom(dom: Arc<dyn TestDom>, config: HarnessConfig, event_bus: EventBus) -> Self {
        Self {
            dom,
            config,
            registry: CommandRegistry::standard(),
            event_bus,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn dom(&self) -> Arc<dyn TestDom> {
        Arc::clone(&self.dom)
    }

    pub fn retry_options(&self) -> RetryOptions {
        self.config.retry.options()
    }

    pub fn mount(&self, component: &ComponentRef, options: MountOptions) -> Result<MountedComponent> {
        self.dom.mount(component, &options)
    }

    /// Mount the root flow component. Caller props and attrs override the
    /// configured defaults key by key.
    pub fn flow(&self, props: Option<FlowProps>, attrs: Option<Attrs>) -> Result<MountedComponent> {
        let options = flow_mount_options(&self.config.flow, props, attrs)?;
        self.dom.mount(&ComponentRef::flow(), &options)
    }

    pub fn viewport(&self) -> Result<ElementHandle> {
        self.dom.query(&format!(".{VIEWPORT_CLASS}"))
    }

    pub fn transformation_pane(&self) -> Result<ElementHandle> {
        self.dom.query(&format!(".{TRANSFORMATION_PANE_CLASS}"))
    }

    /// Retry `assertion` with `options`, or the configured retry defaults.
    pub async fn try_assertion<T, E, F>(
        &self,
        assertion: F,
        options: Option<RetryOptions>,
    ) -> std::result::Result<T, E>
    where
        F: FnMut() -> std::result::Result<T, E>,
    {
        retry::try_assertion(assertion, options.unwrap_or_else(|| self.retry_options())).await
    }

    /// Wait until an element matching `selector` is rendered.
    pub async fn wait_for(&self, selector: &str, options: Option<RetryOptions>) -> Result<ElementHandle> {
        // Reject unsupported selectors up front instead of retrying them.
        Selector::parse(selector)?;
        let dom = self.dom();
        self.try_assertion(|| dom.query(selector), options).await
    }

    /// Records of every command dispatched through [`Fixture::invoke`], oldest first.
    pub fn command_history(&self) -> Vec<CommandRecord> {
        self.history.lock().clone()
    }

    /// Remove everything this fixture mounted.
    pub fn teardown(&self) {
        self.dom.unmount_all();
    }

    /// Dispatch a registered command by name with JSON arguments.
    ///
    /// `args` may be `null` for commands without arguments. Results are
    /// returned as JSON.
    pub async fn invoke(&self, name: &str, args: Value) -> Result<Value> {
        let mut span = CommandSpan::start(name);
        let started = Instant::now();

        let result = match self.registry.resolve(name) {
            Ok(command) => self.run(command, args, &mut span).await,
            Err(e) => Err(e),
        };

        let elapsed = started.elapsed();
        let record = match &result {
            Ok(_) => span.succeed(elapsed),
            Err(e) => span.fail(e, elapsed),
        };
        self.history.lock().push(record.clone());
        self.event_bus.publish(Event::Command(record));
        result
    }

    async fn run(&self, command: CommandName, args: Value, span: &mut CommandSpan) -> Result<Value> {
        match command {
            CommandName::Mount => {
                let args: MountArgs = parse_args(command, args)?;
                let options = MountOptions {
                    props: args.props.unwrap_or_else(|| Value::Object(Default::default())),
                    attrs: args.attrs,
                };
                let mounted = self.mount(&args.component, options)?;
                encode(command, &mounted)
            }
            CommandName::Flow => {
                let args: FlowArgs = parse_args(command, args)?;
                let mounted = self.flow(args.props, args.attrs)?;
                encode(command, &mounted)
            }
            CommandName::ViewPort => encode(command, &self.viewport()?),
            CommandName::TransformationPane => encode(command, &self.transformation_pane()?),
            CommandName::TryAssertion => {
                let args: TryAssertionArgs = parse_args(command, args)?;
                let defaults = self.retry_options();
                let options = RetryOptions::new(
                    args.interval.map_or(defaults.interval, Duration::from_millis),
                    args.timeout.map_or(defaults.timeout, Duration::from_millis),
                );
                Selector::parse(&args.selector)?;
                span.set_selector(&args.selector);

                let dom = self.dom();
                let outcome =
                    retry::try_assertion_with_outcome(|| dom.query(&args.selector), options).await;
                span.record_attempts(outcome.attempts);
                debug!(
                    selector = %args.selector,
                    attempts = outcome.attempts,
                    elapsed_ms = saturating_millis(outcome.elapsed),
                    "Selector wait settled"
                );
                let element = outcome.into_result()?;
                encode(command, &element)
            }
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MountArgs {
    component: ComponentRef,
    #[serde(default)]
    props: Option<Value>,
    #[serde(default)]
    attrs: Attrs,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlowArgs {
    #[serde(default)]
    props: Option<FlowProps>,
    #[serde(default)]
    attrs: Option<Attrs>,
}

/// Retries a selector lookup; `interval` and `timeout` are milliseconds.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TryAssertionArgs {
    selector: String,
    #[serde(default)]
    interval: Option<u64>,
    #[serde(default)]
    timeout: Option<u64>,
}

fn parse_args<T: DeserializeOwned>(command: CommandName, args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|source| HarnessError::InvalidArguments {
        command: command.to_string(),
        source,
    })
}

fn encode<T: serde::Serialize>(command: CommandName, value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|source| HarnessError::EncodeResult {
        command: command.to_string(),
        source,
    })
}
