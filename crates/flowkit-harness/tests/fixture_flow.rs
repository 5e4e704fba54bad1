use flowkit_core::{FlowProps, Style};
use flowkit_events::Event;
use flowkit_harness::{
    Attrs, CommandName, ComponentRef, Fixture, HarnessConfig, HarnessError, MountOptions,
    RetryOptions, TestDom,
};
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

fn delayed_fixture(render_delay_ms: u64) -> Fixture {
    let mut config = HarnessConfig::default();
    config.flow.render_delay_ms = render_delay_ms;
    Fixture::with_config(config)
}

#[tokio::test(start_paused = true)]
async fn viewport_appears_after_render_delay() {
    let fixture = delayed_fixture(70);
    fixture.flow(None, None).unwrap();

    // Not rendered yet.
    assert!(matches!(
        fixture.viewport(),
        Err(HarnessError::ElementNotFound { .. })
    ));

    let start = Instant::now();
    let viewport = fixture
        .try_assertion(|| fixture.viewport(), None)
        .await
        .unwrap();
    assert!(viewport.has_class("flowkit__viewport"));
    // 20ms interval: attempts at 20, 40, 60 fail, 80 succeeds.
    assert!(start.elapsed() >= Duration::from_millis(70));
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn render_slower_than_timeout_rejects_with_lookup_error() {
    let fixture = delayed_fixture(500);
    fixture.flow(None, None).unwrap();

    let err = fixture
        .wait_for(".flowkit__transformationpane", Some(RetryOptions::from_millis(10, 100)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::ElementNotFound { selector } if selector == ".flowkit__transformationpane"
    ));
}

#[tokio::test(start_paused = true)]
async fn assertion_closure_can_own_a_dom_handle() {
    let fixture = delayed_fixture(30);
    let dom = fixture.dom();
    let handle = flowkit_harness::spawn_try_assertion(
        move || dom.query_all(".flowkit__node").and_then(|nodes| {
            if nodes.len() == 2 {
                Ok(nodes)
            } else {
                Err(HarnessError::ElementNotFound {
                    selector: ".flowkit__node".to_string(),
                })
            }
        }),
        RetryOptions::default(),
    );

    let props: FlowProps = serde_json::from_value(json!({
        "modelValue": [
            {"id": "a", "position": {"x": 0, "y": 0}},
            {"id": "b", "position": {"x": 10, "y": 10}}
        ]
    }))
    .unwrap();
    fixture.flow(Some(props), None).unwrap();

    let nodes = handle.await.unwrap().unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn caller_attrs_override_defaults() {
    let fixture = Fixture::new();
    let mounted = fixture
        .flow(
            Some(FlowProps {
                id: Some("custom".to_string()),
                ..Default::default()
            }),
            Some(Attrs {
                key: Some("other".to_string()),
                style: Some(Style::new().with("height", "300px")),
                ..Default::default()
            }),
        )
        .unwrap();

    assert_eq!(mounted.root.attr("id"), Some("custom"));
    assert_eq!(mounted.root.attr("data-key"), Some("other"));
    assert_eq!(mounted.root.style.get("height"), Some("300px"));
    assert_eq!(mounted.root.style.get("width"), None);
}

#[test]
fn invalid_flow_props_surface_unchanged() {
    let fixture = Fixture::new();
    let err = fixture
        .flow(
            Some(FlowProps {
                min_zoom: Some(3.0),
                max_zoom: Some(1.0),
                ..Default::default()
            }),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, HarnessError::InvalidProps { component, .. } if component == "Flow"));
    assert!(fixture.event_bus().drain().is_empty());
}

#[test]
fn fixtures_are_isolated() {
    let first = Fixture::new();
    let second = Fixture::new();
    first.flow(None, None).unwrap();
    assert!(first.viewport().is_ok());
    assert!(second.viewport().is_err());
}

#[test]
fn mount_any_component() {
    let fixture = Fixture::new();
    let mounted = fixture
        .mount(
            &ComponentRef::new("Controls"),
            MountOptions {
                props: json!({"showZoom": false}),
                attrs: Attrs::default(),
            },
        )
        .unwrap();
    assert_eq!(mounted.root.attr("data-component"), Some("Controls"));
    assert!(matches!(
        fixture.event_bus().drain().as_slice(),
        [Event::ComponentMounted { component, .. }] if component == "Controls"
    ));
}

#[test]
fn registry_is_per_fixture() {
    let mut fixture = Fixture::new();
    assert!(matches!(
        fixture.registry_mut().register("mount", CommandName::Mount),
        Err(HarnessError::DuplicateCommand(_))
    ));
    fixture
        .registry_mut()
        .register("waitFor", CommandName::TryAssertion)
        .unwrap();

    assert!(fixture.registry().contains("waitFor"));
    assert!(!Fixture::new().registry().contains("waitFor"));
}

#[tokio::test(start_paused = true)]
async fn invoke_try_assertion_waits_for_selector() {
    let fixture = delayed_fixture(45);
    fixture.invoke("flow", json!(null)).await.unwrap();

    let pane = fixture
        .invoke(
            "tryAssertion",
            json!({"selector": ".flowkit__transformationpane", "interval": 15}),
        )
        .await
        .unwrap();
    assert_eq!(pane["classes"], json!(["flowkit__transformationpane"]));
    assert_eq!(pane["style"]["transform"], "translate(0px, 0px) scale(1)");

    let err = fixture
        .invoke("tryAssertion", json!({"selector": "#missing", "timeout": 50}))
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::ElementNotFound { .. }));
}

#[tokio::test]
async fn invoke_mount_and_locators() {
    let fixture = Fixture::new();
    fixture
        .invoke(
            "mount",
            json!({"component": "Flow", "props": {"defaultZoom": 1.5}, "attrs": {"class": "dark"}}),
        )
        .await
        .unwrap();

    let root = fixture.dom().query(".dark").unwrap();
    assert_eq!(root.attr("data-component"), Some("Flow"));

    let pane = fixture.invoke("transformationPane", json!(null)).await.unwrap();
    assert_eq!(pane["style"]["transform"], "translate(0px, 0px) scale(1.5)");
}
