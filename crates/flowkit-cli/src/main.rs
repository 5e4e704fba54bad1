use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flowkit_core::{
    BackgroundProps, ControlProps, CustomConnectionLineProps, EdgeTextProps, FlowProps,
    MiniMapNodeProps, MiniMapProps, Validate, parse_props,
};
use flowkit_harness::{Fixture, HarnessConfig, RetryOptions, default_flow_attrs, default_flow_props};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a JSON prop file
    Validate {
        #[arg(value_enum)]
        kind: PropKind,
        file: PathBuf,
    },
    /// Print the default props and attrs of a flow mount
    Defaults {
        /// Harness config file; defaults to $FLOWKIT_HARNESS_CONFIG
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective harness configuration
    Config {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Mount a flow into the in-memory DOM and print the transformation pane
    Mount {
        /// Flow props file
        #[arg(long)]
        props: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Selector to wait for before printing
        #[arg(long, default_value = ".flowkit__transformationpane")]
        wait_for: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PropKind {
    Background,
    Controls,
    Minimap,
    MinimapNode,
    EdgeText,
    ConnectionLine,
    Flow,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let output = match args.command {
        Command::Validate { kind, file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let props = validate_document(kind, &content)
                .with_context(|| format!("Invalid {kind:?} props in {}", file.display()))?;
            info!(file = %file.display(), ?kind, "Props are valid");
            props
        }
        Command::Defaults { config } => {
            let config = load_config(config.as_deref())?;
            flow_defaults(&config)?
        }
        Command::Config { path } => serde_json::to_value(load_config(path.as_deref())?)?,
        Command::Mount {
            props,
            config,
            wait_for,
        } => {
            let config = load_config(config.as_deref())?;
            let props = match props {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    Some(parse_props::<FlowProps>(&content).with_context(|| {
                        format!("Invalid flow props in {}", path.display())
                    })?)
                }
                None => None,
            };
            mount_flow(config, props, &wait_for).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
    match path {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("Failed to load harness config {}", path.display())),
        None => Ok(HarnessConfig::from_env()),
    }
}

fn validate_document(kind: PropKind, content: &str) -> Result<Value> {
    match kind {
        PropKind::Background => validated::<BackgroundProps>(content),
        PropKind::Controls => validated::<ControlProps>(content),
        PropKind::Minimap => validated::<MiniMapProps>(content),
        PropKind::MinimapNode => validated::<MiniMapNodeProps>(content),
        PropKind::EdgeText => validated::<EdgeTextProps>(content),
        PropKind::ConnectionLine => validated::<CustomConnectionLineProps>(content),
        PropKind::Flow => validated::<FlowProps>(content),
    }
}

fn validated<T>(content: &str) -> Result<Value>
where
    T: DeserializeOwned + Validate + Serialize,
{
    let props: T = parse_props(content)?;
    Ok(serde_json::to_value(&props)?)
}

fn flow_defaults(config: &HarnessConfig) -> Result<Value> {
    let props = serde_json::to_value(default_flow_props(&config.flow))?;
    let attrs = serde_json::to_value(default_flow_attrs(&config.flow))?;
    Ok(json!({ "props": props, "attrs": attrs }))
}

async fn mount_flow(config: HarnessConfig, props: Option<FlowProps>, selector: &str) -> Result<Value> {
    let options: RetryOptions = config.retry.options();
    let fixture = Fixture::with_config(config);
    let mounted = fixture.flow(props, None).context("Failed to mount flow")?;
    info!(mount_id = mounted.mount_id, "Mounted flow");

    let element = fixture
        .wait_for(selector, Some(options))
        .await
        .with_context(|| format!("{selector} never rendered"))?;
    Ok(serde_json::to_value(element)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["flowkit", "validate", "minimap-node", "node.json"]);
        assert!(matches!(
            args.command,
            Command::Validate { kind: PropKind::MinimapNode, .. }
        ));
        let args = Args::parse_from(["flowkit", "config", "--path", "harness.json"]);
        assert!(matches!(args.command, Command::Config { path: Some(_) }));
    }

    #[test]
    fn test_validate_document() {
        let value =
            validate_document(PropKind::Background, r#"{"variant": "lines", "gap": 12}"#).unwrap();
        assert_eq!(value["variant"], "lines");

        assert!(validate_document(PropKind::Background, r#"{"gap": -1}"#).is_err());
        assert!(validate_document(PropKind::Flow, r#"{"minZoom": 2, "maxZoom": 1}"#).is_err());
        assert!(validate_document(PropKind::EdgeText, r#"{"label": "x"}"#).is_err());
        assert!(validate_document(PropKind::Controls, r#"{"showZom": true}"#).is_err());
    }

    #[test]
    fn test_flow_defaults() {
        let defaults = flow_defaults(&HarnessConfig::default()).unwrap();
        assert_eq!(defaults["props"], json!({"id": "test", "fitViewOnInit": true}));
        assert_eq!(defaults["attrs"]["key"], "flowy");
        assert_eq!(defaults["attrs"]["style"]["height"], "100vh");
    }

    #[test]
    fn test_load_config_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"retry": {{"interval_ms": 5}}}}"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.retry.interval_ms, 5);
        assert_eq!(config.retry.timeout_ms, 1000);
    }

    #[tokio::test]
    async fn test_mount_flow_prints_pane() {
        let props = FlowProps {
            default_zoom: Some(0.5),
            ..Default::default()
        };
        let pane = mount_flow(
            HarnessConfig::default(),
            Some(props),
            ".flowkit__transformationpane",
        )
        .await
        .unwrap();
        assert_eq!(pane["style"]["transform"], "translate(0px, 0px) scale(0.5)");
    }
}
