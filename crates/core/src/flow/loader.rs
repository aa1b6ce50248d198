//! YAML flow loading.
//!
//! File records are deserialized into intermediate spec structs, action
//! argument mappings are converted into typed [`Action`] values, and the
//! resulting graph is validated before it is handed to the engine. Every
//! malformed record is rejected here; the runtime never re-inspects
//! argument shapes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml_ng::Value;
use thiserror::Error;

use crate::flow::validate::{self, ValidationError};
use crate::flow::{Action, CaptureMode, FlowGraph, InputSpec, Intent, Node};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read flow file `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse flow file: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Malformed action record, rejected while the flow is loaded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("`{action}` action requires a `{argument}` argument")]
    MissingArgument { action: String, argument: String },
    #[error("`{action}` action argument `{argument}` must be a string")]
    InvalidArgumentType { action: String, argument: String },
    #[error("unknown action type `{0}`")]
    UnknownActionType(String),
}

pub fn load_file(path: &Path) -> Result<FlowGraph, LoadError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| LoadError::ReadFile { path: path.to_path_buf(), source })?;
    load_str(&raw)
}

pub fn load_str(raw: &str) -> Result<FlowGraph, LoadError> {
    let file: FlowFile = serde_yaml_ng::from_str(raw)?;

    let mut nodes = BTreeMap::new();
    for (name, spec) in file.flows {
        nodes.insert(name, node_from_spec(spec)?);
    }

    let graph = FlowGraph { name: file.bot.name, nodes };
    validate::validate(&graph)?;
    Ok(graph)
}

fn node_from_spec(spec: NodeSpec) -> Result<Node, ActionError> {
    let actions =
        spec.actions.into_iter().map(action_from_spec).collect::<Result<Vec<_>, _>>()?;

    Ok(Node {
        message: spec.message,
        intents: spec
            .intents
            .into_iter()
            .map(|intent| Intent {
                name: intent.name,
                examples: intent.examples,
                next: non_empty(intent.next),
            })
            .collect(),
        input: spec
            .input
            .map(|input| InputSpec { capture: input.capture, save_as: input.save_as }),
        actions,
        next: non_empty(spec.next),
    })
}

fn action_from_spec(spec: ActionSpec) -> Result<Action, ActionError> {
    match spec.kind.as_str() {
        "set_var" => {
            let name = required_string(&spec, "name")?;
            let value = optional_string(&spec, "value")?;
            Ok(Action::SetVar { name, value })
        }
        other => Err(ActionError::UnknownActionType(other.to_string())),
    }
}

fn required_string(spec: &ActionSpec, argument: &str) -> Result<String, ActionError> {
    optional_string(spec, argument)?.ok_or_else(|| ActionError::MissingArgument {
        action: spec.kind.clone(),
        argument: argument.to_string(),
    })
}

fn optional_string(spec: &ActionSpec, argument: &str) -> Result<Option<String>, ActionError> {
    match spec.args.get(argument) {
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ActionError::InvalidArgumentType {
            action: spec.kind.clone(),
            argument: argument.to_string(),
        }),
        None => Ok(None),
    }
}

/// An empty transition target in the file means "no transition".
fn non_empty(target: Option<String>) -> Option<String> {
    target.filter(|name| !name.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct FlowFile {
    bot: BotSpec,
    #[serde(default)]
    flows: BTreeMap<String, NodeSpec>,
}

#[derive(Debug, Deserialize)]
struct BotSpec {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct NodeSpec {
    #[serde(default)]
    message: String,
    #[serde(default)]
    intents: Vec<IntentSpec>,
    #[serde(default)]
    input: Option<InputSpecRecord>,
    #[serde(default)]
    actions: Vec<ActionSpec>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IntentSpec {
    name: String,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InputSpecRecord {
    #[serde(rename = "type", default)]
    capture: CaptureMode,
    save_as: String,
}

#[derive(Debug, Deserialize)]
struct ActionSpec {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    args: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::flow::loader::{load_file, load_str, ActionError, LoadError};
    use crate::flow::validate::ValidationError;
    use crate::flow::{Action, CaptureMode};

    const SUPPORT_FLOW: &str = r#"
bot:
  name: support-bot
flows:
  start:
    message: "Welcome! What's your name?"
    input:
      type: text
      save_as: name
    actions:
      - type: set_var
        args:
          name: greeted
          value: "yes"
    next: menu
  menu:
    message: "Hi {{name}}, how can I help?"
    intents:
      - name: billing
        examples: ["billing", "invoice question"]
        next: farewell
      - name: goodbye
        examples: ["bye"]
        next: farewell
  farewell:
    message: "Bye {{name}}!"
"#;

    #[test]
    fn loads_a_complete_flow() {
        let graph = load_str(SUPPORT_FLOW).expect("flow should load");
        assert_eq!(graph.name, "support-bot");
        assert_eq!(graph.nodes.len(), 3);

        let start = graph.node("start").expect("start node");
        let input = start.input.as_ref().expect("input spec");
        assert_eq!(input.capture, CaptureMode::Text);
        assert_eq!(input.save_as, "name");
        assert_eq!(
            start.actions,
            vec![Action::SetVar { name: "greeted".to_string(), value: Some("yes".to_string()) }]
        );
        assert_eq!(start.next.as_deref(), Some("menu"));

        let menu = graph.node("menu").expect("menu node");
        assert_eq!(menu.intents.len(), 2);
        assert_eq!(menu.intents[0].name, "billing");
        assert_eq!(menu.intents[0].examples, vec!["billing", "invoice question"]);
        assert_eq!(menu.intents[0].next.as_deref(), Some("farewell"));

        assert!(graph.node("farewell").expect("farewell node").is_terminal());
    }

    #[test]
    fn set_var_without_value_keeps_value_empty() {
        let graph = load_str(
            r#"
bot: { name: demo }
flows:
  start:
    message: "Name?"
    input: { save_as: name }
    actions:
      - type: set_var
        args: { name: copy }
"#,
        )
        .expect("flow should load");

        assert_eq!(
            graph.node("start").expect("start").actions,
            vec![Action::SetVar { name: "copy".to_string(), value: None }]
        );
    }

    #[test]
    fn empty_next_normalizes_to_none() {
        let graph = load_str(
            r#"
bot: { name: demo }
flows:
  start:
    message: "Done"
    next: ""
"#,
        )
        .expect("flow should load");

        let start = graph.node("start").expect("start");
        assert_eq!(start.next, None);
        assert!(start.is_terminal());
    }

    #[test]
    fn set_var_missing_name_is_rejected() {
        let error = load_str(
            r#"
bot: { name: demo }
flows:
  start:
    message: "Hi"
    actions:
      - type: set_var
        args: { value: "x" }
"#,
        )
        .expect_err("missing name must fail");

        assert!(matches!(
            error,
            LoadError::Action(ActionError::MissingArgument { ref action, ref argument })
                if action == "set_var" && argument == "name"
        ));
    }

    #[test]
    fn set_var_non_string_value_is_rejected() {
        let error = load_str(
            r#"
bot: { name: demo }
flows:
  start:
    message: "Hi"
    actions:
      - type: set_var
        args: { name: count, value: 7 }
"#,
        )
        .expect_err("non-string value must fail");

        assert!(matches!(
            error,
            LoadError::Action(ActionError::InvalidArgumentType { ref argument, .. })
                if argument == "value"
        ));
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let error = load_str(
            r#"
bot: { name: demo }
flows:
  start:
    message: "Hi"
    actions:
      - type: launch_rocket
"#,
        )
        .expect_err("unknown action type must fail");

        assert!(matches!(
            error,
            LoadError::Action(ActionError::UnknownActionType(ref kind)) if kind == "launch_rocket"
        ));
    }

    #[test]
    fn missing_start_node_is_rejected() {
        let error = load_str(
            r#"
bot: { name: demo }
flows:
  greeting:
    message: "Hi"
"#,
        )
        .expect_err("flow without start must fail");

        assert!(matches!(error, LoadError::Validation(ValidationError::MissingStart)));
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SUPPORT_FLOW.as_bytes()).expect("write flow");

        let graph = load_file(file.path()).expect("flow should load from file");
        assert_eq!(graph.name, "support-bot");
    }

    #[test]
    fn load_file_reports_missing_file() {
        let error = load_file(std::path::Path::new("definitely/not/here.yaml"))
            .expect_err("missing file must fail");
        assert!(matches!(error, LoadError::ReadFile { .. }));
    }
}
