//! Resource command factory.
//!
//! [`build_command`] turns a [`ResourceTypeDescriptor`] into a
//! [`CommandSpec`]: a static list of parameters, one per field that is
//! acceptable in the target [`RequestContext`]. The spec then renders a
//! [`clap::Command`] with one `--flag` per parameter and assembles a JSON
//! payload back from the parsed matches.
//!
//! Parameter tokens derive from the dotted field path, segment by segment,
//! in kebab case: `name.givenName` becomes `--name-given-name`.

use crate::acceptability::{unacceptable_fields, RequestContext};
use crate::error::{Error, Result};
use crate::schema::{AttributeType, FieldDescriptor, ResourceTypeDescriptor};
use clap::{Arg, ArgAction, ArgMatches, Command};
use convert_case::{Boundary, Case, Casing};
use serde_json::{Map, Value};

const INDENT: &str = "indent";
const NO_INDENT: &str = "no-indent";

/// Flags every resource command defines on its own.
const RESERVED_FLAGS: [&str; 3] = [INDENT, NO_INDENT, "help"];

/// One command-line parameter bound to a resource field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Dotted field path, also used as the clap argument id.
    pub field: String,
    /// Long flag name without the leading dashes.
    pub long: String,
    pub attr_type: AttributeType,
    pub multi_valued: bool,
    pub help: Option<String>,
}

impl Parameter {
    fn from_field(field: &FieldDescriptor) -> Self {
        Parameter {
            field: field.path.clone(),
            long: parameter_name(&field.path),
            attr_type: field.attr_type,
            multi_valued: field.multi_valued,
            help: field.description.clone(),
        }
    }

    fn arg(&self) -> Arg {
        let mut arg = Arg::new(self.field.clone()).long(self.long.clone());

        let help = match (&self.help, self.multi_valued) {
            (Some(help), true) => Some(format!("{help} Repeatable, or a JSON array.")),
            (None, true) => Some("Repeatable, or a JSON array.".to_string()),
            (help, false) => help.clone(),
        };
        if let Some(help) = help {
            arg = arg.help(help);
        }

        if self.multi_valued {
            return arg
                .action(ArgAction::Append)
                .value_name("VALUE")
                .value_parser(clap::value_parser!(String));
        }

        arg = arg.action(ArgAction::Set);
        match self.attr_type {
            AttributeType::Boolean => arg.value_name("BOOLEAN").value_parser(clap::value_parser!(bool)),
            AttributeType::Integer => arg.value_name("INTEGER").value_parser(clap::value_parser!(i64)),
            AttributeType::Decimal => arg.value_name("NUMBER").value_parser(clap::value_parser!(f64)),
            AttributeType::Complex => arg.value_name("JSON").value_parser(clap::value_parser!(String)),
            _ => arg.value_name("TEXT").value_parser(clap::value_parser!(String)),
        }
    }

    /// Reads this parameter back from `matches`; `None` when it was not given.
    fn value(&self, matches: &ArgMatches) -> Result<Option<Value>> {
        if self.multi_valued {
            let Some(raw_values) = matches.get_many::<String>(&self.field) else {
                return Ok(None);
            };
            let mut items = Vec::new();
            for raw in raw_values {
                items.extend(self.parse_list_item(raw)?);
            }
            return Ok(Some(Value::Array(items)));
        }

        let value = match self.attr_type {
            AttributeType::Boolean => matches.get_one::<bool>(&self.field).map(|b| Value::Bool(*b)),
            AttributeType::Integer => matches.get_one::<i64>(&self.field).map(|i| Value::from(*i)),
            AttributeType::Decimal => match matches.get_one::<f64>(&self.field) {
                Some(f) => Some(
                    serde_json::Number::from_f64(*f)
                        .map(Value::Number)
                        .ok_or_else(|| self.invalid("not a finite number"))?,
                ),
                None => None,
            },
            AttributeType::Complex => match matches.get_one::<String>(&self.field) {
                Some(raw) => Some(self.parse_object(raw)?),
                None => None,
            },
            _ => matches
                .get_one::<String>(&self.field)
                .map(|s| Value::String(s.clone())),
        };
        Ok(value)
    }

    /// One occurrence of a multi-valued flag: either a JSON array literal
    /// holding every item, or a single item.
    fn parse_list_item(&self, raw: &str) -> Result<Vec<Value>> {
        let trimmed = raw.trim();
        if trimmed.starts_with('[') {
            match serde_json::from_str::<Vec<Value>>(trimmed) {
                Ok(items) => return Ok(items),
                // Text values may legitimately start with a bracket.
                Err(_) if self.is_textual() => return Ok(vec![Value::String(raw.to_string())]),
                Err(e) => return Err(self.invalid(&e.to_string())),
            }
        }

        let item = match self.attr_type {
            AttributeType::Complex => self.parse_object(trimmed)?,
            AttributeType::Boolean | AttributeType::Integer | AttributeType::Decimal => {
                serde_json::from_str(trimmed).map_err(|e| self.invalid(&e.to_string()))?
            }
            _ => Value::String(raw.to_string()),
        };
        Ok(vec![item])
    }

    fn is_textual(&self) -> bool {
        !matches!(
            self.attr_type,
            AttributeType::Complex
                | AttributeType::Boolean
                | AttributeType::Integer
                | AttributeType::Decimal
        )
    }

    fn parse_object(&self, raw: &str) -> Result<Value> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => Ok(value),
            Ok(_) => Err(self.invalid("expected a JSON object")),
            Err(e) => Err(self.invalid(&e.to_string())),
        }
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::InvalidParameter {
            parameter: self.long.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Flag token for a dotted field path: `name.givenName` → `name-given-name`.
/// Digits stay attached to their word: `x509Certificates` → `x509-certificates`.
pub fn parameter_name(path: &str) -> String {
    path.split('.')
        .map(|segment| {
            segment
                .from_case(Case::Camel)
                .remove_boundaries(&[Boundary::LowerDigit, Boundary::UpperDigit, Boundary::DigitLower])
                .to_case(Case::Kebab)
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// A resource subcommand, ready to be rendered and parsed.
#[derive(Debug, Clone)]
pub struct CommandSpec<'a> {
    pub descriptor: &'a ResourceTypeDescriptor,
    pub context: RequestContext,
    pub parameters: Vec<Parameter>,
}

/// Builds the command for `descriptor` in `context`, excluding every field
/// the acceptability filter rejects.
///
/// A field whose flag is reserved or already taken by an earlier field is
/// left out with a warning; it can still be sent through piped input.
pub fn build_command(descriptor: &ResourceTypeDescriptor, context: RequestContext) -> CommandSpec<'_> {
    let exclude = unacceptable_fields(context, descriptor);
    let mut parameters: Vec<Parameter> = Vec::new();
    for field in descriptor
        .fields
        .iter()
        .filter(|f| f.holds_value() && !exclude.contains(&f.path))
    {
        let parameter = Parameter::from_field(field);
        let clashes = RESERVED_FLAGS.contains(&parameter.long.as_str())
            || RESERVED_FLAGS.contains(&parameter.field.as_str())
            || parameters.iter().any(|p| p.long == parameter.long);
        if clashes {
            tracing::warn!(
                resource_type = %descriptor.name,
                field = %parameter.field,
                flag = %parameter.long,
                "flag already in use, attribute has no parameter"
            );
            continue;
        }
        parameters.push(parameter);
    }

    CommandSpec {
        descriptor,
        context,
        parameters,
    }
}

/// Subcommand verb for a context, as typed on the command line.
pub fn verb(context: RequestContext) -> &'static str {
    match context {
        RequestContext::Creation => "create",
        RequestContext::Replacement => "replace",
        RequestContext::Query => "query",
        RequestContext::Search => "search",
    }
}

impl CommandSpec<'_> {
    pub fn parameter(&self, field: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.field == field)
    }

    /// Renders the clap command for this resource type.
    pub fn command(&self) -> Command {
        let key = self.descriptor.key();
        let verb = verb(self.context);
        let about = match self.context {
            RequestContext::Replacement => format!(
                "Replace a {} resource with a SCIM PUT request on {}/<id>",
                self.descriptor.name, self.descriptor.endpoint
            ),
            _ => format!(
                "Create a {} resource with a SCIM POST request on {}",
                self.descriptor.name, self.descriptor.endpoint
            ),
        };

        let mut cmd = Command::new(key.clone())
            .bin_name(format!("scim2 {verb} {key}"))
            .about(about)
            .after_help(
                "Multi-valued attributes take a JSON array, e.g. \
                 --emails '[{\"value\": \"bjensen@example.com\", \"primary\": true}]'.\n\
                 A JSON document piped to stdin takes precedence over the flags.",
            )
            .arg(
                Arg::new(INDENT)
                    .long(INDENT)
                    .action(ArgAction::SetTrue)
                    .overrides_with(NO_INDENT)
                    .help("Indent JSON response payloads (default)"),
            )
            .arg(
                Arg::new(NO_INDENT)
                    .long(NO_INDENT)
                    .action(ArgAction::SetTrue)
                    .overrides_with(INDENT)
                    .help("Print JSON response payloads on a single line"),
            );

        for parameter in &self.parameters {
            cmd = cmd.arg(parameter.arg());
        }
        cmd
    }

    /// Parses the resource name and the flags that follow it.
    pub fn parse<I, T>(&self, args: I) -> std::result::Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        self.command().try_get_matches_from(args)
    }

    /// Help text of the rendered command.
    pub fn help(&self) -> String {
        self.command().render_help().to_string()
    }

    /// Assembles the payload from parsed flags.
    ///
    /// Returns `Ok(None)` when no field flag was given: an object with every
    /// field unset is the resource's zero value and is never sent.
    pub fn payload(&self, matches: &ArgMatches) -> Result<Option<Value>> {
        let mut object = Map::new();
        for parameter in &self.parameters {
            if let Some(value) = parameter.value(matches)? {
                insert_path(&mut object, &parameter.field, value);
            }
        }

        if object.is_empty() {
            return Ok(None);
        }

        object.insert(
            "schemas".to_string(),
            Value::Array(vec![Value::String(self.descriptor.schema.clone())]),
        );
        Ok(Some(Value::Object(object)))
    }
}

/// Explicit `--indent` / `--no-indent` choice, if any was given.
pub fn indent_choice(matches: &ArgMatches) -> Option<bool> {
    if matches.get_flag(NO_INDENT) {
        Some(false)
    } else if matches.get_flag(INDENT) {
        Some(true)
    } else {
        None
    }
}

fn insert_path(object: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            object.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = object
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}
