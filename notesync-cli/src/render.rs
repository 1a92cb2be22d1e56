// ============================================================================
// notesync-cli/src/render.rs
// ============================================================================
//
// SIGNATURE RENDERING: Merged signatures to clap commands and back
//
// Every parameter of a merged signature becomes one `--long` option. The type
// tag picks the value parser, help text and env var come from the parameter.
// Parameters without a default are required. Defaults are attached for help
// output only: `arguments` skips values clap filled in from a default, so the
// core applies defaults during binding.

use clap::builder::{BoolishValueParser, PossibleValuesParser, ValueHint};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use notesync_core::{Arguments, MergedSignature, Parameter, Signature, TypeTag};
use serde_json::Value;

/// Long flag for a parameter name: `browser_timeout_seconds` becomes
/// `browser-timeout-seconds`.
pub fn flag_name(param: &str) -> String {
    param.replace('_', "-")
}

/// Builds the clap command exposing a merged signature.
pub fn command(name: &str, about: &str, merged: &MergedSignature) -> Command {
    merged
        .signature()
        .iter()
        .fold(Command::new(name.to_string()).about(about.to_string()), |cmd, param| {
            cmd.arg(argument(param))
        })
}

fn tag_of(param: &Parameter) -> TypeTag {
    param.annotation.clone().unwrap_or(TypeTag::Str)
}

/// Builds the clap argument for one parameter.
pub fn argument(param: &Parameter) -> Arg {
    let tag = tag_of(param);
    let mut arg = Arg::new(param.name.clone()).long(flag_name(&param.name));

    if let Some(help) = &param.help {
        arg = arg.help(help.clone());
    }
    if let Some(env) = &param.env {
        arg = arg.env(env.clone());
    }

    arg = match &tag {
        TypeTag::Bool => arg
            .value_parser(BoolishValueParser::new())
            .num_args(0..=1)
            .default_missing_value("true")
            .value_name("BOOL"),
        TypeTag::List(inner) => with_value_parser(arg, inner)
            .action(ArgAction::Append)
            .value_name(value_name(inner)),
        other => with_value_parser(arg, other).value_name(value_name(other)),
    };

    if param.is_required() {
        return arg.required(true);
    }

    match param.default.value() {
        Some(Value::Bool(b)) => arg.default_value(b.to_string()),
        Some(Value::Number(n)) => arg.default_value(n.to_string()),
        Some(Value::String(s)) => arg.default_value(s.clone()),
        _ => arg,
    }
}

fn with_value_parser(arg: Arg, tag: &TypeTag) -> Arg {
    match tag {
        TypeTag::Bool => arg.value_parser(BoolishValueParser::new()),
        TypeTag::Int => arg.value_parser(clap::value_parser!(i64)),
        TypeTag::Float => arg.value_parser(clap::value_parser!(f64)),
        TypeTag::Path => arg.value_hint(ValueHint::AnyPath),
        TypeTag::Choice(values) => arg.value_parser(PossibleValuesParser::new(values.clone())),
        TypeTag::Str | TypeTag::List(_) => arg,
    }
}

fn value_name(tag: &TypeTag) -> &'static str {
    match tag {
        TypeTag::Bool => "BOOL",
        TypeTag::Int | TypeTag::Float => "NUMBER",
        TypeTag::Path => "PATH",
        TypeTag::Choice(_) => "METHOD",
        TypeTag::Str | TypeTag::List(_) => "TEXT",
    }
}

/// Collects the values the user supplied, on the command line or through
/// an env var, into the name -> value map the dispatcher binds.
pub fn arguments(matches: &ArgMatches, signature: &Signature) -> Arguments {
    let mut args = Arguments::new();

    for param in signature {
        let id = param.name.as_str();
        match matches.value_source(id) {
            None | Some(ValueSource::DefaultValue) => continue,
            Some(_) => {}
        }
        let value = match tag_of(param) {
            TypeTag::List(inner) => Some(Value::Array(many(matches, id, &inner))),
            tag => one(matches, id, &tag),
        };
        if let Some(value) = value {
            args.insert(id, value);
        }
    }

    args
}

fn one(matches: &ArgMatches, id: &str, tag: &TypeTag) -> Option<Value> {
    match tag {
        TypeTag::Bool => matches.get_one::<bool>(id).map(|v| Value::Bool(*v)),
        TypeTag::Int => matches.get_one::<i64>(id).map(|v| Value::from(*v)),
        TypeTag::Float => matches.get_one::<f64>(id).map(|v| Value::from(*v)),
        _ => matches.get_one::<String>(id).map(|v| Value::String(v.clone())),
    }
}

fn many(matches: &ArgMatches, id: &str, inner: &TypeTag) -> Vec<Value> {
    match inner {
        TypeTag::Bool => collect(matches.get_many::<bool>(id), |v| Value::Bool(*v)),
        TypeTag::Int => collect(matches.get_many::<i64>(id), |v| Value::from(*v)),
        TypeTag::Float => collect(matches.get_many::<f64>(id), |v| Value::from(*v)),
        _ => collect(matches.get_many::<String>(id), |v| Value::String(v.clone())),
    }
}

fn collect<'a, T: 'a>(
    values: Option<impl Iterator<Item = &'a T>>,
    convert: impl Fn(&T) -> Value,
) -> Vec<Value> {
    values.map(|iter| iter.map(convert).collect()).unwrap_or_default()
}
