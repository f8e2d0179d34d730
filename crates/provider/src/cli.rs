//! Offline command line: list types, dump schemas, validate configuration
//! and upgrade stored state without contacting PingOne.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pingone_framework::{Attribute, AttributeKind, AttributeType, Diagnostics, NestingMode, Schema};
use serde::Serialize;
use serde_json::{Map, Value as Json, json};

use crate::error::{Error, Result};
use crate::logging::{LogLevel, TracingConfig, TracingFormat};
use crate::provider::ProviderServer;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-pingone")]
#[command(about = "Inspect the PingOne provider's types and check configuration offline")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(short = 'L', long, global = true, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Log output format.
    #[arg(long, global = true, default_value = "compact", value_enum)]
    pub log_format: TracingFormat,
}

impl Cli {
    /// Tracing settings selected on the command line.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: self.log_format,
            level: self.log_level.into(),
            filter: None,
        }
    }
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List resource and data source types with their schema versions
    Types,

    /// Print the schema of a type, or of the provider block when no type is given
    Schema {
        /// Type name, e.g. `pingone_webhook`
        #[arg(value_name = "TYPE")]
        type_name: Option<String>,

        /// Look the type up among data sources
        #[arg(long)]
        data_source: bool,
    },

    /// Validate a JSON configuration object against a type's schema
    Validate {
        /// Type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// File holding one JSON object of attribute values
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Look the type up among data sources
        #[arg(long)]
        data_source: bool,
    },

    /// Upgrade stored resource state to the current schema version
    Upgrade {
        /// Resource type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// File holding the stored state object
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Schema version the state was written at
        #[arg(long, default_value_t = 0)]
        from_version: i64,
    },
}

#[derive(Serialize)]
struct TypeEntry {
    name: &'static str,
    kind: &'static str,
    version: i64,
}

/// Runs one command, writing its output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let server = ProviderServer::new()?;
    match &cli.command {
        Commands::Types => {
            let mut entries = Vec::new();
            for name in server.resource_types() {
                entries.push(TypeEntry {
                    name,
                    kind: "resource",
                    version: server.resource(name)?.schema().version,
                });
            }
            for name in server.data_source_types() {
                entries.push(TypeEntry {
                    name,
                    kind: "data_source",
                    version: server.data_source(name)?.schema().version,
                });
            }
            write_json(out, &entries)
        }
        Commands::Schema { type_name, data_source } => {
            let schema = match type_name.as_deref() {
                None => ProviderServer::schema(),
                Some(name) if *data_source => server.data_source(name)?.schema().clone(),
                Some(name) => server.resource(name)?.schema().clone(),
            };
            write_json(out, &schema_json(&schema))
        }
        Commands::Validate {
            type_name,
            file,
            data_source,
        } => {
            let config = read_json(file)?;
            let diagnostics = if *data_source {
                server.data_source(type_name)?;
                server.validate_data_source_config(type_name, &config)
            } else {
                server.resource(type_name)?;
                server.validate_resource_config(type_name, &config)
            };
            write_json(out, &diagnostics)?;
            check(&diagnostics)
        }
        Commands::Upgrade {
            type_name,
            file,
            from_version,
        } => {
            let raw = read_json(file)?;
            server.resource(type_name)?;
            match server.upgrade_resource_state(type_name, *from_version, &raw) {
                Ok(upgraded) => write_json(out, &upgraded),
                Err(diagnostics) => {
                    write_json(out, &diagnostics)?;
                    check(&diagnostics)
                }
            }
        }
    }
}

fn check(diagnostics: &Diagnostics) -> Result<()> {
    match diagnostics.errors().count() {
        0 => Ok(()),
        errors => Err(Error::InvalidConfiguration { errors }),
    }
}

fn read_json(path: &Path) -> Result<Json> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::FileError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(Error::Output)?;
    writeln!(out).map_err(|e| Error::Output(serde_json::Error::io(e)))
}

fn type_json(attribute_type: &AttributeType) -> Json {
    match attribute_type {
        AttributeType::String => json!("string"),
        AttributeType::Bool => json!("bool"),
        AttributeType::Int64 | AttributeType::Float64 => json!("number"),
        AttributeType::List(element) => json!(["list", type_json(element)]),
        AttributeType::Set(element) => json!(["set", type_json(element)]),
        AttributeType::Map(element) => json!(["map", type_json(element)]),
    }
}

fn attribute_json(attribute: &Attribute) -> Json {
    let mut out = Map::new();
    match &attribute.kind {
        AttributeKind::Primitive(attribute_type) => {
            out.insert("type".into(), type_json(attribute_type));
        }
        AttributeKind::Nested { mode, attributes } => {
            let nesting = match mode {
                NestingMode::Single => "single",
                NestingMode::List => "list",
                NestingMode::Set => "set",
                NestingMode::Map => "map",
            };
            out.insert(
                "nested_type".into(),
                json!({
                    "nesting_mode": nesting,
                    "attributes": attributes
                        .iter()
                        .map(|(name, nested)| (name.clone(), attribute_json(nested)))
                        .collect::<Map<_, _>>(),
                }),
            );
        }
    }
    out.insert("description".into(), json!(attribute.description));
    for (flag, set) in [
        ("required", attribute.required),
        ("optional", attribute.optional),
        ("computed", attribute.computed),
        ("sensitive", attribute.sensitive),
    ] {
        if set {
            out.insert(flag.into(), Json::Bool(true));
        }
    }
    if let Some(default) = &attribute.default {
        out.insert("default".into(), default.clone());
    }
    if let Some(message) = &attribute.deprecation_message {
        out.insert("deprecation_message".into(), json!(message));
    }
    Json::Object(out)
}

/// The schema in the host's JSON schema layout.
#[must_use]
pub fn schema_json(schema: &Schema) -> Json {
    let attributes: Map<String, Json> = schema
        .attributes
        .iter()
        .map(|(name, attribute)| (name.clone(), attribute_json(attribute)))
        .collect();
    json!({
        "version": schema.version,
        "block": {
            "description": schema.description,
            "attributes": attributes,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn run_args(args: &[&str]) -> (Result<()>, String) {
        let cli = Cli::try_parse_from(std::iter::once("terraform-provider-pingone").chain(args.iter().copied())).unwrap();
        let mut out = Vec::new();
        let result = run(&cli, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn config_file(value: &Json) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    #[test]
    fn test_types_lists_versions() {
        let (result, out) = run_args(&["types"]);
        result.unwrap();
        let entries: Json = serde_json::from_str(&out).unwrap();
        let webhook = entries
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["name"] == "pingone_webhook")
            .unwrap();
        assert_eq!(webhook["version"], json!(1));
        assert_eq!(webhook["kind"], json!("resource"));
    }

    #[test]
    fn test_schema_of_unknown_type() {
        let (result, _) = run_args(&["schema", "pingone_environment"]);
        assert!(matches!(result, Err(Error::UnknownType { .. })));
    }

    #[test]
    fn test_provider_schema_marks_secrets() {
        let (result, out) = run_args(&["schema"]);
        result.unwrap();
        let schema: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(schema["block"]["attributes"]["client_secret"]["sensitive"], json!(true));
    }

    #[test]
    fn test_validate_reports_errors() {
        let file = config_file(&json!({"environment_id": "nope", "domain_name": "demo.example.org"}));
        let (result, out) = run_args(&["validate", "pingone_trusted_email_domain", file.path().to_str().unwrap()]);
        assert!(matches!(result, Err(Error::InvalidConfiguration { errors: 1 })));
        assert!(out.contains("environment_id"));
    }

    #[test]
    fn test_validate_data_source() {
        let file = config_file(&json!({
            "organization_id": "11111111-1111-1111-1111-111111111111",
            "scim_filter": "status eq \"ACTIVE\""
        }));
        let (result, _) = run_args(&["validate", "--data-source", "pingone_licenses", file.path().to_str().unwrap()]);
        result.unwrap();
    }

    #[test]
    fn test_missing_file() {
        let (result, _) = run_args(&["validate", "pingone_webhook", "/nonexistent/config.json"]);
        assert!(matches!(result, Err(Error::FileError { .. })));
    }

    #[test]
    fn test_upgrade_webhook_state() {
        let file = config_file(&json!({"id": "w1", "filter_options": [{"included_action_types": ["USER.CREATED"]}]}));
        let (result, out) = run_args(&["upgrade", "pingone_webhook", file.path().to_str().unwrap()]);
        result.unwrap();
        let upgraded: Json = serde_json::from_str(&out).unwrap();
        assert_eq!(upgraded["filter_options"]["included_action_types"], json!(["USER.CREATED"]));
    }
}
