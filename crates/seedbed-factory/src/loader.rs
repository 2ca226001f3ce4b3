//! Definition loading from JSON and YAML files.
//!
//! A definition file holds a single definition or a list of them:
//!
//! ```yaml
//! - model: User
//!   attributes:
//!     username: username
//!     email: safe_email
//!     active: true
//! - model: admin:User
//!   attributes:
//!     is_admin: true
//! ```
//!
//! String attribute values are generator kinds, every other value is used
//! literally. Files cannot carry callbacks.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::definition::{Attributes, Definition};
use crate::engine::FactoryEngine;
use crate::error::{FactoryError, FactoryResult};
use crate::generator::GeneratorSpec;

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DefinitionFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires `yaml` feature).
	Yaml,
}

impl DefinitionFormat {
	/// Determines the format from a file extension.
	///
	/// # Example
	///
	/// ```
	/// # use seedbed_factory::DefinitionFormat;
	/// assert_eq!(DefinitionFormat::from_extension("json"), Some(DefinitionFormat::Json));
	/// assert_eq!(DefinitionFormat::from_extension("YML"), Some(DefinitionFormat::Yaml));
	/// assert_eq!(DefinitionFormat::from_extension("xml"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}
}

impl fmt::Display for DefinitionFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}

/// One definition as written in a file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DefinitionRecord {
	/// Definition name, `Model` or `group:Model`.
	pub model: String,

	/// Attribute specs in generation order.
	#[serde(default)]
	pub attributes: IndexMap<String, Value>,
}

impl DefinitionRecord {
	/// Converts the record into a definition.
	pub fn into_definition(self) -> Definition {
		let attributes: Attributes = self
			.attributes
			.into_iter()
			.map(|(name, value)| (name, spec_from_value(value)))
			.collect();
		Definition::new(self.model, attributes)
	}
}

fn spec_from_value(value: Value) -> GeneratorSpec {
	match value {
		Value::String(kind) => GeneratorSpec::Kind(kind),
		other => GeneratorSpec::Literal(other),
	}
}

/// Discovers definition files and registers their definitions.
#[derive(Debug, Default)]
pub struct DefinitionLoader;

impl DefinitionLoader {
	/// Creates a new loader.
	pub fn new() -> Self {
		Self
	}

	/// Loads every definition file under `paths` into `engine`.
	///
	/// Directories are walked recursively. Entries are visited in path order
	/// within each directory, so a later file overrides an earlier definition
	/// of the same name. Only extensions accepted by the engine configuration
	/// are read.
	///
	/// # Returns
	///
	/// The number of definitions registered.
	///
	/// # Errors
	///
	/// - [`FactoryError::DirectoryNotFound`] if a path is not a directory
	/// - [`FactoryError::ParseError`] if a file contains an invalid definition
	pub fn load<P: AsRef<Path>>(
		&self,
		engine: &mut FactoryEngine,
		paths: &[P],
	) -> FactoryResult<usize> {
		let mut files = Vec::new();
		for path in paths {
			let path = path.as_ref();
			if !path.is_dir() {
				return Err(FactoryError::DirectoryNotFound(path.display().to_string()));
			}
			self.discover(engine, path, &mut files)?;
		}

		let mut loaded = 0;
		for file in &files {
			let records = self.parse_file(file)?;
			tracing::debug!(path = %file.display(), definitions = records.len(), "parsed definition file");
			for record in records {
				engine.register(record.into_definition());
				loaded += 1;
			}
		}

		tracing::info!(files = files.len(), definitions = loaded, "loaded factory definitions");
		Ok(loaded)
	}

	fn discover(
		&self,
		engine: &FactoryEngine,
		dir: &Path,
		files: &mut Vec<PathBuf>,
	) -> FactoryResult<()> {
		let mut entries = std::fs::read_dir(dir)?
			.map(|entry| entry.map(|entry| entry.path()))
			.collect::<Result<Vec<_>, _>>()?;
		entries.sort();

		for path in entries {
			if path.is_dir() {
				self.discover(engine, &path, files)?;
				continue;
			}

			let accepted = path
				.extension()
				.and_then(|ext| ext.to_str())
				.is_some_and(|ext| engine.config().accepts_extension(ext));
			if accepted {
				files.push(path);
			} else {
				tracing::debug!(path = %path.display(), "skipping non-definition file");
			}
		}
		Ok(())
	}

	/// Parses a single definition file.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::UnsupportedExtension`] if the format cannot be
	/// detected, [`FactoryError::JsonError`] or `YamlError` for malformed
	/// syntax, or [`FactoryError::ParseError`] naming the file for an invalid
	/// definition.
	pub fn parse_file(&self, path: &Path) -> FactoryResult<Vec<DefinitionRecord>> {
		let format = DefinitionFormat::from_path(path).ok_or_else(|| {
			FactoryError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path)?;
		self.parse_str(&content, format).map_err(|e| {
			tracing::warn!(path = %path.display(), error = %e, "invalid definition file");
			match e {
				FactoryError::ParseError(message) => {
					FactoryError::ParseError(format!("{}: {}", path.display(), message))
				}
				other => other,
			}
		})
	}

	/// Parses definitions from a string.
	pub fn parse_str(
		&self,
		content: &str,
		format: DefinitionFormat,
	) -> FactoryResult<Vec<DefinitionRecord>> {
		match format {
			DefinitionFormat::Json => self.parse_json(content),
			DefinitionFormat::Yaml => self.parse_yaml(content),
		}
	}

	fn parse_json(&self, content: &str) -> FactoryResult<Vec<DefinitionRecord>> {
		let value: Value = serde_json::from_str(content)?;

		match value {
			Value::Array(items) => {
				let mut records = Vec::with_capacity(items.len());
				for (idx, item) in items.into_iter().enumerate() {
					let record: DefinitionRecord = serde_json::from_value(item).map_err(|e| {
						FactoryError::ParseError(format!("Invalid definition at index {}: {}", idx, e))
					})?;
					records.push(record);
				}
				Ok(records)
			}
			Value::Object(_) => {
				let record: DefinitionRecord = serde_json::from_value(value).map_err(|e| {
					FactoryError::ParseError(format!("Invalid definition at index 0: {}", e))
				})?;
				Ok(vec![record])
			}
			_ => Err(FactoryError::ParseError(
				"Expected array or object".to_string(),
			)),
		}
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> FactoryResult<Vec<DefinitionRecord>> {
		let value: serde_yaml::Value = serde_yaml::from_str(content)?;

		match value {
			serde_yaml::Value::Sequence(items) => {
				let mut records = Vec::with_capacity(items.len());
				for (idx, item) in items.into_iter().enumerate() {
					let record: DefinitionRecord = serde_yaml::from_value(item).map_err(|e| {
						FactoryError::ParseError(format!("Invalid definition at index {}: {}", idx, e))
					})?;
					records.push(record);
				}
				Ok(records)
			}
			serde_yaml::Value::Mapping(_) => {
				let record: DefinitionRecord = serde_yaml::from_value(value).map_err(|e| {
					FactoryError::ParseError(format!("Invalid definition at index 0: {}", e))
				})?;
				Ok(vec![record])
			}
			_ => Err(FactoryError::ParseError(
				"Expected sequence or mapping".to_string(),
			)),
		}
	}

	/// Stub for YAML parsing when the feature is not enabled.
	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> FactoryResult<Vec<DefinitionRecord>> {
		Err(FactoryError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("json", Some(DefinitionFormat::Json))]
	#[case("yaml", Some(DefinitionFormat::Yaml))]
	#[case("yml", Some(DefinitionFormat::Yaml))]
	#[case("toml", None)]
	fn test_format_from_extension(#[case] ext: &str, #[case] expected: Option<DefinitionFormat>) {
		assert_eq!(DefinitionFormat::from_extension(ext), expected);
	}

	#[rstest]
	fn test_format_from_path() {
		assert_eq!(
			DefinitionFormat::from_path(Path::new("defs/users.json")),
			Some(DefinitionFormat::Json)
		);
		assert_eq!(DefinitionFormat::from_path(Path::new("README")), None);
	}

	#[rstest]
	fn test_parse_json_single_object() {
		let loader = DefinitionLoader::new();
		let records = loader
			.parse_str(
				r#"{"model": "User", "attributes": {"name": "first_name", "age": 30}}"#,
				DefinitionFormat::Json,
			)
			.unwrap();

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].model, "User");
		assert_eq!(records[0].attributes["age"], json!(30));
	}

	#[rstest]
	fn test_parse_json_array_keeps_attribute_order() {
		let loader = DefinitionLoader::new();
		let records = loader
			.parse_str(
				r#"[{"model": "User", "attributes": {"z": 1, "a": 2}}, {"model": "admin:User"}]"#,
				DefinitionFormat::Json,
			)
			.unwrap();

		assert_eq!(records.len(), 2);
		let names: Vec<&str> = records[0].attributes.keys().map(String::as_str).collect();
		assert_eq!(names, vec!["z", "a"]);
		assert!(records[1].attributes.is_empty());
	}

	#[rstest]
	fn test_parse_json_invalid_entry_names_index() {
		let loader = DefinitionLoader::new();
		let err = loader
			.parse_str(
				r#"[{"model": "User"}, {"attributes": {}}]"#,
				DefinitionFormat::Json,
			)
			.unwrap_err();

		assert!(matches!(err, FactoryError::ParseError(ref message) if message.contains("index 1")));
	}

	#[rstest]
	fn test_parse_json_syntax_error() {
		let loader = DefinitionLoader::new();
		let err = loader
			.parse_str(r#"[{"model": "User""#, DefinitionFormat::Json)
			.unwrap_err();
		assert!(matches!(err, FactoryError::JsonError(_)));
	}

	#[cfg(feature = "yaml")]
	#[rstest]
	fn test_parse_yaml_syntax_error() {
		let loader = DefinitionLoader::new();
		let err = loader
			.parse_str("- model: [User\n", DefinitionFormat::Yaml)
			.unwrap_err();
		assert!(matches!(err, FactoryError::YamlError(_)));
	}

	#[cfg(feature = "yaml")]
	#[rstest]
	fn test_parse_yaml_keeps_attribute_order() {
		let loader = DefinitionLoader::new();
		let content = "model: User\nattributes:\n  z: 1\n  a: 2\n";
		let records = loader.parse_str(content, DefinitionFormat::Yaml).unwrap();

		let names: Vec<&str> = records[0].attributes.keys().map(String::as_str).collect();
		assert_eq!(names, vec!["z", "a"]);
	}

	#[rstest]
	fn test_parse_json_rejects_scalar() {
		let loader = DefinitionLoader::new();
		let err = loader.parse_str("42", DefinitionFormat::Json).unwrap_err();
		assert!(matches!(err, FactoryError::ParseError(_)));
	}

	#[cfg(feature = "yaml")]
	#[rstest]
	fn test_parse_yaml_sequence() {
		let loader = DefinitionLoader::new();
		let content = "- model: User\n  attributes:\n    name: word\n    active: true\n";
		let records = loader.parse_str(content, DefinitionFormat::Yaml).unwrap();

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].attributes["name"], json!("word"));
		assert_eq!(records[0].attributes["active"], json!(true));
	}

	#[rstest]
	fn test_record_into_definition() {
		let record = DefinitionRecord {
			model: "admin:User".to_string(),
			attributes: [
				("role".to_string(), json!("literal:admin")),
				("level".to_string(), json!(3)),
			]
			.into_iter()
			.collect(),
		};
		let definition = record.into_definition();

		assert_eq!(definition.model_type(), "User");
		assert_eq!(definition.group(), Some("admin"));
		assert!(matches!(
			definition.attributes().get("role"),
			Some(GeneratorSpec::Kind(kind)) if kind == "literal:admin"
		));
		assert!(matches!(
			definition.attributes().get("level"),
			Some(GeneratorSpec::Literal(value)) if *value == json!(3)
		));
	}
}
