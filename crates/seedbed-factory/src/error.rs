//! Error types for the factory engine.
//!
//! Every fallible operation in this crate returns [`FactoryResult`]. The only
//! place errors are collected instead of returned immediately is
//! [`FactoryEngine::delete_saved`](crate::FactoryEngine::delete_saved), which
//! wraps every per-object failure in [`FactoryError::DeletingFailed`].

use serde_json::Value;
use thiserror::Error;

/// Boxed error returned by the save/delete capabilities of a model.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building, persisting or tearing down models.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// No definition was registered under the requested name.
	#[error("No factory defined for: {0}")]
	NoDefinedFactory(String),

	/// The definition names a model type the registry cannot construct.
	#[error("Model not found: {0}")]
	ModelNotFound(String),

	/// The model type was registered without a save capability.
	#[error("Model {0} has no save capability")]
	SaveMethodNotFound(String),

	/// The model type was registered without a delete capability.
	#[error("Model {0} has no delete capability")]
	DeleteMethodNotFound(String),

	/// The save capability reported failure.
	#[error("{}", save_failed_message(.model, .errors.as_ref()))]
	SaveFailed {
		/// Definition name of the object.
		model: String,
		/// Validation errors exposed by the object, if any.
		errors: Option<Value>,
	},

	/// The save capability returned an error.
	#[error("Error while saving {model}: {source}")]
	SaveError {
		/// Definition name of the object.
		model: String,
		/// Underlying error.
		#[source]
		source: BoxError,
	},

	/// The delete capability reported failure.
	#[error("Failed to delete model: {0}")]
	DeleteFailed(String),

	/// The delete capability returned an error.
	#[error("Error while deleting {model}: {source}")]
	DeleteError {
		/// Definition name of the object.
		model: String,
		/// Underlying error.
		#[source]
		source: BoxError,
	},

	/// One or more saved objects could not be deleted.
	#[error("Encountered {} problem(s) while deleting saved models", .0.len())]
	DeletingFailed(Vec<FactoryError>),

	/// A generator spec named a kind that is not registered.
	#[error("Generator not found: {0}")]
	GeneratorNotFound(String),

	/// A generator was invoked with unusable parameters.
	#[error("Invalid arguments for generator {kind}: {message}")]
	InvalidGeneratorArguments {
		/// Generator kind.
		kind: String,
		/// Description of the problem.
		message: String,
	},

	/// The model does not expose the named attribute.
	#[error("Attribute {attribute} not found on {model}")]
	AttributeNotFound {
		/// Model type name.
		model: String,
		/// Attribute name.
		attribute: String,
	},

	/// A generated value could not be assigned to the attribute.
	#[error("Invalid value for {model}.{attribute}: {message}")]
	InvalidAttribute {
		/// Model type name.
		model: String,
		/// Attribute name.
		attribute: String,
		/// Conversion error message.
		message: String,
	},

	/// A built object is not of the requested Rust type.
	#[error("Model {model} is not a {expected}")]
	TypeMismatch {
		/// Requested Rust type.
		expected: &'static str,
		/// Definition name of the object.
		model: String,
	},

	/// A definition directory does not exist.
	#[error("Directory not found: {0}")]
	DirectoryNotFound(String),

	/// A definition file could not be parsed.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// Unsupported definition file extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),

	/// YAML serialization/deserialization error (when yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	YamlError(#[from] serde_yaml::Error),
}

impl FactoryError {
	/// Returns the collected failures of a [`FactoryError::DeletingFailed`].
	///
	/// Every other variant yields an empty slice.
	pub fn errors(&self) -> &[FactoryError] {
		match self {
			Self::DeletingFailed(errors) => errors,
			_ => &[],
		}
	}

	/// Returns the validation errors carried by a [`FactoryError::SaveFailed`].
	pub fn validation_errors(&self) -> Option<&Value> {
		match self {
			Self::SaveFailed { errors, .. } => errors.as_ref(),
			_ => None,
		}
	}
}

fn save_failed_message(model: &str, errors: Option<&Value>) -> String {
	match errors {
		Some(errors) => format!("Failed to save model {}: {}", model, errors),
		None => format!("Failed to save model: {}", model),
	}
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
