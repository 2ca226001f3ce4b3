//! Engine configuration.

/// File extensions the definition loader accepts by default.
pub const DEFAULT_DEFINITION_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Options applied when an engine is constructed.
///
/// # Example
///
/// ```
/// use seedbed_factory::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_sequence_start(1000)
///     .with_definition_extensions(vec!["json".to_string()]);
/// assert_eq!(config.sequence_start, 1000);
/// assert!(config.default_generators);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
	/// Register the built-in generator kinds.
	pub default_generators: bool,

	/// First value produced by every `sequence` counter.
	pub sequence_start: u64,

	/// Extensions of files picked up by the definition loader.
	pub definition_extensions: Vec<String>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			default_generators: true,
			sequence_start: 1,
			definition_extensions: DEFAULT_DEFINITION_EXTENSIONS
				.iter()
				.map(|ext| ext.to_string())
				.collect(),
		}
	}
}

impl EngineConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether the built-in generator kinds are registered.
	pub fn with_default_generators(mut self, enabled: bool) -> Self {
		self.default_generators = enabled;
		self
	}

	/// Sets the first value of every sequence.
	pub fn with_sequence_start(mut self, start: u64) -> Self {
		self.sequence_start = start;
		self
	}

	/// Sets the extensions accepted by the definition loader.
	pub fn with_definition_extensions(mut self, extensions: Vec<String>) -> Self {
		self.definition_extensions = extensions;
		self
	}

	/// Returns true if the loader should read files with this extension.
	pub fn accepts_extension(&self, ext: &str) -> bool {
		self.definition_extensions
			.iter()
			.any(|accepted| accepted.eq_ignore_ascii_case(ext))
	}
}
