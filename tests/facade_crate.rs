//! Integration tests for the `seedbed` facade crate.

use rstest::rstest;
use seedbed::prelude::*;
use serde_json::json;

#[derive(Debug, Default, Model)]
struct Article {
	id: u64,
	title: String,
	published: bool,
	#[model(skip)]
	deleted: bool,
}

impl Persistable for Article {
	fn save(&mut self) -> Result<bool, BoxError> {
		Ok(!self.title.is_empty())
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		self.deleted = true;
		Ok(true)
	}
}

#[rstest]
fn test_facade_crate_round_trip() {
	let mut engine = FactoryEngine::new();
	engine.register_persistable::<Article>("Article");
	engine.define(
		"Article",
		Attributes::new()
			.with("id", "sequence")
			.with("title", "sentence:3,6")
			.with("published", "boolean:100"),
	);
	engine.define(
		"draft:Article",
		Attributes::new().with("published", GeneratorSpec::literal(false)),
	);

	let ids = engine.seed(2, "Article").unwrap();
	let draft = engine.create("draft:Article").unwrap();

	assert_eq!(engine.saved().len(), 3);
	assert!(ids.iter().all(|id| engine.get_as::<Article>(*id).unwrap().published));
	let draft = engine.get_as::<Article>(draft).unwrap();
	assert!(!draft.published);
	assert_eq!(draft.id, 1);

	engine.delete_saved().unwrap();
	assert!(engine.saved().is_empty());
}

#[rstest]
fn test_facade_crate_reports_failed_save() {
	let mut engine = FactoryEngine::new();
	engine.register_persistable::<Article>("Article");
	engine.define("Article", Attributes::new().with("title", GeneratorSpec::literal("")));

	let err = engine.create("Article").unwrap_err();

	assert!(matches!(err, seedbed::FactoryError::SaveFailed { .. }));
	assert_eq!(err.to_string(), "Failed to save model: Article");
	assert_eq!(engine.pending().len(), 1);
	let pending = engine.get(engine.pending()[0]).unwrap();
	assert_eq!(pending.get_attribute("title"), Some(json!("")));
}
