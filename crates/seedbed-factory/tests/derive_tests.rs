//! Integration tests for `#[derive(Model)]`.

mod helpers;

use helpers::models::{Plain, Widget};
use rstest::rstest;
use seedbed_factory::{FactoryError, Model};
use serde_json::json;

#[rstest]
fn test_set_and_get_named_fields() {
	let mut widget = Widget::default();

	widget.set_attribute("name", json!("bolt")).unwrap();
	widget.set_attribute("weight", json!(12)).unwrap();

	assert_eq!(widget.name, "bolt");
	assert_eq!(widget.get_attribute("weight"), Some(json!(12)));
}

#[rstest]
fn test_skipped_field_is_not_an_attribute() {
	let mut widget = Widget::default();

	assert_eq!(widget.get_attribute("saves"), None);
	let err = widget.set_attribute("saves", json!(3)).unwrap_err();
	assert!(matches!(
		err,
		FactoryError::AttributeNotFound { ref model, ref attribute }
			if model == "Widget" && attribute == "saves"
	));
}

#[rstest]
fn test_renamed_field_uses_new_key() {
	let mut plain = Plain::default();

	plain.set_attribute("label", json!("Title")).unwrap();

	assert_eq!(plain.title, "Title");
	assert_eq!(plain.get_attribute("label"), Some(json!("Title")));
	assert_eq!(plain.get_attribute("title"), None);
}

#[rstest]
#[case(json!("heavy"))]
#[case(json!(null))]
#[case(json!({"kg": 3}))]
fn test_wrongly_shaped_value(#[case] value: serde_json::Value) {
	let mut widget = Widget::default();

	let err = widget.set_attribute("weight", value).unwrap_err();
	assert!(matches!(
		err,
		FactoryError::InvalidAttribute { ref attribute, .. } if attribute == "weight"
	));
	assert_eq!(widget.weight, 0);
}

#[rstest]
fn test_downcast_through_dyn_model() {
	let mut boxed: Box<dyn Model> = Box::new(Widget::default());

	boxed.set_attribute("color", json!("red")).unwrap();

	assert!(boxed.is::<Widget>());
	assert!(!boxed.is::<Plain>());
	assert_eq!(boxed.downcast_ref::<Widget>().map(|w| w.color.as_str()), Some("red"));
	assert!(boxed.downcast_mut::<Plain>().is_none());
}
