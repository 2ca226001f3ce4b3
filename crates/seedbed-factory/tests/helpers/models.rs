//! Test model types.
//!
//! Every persistable model appends to a per-thread event log, so a test can
//! assert the order of saves and deletes without sharing state with tests
//! running on other threads.

use std::cell::RefCell;
use std::fmt;

use seedbed_factory::{BoxError, FactoryEngine, Model, Persistable};
use serde_json::{Value, json};

thread_local! {
	static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(event: String) {
	EVENTS.with(|events| events.borrow_mut().push(event));
}

/// Takes every event recorded on this thread.
pub fn take_events() -> Vec<String> {
	EVENTS.with(|events| events.borrow_mut().drain(..).collect())
}

#[derive(Debug)]
struct Boom;

impl fmt::Display for Boom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("boom")
	}
}

impl std::error::Error for Boom {}

/// Model whose save and delete always succeed.
#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Widget {
	pub id: u64,
	pub name: String,
	pub color: String,
	pub weight: i64,
	#[model(skip)]
	pub saves: u32,
}

impl Persistable for Widget {
	fn save(&mut self) -> Result<bool, BoxError> {
		self.saves += 1;
		record(format!("save widget {}", self.name));
		Ok(true)
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		record(format!("delete widget {}", self.name));
		Ok(true)
	}
}

/// Model whose save reports failure with validation errors.
#[derive(Debug, Default, Model)]
pub struct Invalid {
	pub name: String,
}

impl Persistable for Invalid {
	fn save(&mut self) -> Result<bool, BoxError> {
		Ok(false)
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		Ok(true)
	}

	fn validation_errors(&self) -> Option<Value> {
		Some(json!({"name": ["required"]}))
	}
}

/// Model whose save raises.
#[derive(Debug, Default, Model)]
pub struct Volatile {
	pub name: String,
}

impl Persistable for Volatile {
	fn save(&mut self) -> Result<bool, BoxError> {
		Err(Box::new(Boom))
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		Ok(true)
	}
}

/// Model whose delete reports failure.
#[derive(Debug, Default, Model)]
pub struct Brittle {
	pub name: String,
}

impl Persistable for Brittle {
	fn save(&mut self) -> Result<bool, BoxError> {
		Ok(true)
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		record(format!("delete brittle {}", self.name));
		Ok(false)
	}
}

/// Model whose delete raises.
#[derive(Debug, Default, Model)]
pub struct Exploding {
	pub name: String,
}

impl Persistable for Exploding {
	fn save(&mut self) -> Result<bool, BoxError> {
		Ok(true)
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		record(format!("delete exploding {}", self.name));
		Err(Box::new(Boom))
	}
}

/// Model without persistence.
#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Plain {
	pub name: String,
	#[model(rename = "label")]
	pub title: String,
}

/// Parent side of a relation.
#[derive(Debug, Default, Model)]
pub struct Company {
	pub id: u64,
	pub name: String,
}

impl Persistable for Company {
	fn save(&mut self) -> Result<bool, BoxError> {
		record(format!("save company {}", self.id));
		Ok(true)
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		record(format!("delete company {}", self.id));
		Ok(true)
	}
}

/// Child side of a relation.
#[derive(Debug, Default, Model)]
pub struct Employee {
	pub name: String,
	pub company_id: u64,
	pub email: String,
}

impl Persistable for Employee {
	fn save(&mut self) -> Result<bool, BoxError> {
		record(format!("save employee {}", self.name));
		Ok(true)
	}

	fn delete(&mut self) -> Result<bool, BoxError> {
		record(format!("delete employee {}", self.name));
		Ok(true)
	}
}

/// Engine with every test model registered and nothing defined.
pub fn registered_engine() -> FactoryEngine {
	let mut engine = FactoryEngine::new();
	engine.register_persistable::<Widget>("Widget");
	engine.register_persistable::<Invalid>("Invalid");
	engine.register_persistable::<Volatile>("Volatile");
	engine.register_persistable::<Brittle>("Brittle");
	engine.register_persistable::<Exploding>("Exploding");
	engine.register_model::<Plain>("Plain");
	engine.register_persistable::<Company>("Company");
	engine.register_persistable::<Employee>("Employee");
	take_events();
	engine
}
