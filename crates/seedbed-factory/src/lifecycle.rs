//! Pending/saved lifecycle tracking.
//!
//! Built objects live in an arena keyed by [`ObjectId`]. Each entry carries a
//! [`Membership`] tag, and two ordered id lists record the order in which
//! objects became pending or saved. An id is in at most one list at a time.

use std::collections::HashMap;
use std::fmt;

use crate::model::{Model, PersistFn, Persistable};

/// Stable handle of an object tracked by the engine.
///
/// Ids are never reused within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
	/// Returns the raw id value.
	pub fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Which lifecycle set an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
	/// Built and registered, not yet persisted.
	Pending,
	/// Persisted through its save capability.
	Saved,
}

/// One tracked object.
pub(crate) struct Entry {
	pub(crate) model: String,
	// `None` while the engine is generating its attributes
	pub(crate) object: Option<Box<dyn Model>>,
	persist: Option<PersistFn>,
	pub(crate) membership: Membership,
}

impl Entry {
	/// The object together with its persistence capability.
	pub(crate) fn persistable(&mut self) -> Option<&mut dyn Persistable> {
		let persist = self.persist?;
		persist(self.object.as_deref_mut()?)
	}
}

/// Arena of tracked objects with ordered pending/saved sets.
#[derive(Default)]
pub(crate) struct Lifecycle {
	next_id: u64,
	entries: HashMap<ObjectId, Entry>,
	pending: Vec<ObjectId>,
	saved: Vec<ObjectId>,
}

impl Lifecycle {
	/// Registers a new pending entry and returns its id.
	pub(crate) fn register_pending(
		&mut self,
		model: impl Into<String>,
		persist: Option<PersistFn>,
	) -> ObjectId {
		self.next_id += 1;
		let id = ObjectId(self.next_id);
		self.entries.insert(
			id,
			Entry {
				model: model.into(),
				object: None,
				persist,
				membership: Membership::Pending,
			},
		);
		self.pending.push(id);
		id
	}

	/// Stores the built object of an entry.
	pub(crate) fn attach(&mut self, id: ObjectId, object: Box<dyn Model>) {
		if let Some(entry) = self.entries.get_mut(&id) {
			entry.object = Some(object);
		}
	}

	pub(crate) fn membership(&self, id: ObjectId) -> Option<Membership> {
		self.entries.get(&id).map(|entry| entry.membership)
	}

	/// Moves a pending entry to the end of the saved set.
	///
	/// Returns false if the entry was not pending.
	pub(crate) fn mark_saved(&mut self, id: ObjectId) -> bool {
		let Some(entry) = self.entries.get_mut(&id) else {
			return false;
		};
		if entry.membership != Membership::Pending {
			return false;
		}
		self.pending.retain(|pending| *pending != id);
		self.saved.push(id);
		entry.membership = Membership::Saved;
		true
	}

	/// Removes the most recently saved entry.
	pub(crate) fn pop_saved(&mut self) -> Option<(ObjectId, Entry)> {
		let id = self.saved.pop()?;
		let entry = self.entries.remove(&id)?;
		Some((id, entry))
	}

	pub(crate) fn entry_mut(&mut self, id: ObjectId) -> Option<&mut Entry> {
		self.entries.get_mut(&id)
	}

	pub(crate) fn get(&self, id: ObjectId) -> Option<&dyn Model> {
		self.entries.get(&id)?.object.as_deref()
	}

	pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn Model> {
		self.entries.get_mut(&id)?.object.as_deref_mut()
	}

	pub(crate) fn model(&self, id: ObjectId) -> Option<&str> {
		self.entries.get(&id).map(|entry| entry.model.as_str())
	}

	pub(crate) fn pending(&self) -> &[ObjectId] {
		&self.pending
	}

	pub(crate) fn saved(&self) -> &[ObjectId] {
		&self.saved
	}

	/// Forgets every tracked object without deleting anything.
	pub(crate) fn clear(&mut self) {
		self.entries.clear();
		self.pending.clear();
		self.saved.clear();
	}
}
