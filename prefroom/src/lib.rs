//! Typed, singleton-scoped accessors over a named key-value preference store.
//!
//! `#[derive(PreferenceEntity)]` (or the `prefroom-build` code generator) turns
//! an entity description into a `Preference_<Name>` unit. This crate is the
//! runtime those units call into: a [`Context`] that opens named stores, the
//! [`PreferenceStore`] capability with its [`Editor`], and the
//! [`SingletonSlot`] each unit keeps its shared instance in.

extern crate self as prefroom;

pub mod context;
pub mod errors;
pub mod singleton;
pub mod store;
pub mod value;

pub use context::{Context, Mode};
pub use errors::StoreError;
pub use singleton::SingletonSlot;
pub use store::{Editor, FileStore, MemoryStore, PendingEdit, PreferenceStore, SharedPreferences};
pub use value::Value;

pub use prefroom_macros::PreferenceEntity;
