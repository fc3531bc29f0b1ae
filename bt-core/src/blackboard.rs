use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::BlackboardError;

/// Statically typed handle to a blackboard entry.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Named, type-erased key-value store shared by the nodes of one tree.
///
/// Typed keys (`BbKey`) treat a type mismatch as a programming error and panic. Lookups by name
/// (`entry`, used by node ports whose keys come from configuration) report it as
/// `BlackboardError::TypeMismatch` instead.
///
/// The blackboard is deliberately not `Sync`: only the tick thread touches it.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<String, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.name.to_owned(), Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(key.name)?;
        value
            .downcast_ref::<T>()
            .or_else(|| mismatch_panic(key.name))
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(key.name)?;
        value
            .downcast_mut::<T>()
            .or_else(|| mismatch_panic(key.name))
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        value
            .downcast::<T>()
            .map(|b| *b)
            .ok()
            .or_else(|| mismatch_panic(key.name))
    }

    pub fn contains_entry(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn set_entry<T: 'static>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    pub fn entry<T: 'static>(&self, name: &str) -> Result<&T, BlackboardError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| BlackboardError::Missing {
                key: name.to_owned(),
            })?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| BlackboardError::TypeMismatch {
                key: name.to_owned(),
            })
    }

    pub fn remove_entry(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }
}

fn mismatch_panic<R>(name: &str) -> Option<R> {
    panic!("blackboard type mismatch for key `{name}` (stored type differs from requested)")
}
