use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::DecodeError;

/// Two-way association between signals and names.
///
/// A signal may carry several names, kept in insertion order. A name points
/// at exactly one signal, the one it was most recently inserted with.
#[derive(Debug, Clone)]
pub struct NameMap<S> {
    names: IndexMap<S, Vec<String>>,
    rev_names: IndexMap<String, S>,
}

impl<S> Default for NameMap<S> {
    fn default() -> Self {
        Self {
            names: IndexMap::new(),
            rev_names: IndexMap::new(),
        }
    }
}

impl<S: Copy + Eq + Hash + std::fmt::Debug> NameMap<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signal: S, name: &str) {
        self.names
            .entry(signal)
            .or_default()
            .push(name.to_owned());

        if let Some(prev) = self.rev_names.insert(name.to_owned(), signal) {
            if prev != signal {
                log::warn!(
                    "signal name `{}` is used twice ({:?} replaced by {:?})",
                    name,
                    prev,
                    signal
                );
            }
        }
    }

    pub fn names_of(&self, signal: S) -> Result<&[String], DecodeError> {
        self.names
            .get(&signal)
            .map(Vec::as_slice)
            .ok_or(DecodeError::NameNotFound)
    }

    pub fn has_name(&self, signal: S, name: &str) -> bool {
        self.names
            .get(&signal)
            .is_some_and(|list| list.iter().any(|n| n == name))
    }

    pub fn contains(&self, signal: S) -> bool {
        self.names.contains_key(&signal)
    }

    pub fn signal_of(&self, name: &str) -> Option<S> {
        self.rev_names.get(name).copied()
    }

    pub fn export_reverse_mapping(&self) -> IndexMap<String, S> {
        self.rev_names.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, &[String])> {
        self.names.iter().map(|(&s, list)| (s, list.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
