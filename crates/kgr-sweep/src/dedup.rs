use std::hash::Hash;

use indexmap::IndexSet;
use kgr_core::errors::KgrError;

use crate::scheme::ParameterScheme;
use crate::sequence::ConfigurationRecord;

/// Outcome of looking a key up in a [`TableRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// First sighting: the record builds table `id`.
    Owner(usize),
    /// The record reuses the already assigned table `id`.
    Reuse(usize),
}

impl Assignment {
    pub fn table_id(&self) -> usize {
        match self {
            Assignment::Owner(id) | Assignment::Reuse(id) => *id,
        }
    }
}

/// Work key to table id mapping for one sweep.
///
/// Ids are the insertion positions of the keys, so they run `0, 1, 2, ...`
/// in first-seen order with no gaps or reuse.
#[derive(Debug, Clone)]
pub struct TableRegistry<K> {
    keys: IndexSet<K>,
}

impl<K: Hash + Eq> TableRegistry<K> {
    pub fn new() -> Self {
        Self {
            keys: IndexSet::new(),
        }
    }

    /// Returns the table for `key`, allocating the next id on first sight.
    pub fn assign(&mut self, key: K) -> Assignment {
        let (id, inserted) = self.keys.insert_full(key);
        if inserted {
            Assignment::Owner(id)
        } else {
            Assignment::Reuse(id)
        }
    }

    pub fn table_id(&self, key: &K) -> Option<usize> {
        self.keys.get_index_of(key)
    }

    /// Number of distinct tables.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Hash + Eq> Default for TableRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Records split by table responsibility, each side in enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<P> {
    pub owners: Vec<ConfigurationRecord<P>>,
    pub reuse: Vec<ConfigurationRecord<P>>,
}

impl<P> Partition<P> {
    pub(crate) fn len(&self) -> usize {
        self.owners.len() + self.reuse.len()
    }
}

/// Assigns table ids to `records` strictly in the order given.
///
/// The first record seen for a work key becomes its owner. Every call starts
/// from an empty registry, so owner ids cover `0..registry.len()` exactly;
/// the filled registry is returned for inspection.
pub fn deduplicate<S: ParameterScheme>(
    scheme: &S,
    records: Vec<S::Params>,
) -> Result<(Partition<S::Params>, TableRegistry<S::Key>), KgrError> {
    let mut registry = TableRegistry::new();
    let mut owners = Vec::new();
    let mut reuse = Vec::new();
    for params in records {
        let key = scheme.work_key(&params)?;
        match registry.assign(key) {
            Assignment::Owner(table_id) => owners.push(ConfigurationRecord {
                params,
                table_id,
                is_table_owner: true,
            }),
            Assignment::Reuse(table_id) => reuse.push(ConfigurationRecord {
                params,
                table_id,
                is_table_owner: false,
            }),
        }
    }
    Ok((Partition { owners, reuse }, registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_first_sighting() {
        let mut registry = TableRegistry::new();
        assert_eq!(registry.assign("b"), Assignment::Owner(0));
        assert_eq!(registry.assign("a"), Assignment::Owner(1));
        assert_eq!(registry.assign("b"), Assignment::Reuse(0));
        assert_eq!(registry.assign("c"), Assignment::Owner(2));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.table_id(&"a"), Some(1));
        assert_eq!(registry.table_id(&"z"), None);
    }
}
