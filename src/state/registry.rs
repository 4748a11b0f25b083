//! The person registry.
//!
//! People are indexed by client id, plus a sorted index that gives
//! [`PersonRegistry::all`] its stable presentation order (display name,
//! then client id). The registry knows which id belongs to the anonymous
//! placeholder so it can refuse to remove it, but nothing else about
//! sessions.

use std::collections::{BTreeSet, HashMap, btree_set};

use super::person::{ClientId, Person};
use crate::error::{ModelError, ModelResult};
use spachat_proto::AvatarStyle;

type SortKey = (String, ClientId);

fn sort_key(person: &Person) -> SortKey {
    (person.display_name.clone(), person.client_id.clone())
}

/// Indexed collection of every live [`Person`].
#[derive(Debug)]
pub struct PersonRegistry {
    people: HashMap<ClientId, Person>,
    order: BTreeSet<SortKey>,
    anonymous_id: ClientId,
}

impl PersonRegistry {
    /// Create an empty registry whose anonymous placeholder uses `anonymous_id`.
    pub fn new(anonymous_id: impl Into<ClientId>) -> Self {
        Self {
            people: HashMap::new(),
            order: BTreeSet::new(),
            anonymous_id: anonymous_id.into(),
        }
    }

    /// Add a person. Fails without touching the registry if the id is taken.
    pub fn insert(&mut self, person: Person) -> ModelResult<()> {
        if self.people.contains_key(&person.client_id) {
            return Err(ModelError::DuplicateId(person.client_id));
        }
        self.order.insert(sort_key(&person));
        self.people.insert(person.client_id.clone(), person);
        Ok(())
    }

    pub fn get_by_client_id(&self, client_id: &str) -> Option<&Person> {
        self.people.get(client_id)
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.people.contains_key(client_id)
    }

    /// Remove a person by client id.
    ///
    /// Returns `false` for the anonymous placeholder or an unknown id.
    pub fn remove(&mut self, person: &Person) -> bool {
        self.remove_by_id(&person.client_id).is_some()
    }

    pub(crate) fn remove_by_id(&mut self, client_id: &str) -> Option<Person> {
        if client_id == self.anonymous_id {
            return None;
        }
        let person = self.people.remove(client_id)?;
        self.order.remove(&sort_key(&person));
        Some(person)
    }

    /// Empty the registry, keeping `preserving` if it is a non-anonymous member.
    pub fn clear(&mut self, preserving: Option<&str>) {
        let kept = preserving
            .filter(|id| *id != self.anonymous_id)
            .and_then(|id| self.people.remove(id));

        self.people.clear();
        self.order.clear();

        if let Some(person) = kept {
            self.order.insert(sort_key(&person));
            self.people.insert(person.client_id.clone(), person);
        }
    }

    /// Move a pending person onto its server-assigned id.
    ///
    /// Either the whole change commits or the registry is left as it was:
    /// the old id must exist and the new id must be free (or the same).
    pub(crate) fn confirm(
        &mut self,
        client_id: &str,
        server_id: &str,
        style: Option<AvatarStyle>,
    ) -> ModelResult<&Person> {
        if !self.people.contains_key(client_id) {
            return Err(ModelError::Protocol(format!(
                "no registry entry for pending id {client_id}"
            )));
        }
        if client_id != server_id && self.people.contains_key(server_id) {
            return Err(ModelError::DuplicateId(server_id.to_string()));
        }

        let Some(mut person) = self.people.remove(client_id) else {
            return Err(ModelError::Protocol(format!(
                "no registry entry for pending id {client_id}"
            )));
        };
        self.order.remove(&sort_key(&person));

        person.client_id = server_id.to_string();
        person.server_id = Some(server_id.to_string());
        if let Some(style) = style {
            person.style = style;
        }

        self.order.insert(sort_key(&person));
        let person = self.people.entry(server_id.to_string()).or_insert(person);
        Ok(&*person)
    }

    /// Replace a person's style in place. Returns `false` for an unknown id.
    pub(crate) fn set_style(&mut self, client_id: &str, style: AvatarStyle) -> bool {
        match self.people.get_mut(client_id) {
            Some(person) => {
                person.style = style;
                true
            }
            None => false,
        }
    }

    /// Every person, in presentation order.
    ///
    /// The returned iterator is `Clone`, so it can be replayed; calling
    /// `all()` again yields the same order while the registry is unchanged.
    pub fn all(&self) -> People<'_> {
        People {
            keys: self.order.iter(),
            people: &self.people,
        }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn anonymous_id(&self) -> &str {
        &self.anonymous_id
    }
}

/// Iterator over the registry in presentation order.
#[derive(Clone)]
pub struct People<'a> {
    keys: btree_set::Iter<'a, SortKey>,
    people: &'a HashMap<ClientId, Person>,
}

impl<'a> Iterator for People<'a> {
    type Item = &'a Person;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, id) = self.keys.next()?;
        self.people.get(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}
