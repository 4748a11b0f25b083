//! Person records.

use crate::error::{ModelError, ModelResult};
use spachat_proto::{AvatarStyle, PersonRecord};

/// Client-side identifier of a person.
pub type ClientId = String;

/// A chat participant.
///
/// Whether a person is the current user or the anonymous placeholder is a
/// property of the session, not of the record; see
/// [`SessionContext::is_user`](crate::state::SessionContext::is_user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub(crate) client_id: ClientId,
    pub(crate) server_id: Option<String>,
    pub(crate) display_name: String,
    pub(crate) style: AvatarStyle,
}

impl Person {
    /// Create a person not yet known to the backend.
    pub fn new(
        client_id: impl Into<ClientId>,
        display_name: impl Into<String>,
        style: AvatarStyle,
    ) -> ModelResult<Self> {
        let client_id = client_id.into();
        let display_name = display_name.into();

        if client_id.is_empty() {
            return Err(ModelError::InvalidArgument("client id is required".into()));
        }
        if display_name.is_empty() {
            return Err(ModelError::InvalidArgument("display name is required".into()));
        }

        Ok(Self {
            client_id,
            server_id: None,
            display_name,
            style,
        })
    }

    /// Create a person the backend already knows, indexed by its server id.
    pub fn confirmed(
        server_id: impl Into<String>,
        display_name: impl Into<String>,
        style: AvatarStyle,
    ) -> ModelResult<Self> {
        let server_id = server_id.into();
        let mut person = Self::new(server_id.clone(), display_name, style)?;
        person.server_id = Some(server_id);
        Ok(person)
    }

    /// Build a confirmed person from a roster entry.
    pub fn from_record(record: &PersonRecord) -> ModelResult<Self> {
        let server_id = record
            .server_id()
            .ok_or_else(|| ModelError::Protocol("roster entry without _id".into()))?;
        let name = record
            .display_name()
            .ok_or_else(|| ModelError::Protocol(format!("roster entry {server_id} without name")))?;
        Self::confirmed(server_id, name, record.css_map.clone().unwrap_or_default())
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn server_id(&self) -> Option<&str> {
        self.server_id.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn style(&self) -> &AvatarStyle {
        &self.style
    }

    /// True once the backend has assigned a server id.
    pub fn is_confirmed(&self) -> bool {
        self.server_id.is_some()
    }

    /// Roster entry describing this person.
    pub fn to_record(&self) -> PersonRecord {
        PersonRecord {
            id: self.server_id.clone(),
            cid: Some(self.client_id.clone()),
            name: Some(self.display_name.clone()),
            css_map: Some(self.style.clone()),
        }
    }
}
