//! Login and logout.
//!
//! A login runs in two halves. [`SessionContext::login`] inserts a pending
//! person under a fresh client id and asks the backend to add the user; the
//! backend's `userupdate` reply later reaches
//! [`SessionContext::complete_login`], which moves that same person onto its
//! server id. Between the two halves the pending person is the current user
//! and is findable by its client id; after completion it is findable by its
//! server id. There is no moment where it is findable by neither.

use spachat_proto::{AddUser, Intent, PersonRecord, Topic};
use tracing::{info, warn};

use crate::bus::{EventBus, ModelEvent};
use crate::error::{ModelError, ModelResult};
use crate::state::{Identity, Person, SessionContext};
use crate::telemetry::spans;
use crate::transport::Transport;

impl<B: EventBus, T: Transport> SessionContext<B, T> {
    /// Start logging in as `display_name`.
    ///
    /// The new person becomes the current user right away, but no event is
    /// published until the backend confirms. An empty name is rejected before
    /// anything changes.
    ///
    /// Calling this while another login is pending replaces the pending one;
    /// callers are expected to gate their UI instead. A signed-in user must
    /// log out first.
    pub fn login(&mut self, display_name: &str) -> ModelResult<()> {
        if display_name.trim().is_empty() {
            return Err(ModelError::InvalidArgument(
                "display name must not be empty".into(),
            ));
        }
        if let Identity::SignedIn(id) = &self.identity {
            return Err(ModelError::InvalidState(format!(
                "already signed in as {id}, log out first"
            )));
        }

        if let Identity::Pending(stale) = &self.identity {
            let stale = stale.clone();
            warn!(client_id = %stale, "login already pending, replacing it");
            self.registry.remove_by_id(&stale);
            if self.chatee.as_deref() == Some(stale.as_str()) {
                self.chatee = None;
            }
        }

        let client_id = self.cid_gen.next();
        let _span = spans::operation("login", &client_id).entered();

        let person = Person::new(
            client_id.clone(),
            display_name,
            self.config.avatar.default_style(),
        )?;
        let intent = Intent::AddUser(AddUser {
            cid: person.client_id.clone(),
            css_map: person.style.clone(),
            name: person.display_name.clone(),
        });

        self.registry.insert(person)?;
        self.identity = Identity::Pending(client_id);
        self.listen(Topic::UserUpdate);
        self.transport.emit(intent);

        info!(name = %display_name, "login requested");
        Ok(())
    }

    /// Apply the backend's confirmation of the pending login.
    ///
    /// The first record must carry the server id; without it the session is
    /// left exactly as it was and the confirmation can be retried. The
    /// pending user is the one reconciled, whatever client id the record
    /// echoes.
    ///
    /// On success the user is re-indexed under the server id, the one-shot
    /// `userupdate` listener is dropped, `LoginCompleted` is published and the
    /// chat room is joined.
    pub fn complete_login(&mut self, confirmed: &[PersonRecord]) -> ModelResult<()> {
        let Identity::Pending(pending) = &self.identity else {
            return Err(ModelError::Protocol(
                "login confirmation with no login pending".into(),
            ));
        };
        let pending = pending.clone();
        let _span = spans::operation("complete_login", &pending).entered();

        let record = confirmed
            .first()
            .ok_or_else(|| ModelError::Protocol("empty login confirmation".into()))?;
        let server_id = record.server_id().ok_or_else(|| {
            ModelError::Protocol(format!("login confirmation for {pending} has no _id"))
        })?;
        if let Some(cid) = record.cid.as_deref()
            && cid != pending
        {
            warn!(echoed = %cid, "confirmation echoes another client id");
        }

        let user = self
            .registry
            .confirm(&pending, server_id, record.css_map.clone())?
            .clone();
        self.identity = Identity::SignedIn(server_id.to_string());
        self.unlisten(Topic::UserUpdate);

        info!(server_id = %server_id, name = %user.display_name, "login completed");
        self.publish(ModelEvent::LoginCompleted { user });

        self.join();
        Ok(())
    }

    /// Revert to the anonymous placeholder.
    ///
    /// Safe from any state. Leaves the chat room, forgets a pending login and
    /// publishes `LogoutCompleted` with the identity that was current before.
    /// Returns whether a person was actually removed from the registry.
    pub fn logout(&mut self) -> bool {
        let user = self.current_user().clone();
        let _span = spans::operation("logout", &user.client_id).entered();

        let removed = self.registry.remove(&user);
        self.identity = Identity::Anonymous;
        self.unlisten(Topic::UserUpdate);
        self.leave();

        info!(removed, name = %user.display_name, "logged out");
        self.publish(ModelEvent::LogoutCompleted { user });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::transport::MemoryTransport;
    use spachat_proto::AvatarStyle;

    type Ctx = SessionContext<Vec<ModelEvent>, MemoryTransport>;

    fn context() -> Ctx {
        SessionContext::bootstrap(Config::default(), Vec::new(), MemoryTransport::new()).unwrap()
    }

    fn confirmation(cid: &str, id: &str) -> Vec<PersonRecord> {
        vec![PersonRecord {
            id: Some(id.into()),
            cid: Some(cid.into()),
            name: Some("Alice".into()),
            css_map: Some(AvatarStyle::new(60, 70, "#f88")),
        }]
    }

    #[test]
    fn login_creates_pending_user() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();

        let user = ctx.current_user();
        assert_eq!(user.client_id(), "c0");
        assert_eq!(user.display_name(), "Alice");
        assert_eq!(user.server_id(), None);
        assert_eq!(user.style(), &AvatarStyle::new(25, 25, "#8f8"));
        assert_eq!(ctx.identity(), &Identity::Pending("c0".into()));
        assert!(ctx.is_listening(Topic::UserUpdate));
        assert!(ctx.bus().is_empty());

        let sent = ctx.transport_mut().drain();
        assert_eq!(
            sent,
            [Intent::AddUser(AddUser {
                cid: "c0".into(),
                css_map: AvatarStyle::new(25, 25, "#8f8"),
                name: "Alice".into(),
            })]
        );
    }

    #[test]
    fn empty_name_has_no_side_effects() {
        let mut ctx = context();

        for name in ["", "   "] {
            let err = ctx.login(name).unwrap_err();
            assert!(matches!(err, ModelError::InvalidArgument(_)));
        }

        assert!(ctx.identity().is_anonymous());
        assert_eq!(ctx.all().count(), 1);
        assert!(ctx.transport().pending().next().is_none());
        assert!(!ctx.is_listening(Topic::UserUpdate));
        assert_eq!(ctx.cid_gen.peek_serial(), 0);
    }

    #[test]
    fn completion_reindexes_and_publishes_once() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();

        ctx.complete_login(&confirmation("c0", "u42")).unwrap();

        assert!(ctx.get_by_client_id("c0").is_none());
        let user = ctx.current_user().clone();
        assert_eq!(ctx.get_by_client_id("u42"), Some(&user));
        assert_eq!(user.server_id(), Some("u42"));
        assert_eq!(user.client_id(), "u42");
        assert_eq!(user.style().top, 60);
        assert!(ctx.identity().is_signed_in());
        assert!(!ctx.is_listening(Topic::UserUpdate));

        let logins: Vec<_> = ctx
            .bus()
            .iter()
            .filter(|e| e.topic() == "login-completed")
            .collect();
        assert_eq!(logins, [&ModelEvent::LoginCompleted { user }]);
    }

    #[test]
    fn completion_without_style_keeps_pending_style() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();
        let mut records = confirmation("c0", "u42");
        records[0].css_map = None;

        ctx.complete_login(&records).unwrap();

        assert_eq!(ctx.current_user().style(), &AvatarStyle::new(25, 25, "#8f8"));
    }

    #[test]
    fn completion_without_server_id_changes_nothing() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();
        let mut records = confirmation("c0", "");
        records[0].id = None;

        let err = ctx.complete_login(&records).unwrap_err();

        assert!(matches!(err, ModelError::Protocol(_)));
        assert_eq!(ctx.identity(), &Identity::Pending("c0".into()));
        assert_eq!(ctx.current_user().client_id(), "c0");
        assert!(ctx.is_listening(Topic::UserUpdate));
        assert!(ctx.bus().is_empty());
    }

    #[test]
    fn completion_echoing_other_cid_still_signs_in() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();

        ctx.complete_login(&confirmation("c1", "u42")).unwrap();

        assert!(ctx.get_by_client_id("c0").is_none());
        assert_eq!(ctx.identity(), &Identity::SignedIn("u42".into()));
        assert_eq!(ctx.current_user().display_name(), "Alice");
        assert_eq!(ctx.bus().len(), 1);
    }

    #[test]
    fn login_while_signed_in_is_refused() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();
        ctx.complete_login(&confirmation("c0", "u42")).unwrap();
        ctx.transport_mut().drain();

        let err = ctx.login("Bob").unwrap_err();

        assert_eq!(err.error_code(), "invalid_state");
        assert_eq!(ctx.identity(), &Identity::SignedIn("u42".into()));
        let ids: Vec<_> = ctx.all().map(Person::client_id).collect();
        assert_eq!(ids, ["u42", "a0"]);
        assert!(ctx.is_connected());
        assert!(ctx.transport().pending().next().is_none());
        assert_eq!(ctx.cid_gen.peek_serial(), 1);
    }

    #[test]
    fn replacing_pending_login_forgets_it_as_chatee() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();
        assert!(ctx.set_chatee("c0"));
        ctx.login("Alicia").unwrap();

        assert!(ctx.get_chatee().is_none());
        assert!(!ctx.set_chatee("nobody"));
        assert_eq!(ctx.bus().len(), 1);
    }

    #[test]
    fn completion_without_pending_login_is_rejected() {
        let mut ctx = context();
        let err = ctx.complete_login(&confirmation("c0", "u42")).unwrap_err();
        assert!(matches!(err, ModelError::Protocol(_)));
        assert!(ctx.identity().is_anonymous());
    }

    #[test]
    fn second_login_replaces_pending() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();
        ctx.login("Alicia").unwrap();

        assert!(ctx.get_by_client_id("c0").is_none());
        assert_eq!(ctx.current_user().client_id(), "c1");
        assert_eq!(ctx.transport_mut().drain().len(), 2);
    }

    #[test]
    fn anonymous_logout_removes_nothing_but_publishes() {
        let mut ctx = context();

        assert!(!ctx.logout());

        assert_eq!(ctx.all().count(), 1);
        assert!(ctx.get_by_client_id("a0").is_some());
        assert_eq!(ctx.bus().len(), 1);
        assert!(matches!(
            &ctx.bus()[0],
            ModelEvent::LogoutCompleted { user } if user.client_id() == "a0"
        ));
    }

    #[test]
    fn logout_after_login_removes_user() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();
        ctx.complete_login(&confirmation("c0", "u42")).unwrap();

        assert!(ctx.logout());

        assert!(ctx.get_by_client_id("u42").is_none());
        assert!(ctx.identity().is_anonymous());
        assert!(ctx.is_anonymous(ctx.current_user()));
        assert!(!ctx.is_connected());
        assert!(matches!(
            ctx.bus().last(),
            Some(ModelEvent::LogoutCompleted { user }) if user.client_id() == "u42"
        ));
    }

    #[test]
    fn logout_while_pending_drops_listener() {
        let mut ctx = context();
        ctx.login("Alice").unwrap();

        assert!(ctx.logout());

        assert!(!ctx.is_listening(Topic::UserUpdate));
        let err = ctx.complete_login(&confirmation("c0", "u42")).unwrap_err();
        assert!(matches!(err, ModelError::Protocol(_)));
    }

    #[test]
    fn generated_ids_keep_increasing() {
        let mut ctx = context();
        let mut seen = Vec::new();
        for i in 0..5 {
            ctx.login(&format!("user{i}")).unwrap();
            seen.push(ctx.current_user().client_id().to_string());
            ctx.logout();
        }
        assert_eq!(seen, ["c0", "c1", "c2", "c3", "c4"]);
    }
}
