//! The vault gate: decides whether a page shows its protected content or a
//! login form, and records successful logins for a bounded time.
//!
//! Expiry is lazy. A stale record is only noticed (and deleted) the next time
//! the gate evaluates it, typically when the host reloads.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::credential::{compute_hash, Credential};
use crate::error::StorageError;
use crate::page::{FormPlacement, HostPage, LoginForm};
use crate::readiness::ReadyWaiter;
use crate::session::SessionRecord;
use crate::storage::SessionStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Unauthenticated,
    Authenticated {
        issued_at: DateTime<Utc>,
        expires_in: Duration,
    },
}

impl GateStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, GateStatus::Authenticated { .. })
    }
}

/// What [`VaultGate::render`] did to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    ContentShown,
    LoginShown,
    /// A login form was already on the page; nothing changed
    LoginAlreadyShown,
    /// The host has no `main` container yet
    HostNotReady,
}

/// Result of handling a login form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Password accepted, reload requested
    Accepted,
    /// Wrong password, error shown
    Rejected,
    /// Password accepted but the session could not be stored
    StorageUnavailable,
    /// The page has no password input
    NoInput,
}

pub struct VaultGate<S, C = SystemClock> {
    storage: S,
    clock: C,
    credential: Credential,
    form: LoginForm,
}

impl<S: SessionStorage> VaultGate<S, SystemClock> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: SessionStorage, C: Clock> VaultGate<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            credential: Credential::default(),
            form: LoginForm::default(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.form
    }

    /// Is there a live session. Deletes the record as a side effect when it
    /// has expired. Unreadable storage counts as "no session".
    pub fn check_authenticated(&self) -> bool {
        self.status().is_authenticated()
    }

    /// Like [`check_authenticated`](Self::check_authenticated), with the
    /// issuance time and remaining lifetime of a live session.
    pub fn status(&self) -> GateStatus {
        let record = match SessionRecord::load(&self.storage) {
            Ok(Some(record)) => record,
            Ok(None) => return GateStatus::Unauthenticated,
            Err(e) => {
                warn!(error = %e, "Failed to read session record");
                return GateStatus::Unauthenticated;
            }
        };

        if !record.authenticated {
            debug!("Session record present but not authenticated");
            return GateStatus::Unauthenticated;
        }

        let now = self.clock.now();
        if record.is_expired(now) {
            info!(age_minutes = record.age(now).num_minutes(), "Vault session expired");
            self.clear();
            return GateStatus::Unauthenticated;
        }

        GateStatus::Authenticated {
            issued_at: record.issued_at,
            expires_in: record.time_until_expiry(now),
        }
    }

    /// Check a password. On a match a new session record is written.
    /// A wrong password leaves storage untouched. A correct password whose
    /// record cannot be written also counts as a failure.
    pub fn attempt_login(&self, plaintext: &str) -> bool {
        match self.try_login(plaintext) {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Failed to store session record");
                false
            }
        }
    }

    /// Like [`attempt_login`](Self::attempt_login), but keeps a storage
    /// failure apart from a wrong password.
    pub fn try_login(&self, plaintext: &str) -> Result<bool, StorageError> {
        let digest = compute_hash(plaintext);
        if !self.credential.matches(&digest) {
            warn!("Vault login rejected");
            return Ok(false);
        }

        SessionRecord::issue(self.clock.now()).save(&self.storage)?;
        info!("Vault login successful");
        Ok(true)
    }

    /// Log out. Storage failures are logged and otherwise ignored.
    pub fn clear(&self) {
        match SessionRecord::clear(&self.storage) {
            Ok(()) => debug!("Session record cleared"),
            Err(e) => warn!(error = %e, "Failed to clear session record"),
        }
    }

    /// Show either the protected content or the login form, never both.
    pub fn render<P: HostPage + ?Sized>(&self, page: &mut P) -> RenderOutcome {
        if !page.has_main() {
            warn!("Vault gate: main container not found");
            return RenderOutcome::HostNotReady;
        }

        if self.check_authenticated() {
            if page.has_content() {
                page.set_content_visible(true);
            }
            if page.has_login_form() {
                page.remove_login_form();
            }
            return RenderOutcome::ContentShown;
        }

        if page.has_login_form() {
            return RenderOutcome::LoginAlreadyShown;
        }

        let placement = if page.has_content() {
            page.set_content_visible(false);
            FormPlacement::BeforeContent
        } else {
            FormPlacement::AppendToMain
        };
        page.insert_login_form(&self.form, placement);
        page.focus_password();
        RenderOutcome::LoginShown
    }

    /// Handle a login form submission.
    pub fn submit<P: HostPage + ?Sized>(&self, page: &mut P) -> SubmitOutcome {
        let Some(password) = page.password() else {
            return SubmitOutcome::NoInput;
        };

        page.set_error_visible(false);
        page.set_unavailable_visible(false);

        match self.try_login(&password) {
            Ok(true) => {
                page.reload();
                SubmitOutcome::Accepted
            }
            Ok(false) => {
                page.set_error_visible(true);
                page.clear_password();
                page.focus_password();
                SubmitOutcome::Rejected
            }
            Err(e) => {
                warn!(error = %e, "Correct password, but the session could not be stored");
                page.set_unavailable_visible(true);
                page.focus_password();
                SubmitOutcome::StorageUnavailable
            }
        }
    }

    /// Wait for the host to signal readiness, then render. If the host
    /// turns out to be missing its markup, wait for the next signal rather
    /// than failing.
    pub async fn init<P: HostPage + ?Sized>(
        &self,
        page: &mut P,
        waiter: &mut ReadyWaiter,
    ) -> RenderOutcome {
        if !waiter.ready().await {
            debug!("Host went away before becoming ready");
            return RenderOutcome::HostNotReady;
        }
        loop {
            let outcome = self.render(page);
            if outcome != RenderOutcome::HostNotReady {
                return outcome;
            }
            if !waiter.next_ready().await {
                return RenderOutcome::HostNotReady;
            }
        }
    }
}
