//! Session store for the demo user.
//!
//! # Responsibility
//! - Authenticate against the fixed demo credential table.
//! - Create accounts and capture onboarding data.
//! - Persist the active session so it survives a reload.
//!
//! # Invariants
//! - At most one session is active per store.
//! - A failed login never touches the active or persisted session.
//! - Logout clears every persisted entry the store owns.
//! - Memory and storage change together: multi-key writes are all-or-nothing
//!   and the in-memory session is updated only after they commit.
//! - An unreadable persisted session is discarded, never surfaced as an error.

use crate::config::SessionConfig;
use crate::model::session::{Role, Session, SignupProfile};
use crate::repo::state_repo::{
    encode_versioned, flag_text, get_flag, get_versioned, put_versioned, RepoError, StateKey,
    StateRepository,
};
use log::{info, warn};
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type SessionResult<T> = Result<T, SessionError>;

/// Storage failure while reading or writing session state.
#[derive(Debug)]
pub enum SessionError {
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "session storage failed: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

struct DemoAccount {
    id: &'static str,
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: Role,
}

const DEMO_COMPANY_ID: &str = "company-1";

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        id: "1",
        email: "admin@demo.com",
        password: "demo123",
        name: "Admin User",
        role: Role::Admin,
    },
    DemoAccount {
        id: "2",
        email: "manager@demo.com",
        password: "demo123",
        name: "Manager User",
        role: Role::Manager,
    },
    DemoAccount {
        id: "3",
        email: "employee@demo.com",
        password: "demo123",
        name: "Employee User",
        role: Role::Employee,
    },
];

impl DemoAccount {
    fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }

    fn open_session(&self, as_employee: bool) -> Session {
        Session {
            id: self.id.to_string(),
            email: self.email.to_string(),
            name: self.name.to_string(),
            role: self.role,
            company_id: DEMO_COMPANY_ID.to_string(),
            is_employee: Some(as_employee || self.role == Role::Employee),
        }
    }
}

/// Explicitly owned session state over a [`StateRepository`].
pub struct SessionStore<R: StateRepository> {
    repo: R,
    config: SessionConfig,
    session: Option<Session>,
}

impl<R: StateRepository> SessionStore<R> {
    /// Opens the store and restores any persisted session.
    ///
    /// A persisted session that cannot be decoded is deleted and the store
    /// starts unauthenticated.
    pub fn open(repo: R, config: SessionConfig) -> SessionResult<Self> {
        let session = match get_versioned::<Session>(&repo, StateKey::Session) {
            Ok(session) => session,
            Err(RepoError::InvalidData { message, .. }) => {
                warn!(
                    "event=session_restore module=session status=discarded reason=invalid_data detail={message}"
                );
                repo.delete_entry(StateKey::Session)?;
                None
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "event=session_restore module=session status=ok authenticated={}",
            session.is_some()
        );
        Ok(Self {
            repo,
            config,
            session,
        })
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Logs in with one of the demo accounts.
    ///
    /// Returns `Ok(false)` when no account matches; the prior session (if
    /// any) is kept as is.
    pub fn login(&mut self, email: &str, password: &str, as_employee: bool) -> SessionResult<bool> {
        self.simulate_latency();

        let Some(account) = DEMO_ACCOUNTS
            .iter()
            .find(|account| account.matches(email, password))
        else {
            warn!("event=session_login module=session status=rejected reason=no_match");
            return Ok(false);
        };

        let session = account.open_session(as_employee);
        self.activate(session)?;
        info!(
            "event=session_login module=session status=ok role={} employee_portal={}",
            account.role.as_str(),
            as_employee
        );
        Ok(true)
    }

    /// Creates an account and logs it in.
    ///
    /// Returns `Ok(false)` when name, email or password is blank.
    pub fn signup(&mut self, profile: &SignupProfile) -> SessionResult<bool> {
        self.simulate_latency();

        if !profile.has_required_fields() {
            warn!("event=session_signup module=session status=rejected reason=missing_fields");
            return Ok(false);
        }

        let session = Session {
            id: Uuid::new_v4().to_string(),
            email: profile.email.trim().to_string(),
            name: profile.name.trim().to_string(),
            role: Role::Admin,
            company_id: format!("company-{}", Uuid::new_v4().simple()),
            is_employee: Some(false),
        };
        let session_text = encode_versioned(&session)?;
        let company_text = profile
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| encode_versioned(&json!({ "companyName": name })))
            .transpose()?;

        let mut entries = vec![
            (StateKey::Session, session_text.as_str()),
            (StateKey::SignupCompleted, flag_text(true)),
        ];
        if let Some(company_text) = &company_text {
            entries.push((StateKey::CompanyData, company_text.as_str()));
        }
        self.repo.put_entries(&entries)?;
        self.session = Some(session);
        info!(
            "event=session_signup module=session status=ok company_name={}",
            company_text.is_some()
        );
        Ok(true)
    }

    /// Stores arbitrary company data captured by the onboarding wizard.
    ///
    /// Replaces any company name recorded at signup.
    pub fn complete_onboarding(&mut self, company_data: &serde_json::Value) -> SessionResult<bool> {
        self.simulate_latency();

        let company_text = encode_versioned(company_data)?;
        self.repo.put_entries(&[
            (StateKey::CompanyData, company_text.as_str()),
            (StateKey::OnboardingCompleted, flag_text(true)),
        ])?;
        info!("event=session_onboarding module=session status=ok");
        Ok(true)
    }

    /// Clears the session and every persisted flag and payload.
    ///
    /// On a storage error nothing is removed and the session stays active.
    pub fn logout(&mut self) -> SessionResult<()> {
        let removed = self.repo.delete_entries(&StateKey::ALL)?;
        self.session = None;
        info!("event=session_logout module=session status=ok removed={removed}");
        Ok(())
    }

    pub fn has_completed_signup(&self) -> SessionResult<bool> {
        Ok(get_flag(&self.repo, StateKey::SignupCompleted)?)
    }

    pub fn has_completed_onboarding(&self) -> SessionResult<bool> {
        Ok(get_flag(&self.repo, StateKey::OnboardingCompleted)?)
    }

    /// Company data saved by [`Self::complete_onboarding`], if any.
    pub fn company_data(&self) -> SessionResult<Option<serde_json::Value>> {
        Ok(get_versioned(&self.repo, StateKey::CompanyData)?)
    }

    fn activate(&mut self, session: Session) -> SessionResult<()> {
        put_versioned(&self.repo, StateKey::Session, &session)?;
        self.session = Some(session);
        Ok(())
    }

    fn simulate_latency(&self) {
        if !self.config.simulated_latency.is_zero() {
            std::thread::sleep(self.config.simulated_latency);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DEMO_ACCOUNTS;

    #[test]
    fn credential_match_requires_exact_equality() {
        let admin = &DEMO_ACCOUNTS[0];
        assert!(admin.matches("admin@demo.com", "demo123"));
        assert!(!admin.matches("ADMIN@demo.com", "demo123"));
        assert!(!admin.matches(" admin@demo.com", "demo123"));
        assert!(!admin.matches("admin@demo.com", "demo1234"));
    }

    #[test]
    fn employee_account_always_opens_employee_session() {
        let employee = DEMO_ACCOUNTS
            .iter()
            .find(|account| account.email == "employee@demo.com")
            .unwrap();
        assert!(employee.open_session(false).is_employee());
        assert!(DEMO_ACCOUNTS[0].open_session(true).is_employee());
        assert!(!DEMO_ACCOUNTS[0].open_session(false).is_employee());
    }
}
