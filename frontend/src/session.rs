use std::fmt;
use std::rc::Rc;

use log::{info, warn};
use thiserror::Error;
use web_sys::Storage;
use yew::prelude::*;

/* ---------------- rôles ---------------------------- */

/// The two independent sessions the console knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Local storage key holding the bearer token of this role.
    pub fn storage_key(self) -> &'static str {
        match self {
            Role::User => "token",
            Role::Admin => "adminToken",
        }
    }

    /// Where a missing or rejected session sends the browser.
    pub fn login_route(self) -> &'static str {
        match self {
            Role::User => "/",
            Role::Admin => "/admin/login",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("local storage refused to update `{0}`")]
    Rejected(&'static str),
}

/* ---------------- stockage des jetons -------------- */

pub trait TokenStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &'static str, value: &str) -> Result<(), SessionError>;
    fn erase(&self, key: &'static str) -> Result<(), SessionError>;
}

/// `window.localStorage`, shared by every tab of the origin.
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStore for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn write(&self, key: &'static str, value: &str) -> Result<(), SessionError> {
        let storage = Self::storage().ok_or(SessionError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| SessionError::Rejected(key))
    }

    fn erase(&self, key: &'static str) -> Result<(), SessionError> {
        let storage = Self::storage().ok_or(SessionError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|_| SessionError::Rejected(key))
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    items: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl TokenStore for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn write(&self, key: &'static str, value: &str) -> Result<(), SessionError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn erase(&self, key: &'static str) -> Result<(), SessionError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/* ---------------- structure session ---------------- */

/// Only entry point to the persisted tokens. Views never touch the storage
/// directly; they receive this handle through the context below.
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Rc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStorage::default()))
    }

    /// Stores `token` for `role`, replacing any previous one.
    pub fn login(&self, role: Role, token: &str) -> Result<(), SessionError> {
        self.store.write(role.storage_key(), token)?;
        info!("{role} session opened");
        Ok(())
    }

    pub fn logout(&self, role: Role) {
        match self.store.erase(role.storage_key()) {
            Ok(()) => info!("{role} session closed"),
            Err(e) => warn!("{role} logout: {e}"),
        }
    }

    /// Empty strings count as no token at all.
    pub fn current_token(&self, role: Role) -> Option<String> {
        self.store
            .read(role.storage_key())
            .filter(|token| !token.is_empty())
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/* ---------------- hook pratique -------------------- */
#[hook]
pub fn use_session() -> Session {
    use_context::<Session>().unwrap_or_else(Session::browser)
}

/* -------------- props du provider ----------------- */
#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    #[prop_or_default]
    pub children: Children,
}

/* -------------- provider global ------------------- */
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let session = use_state(Session::browser);

    html! {
        <ContextProvider<Session> context={(*session).clone()}>
            { for props.children.iter() }
        </ContextProvider<Session>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_separate_slots() {
        let session = Session::in_memory();
        session.login(Role::User, "user-jwt").unwrap();

        assert_eq!(session.current_token(Role::User).as_deref(), Some("user-jwt"));
        assert_eq!(session.current_token(Role::Admin), None);

        session.login(Role::Admin, "admin-jwt").unwrap();
        session.logout(Role::User);

        assert_eq!(session.current_token(Role::User), None);
        assert_eq!(session.current_token(Role::Admin).as_deref(), Some("admin-jwt"));
    }

    #[test]
    fn login_overwrites_previous_token() {
        let session = Session::in_memory();
        session.login(Role::User, "first").unwrap();
        session.login(Role::User, "second").unwrap();

        assert_eq!(session.current_token(Role::User).as_deref(), Some("second"));
    }

    #[test]
    fn empty_token_is_absent() {
        let session = Session::in_memory();
        session.login(Role::Admin, "").unwrap();

        assert_eq!(session.current_token(Role::Admin), None);
    }

    #[test]
    fn storage_keys_match_the_legacy_console() {
        assert_eq!(Role::User.storage_key(), "token");
        assert_eq!(Role::Admin.storage_key(), "adminToken");
        assert_eq!(Role::Admin.login_route(), "/admin/login");
    }

    #[test]
    fn clones_compare_equal_but_distinct_stores_do_not() {
        let a = Session::in_memory();
        let b = Session::in_memory();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
