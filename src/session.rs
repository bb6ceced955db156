//! The authenticated session: who is signed in and with which token.
//!
//! There is one [SessionStore] per running client. `App` creates it and hands
//! a [SessionHandle] to every component that needs it. Components rerender on
//! session changes through [use_session].

use std::cell::{Cell, RefCell};
use std::ops::Deref;
use std::rc::Rc;

use yew::prelude::*;

use crate::api::{ApiClient, AuthApi};
use crate::error::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use crate::storage::{LocalStorage, TokenStorage, TOKEN_KEY};

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub is_loading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Anonymous,
    Authenticated,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A persisted token was found; its profile is still being fetched.
    Restored(String),
    /// Nothing was persisted.
    Anonymous,
    SignedIn { token: String, user: UserProfile },
    /// A profile fetched for `token`.
    ProfileLoaded { token: String, user: UserProfile },
    Cleared,
}

impl Session {
    /// The state before [SessionStore::initialize] has looked at storage.
    pub fn starting() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: true,
        }
    }

    fn cleared() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: false,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (&self.token, &self.user) {
            (Some(_), Some(_)) => SessionStatus::Authenticated,
            _ if self.is_loading => SessionStatus::Loading,
            _ => SessionStatus::Anonymous,
        }
    }

    /// Applies one transition.
    ///
    /// `user` is only ever set together with the token it belongs to, so a
    /// profile for a token that was cleared or replaced in the meantime is
    /// dropped.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Restored(token) => {
                self.token = Some(token);
                self.user = None;
                self.is_loading = true;
            }
            SessionEvent::Anonymous | SessionEvent::Cleared => *self = Self::cleared(),
            SessionEvent::SignedIn { token, user } => {
                self.token = Some(token);
                self.user = Some(user);
                self.is_loading = false;
            }
            SessionEvent::ProfileLoaded { token, user } => {
                if self.token.as_deref() == Some(token.as_str()) {
                    self.user = Some(user);
                    self.is_loading = false;
                } else {
                    log::debug!("dropping profile fetched for a stale token");
                }
            }
        }
    }
}

pub type SubscriptionId = usize;

pub struct SessionStore<A, S> {
    api: A,
    storage: S,
    state: RefCell<Session>,
    subscribers: RefCell<Vec<(SubscriptionId, Callback<Session>)>>,
    next_subscription: Cell<SubscriptionId>,
}

impl<A: AuthApi, S: TokenStorage> SessionStore<A, S> {
    pub fn new(api: A, storage: S) -> Self {
        Self {
            api,
            storage,
            state: RefCell::new(Session::starting()),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// The active token, or an auth error when nobody is signed in.
    pub fn require_token(&self) -> Result<String, AppError> {
        self.token()
            .ok_or_else(|| AppError::Auth("Please log in to continue".to_string()))
    }

    /// Loads the persisted token, if any, and validates it by fetching the
    /// profile.
    pub async fn initialize(&self) {
        match self.storage.get(TOKEN_KEY) {
            Some(token) => {
                log::info!("restoring persisted session");
                self.dispatch(SessionEvent::Restored(token));
                // A failure has already torn the session down.
                let _ = self.fetch_profile().await;
            }
            None => {
                log::info!("no persisted session");
                self.dispatch(SessionEvent::Anonymous);
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await.map_err(|error| {
            log::warn!("login rejected: {error}");
            error
        })?;

        Ok(self.establish(response))
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AppError> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.register(&request).await.map_err(|error| {
            log::warn!("registration rejected: {error}");
            error
        })?;

        Ok(self.establish(response))
    }

    /// Fetches the profile for the active token.
    ///
    /// Any failure is treated as an invalid token and clears the session.
    pub async fn fetch_profile(&self) -> Result<UserProfile, AppError> {
        let token = match self.token() {
            Some(token) => token,
            None => {
                self.teardown();
                return Err(AppError::Auth("Please log in to continue".to_string()));
            }
        };

        match self.api.me(&token).await {
            Ok(user) => {
                self.dispatch(SessionEvent::ProfileLoaded {
                    token,
                    user: user.clone(),
                });
                Ok(user)
            }
            Err(error) => {
                log::warn!("profile fetch failed, clearing session: {error}");
                if self.token().as_deref() == Some(token.as_str()) {
                    self.teardown();
                }
                Err(error)
            }
        }
    }

    pub fn logout(&self) {
        log::info!("logging out");
        self.teardown();
    }

    /// Tears the session down when a page call reports a rejected token.
    pub fn handle_error(&self, error: &AppError) {
        if error.is_auth() && self.token().is_some() {
            log::warn!("token rejected by the backend, logging out");
            self.teardown();
        }
    }

    pub fn subscribe(&self, callback: Callback<Session>) -> SubscriptionId {
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        self.subscribers.borrow_mut().push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .borrow_mut()
            .retain(|(subscription, _)| *subscription != id);
    }

    fn establish(&self, response: AuthResponse) -> UserProfile {
        let AuthResponse {
            access_token, user, ..
        } = response;
        self.storage.set(TOKEN_KEY, &access_token);
        log::info!("signed in as {}", user.email);
        self.dispatch(SessionEvent::SignedIn {
            token: access_token,
            user: user.clone(),
        });
        user
    }

    fn teardown(&self) {
        self.storage.remove(TOKEN_KEY);
        self.dispatch(SessionEvent::Cleared);
    }

    fn dispatch(&self, event: SessionEvent) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.apply(event);
            state.clone()
        };

        // Subscribers may (un)subscribe while being notified.
        let subscribers: Vec<Callback<Session>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in subscribers {
            callback.emit(snapshot.clone());
        }
    }
}

pub type AppSession = SessionStore<ApiClient, LocalStorage>;

/// Shared reference to the client's one session store.
#[derive(Clone)]
pub struct SessionHandle(Rc<AppSession>);

impl SessionHandle {
    pub fn new(store: AppSession) -> Self {
        Self(Rc::new(store))
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SessionHandle {
    type Target = AppSession;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Current session snapshot; rerenders the component on every transition.
#[hook]
pub fn use_session(handle: &SessionHandle) -> Session {
    let snapshot = use_state_eq(|| handle.session());

    {
        let snapshot = snapshot.clone();
        use_effect_with_deps(
            move |handle: &SessionHandle| {
                let setter = snapshot.clone();
                let id = handle.subscribe(Callback::from(move |session| setter.set(session)));
                // Catch transitions that happened before the subscription.
                snapshot.set(handle.session());

                let handle = handle.clone();
                move || handle.unsubscribe(id)
            },
            handle.clone(),
        );
    }

    (*snapshot).clone()
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use yew::Callback;

    use super::{Session, SessionEvent, SessionStatus, SessionStore};
    use crate::api::AuthApi;
    use crate::error::AppError;
    use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
    use crate::storage::{MemoryStorage, TokenStorage, TOKEN_KEY};

    const PASSWORD: &str = "correct horse";
    const TOKEN: &str = "token-1";

    fn profile(name: &str, email: &str) -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: name.into(),
            email: email.into(),
            created_at: "2025-01-01T00:00:00+00:00".into(),
        }
    }

    struct FakeApi {
        user: UserProfile,
        network_down: Cell<bool>,
        me_calls: Cell<usize>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                user: profile("Ana Souza", "a@b.com"),
                network_down: Cell::new(false),
                me_calls: Cell::new(0),
            }
        }

        fn auth_response(&self, user: UserProfile) -> AuthResponse {
            AuthResponse {
                access_token: TOKEN.into(),
                user,
            }
        }
    }

    impl AuthApi for FakeApi {
        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
            if request.email == self.user.email && request.password == PASSWORD {
                Ok(self.auth_response(self.user.clone()))
            } else {
                Err(AppError::Auth("Invalid credentials".into()))
            }
        }

        async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
            if request.email == self.user.email {
                return Err(AppError::Validation("Email already registered".into()));
            }
            Ok(self.auth_response(profile(&request.name, &request.email)))
        }

        async fn me(&self, token: &str) -> Result<UserProfile, AppError> {
            self.me_calls.set(self.me_calls.get() + 1);
            if self.network_down.get() {
                return Err(AppError::Network("Network request failed".into()));
            }
            if token == TOKEN {
                Ok(self.user.clone())
            } else {
                Err(AppError::Auth("Invalid token".into()))
            }
        }
    }

    fn new_store() -> (SessionStore<FakeApi, MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::default();
        (SessionStore::new(FakeApi::new(), storage.clone()), storage)
    }

    fn assert_cleared(session: &Session) {
        assert_eq!(session.token, None);
        assert_eq!(session.user, None);
        assert!(!session.is_loading);
        assert_eq!(session.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn login_stores_token_and_profile() {
        let (store, storage) = new_store();

        let user = store.login("a@b.com", PASSWORD).await.unwrap();

        let session = store.session();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(session.token.as_deref(), Some(TOKEN));
        assert_eq!(session.user, Some(user));
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some(TOKEN));
    }

    #[tokio::test]
    async fn wrong_password_is_an_auth_error_and_session_stays_cleared() {
        let (store, storage) = new_store();
        store.initialize().await;

        let error = store.login("a@b.com", "wrong").await.unwrap_err();

        assert_eq!(error, AppError::Auth("Invalid credentials".into()));
        assert_cleared(&store.session());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn register_signs_in_the_new_account() {
        let (store, storage) = new_store();

        let user = store
            .register(" Bruno Lima ", "bruno@example.com", PASSWORD)
            .await
            .unwrap();

        assert_eq!(user.name, "Bruno Lima");
        assert_eq!(store.session().user, Some(user));
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some(TOKEN));
    }

    #[tokio::test]
    async fn register_with_taken_email_leaves_session_alone() {
        let (store, _) = new_store();
        store.initialize().await;

        let error = store.register("Ana", "a@b.com", PASSWORD).await.unwrap_err();

        assert!(matches!(error, AppError::Validation(_)));
        assert_cleared(&store.session());
    }

    #[tokio::test]
    async fn initialize_without_token_finishes_anonymous() {
        let (store, _) = new_store();
        assert_eq!(store.session().status(), SessionStatus::Loading);

        store.initialize().await;

        assert_cleared(&store.session());
        assert_eq!(store.api().me_calls.get(), 0);
    }

    #[tokio::test]
    async fn initialize_with_valid_token_loads_profile() {
        let (store, storage) = new_store();
        storage.set(TOKEN_KEY, TOKEN);

        store.initialize().await;

        let session = store.session();
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(session.user.map(|user| user.email).as_deref(), Some("a@b.com"));
        assert_eq!(store.api().me_calls.get(), 1);
    }

    #[tokio::test]
    async fn initialize_with_expired_token_clears_everything() {
        let (store, storage) = new_store();
        storage.set(TOKEN_KEY, "expired");

        store.initialize().await;

        assert_cleared(&store.session());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn profile_fetch_network_failure_clears_everything() {
        let (store, storage) = new_store();
        store.login("a@b.com", PASSWORD).await.unwrap();
        store.api().network_down.set(true);

        let error = store.fetch_profile().await.unwrap_err();

        assert!(matches!(error, AppError::Network(_)));
        assert_cleared(&store.session());
        assert_eq!(storage.get(TOKEN_KEY), None);
        assert_eq!(store.api().me_calls.get(), 1, "failures are not retried");
    }

    #[tokio::test]
    async fn logout_clears_from_any_state() {
        let (store, storage) = new_store();

        store.logout();
        assert_cleared(&store.session());

        store.login("a@b.com", PASSWORD).await.unwrap();
        store.logout();

        assert_cleared(&store.session());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn auth_errors_from_pages_tear_the_session_down() {
        let (store, _) = new_store();
        store.login("a@b.com", PASSWORD).await.unwrap();

        store.handle_error(&AppError::Network("Network request failed".into()));
        assert_eq!(store.session().status(), SessionStatus::Authenticated);

        store.handle_error(&AppError::Auth("Invalid token".into()));
        assert_cleared(&store.session());
    }

    #[tokio::test]
    async fn subscribers_see_every_transition_until_unsubscribed() {
        let (store, _) = new_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = {
            let seen = seen.clone();
            store.subscribe(Callback::from(move |session: Session| {
                seen.borrow_mut().push(session.status())
            }))
        };

        store.initialize().await;
        store.login("a@b.com", PASSWORD).await.unwrap();
        store.unsubscribe(id);
        store.logout();

        assert_eq!(
            *seen.borrow(),
            vec![SessionStatus::Anonymous, SessionStatus::Authenticated]
        );
    }

    #[test]
    fn require_token_fails_when_signed_out() {
        let (store, _) = new_store();

        assert!(store.require_token().unwrap_err().is_auth());
    }

    #[test]
    fn profile_for_stale_token_is_dropped() {
        let mut session = Session::starting();
        session.apply(SessionEvent::Restored("old".into()));
        session.apply(SessionEvent::Cleared);

        session.apply(SessionEvent::ProfileLoaded {
            token: "old".into(),
            user: profile("Ana", "a@b.com"),
        });

        assert_eq!(session.user, None);
        assert_eq!(session.status(), SessionStatus::Anonymous);
    }

    #[test]
    fn restored_token_is_loading_until_profile_arrives() {
        let mut session = Session::starting();

        session.apply(SessionEvent::Restored(TOKEN.into()));
        assert_eq!(session.status(), SessionStatus::Loading);

        session.apply(SessionEvent::ProfileLoaded {
            token: TOKEN.into(),
            user: profile("Ana", "a@b.com"),
        });
        assert_eq!(session.status(), SessionStatus::Authenticated);
    }
}
