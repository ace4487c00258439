//! Sign-in state, account self-service and UI flags.

use tokio::sync::watch;
use validator::Validate;

use super::{next_id, Store};
use crate::domain::aggregates::*;
use crate::storage::{self, wishlist_key, CART_KEY, REMEMBER_ME_KEY, SIDEBAR_COLLAPSED_KEY};
use crate::{Result, StoreError};

impl Store {
    /// Exact email/password match. A failed attempt changes nothing.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let Some(user_id) = self.users.iter().find(|u| u.matches(email, password)).map(|u| u.id) else {
            tracing::info!(email, "Login rejected");
            return false;
        };
        self.sign_in(user_id);
        tracing::info!(user_id, "User signed in");
        true
    }

    pub fn logout(&mut self) {
        let user_id = self.current_user.take();
        self.auth_state.send_replace(false);
        self.cart.clear();
        storage::remove_entry(self.storage(), CART_KEY);
        self.wishlist.send_replace(Vec::new());
        tracing::info!(?user_id, "User signed out");
    }

    /// Creates a customer account and signs it in.
    pub fn register(&mut self, registration: Registration) -> Result<UserId> {
        registration.validate()?;
        if self.users.iter().any(|u| u.email.eq_ignore_ascii_case(&registration.email)) {
            return Err(StoreError::EmailTaken(registration.email));
        }
        let id = next_id(&self.users, |u| u.id);
        self.users.push(User::register(id, registration, Self::today()));
        self.sign_in(id);
        tracing::info!(user_id = id, "User registered");
        Ok(id)
    }

    pub fn is_authenticated(&self) -> bool { self.current_user.is_some() }

    pub fn is_admin(&self) -> bool { self.current_user().is_some_and(User::is_admin) }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.and_then(|id| self.users.iter().find(|u| u.id == id))
    }

    /// Stream of the signed-in flag; the receiver starts at the current value.
    pub fn subscribe_auth(&self) -> watch::Receiver<bool> { self.auth_state.subscribe() }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&User> {
        update.validate()?;
        let user_id = self.require_user()?.id;
        if self.users.iter().any(|u| u.id != user_id && u.email.eq_ignore_ascii_case(&update.email)) {
            return Err(StoreError::EmailTaken(update.email));
        }
        let user = self.user_mut(user_id)?;
        user.apply(update);
        Ok(&*user)
    }

    pub fn change_password(&mut self, change: PasswordChange) -> Result<()> {
        change.validate()?;
        let user_id = self.require_user()?.id;
        let user = self.user_mut(user_id)?;
        if user.password != change.current_password { return Err(StoreError::InvalidCredentials); }
        user.password = change.new_password;
        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    pub fn remember_me(&self) -> bool { storage::load_json(self.storage(), REMEMBER_ME_KEY) }

    pub fn set_remember_me(&mut self, remember: bool) {
        if remember { storage::save_json(self.storage(), REMEMBER_ME_KEY, &true) }
        else { storage::remove_entry(self.storage(), REMEMBER_ME_KEY) }
    }

    pub fn admin_sidebar_collapsed(&self) -> bool { storage::load_json(self.storage(), SIDEBAR_COLLAPSED_KEY) }

    pub fn set_admin_sidebar_collapsed(&mut self, collapsed: bool) {
        storage::save_json(self.storage(), SIDEBAR_COLLAPSED_KEY, &collapsed);
    }

    pub(crate) fn require_user(&self) -> Result<&User> { self.current_user().ok_or(StoreError::NotAuthenticated) }

    pub(crate) fn require_admin(&self) -> Result<&User> {
        let user = self.require_user()?;
        if user.is_admin() { Ok(user) } else { Err(StoreError::Forbidden) }
    }

    pub(super) fn user_mut(&mut self, user_id: UserId) -> Result<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id).ok_or(StoreError::UserNotFound(user_id))
    }

    fn sign_in(&mut self, user_id: UserId) {
        self.current_user = Some(user_id);
        self.auth_state.send_replace(true);
        let wishlist = storage::try_load_json(self.storage(), &wishlist_key(user_id)).unwrap_or_else(|| {
            self.seeded_wishlist.iter().filter(|(u, _)| *u == user_id).map(|(_, p)| *p).collect()
        });
        self.wishlist.send_replace(wishlist);
    }
}
