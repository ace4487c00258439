//! Account administration.

use serde::Serialize;
use validator::Validate;

use super::{next_id, Store};
use crate::domain::aggregates::*;
use crate::domain::aggregates::user::UNKNOWN_AVATAR;
use crate::domain::value_objects::Money;
use crate::{Result, StoreError};

/// How engaged a customer is, by number of orders placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment { New, Active, Loyal }

impl CustomerSegment {
    fn from_order_count(count: usize) -> Self {
        match count {
            0 => Self::New,
            1..=5 => Self::Active,
            _ => Self::Loyal,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub user_id: UserId,
    pub order_count: usize,
    pub total_spent: Money,
    pub last_order: Option<OrderId>,
    pub segment: CustomerSegment,
}

impl Store {
    pub fn users(&self) -> &[User] { &self.users }

    pub fn user_by_id(&self, user_id: UserId) -> Option<&User> { self.users.iter().find(|u| u.id == user_id) }

    /// Avatar URL for a user, or a neutral placeholder for unknown ids.
    pub fn avatar_for(&self, user_id: UserId) -> &str {
        self.user_by_id(user_id).map_or(UNKNOWN_AVATAR, |u| u.avatar.as_str())
    }

    /// Case-insensitive match on name or email, substring match on phone.
    pub fn search_users(&self, term: &str, role: Option<Role>) -> Vec<&User> {
        let needle = term.to_lowercase();
        self.users.iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
                    || u.phone.as_deref().is_some_and(|p| p.contains(term))
            })
            .collect()
    }

    /// Adds an account on behalf of an administrator. Does not sign it in.
    pub fn create_user(&mut self, registration: Registration, role: Role) -> Result<UserId> {
        registration.validate()?;
        if self.users.iter().any(|u| u.email.eq_ignore_ascii_case(&registration.email)) {
            return Err(StoreError::EmailTaken(registration.email));
        }
        let id = next_id(&self.users, |u| u.id);
        let mut user = User::register(id, registration, Self::today());
        user.role = role;
        self.users.push(user);
        tracing::info!(user_id = id, ?role, "User created");
        Ok(id)
    }

    pub fn set_user_role(&mut self, user_id: UserId, role: Role) -> Result<&User> {
        let user = self.user_mut(user_id)?;
        user.role = role;
        tracing::info!(user_id, ?role, "User role changed");
        Ok(&*user)
    }

    /// Removes an account. The signed-in user cannot remove themselves.
    pub fn delete_user(&mut self, user_id: UserId) -> Result<()> {
        if self.current_user == Some(user_id) { return Err(StoreError::SelfDeletion); }
        let before = self.users.len();
        self.users.retain(|u| u.id != user_id);
        if self.users.len() == before { return Err(StoreError::UserNotFound(user_id)); }
        tracing::info!(user_id, "User deleted");
        Ok(())
    }

    pub fn customer_summary(&self, user_id: UserId) -> Result<CustomerSummary> {
        if self.user_by_id(user_id).is_none() { return Err(StoreError::UserNotFound(user_id)); }
        let orders: Vec<&Order> = self.orders.iter().filter(|o| o.user_id() == user_id).collect();
        Ok(CustomerSummary {
            user_id,
            order_count: orders.len(),
            total_spent: orders.iter().map(|o| o.total()).sum(),
            last_order: orders.iter().max_by_key(|o| (o.date(), o.id())).map(|o| o.id()),
            segment: CustomerSegment::from_order_count(orders.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_avatar_falls_back_for_unknown_user() {
        let store = demo_store();
        assert!(store.avatar_for(1).contains("name=Reaksa"));
        assert_eq!(store.avatar_for(99), UNKNOWN_AVATAR);
    }

    #[test]
    fn test_search_users() {
        let store = demo_store();
        assert_eq!(store.search_users("ADMIN", None).len(), 1);
        assert_eq!(store.search_users("", Some(Role::Customer)).len(), 1);
        assert!(store.search_users("zzz", None).is_empty());
    }

    #[test]
    fn test_admin_cannot_delete_self() {
        let mut store = admin_store();
        assert!(matches!(store.delete_user(2), Err(StoreError::SelfDeletion)));
        store.delete_user(1).unwrap();
        assert!(store.user_by_id(1).is_none());
        assert!(matches!(store.delete_user(1), Err(StoreError::UserNotFound(1))));
    }

    #[test]
    fn test_create_user_with_role() {
        let mut store = admin_store();
        let registration = Registration {
            name: "Sophea".into(), email: "sophea@example.com".into(), password: "secret1".into(),
            confirm_password: "secret1".into(), phone: None, agree_to_terms: true,
        };
        let id = store.create_user(registration, Role::Admin).unwrap();
        assert!(store.user_by_id(id).unwrap().is_admin());
        assert_eq!(store.current_user().map(|u| u.id), Some(2));
    }

    #[test]
    fn test_set_user_role() {
        let mut store = admin_store();
        assert_eq!(store.set_user_role(1, Role::Admin).unwrap().role, Role::Admin);
        assert!(matches!(store.set_user_role(42, Role::Admin), Err(StoreError::UserNotFound(42))));
    }

    #[test]
    fn test_customer_summary() {
        let store = demo_store();
        let summary = store.customer_summary(1).unwrap();
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.total_spent, Money::from_major(1698));
        assert_eq!(summary.last_order, Some(1));
        assert_eq!(summary.segment, CustomerSegment::Active);
        assert_eq!(store.customer_summary(2).unwrap().segment, CustomerSegment::New);
    }
}
