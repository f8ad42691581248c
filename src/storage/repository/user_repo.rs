use crate::storage::entity::{new_id, NewUser, User, UserPreferences};
use crate::storage::{Store, StoreError};
use chrono::Utc;

pub struct UserRepository;

impl UserRepository {
    pub async fn get(store: &Store, id: &str) -> Option<User> {
        store.users.get(id).await
    }

    pub async fn get_by_username(store: &Store, username: &str) -> Option<User> {
        store.users.find(|u| u.username == username).await
    }

    pub async fn get_by_email(store: &Store, email: &str) -> Option<User> {
        store
            .users
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .await
    }

    /// username / email 唯一；冲突时返回 DuplicateKey，存储不变
    pub async fn create(store: &Store, new: NewUser) -> Result<User, StoreError> {
        let user = new.into_user(new_id(), Utc::now());
        store
            .users
            .insert_with(user, |rows, candidate| {
                if rows.iter().any(|u| u.username == candidate.username) {
                    return Err(StoreError::duplicate("username", &candidate.username));
                }
                if rows
                    .iter()
                    .any(|u| u.email.eq_ignore_ascii_case(&candidate.email))
                {
                    return Err(StoreError::duplicate("email", &candidate.email));
                }
                Ok(())
            })
            .await
    }

    /// 用户创建后只有 preferences 可改
    pub async fn update_preferences(
        store: &Store,
        id: &str,
        preferences: UserPreferences,
    ) -> Result<Option<User>, StoreError> {
        store
            .users
            .update_with(id, |u| u.preferences = Some(preferences))
            .await
    }
}
