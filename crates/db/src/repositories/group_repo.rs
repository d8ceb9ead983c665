//! Repository for the `groups` and `group_members` tables.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::group::{
    CreateGroup, CreateGroupMember, Group, GroupMember, UpdateGroupMember,
};

const GROUP_COLUMNS: &str = "id, user_id, name, created_at";
const MEMBER_COLUMNS: &str = "id, group_id, name, mood, avatar_url, created_at";

/// Provides CRUD operations for groups and their members.
pub struct GroupRepo;

impl GroupRepo {
    /// Create a group owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        input: &CreateGroup,
    ) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (user_id, name)
             VALUES ($1, $2)
             RETURNING {GROUP_COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(user_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a group by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Groups owned by a user, oldest first.
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Group>, sqlx::Error> {
        let query =
            format!("SELECT {GROUP_COLUMNS} FROM groups WHERE user_id = $1 ORDER BY created_at");
        sqlx::query_as::<_, Group>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Rename a group. Returns `None` if it does not exist.
    pub async fn rename(
        pool: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups SET name = $2 WHERE id = $1 RETURNING {GROUP_COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a group (members cascade). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a member to a group.
    pub async fn add_member(
        pool: &PgPool,
        group_id: Uuid,
        input: &CreateGroupMember,
    ) -> Result<GroupMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO group_members (group_id, name, mood, avatar_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, GroupMember>(&query)
            .bind(group_id)
            .bind(&input.name)
            .bind(input.mood)
            .bind(&input.avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Members of a group, oldest first.
    pub async fn list_members(
        pool: &PgPool,
        group_id: Uuid,
    ) -> Result<Vec<GroupMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM group_members WHERE group_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, GroupMember>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    /// Patch a member. Only non-`None` fields are applied.
    ///
    /// The `group_id` guard keeps a member id from being patched through
    /// another group's route.
    pub async fn update_member(
        pool: &PgPool,
        group_id: Uuid,
        member_id: Uuid,
        input: &UpdateGroupMember,
    ) -> Result<Option<GroupMember>, sqlx::Error> {
        let query = format!(
            "UPDATE group_members SET
                name = COALESCE($3, name),
                mood = COALESCE($4, mood),
                avatar_url = COALESCE($5, avatar_url)
             WHERE id = $2 AND group_id = $1
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, GroupMember>(&query)
            .bind(group_id)
            .bind(member_id)
            .bind(&input.name)
            .bind(input.mood)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Remove a member. Returns `true` if a row was removed.
    pub async fn remove_member(
        pool: &PgPool,
        group_id: Uuid,
        member_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM group_members WHERE id = $2 AND group_id = $1")
            .bind(group_id)
            .bind(member_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
