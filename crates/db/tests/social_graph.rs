//! Integration tests for profile provisioning and the connection graph,
//! exercised against a real database:
//! - Idempotent profile provisioning (re-insert never overwrites a mood)
//! - Duplicate email rejection
//! - Mutual edge creation and symmetric removal

use sqlx::PgPool;
use uuid::Uuid;

use b2gthr_db::models::profile::CreateProfile;
use b2gthr_db::repositories::{ConnectionRepo, ProfileRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_profile(email: &str, name: &str) -> CreateProfile {
    CreateProfile {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: name.to_string(),
        password_hash: "$argon2id$stub".to_string(),
    }
}

async fn edge_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM connections")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Test: Provisioning is idempotent by id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_first_insert_returns_row_with_default_mood(pool: PgPool) {
    let profile = ProfileRepo::create(&pool, &new_profile("ana@example.com", "Ana"))
        .await
        .unwrap()
        .expect("first insert should return the row");

    assert_eq!(profile.full_name, "Ana");
    assert_eq!(profile.mood, 2); // Mild/Neutral default
    assert_eq!(profile.context, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reprovisioning_never_overwrites_an_existing_mood(pool: PgPool) {
    let input = new_profile("ben@example.com", "Ben");
    let profile = ProfileRepo::create(&pool, &input).await.unwrap().unwrap();

    // Ben sets an urgent mood with context.
    ProfileRepo::update_mood(&pool, profile.id, 5, Some("call me"))
        .await
        .unwrap()
        .expect("mood update should return the row");

    // A second provisioning attempt with the same id is a silent no-op.
    let again = CreateProfile {
        full_name: "Someone Else".to_string(),
        ..input
    };
    let result = ProfileRepo::create(&pool, &again).await.unwrap();
    assert!(result.is_none(), "duplicate insert should return None");

    let stored = ProfileRepo::find_by_id(&pool, profile.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.mood, 5, "mood must survive re-provisioning");
    assert_eq!(stored.context.as_deref(), Some("call me"));
    assert_eq!(stored.full_name, "Ben");
}

// ---------------------------------------------------------------------------
// Test: Duplicate email rejected (case-insensitive)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    ProfileRepo::create(&pool, &new_profile("cara@example.com", "Cara"))
        .await
        .unwrap();

    let result = ProfileRepo::create(&pool, &new_profile("CARA@example.com", "Impostor")).await;
    assert!(result.is_err(), "duplicate email should violate uq_profiles_email");
}

// ---------------------------------------------------------------------------
// Test: Accepting a request yields exactly one edge pair
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_mutual_yields_exactly_one_edge_pair(pool: PgPool) {
    let ana = ProfileRepo::create(&pool, &new_profile("ana@example.com", "Ana"))
        .await
        .unwrap()
        .unwrap();
    let ben = ProfileRepo::create(&pool, &new_profile("ben@example.com", "Ben"))
        .await
        .unwrap()
        .unwrap();

    ConnectionRepo::create_mutual(&pool, ana.id, ben.id)
        .await
        .unwrap();

    assert!(ConnectionRepo::edge_exists(&pool, ana.id, ben.id).await.unwrap());
    assert!(ConnectionRepo::edge_exists(&pool, ben.id, ana.id).await.unwrap());
    assert_eq!(edge_count(&pool).await, 2);

    // Re-accepting is a no-op: still exactly the pair.
    ConnectionRepo::create_mutual(&pool, ana.id, ben.id)
        .await
        .unwrap();
    assert_eq!(edge_count(&pool).await, 2);
}

// ---------------------------------------------------------------------------
// Test: Removal is symmetric
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_remove_mutual_deletes_both_edges(pool: PgPool) {
    let ana = ProfileRepo::create(&pool, &new_profile("ana@example.com", "Ana"))
        .await
        .unwrap()
        .unwrap();
    let ben = ProfileRepo::create(&pool, &new_profile("ben@example.com", "Ben"))
        .await
        .unwrap()
        .unwrap();

    ConnectionRepo::create_mutual(&pool, ana.id, ben.id)
        .await
        .unwrap();

    // Either party may remove; both directions go.
    let removed = ConnectionRepo::remove_mutual(&pool, ben.id, ana.id)
        .await
        .unwrap();
    assert!(removed);
    assert_eq!(edge_count(&pool).await, 0);

    // Removing an already-removed pair reports nothing deleted.
    let removed = ConnectionRepo::remove_mutual(&pool, ana.id, ben.id)
        .await
        .unwrap();
    assert!(!removed);
}
