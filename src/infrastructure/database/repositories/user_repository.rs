use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use tracing::debug;

use crate::domain::{UserAccount, UserRepositoryInterface};
use crate::infrastructure::database::entities::user;
use crate::shared::StoreResult;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

/// `id, usuario, password_hash, rol, activo`; `ultimo_login` is never read.
type CredentialRow = (i32, String, Option<String>, Option<String>, Option<bool>);

fn credential_row_to_domain(row: CredentialRow) -> UserAccount {
    let (id, username, password_hash, role, active) = row;
    UserAccount {
        id,
        username,
        password_hash: password_hash.unwrap_or_default(),
        role: role.unwrap_or_default(),
        // NULL is not active
        active: active == Some(true),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        let row = user::Entity::find()
            .select_only()
            .columns([
                user::Column::Id,
                user::Column::Username,
                user::Column::PasswordHash,
                user::Column::Role,
                user::Column::Active,
            ])
            .filter(user::Column::Username.eq(username))
            .into_tuple::<CredentialRow>()
            .one(&self.db)
            .await?;

        Ok(row.map(credential_row_to_domain))
    }

    async fn touch_last_login(&self, id: i32) -> StoreResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        debug!(user_id = id, rows = result.rows_affected, "Last login recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, DbBackend, Set, Statement};
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig};
    use crate::shared::StoreError;

    async fn setup() -> DatabaseConnection {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert(
        db: &DatabaseConnection,
        username: &str,
        role: Option<&str>,
        active: bool,
    ) -> user::Model {
        user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(Some(" $2b$04$abcdefghijklmnopqrstuu ".to_string())),
            role: Set(role.map(str::to_string)),
            active: Set(Some(active)),
            last_login_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn finds_by_exact_username() {
        let db = setup().await;
        let inserted = insert(&db, "JUANP", Some("Director "), true).await;
        let repo = UserRepository::new(db);

        let found = repo.find_user_by_username("JUANP").await.unwrap().unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.username, "JUANP");
        // Stored values come back untouched; trimming is the service's job
        assert_eq!(found.role, "Director ");
        assert_eq!(found.password_hash, " $2b$04$abcdefghijklmnopqrstuu ");
        assert!(found.active);
    }

    #[tokio::test]
    async fn lookup_is_not_case_insensitive_at_store_level() {
        let db = setup().await;
        insert(&db, "JUANP", Some("Director"), true).await;
        let repo = UserRepository::new(db);

        assert!(repo.find_user_by_username("juanp").await.unwrap().is_none());
        assert!(repo.find_user_by_username("GHOST").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn null_columns_map_to_safe_defaults() {
        let db = setup().await;
        let inserted = insert(&db, "NOROLE", None, true).await;
        user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(Option::<String>::None))
            .filter(user::Column::Id.eq(inserted.id))
            .exec(&db)
            .await
            .unwrap();
        let repo = UserRepository::new(db);

        let found = repo.find_user_by_username("NOROLE").await.unwrap().unwrap();
        assert_eq!(found.role, "");
        assert_eq!(found.password_hash, "");
    }

    #[tokio::test]
    async fn lookup_ignores_undecodable_last_login_column() {
        let db = setup().await;
        let inserted = insert(&db, "LEGACY", Some("Financiera"), true).await;
        db.execute(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "UPDATE usuarios SET ultimo_login = 'not a timestamp' WHERE id = ?",
            [inserted.id.into()],
        ))
        .await
        .unwrap();
        let repo = UserRepository::new(db);

        let found = repo.find_user_by_username("LEGACY").await.unwrap().unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.role, "Financiera");
        assert!(found.active);
    }

    #[tokio::test]
    async fn touch_sets_last_login_for_that_row_only() {
        let db = setup().await;
        let target = insert(&db, "JUANP", Some("Director"), true).await;
        let other = insert(&db, "MARIA", Some("Financiera"), true).await;
        let repo = UserRepository::new(db.clone());

        let before = Utc::now();
        repo.touch_last_login(target.id).await.unwrap();

        let target = user::Entity::find_by_id(target.id).one(&db).await.unwrap().unwrap();
        let other = user::Entity::find_by_id(other.id).one(&db).await.unwrap().unwrap();
        let touched = target.last_login_at.expect("last login recorded");
        assert!(touched >= before - chrono::Duration::seconds(1));
        assert!(other.last_login_at.is_none());
    }

    #[tokio::test]
    async fn closed_pool_surfaces_database_error() {
        let db = setup().await;
        let repo = UserRepository::new(db.clone());
        db.close().await.unwrap();

        let err = repo.find_user_by_username("JUANP").await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
