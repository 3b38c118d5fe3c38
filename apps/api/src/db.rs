use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS offres (
        id BIGSERIAL PRIMARY KEY,
        titre TEXT NOT NULL,
        entreprise TEXT,
        localisation TEXT,
        competences_requises TEXT,
        interview_checklist JSONB,
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS candidatures (
        id BIGSERIAL PRIMARY KEY,
        offre_id BIGINT NOT NULL REFERENCES offres(id),
        statut TEXT NOT NULL DEFAULT 'EN_ATTENTE',
        date_reponse TIMESTAMPTZ,
        interview_checklist_results TEXT,
        interview_skill_comments TEXT,
        interview_commentaire TEXT
    )
    "#,
];

/// Creates the checklist tables if they are missing. Idempotent.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
