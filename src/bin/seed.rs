use sea_orm::{ActiveValue::Set, DatabaseConnection};
use skillzio_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{categories, users},
    middleware::auth::Role,
    repository::{CategoryRepository, Repository, UserRepository, category_repository::name_key, now},
    services::auth_service::hash_password,
};
use uuid::Uuid;

const CATEGORIES: [&str; 5] = [
    "Programming",
    "Design",
    "Business",
    "Data Science",
    "Photography",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Admin", "admin@example.com", "admin12345", Role::Admin).await?;
    let instructor_id = ensure_user(
        &orm,
        "Demo Instructor",
        "instructor@example.com",
        "instructor123",
        Role::Instructor,
    )
    .await?;
    let student_id =
        ensure_user(&orm, "Demo Student", "student@example.com", "student123", Role::Student).await?;
    let created = seed_categories(&orm).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Instructor ID: {instructor_id}, Student ID: {student_id}, new categories: {created}"
    );
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let users: UserRepository<'_> = Repository::new(orm);
    if let Some(existing) = users.find_by_email(email).await? {
        return Ok(existing.id);
    }

    let user = users
        .create(users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password(password)?),
            role: Set(role.as_str().to_string()),
            created_at: Set(now()),
        })
        .await?;
    Ok(user.id)
}

async fn seed_categories(orm: &DatabaseConnection) -> anyhow::Result<usize> {
    let repo: CategoryRepository<'_> = Repository::new(orm);
    let mut missing = Vec::new();
    for name in CATEGORIES {
        if repo.find_category_by_name(name).await?.is_none() {
            let created_at = now();
            missing.push(categories::ActiveModel {
                id: Set(Uuid::new_v4()),
                category_name: Set(name.to_string()),
                name_key: Set(name_key(name)),
                is_listed: Set(true),
                created_at: Set(created_at),
                updated_at: Set(created_at),
            });
        }
    }
    Ok(repo.create_many(missing).await?.len())
}
