use axum_storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        categories::{self, ActiveModel as CategoryActive, Entity as Categories},
        customers::{self, ActiveModel as CustomerActive, Entity as Customers},
        products::{self, ActiveModel as ProductActive, Entity as Products},
        users::{self, ActiveModel as UserActive, Entity as Users},
    },
    middleware::auth::{ADMIN_ROLE, USER_ROLE},
    services::auth_service::hash_password,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@example.com", "admin123", ADMIN_ROLE).await?;
    let user_id = ensure_user(&orm, "user@example.com", "user123", USER_ROLE).await?;
    ensure_customer(&orm, user_id, "Example Shopper").await?;
    seed_catalog(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(role.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

async fn ensure_customer(
    orm: &DatabaseConnection,
    user_id: Uuid,
    full_name: &str,
) -> anyhow::Result<()> {
    let exists = Customers::find()
        .filter(customers::Column::UserId.eq(user_id))
        .one(orm)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    CustomerActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        full_name: Set(full_name.to_string()),
        address: Set(Some("1 Ferris Way".to_string())),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    Ok(())
}

async fn seed_catalog(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let catalog = vec![
        (
            ("Apparel", "apparel"),
            vec![
                ("Axum Hoodie", "axum-hoodie", "Warm hoodie for Rustaceans", 6500, 5500),
                ("Crab T-Shirt", "crab-t-shirt", "Soft cotton, bright orange", 2500, 1999),
            ],
        ),
        (
            ("Desk", "desk"),
            vec![
                ("Ferris Mug", "ferris-mug", "Coffee tastes better with Ferris", 1500, 1200),
                ("Rust Sticker Pack", "rust-sticker-pack", "Decorate your laptop", 600, 500),
            ],
        ),
    ];

    for ((title, slug), items) in catalog {
        let category = match Categories::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(orm)
            .await?
        {
            Some(existing) => existing,
            None => {
                CategoryActive {
                    id: Set(Uuid::new_v4()),
                    title: Set(title.to_string()),
                    slug: Set(slug.to_string()),
                    created_at: Set(Utc::now().into()),
                }
                .insert(orm)
                .await?
            }
        };

        for (name, product_slug, description, marked, selling) in items {
            let exists = Products::find()
                .filter(products::Column::Slug.eq(product_slug))
                .one(orm)
                .await?
                .is_some();
            if exists {
                continue;
            }
            ProductActive {
                id: Set(Uuid::new_v4()),
                category_id: Set(category.id),
                title: Set(name.to_string()),
                slug: Set(product_slug.to_string()),
                description: Set(Some(description.to_string())),
                marked_price: Set(marked),
                selling_price: Set(selling),
                view_count: Set(0),
                created_at: Set(Utc::now().into()),
            }
            .insert(orm)
            .await?;
        }
    }

    println!("Seeded catalog");
    Ok(())
}
