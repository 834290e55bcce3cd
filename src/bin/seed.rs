use creative_print_api::{
    config::AppConfig,
    db::{DbPool, create_orm_conn, create_pool, run_migrations},
    services::auth_service::hash_password,
};
use rust_decimal::Decimal;
use uuid::Uuid;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    // cents
    base_price: i64,
    // (size, color, adjustment in cents, stock)
    variants: &'static [(&'static str, &'static str, i64, i32)],
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Ferris Classic T-Shirt",
        description: "Soft cotton tee with a screen-printed crab",
        category: "T-Shirts",
        base_price: 2499,
        variants: &[
            ("S", "Black", 0, 40),
            ("M", "Black", 0, 60),
            ("L", "Black", 0, 60),
            ("XL", "White", 200, 25),
        ],
    },
    SeedProduct {
        name: "Borrow Checker Cap",
        description: "Embroidered six-panel cap",
        category: "Hats & Caps",
        base_price: 1999,
        variants: &[("One Size", "Navy", 0, 30), ("One Size", "Red", 100, 15)],
    },
    SeedProduct {
        name: "Async Morning Mug",
        description: "Ceramic mug, 11oz",
        category: "Mugs",
        base_price: 1499,
        variants: &[("11oz", "White", 0, 80), ("15oz", "White", 300, 40)],
    },
    SeedProduct {
        name: "Lifetimes Poster",
        description: "Printed on demand, A2 matte",
        category: "Posters",
        base_price: 1299,
        variants: &[],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin12345", "admin").await?;
    let partner_id = ensure_user(&pool, "partner@example.com", "partner12345", "partner").await?;
    let client_id = ensure_user(&pool, "client@example.com", "client12345", "client").await?;
    seed_categories(&pool).await?;
    seed_products(&pool, partner_id).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Partner ID: {partner_id}, Client ID: {client_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_categories(pool: &DbPool) -> anyhow::Result<()> {
    for product in PRODUCTS {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.category)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_products(pool: &DbPool, partner_id: Uuid) -> anyhow::Result<()> {
    for product in PRODUCTS {
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO products (id, partner_id, name, description, category, base_price)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (
                SELECT 1 FROM products WHERE partner_id = $2 AND name = $3
            )
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(partner_id)
        .bind(product.name)
        .bind(product.description)
        .bind(product.category)
        .bind(Decimal::new(product.base_price, 2))
        .fetch_optional(pool)
        .await?;

        // Already seeded.
        let Some((product_id,)) = inserted else {
            continue;
        };

        for (size, color, adjustment, stock) in product.variants {
            sqlx::query(
                r#"
                INSERT INTO product_variants (id, product_id, size, color, price_adjustment, stock)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(product_id)
            .bind(*size)
            .bind(*color)
            .bind(Decimal::new(*adjustment, 2))
            .bind(*stock)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded {} products", PRODUCTS.len());
    Ok(())
}
