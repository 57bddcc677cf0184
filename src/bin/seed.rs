use chrono::NaiveDate;
use seisme_dashboard::{
    db::{DbPool, create_pool, run_migrations},
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = create_pool(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let analyst_id = ensure_user(&pool, "analyst@example.com", "analyst123", "analyst").await?;

    let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM client")
        .fetch_one(&pool)
        .await?;
    if existing.0 > 0 {
        println!("Clients already present, skipping catalogue seed");
    } else {
        let clients = seed_clients(&pool).await?;
        let products = seed_products(&pool).await?;
        seed_transactions(&pool, &clients, &products).await?;
    }

    println!("Seed completed. Admin ID: {admin_id}, Analyst ID: {analyst_id}");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    email: &str,
    password: &str,
    username: &str,
) -> anyhow::Result<i64> {
    let password_hash = hash_password(password.to_string()).await?;

    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (i64,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow::anyhow!("invalid date {y}-{m}-{d}"))
}

async fn seed_clients(pool: &DbPool) -> anyhow::Result<Vec<i64>> {
    let clients = [
        ("Amina Benali", "F", 34, "Rabat", (2023, 2, 14), "amina@example.com"),
        ("Youssef Idrissi", "M", 41, "Casablanca", (2023, 5, 3), "youssef@example.com"),
        ("Sara Alaoui", "F", 27, "Marrakech", (2023, 9, 21), "sara@example.com"),
        ("Karim Tazi", "M", 55, "Casablanca", (2024, 1, 8), "karim@example.com"),
        ("Nadia Fassi", "F", 38, "Fes", (2024, 3, 30), "nadia@example.com"),
        ("Omar Chraibi", "M", 23, "Rabat", (2024, 6, 12), "omar@example.com"),
    ];

    let mut ids = Vec::with_capacity(clients.len());
    for (nom, genre, age, localisation, (y, m, d), email) in clients {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO client (nom_complet, genre, age, localisation, date_inscription, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING client_id
            "#,
        )
        .bind(nom)
        .bind(genre)
        .bind(age)
        .bind(localisation)
        .bind(date(y, m, d)?)
        .bind(email)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("Seeded {} clients", ids.len());
    Ok(ids)
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<Vec<i64>> {
    let products = [
        ("Sismographe portable", 1_250.0, 12, (2023, 1, 10), "Capteur trois axes"),
        ("Accelerometre MEMS", 189.9, 80, (2023, 4, 2), "Module USB"),
        ("Kit d'urgence", 59.0, 240, (2023, 8, 19), "Eau, lampe, radio"),
        ("Station GNSS", 3_400.0, 4, (2024, 2, 27), "Suivi de deformation"),
    ];

    let mut ids = Vec::with_capacity(products.len());
    for (nom, prix, stock, (y, m, d), description) in products {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO produit (prix, stock, date_ajout, nom, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING produit_id
            "#,
        )
        .bind(prix)
        .bind(stock)
        .bind(date(y, m, d)?)
        .bind(nom)
        .bind(description)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("Seeded {} products", ids.len());
    Ok(ids)
}

async fn seed_transactions(pool: &DbPool, clients: &[i64], products: &[i64]) -> anyhow::Result<()> {
    let mut count = 0;
    for (i, client_id) in clients.iter().enumerate() {
        for (j, produit_id) in products.iter().enumerate() {
            // uneven purchase pattern
            if (i + j) % 3 == 0 || j == i % products.len() {
                sqlx::query("INSERT INTO transactions (client_id, produit_id) VALUES ($1, $2)")
                    .bind(client_id)
                    .bind(produit_id)
                    .execute(pool)
                    .await?;
                count += 1;
            }
        }
    }

    println!("Seeded {count} transactions");
    Ok(())
}
