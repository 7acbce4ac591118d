use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use vitrina_cli::seeder::{self, DEFAULT_SEED_PASSWORD, SeedConfig};
use vitrina_core::{hash_password, validate_password_strength};
use vitrina_db::{PgStore, Store, StoreError};
use vitrina_models::{NewUser, Role};

#[derive(Parser)]
#[command(name = "vitrina-cli")]
#[command(about = "Vitrina CLI - Administrative tools for Vitrina", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Replace sample data with fake users and products
    Seed {
        /// Number of users to create
        #[arg(long, default_value = "5")]
        users: usize,

        /// Number of products to create
        #[arg(long, default_value = "20")]
        products: usize,

        /// Password shared by every seeded user
        #[arg(long, default_value = DEFAULT_SEED_PASSWORD)]
        password: String,
    },
    /// Clear all seeded data (keeps administrators)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vitrina_db::init_db_pool(&database_url, 5)
        .await
        .expect("Failed to connect to database");

    vitrina_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => handle_create_admin(PgStore::new(pool), username, email, password).await,
        Commands::Seed {
            users,
            products,
            password,
        } => handle_seed(&pool, users, products, password).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_admin(
    store: PgStore,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Username")
            .interact_text()
            .expect("Failed to read username")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    if let Err(problems) = validate_password_strength(&password, &[&username, &email]) {
        eprintln!("\n❌ Password rejected:");
        for problem in problems {
            eprintln!("   - {}", problem);
        }
        std::process::exit(1);
    }

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("\n❌ Failed to hash password: {}", e.error);
            std::process::exit(1);
        }
    };

    let new_user = NewUser {
        username: username.clone(),
        email: email.clone(),
        password_hash,
        phone: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        role: Role::Admin,
    };

    match store.create_user(new_user).await {
        Ok(user) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", user.username);
            println!("   Email: {}", user.email);
        }
        Err(StoreError::Conflict { field }) => {
            eprintln!("\n❌ A user with that {} already exists", field);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::PgPool, users: usize, products: usize, password: String) {
    let config = SeedConfig::new(users, products).with_password(password);

    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &sqlx::PgPool) {
    match seeder::clear_all(pool).await {
        Ok(_) => println!("\n✅ Cleared seeded data"),
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded data: {}", e);
            std::process::exit(1);
        }
    }
}
