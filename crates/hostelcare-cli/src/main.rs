use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use hostelcare_cli::admins::{NewAdmin, create_super_admin};
use hostelcare_cli::seeder::{self, SeedConfig};
use hostelcare_config::TicketConfig;
use hostelcare_db::PgPool;
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "hostelcare-cli")]
#[command(about = "HostelCare CLI tool for administrative tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin holding every permission
    CreateAdmin {
        /// Staff identifier used to log in
        #[arg(long)]
        admin_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Seed students and complaints for development
    Seed {
        /// Number of students to create
        #[arg(short, long, default_value = "50")]
        students: usize,
        /// Complaints filed by each student
        #[arg(short, long, default_value = "2")]
        complaints_per_student: usize,
        /// Password shared by every seeded student
        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Remove seeded students and their complaints
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let db = connect().await;

    match cli.command {
        Commands::CreateAdmin {
            admin_id,
            name,
            email,
            password,
            department,
        } => handle_create_admin(&db, admin_id, name, email, password, department).await,
        Commands::Seed {
            students,
            complaints_per_student,
            password,
        } => handle_seed(&db, students, complaints_per_student, password).await,
        Commands::ClearSeed => handle_clear_seed(&db).await,
    }
}

async fn connect() -> PgPool {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("❌ DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    match PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt_or(value: Option<String>, prompt: &str) -> String {
    match value {
        Some(v) => v,
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .unwrap_or_else(|e| {
                eprintln!("❌ Failed to read input: {}", e);
                std::process::exit(1);
            }),
    }
}

async fn handle_create_admin(
    db: &PgPool,
    admin_id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    department: Option<String>,
) {
    let admin_id = prompt_or(admin_id, "Admin ID");
    let name = prompt_or(name, "Full name");
    let email = prompt_or(email, "Email");
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .unwrap_or_else(|e| {
                eprintln!("❌ Failed to read password: {}", e);
                std::process::exit(1);
            }),
    };

    let admin = NewAdmin {
        admin_id,
        name,
        email: email.clone(),
        password,
        department,
    };

    match create_super_admin(db, admin).await {
        Ok(id) => {
            println!("✅ Admin created successfully!");
            println!("   ID: {}", id);
            println!("   Email: {}", email.trim().to_lowercase());
        }
        Err(e) => {
            eprintln!("❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(db: &PgPool, students: usize, complaints_per_student: usize, password: String) {
    let tickets = TicketConfig::from_env();
    let config = SeedConfig::new(students)
        .with_complaints_per_student(complaints_per_student)
        .with_password(password);

    match seeder::seed_all(db, &tickets, config).await {
        Ok(summary) => {
            println!(
                "✅ Seeded {} students and {} complaints in {:.2?}",
                summary.students, summary.complaints, summary.elapsed
            );
        }
        Err(e) => {
            eprintln!("❌ Error seeding data: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(db: &PgPool) {
    if let Err(e) = seeder::clear_seeded_data(db).await {
        eprintln!("❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}
