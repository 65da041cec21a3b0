use dotenvy::dotenv;
use env_logger::Env;
use log::{info, warn};
use safe_travel::config::Config;
use safe_travel::state::AppState;
use safe_travel::stores::identity;
use safe_travel::{database, http};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().expect("Invalid configuration");
    config.report();

    let pool = database::build_pool(&config.database_url).expect("Could not build connection pool");

    {
        let connection = &mut pool.get().expect("Could not get connection from pool");
        database::run_migrations(connection).expect("Could not run migrations");

        match &config.admin {
            Some(admin) => {
                let admin = identity::ensure_admin(connection, &admin.email, &admin.password)
                    .expect("Could not set up admin account");
                info!("{} is the administrator", admin.email);
            }
            None => {
                let revoked =
                    identity::revoke_admins(connection).expect("Could not revoke admin rights");
                if revoked > 0 {
                    warn!("No admin configured, removed admin rights from {revoked} account(s)");
                }
            }
        }
    }

    http::listen(AppState::new(pool, config)).await;
}
