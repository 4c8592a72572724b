// src/config.rs

use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{InventoryRepository, SalesRepository, StockLedger, TokenRepository, UserRepository},
    services::{
        auth::AuthService, sales_service::SaleDeletePolicy, token_codec::TokenCodec,
        InventoryService, SalesService,
    },
};

// ---
// Settings: tudo o que vem do ambiente (.env incluso)
// ---
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub request_timeout: Duration,
    pub sale_delete_policy: SaleDeletePolicy,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do `env` para poder testar sem mexer no processo
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl: token_ttl(parse_or(&lookup, "TOKEN_TTL_SECS", 3600)?)?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
            sale_delete_policy: parse_or(&lookup, "SALE_DELETE_POLICY", SaleDeletePolicy::default())?,
        })
    }
}

// Teto de 1 ano: acima disso o `exp` deixa de fazer sentido para uma sessão
const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

fn token_ttl(secs: i64) -> anyhow::Result<chrono::Duration> {
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        anyhow::bail!(
            "TOKEN_TTL_SECS fora do intervalo: {} (use 1..={})",
            secs,
            MAX_TOKEN_TTL_SECS
        );
    }
    chrono::Duration::try_seconds(secs).context("TOKEN_TTL_SECS fora do intervalo")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} inválido ('{}'): {}", key, raw, e)),
        None => Ok(default),
    }
}

// ---
// AppState: o gráfico de dependências, montado uma vez
// ---
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub sales_service: SalesService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(settings.db_acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, settings))
    }

    pub fn from_pool(db_pool: PgPool, settings: &Settings) -> Self {
        let codec = TokenCodec::new(&settings.jwt_secret, settings.token_ttl);
        let ledger = StockLedger::new();

        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let token_repo = TokenRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());

        // --- Serviços ---
        let auth_service = AuthService::new(user_repo, token_repo, codec);
        let inventory_service = InventoryService::new(db_pool.clone(), inventory_repo, ledger.clone());
        let sales_service = SalesService::new(
            db_pool.clone(),
            sales_repo,
            ledger,
            settings.sale_delete_policy,
        );

        Self {
            db_pool,
            auth_service,
            inventory_service,
            sales_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/bikestock"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(settings.token_ttl, chrono::Duration::seconds(3600));
        assert_eq!(settings.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.db_acquire_timeout, Duration::from_secs(3));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.sale_delete_policy, SaleDeletePolicy::RestoreStock);
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/bikestock"),
            ("JWT_SECRET", "segredo"),
            ("TOKEN_TTL_SECS", "60"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SALE_DELETE_POLICY", "keep"),
        ]))
        .unwrap();

        assert_eq!(settings.token_ttl, chrono::Duration::seconds(60));
        assert_eq!(settings.bind_addr.port(), 8080);
        assert_eq!(settings.sale_delete_policy, SaleDeletePolicy::KeepStock);
    }

    #[test]
    fn token_ttl_out_of_range_is_rejected() {
        for ttl in ["0", "-5", "31536001", "9300000000000000", "99999999999999999999"] {
            let result = Settings::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://x"),
                ("JWT_SECRET", "s"),
                ("TOKEN_TTL_SECS", ttl),
            ]));
            assert!(result.is_err(), "{ttl}");
        }

        let max = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("TOKEN_TTL_SECS", "31536000"),
        ]))
        .unwrap();
        assert_eq!(max.token_ttl, chrono::Duration::days(365));
    }

    #[test]
    fn missing_secret_or_bad_number_fails() {
        assert!(Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "")])).is_err());
        assert!(Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("DB_MAX_CONNECTIONS", "muitas"),
        ]))
        .is_err());
    }
}
