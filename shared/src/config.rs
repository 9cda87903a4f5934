use anyhow::Result;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub gateway: GatewayConfig,
    pub booking: BookingConfig,
}

impl AppConfig {
    pub fn new() -> Result<AppConfig> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST")?,
            port: std::env::var("REDIS_PORT")?.parse()?,
        };
        let auth = AuthConfig {
            ttl: std::env::var("AUTH_TOKEN_TTL")?.parse()?,
        };
        let gateway = GatewayConfig {
            endpoint: std::env::var("PAYMENT_GATEWAY_ENDPOINT")
                .unwrap_or_else(|_| "https://api.stripe.com".into()),
            secret_key: std::env::var("PAYMENT_GATEWAY_SECRET_KEY")?,
        };
        let booking = BookingConfig {
            // 未入金の pending 予約を解放するまでの保持時間（分）
            hold_minutes: std::env::var("BOOKING_HOLD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        };
        Ok(AppConfig {
            database,
            redis,
            auth,
            gateway,
            booking,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub ttl: u64,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub hold_minutes: i64,
}
