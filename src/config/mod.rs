use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Which credential scheme the deployment accepts. The two schemes are
/// mutually exclusive: a server runs either Basic or Bearer, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthScheme {
    Basic,
    Bearer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_cors: bool,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub auth_scheme: AuthScheme,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Whether token validation rejects expired tokens. Off by default:
    /// issued tokens carry an `exp` claim but it is not enforced unless a
    /// deployment opts in (TODOS_VALIDATE_TOKEN_LIFETIME=true).
    pub validate_token_lifetime: bool,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("API_ENABLE_CORS") {
            self.api.enable_cors = v.parse().unwrap_or(self.api.enable_cors);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("TODOS_AUTH_SCHEME") {
            self.security.auth_scheme = match v.to_ascii_lowercase().as_str() {
                "basic" => AuthScheme::Basic,
                "bearer" | "jwt" => AuthScheme::Bearer,
                _ => self.security.auth_scheme,
            };
        }
        if let Ok(v) = env::var("TODOS_JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("TODOS_JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }
        if let Ok(v) = env::var("TODOS_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("TODOS_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("TODOS_VALIDATE_TOKEN_LIFETIME") {
            self.security.validate_token_lifetime =
                v.parse().unwrap_or(self.security.validate_token_lifetime);
        }
        if let Ok(v) = env::var("TODOS_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                enable_cors: true,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                auth_scheme: AuthScheme::Bearer,
                jwt_issuer: "todos-api".to_string(),
                jwt_audience: "todos-clients".to_string(),
                // Development-only signing key, long enough for HMAC-SHA256
                jwt_secret: "dev-only-signing-key-0123456789abcdef".to_string(),
                jwt_expiry_hours: 24,
                validate_token_lifetime: false,
                bcrypt_cost: 4, // keep local runs and tests fast
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                enable_cors: true,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                auth_scheme: AuthScheme::Bearer,
                jwt_issuer: "todos-api".to_string(),
                jwt_audience: "todos-clients".to_string(),
                jwt_secret: String::new(), // must come from TODOS_JWT_SECRET
                jwt_expiry_hours: 24,
                validate_token_lifetime: false,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                enable_cors: true,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                auth_scheme: AuthScheme::Bearer,
                jwt_issuer: "todos-api".to_string(),
                jwt_audience: "todos-clients".to_string(),
                jwt_secret: String::new(), // must come from TODOS_JWT_SECRET
                jwt_expiry_hours: 4,
                validate_token_lifetime: true,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
