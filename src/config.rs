use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub auth_secret: String,
    pub trigger_secret: Option<String>,
    pub owner_email: String,
    pub max_body_size: usize,
    pub dedup_ttl_secs: u64,
    pub log_level: String,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let user = env_required("GMAIL_USER")?;
        let pass = env_required("GMAIL_APP_PASSWORD")?;
        let auth_secret = env_required("CHRONO_AUTH_SECRET")?;

        let host: IpAddr = env_or("CHRONO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CHRONO_HOST: {e}"))?;

        let port: u16 = env_or("CHRONO_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid CHRONO_PORT: {e}"))?;

        let owner_email = env_or("CHRONO_OWNER_EMAIL", &user);

        let trigger_secret = std::env::var("CHRONO_TRIGGER_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let max_body_size: usize = env_or("CHRONO_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid CHRONO_MAX_BODY_SIZE: {e}"))?;

        let dedup_ttl_secs: u64 = env_or("CHRONO_DEDUP_TTL_SECS", "86400")
            .parse()
            .map_err(|e| format!("Invalid CHRONO_DEDUP_TTL_SECS: {e}"))?;

        let log_level = env_or("CHRONO_LOG_LEVEL", "info");

        let smtp = SmtpConfig {
            host: env_or("CHRONO_SMTP_HOST", "smtp.gmail.com"),
            port: env_or("CHRONO_SMTP_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid CHRONO_SMTP_PORT: {e}"))?,
            user,
            pass,
        };

        Ok(Config {
            host,
            port,
            auth_secret,
            trigger_secret,
            owner_email,
            max_body_size,
            dedup_ttl_secs,
            log_level,
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
