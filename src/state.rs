//! Application state

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// AWS SES client for customer notifications
    pub ses: SesClient,
    /// SES sender email address
    pub ses_from_email: String,
    /// Storefront base URL used in notification links
    pub site_url: String,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = match &config.ses_region {
            Some(region) => {
                let ses_config = aws_config
                    .to_builder()
                    .region(aws_config::Region::new(region.clone()))
                    .build();
                SesClient::new(&ses_config)
            }
            None => SesClient::new(&aws_config),
        };

        Ok(Self {
            pool,
            ses,
            ses_from_email: config.ses_from_email.clone(),
            site_url: config.site_url.clone(),
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
