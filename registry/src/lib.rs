use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::gateway::stripe::StripePaymentGateway;
use adapter::redis::RedisClient;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::booking::BookingRepositoryImpl;
use adapter::repository::document::DocumentRepositoryImpl;
use adapter::repository::field::FieldRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::review::ReviewRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::gateway::payment::PaymentGateway;
use kernel::repository::auth::AuthRepository;
use kernel::repository::booking::BookingRepository;
use kernel::repository::document::DocumentRepository;
use kernel::repository::field::FieldRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::review::ReviewRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;
use shared::error::AppResult;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    field_repository: Arc<dyn FieldRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    document_repository: Arc<dyn DocumentRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    payment_gateway: Arc<dyn PaymentGateway>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: &AppConfig,
    ) -> AppResult<Self> {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let field_repository = Arc::new(FieldRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let review_repository = Arc::new(ReviewRepositoryImpl::new(pool.clone()));
        let document_repository = Arc::new(DocumentRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        let payment_gateway = Arc::new(StripePaymentGateway::new(&app_config.gateway)?);
        Ok(Self {
            health_check_repository,
            field_repository,
            booking_repository,
            review_repository,
            document_repository,
            user_repository,
            auth_repository,
            payment_gateway,
        })
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn field_repository(&self) -> Arc<dyn FieldRepository> {
        self.field_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn review_repository(&self) -> Arc<dyn ReviewRepository> {
        self.review_repository.clone()
    }

    pub fn document_repository(&self) -> Arc<dyn DocumentRepository> {
        self.document_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn payment_gateway(&self) -> Arc<dyn PaymentGateway> {
        self.payment_gateway.clone()
    }
}
