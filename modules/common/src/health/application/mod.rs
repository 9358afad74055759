mod health_check_use_case;

pub use health_check_use_case::HealthCheckUseCase;
