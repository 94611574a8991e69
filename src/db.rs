pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod contact_repo;
pub use contact_repo::ContactRepository;
pub mod tag_repo;
pub use tag_repo::TagRepository;
pub mod pipeline_repo;
pub use pipeline_repo::PipelineStageRepository;
pub mod task_repo;
pub use task_repo::TaskRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
