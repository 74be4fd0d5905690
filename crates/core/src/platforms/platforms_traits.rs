use crate::errors::Result;
use crate::platforms::platforms_model::Platform;

/// Trait for platform repository operations
pub trait PlatformRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Platform>>;
    fn get_by_id(&self, platform_id: &str) -> Result<Option<Platform>>;
}

/// Trait for platform service operations
pub trait PlatformServiceTrait: Send + Sync {
    fn list_platforms(&self) -> Result<Vec<Platform>>;
    fn get_platform(&self, platform_id: &str) -> Result<Platform>;
}
