use std::sync::Arc;

use super::platforms_model::Platform;
use super::platforms_traits::{PlatformRepositoryTrait, PlatformServiceTrait};
use crate::errors::{Error, Result};

pub struct PlatformService {
    repository: Arc<dyn PlatformRepositoryTrait>,
}

impl PlatformService {
    pub fn new(repository: Arc<dyn PlatformRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl PlatformServiceTrait for PlatformService {
    fn list_platforms(&self) -> Result<Vec<Platform>> {
        let mut platforms = self.repository.list()?;
        platforms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(platforms)
    }

    fn get_platform(&self, platform_id: &str) -> Result<Platform> {
        self.repository
            .get_by_id(platform_id)?
            .ok_or_else(|| Error::NotFound(format!("Platform {}", platform_id)))
    }
}
