use std::sync::Arc;

use super::{config::Config, directory::UserDirectory};

pub struct AppState {
    pub config: Config,
    pub directory: UserDirectory,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();
        let directory = UserDirectory::new(&config.users_path);

        Arc::new(Self { config, directory })
    }
}
