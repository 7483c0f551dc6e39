use std::sync::Arc;

use crate::application::{
    ports::{media_storage::MediaStorage, time::Clock},
    queries::pastries::PastryPresenter,
};
use crate::domain::pastry::{PastryReadRepository, PastryWriteRepository};

pub struct PastryCommandService {
    pub(super) write_repo: Arc<dyn PastryWriteRepository>,
    pub(super) read_repo: Arc<dyn PastryReadRepository>,
    pub(super) storage: Arc<dyn MediaStorage>,
    pub(super) presenter: Arc<PastryPresenter>,
    pub(super) clock: Arc<dyn Clock>,
}

impl PastryCommandService {
    pub fn new(
        write_repo: Arc<dyn PastryWriteRepository>,
        read_repo: Arc<dyn PastryReadRepository>,
        storage: Arc<dyn MediaStorage>,
        presenter: Arc<PastryPresenter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            storage,
            presenter,
            clock,
        }
    }
}
