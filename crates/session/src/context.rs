use std::sync::Arc;
use std::time::Duration;

use facewatch_gateway::FaceGateway;

use crate::analysis::AnalysisSession;
use crate::archive::ArchiveSession;
use crate::dashboard::DashboardSession;
use crate::subjects::SubjectsCache;
use crate::training::TrainingSession;

/// Everything the views share for the lifetime of one operator session.
///
/// Cheaply cloneable; created once at startup via [`FacewatchContext::start`].
#[derive(Clone)]
pub struct FacewatchContext {
    pub gateway: Arc<dyn FaceGateway>,
    pub subjects: Arc<SubjectsCache>,
}

impl FacewatchContext {
    /// Wire the gateway and start the subjects cache (which schedules its
    /// initial refresh).
    pub fn start(gateway: Arc<dyn FaceGateway>) -> Self {
        let subjects = SubjectsCache::start(Arc::clone(&gateway));
        Self { gateway, subjects }
    }

    pub fn dashboard(&self) -> DashboardSession {
        DashboardSession::new(Arc::clone(&self.gateway), Arc::clone(&self.subjects))
    }

    pub fn archive(&self) -> ArchiveSession {
        ArchiveSession::new(Arc::clone(&self.gateway))
    }

    pub fn analysis(&self) -> AnalysisSession {
        AnalysisSession::new(Arc::clone(&self.gateway))
    }

    pub fn training(&self, confirmation_delay: Duration) -> TrainingSession {
        TrainingSession::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.subjects),
            confirmation_delay,
        )
    }

    pub fn shutdown(&self) {
        self.subjects.shutdown();
    }
}
