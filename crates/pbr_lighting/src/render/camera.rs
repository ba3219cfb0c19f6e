//! Camera as seen by the render pipeline

use std::fmt;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::backend::{EncoderId, GfxBackend, ViewId};

/// Clustered light lookup structure owned by a camera
///
/// Computing the clusters is the implementor's business; the pipeline only
/// asks it to bind its data for a view and again for each draw encoder.
pub trait LightClusters {
    /// Bind cluster data for every draw of a view
    fn submit_pass(&self, backend: &mut dyn GfxBackend, view: ViewId);

    /// Bind cluster data for the next draw recorded on an encoder
    fn submit_encoder(&self, backend: &mut dyn GfxBackend, encoder: EncoderId);
}

/// Camera parameters consumed by render blocks
pub struct Camera {
    /// World to view matrix
    pub view: Mat4,
    /// Whether lights are looked up through clusters
    pub clustered: bool,
    /// Cluster structure, present when `clustered` is set
    pub clusters: Option<Box<dyn LightClusters>>,
}

impl Camera {
    /// Create a camera from a view matrix
    pub fn new(view: Mat4) -> Self {
        Self {
            view,
            clustered: false,
            clusters: None,
        }
    }

    /// Create a camera at `eye` looking at `target`
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self::new(Mat4::look_at(eye, target, up))
    }

    /// Enable clustered lighting with the given cluster structure
    #[must_use]
    pub fn with_clusters(mut self, clusters: Box<dyn LightClusters>) -> Self {
        self.clustered = true;
        self.clusters = Some(clusters);
        self
    }

    /// Cluster structure, if clustered lighting is active
    pub fn active_clusters(&self) -> Option<&dyn LightClusters> {
        if self.clustered {
            self.clusters.as_deref()
        } else {
            None
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Mat4::identity())
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("view", &self.view)
            .field("clustered", &self.clustered)
            .field("clusters", &self.clusters.is_some())
            .finish()
    }
}
