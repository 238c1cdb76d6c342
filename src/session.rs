//! Visualization session: the state machine driving analysis, deformation
//! and color once per display refresh.

use crate::analyzer::{AnalysisFrame, SpectrumAnalyzer};
use crate::color;
use crate::deform::DeformationEngine;
use crate::error::{ConfigError, StartError};
use crate::mesh::SphereMesh;
use crate::params::{AnalysisConfig, DeformationParams, SphereGeometry};

/// Scheduler state. A session is constructed Idle and moves to Running at
/// most once per start trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No stream loaded; ticks produce no output
    Idle,

    /// Playback live; every tick yields a fresh visual state
    Running,
}

/// Per-tick visual output: the mesh's uniform scale and fill color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub scale: f32,
    pub color: [f32; 3],
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            color: [1.0, 0.0, 0.0],
        }
    }
}

/// Owns the analyzer, mesh and deformation engine for one visualization run.
///
/// The host drives it from its redraw callback: `tick` samples the analyzer,
/// deforms the mesh and recomputes the visual state, returning `None` while
/// Idle so the host issues no mesh draw call.
pub struct VisualizationSession {
    analyzer: SpectrumAnalyzer,
    mesh: SphereMesh,
    engine: DeformationEngine,
    visual: VisualState,
    state: SessionState,
}

impl VisualizationSession {
    /// Build an Idle session. Analyzer initialization happens exactly once,
    /// here; the bin resolution is fixed for the session's lifetime.
    pub fn new(
        analysis: AnalysisConfig,
        geometry: &SphereGeometry,
        params: DeformationParams,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            analyzer: SpectrumAnalyzer::new(analysis)?,
            mesh: SphereMesh::new(geometry),
            engine: DeformationEngine::new(params),
            visual: VisualState::default(),
            state: SessionState::Idle,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Start visualizing the given audio bytes.
    ///
    /// With no bytes the session stays Idle and reports
    /// [`StartError::MissingInput`]; a decode or playback failure likewise
    /// leaves it Idle, with no retry. A start while already Running is
    /// ignored: the first stream plays on.
    pub fn start(&mut self, bytes: Option<Vec<u8>>) -> Result<(), StartError> {
        if self.is_running() {
            log::warn!("start requested while already running, ignoring");
            return Ok(());
        }
        let bytes = bytes.ok_or(StartError::MissingInput)?;
        self.analyzer.load_and_connect(bytes)?;
        self.state = SessionState::Running;
        Ok(())
    }

    /// Stop ticking.
    ///
    /// The windowed host never calls this (the visualization runs until the
    /// window is torn down); it exists so other callers can terminate the
    /// loop deterministically.
    pub fn stop(&mut self) {
        self.state = SessionState::Idle;
    }

    /// One frame of the pipeline: sample, deform, color.
    ///
    /// Returns `None` while Idle. Never blocks; the analyzer reads whatever
    /// samples playback has produced so far. When playback runs out the
    /// stream decays to silence and the visual state settles at the rest
    /// pose, still ticking.
    pub fn tick(&mut self) -> Option<VisualState> {
        if !self.is_running() {
            return None;
        }
        let frame = self.analyzer.sample_frame();
        Some(self.apply_frame(&frame))
    }

    /// Deform the mesh and recompute the visual state from one analysis
    /// frame. This is the whole per-tick transformation behind [`tick`](Self::tick).
    pub fn apply_frame(&mut self, frame: &AnalysisFrame) -> VisualState {
        let scale = self.engine.deform(&mut self.mesh, frame);
        self.visual = VisualState {
            scale,
            color: color::color_for(frame),
        };
        self.visual
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn visual(&self) -> VisualState {
        self.visual
    }
}
