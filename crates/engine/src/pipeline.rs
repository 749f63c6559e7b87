// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One detector's triple of adapters, sequenced per a fixed ordering
//! invariant.
//!
//! Ported directly from `detector_pipeline.py`: `start` opens the
//! backend before the writer and detector so the stream receiver is
//! ready before anything starts producing; `stop`/`kill` tear the
//! detector down first so it can't keep emitting into a backend that's
//! about to close.

use dia_adapters::{Controllable, Parameterizable, Queryable};
use dia_core::{BackendStatus, ConfigSection, DetectorStatus, ManagerError, WriterStatus};

/// The raw status of one pipeline's three adapters, read together to
/// feed [`dia_core::interpret`] once combined with the shared aux-bus
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineRawStatus {
    pub detector: DetectorStatus,
    pub backend: BackendStatus,
    pub writer: WriterStatus,
}

/// Bundles a detector's controller, backend, and writer adapters and
/// sequences their lifecycle calls.
///
/// `open()`/`close()` on the backend are realised as plain
/// `Controllable::start`/`stop` — the backend's own REST surface is an
/// out-of-scope external collaborator, so there is no wire-level
/// distinction for this crate to preserve between "open" and "start"
/// beyond naming.
pub struct DetectorPipeline<D, B, W> {
    pub detector: D,
    pub backend: B,
    pub writer: W,
}

impl<D, B, W> DetectorPipeline<D, B, W>
where
    D: Controllable<Status = DetectorStatus> + Parameterizable + Queryable,
    B: Controllable<Status = BackendStatus> + Parameterizable,
    W: Controllable<Status = WriterStatus> + Parameterizable,
{
    pub fn new(detector: D, backend: B, writer: W) -> Self {
        Self { detector, backend, writer }
    }

    /// `backend.open() -> writer.start(writer_params) -> detector.start()`.
    pub async fn start(&self, writer_params: &ConfigSection) -> Result<(), ManagerError> {
        self.backend.start(&ConfigSection::default()).await?;
        self.writer.start(writer_params).await?;
        self.detector.start(&ConfigSection::default()).await?;
        Ok(())
    }

    /// `detector.stop() -> backend.close() -> writer.stop()`.
    pub async fn stop(&self) -> Result<(), ManagerError> {
        self.detector.stop().await?;
        self.backend.stop().await?;
        self.writer.stop().await?;
        Ok(())
    }

    /// `detector.stop() -> backend.reset() -> writer.reset()`, run
    /// sequentially within this one pipeline; the manager is what
    /// fans multiple pipelines' `reset()` out in parallel.
    pub async fn reset(&self) -> Result<(), ManagerError> {
        self.detector.stop().await?;
        self.backend.reset().await?;
        self.writer.reset().await?;
        Ok(())
    }

    /// `detector.stop() -> backend.reset() -> writer.kill()`.
    pub async fn kill(&self) -> Result<(), ManagerError> {
        self.detector.stop().await?;
        self.backend.reset().await?;
        self.writer.kill().await?;
        Ok(())
    }

    pub async fn raw_status(&self) -> Result<PipelineRawStatus, ManagerError> {
        Ok(PipelineRawStatus {
            detector: self.detector.get_status().await?,
            backend: self.backend.get_status().await?,
            writer: self.writer.get_status().await?,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
