// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Collaborator contracts for presentation and GUI backends.
//!
//! The pipeline never calls a backend itself; these traits define the seam
//! at which render and sync stages talk to whatever concrete implementation
//! the host wires in (a GPU renderer, an immediate-mode GUI, or a test
//! double). No concrete backend lives in this crate.

use std::any::Any;

use async_trait::async_trait;
use thiserror::Error;

/// RGBA clear color in linear space, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl ClearColor {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// A failure inside a backend, surfaced to the stage that invoked it.
///
/// Stages convert these into stage failures with `?`; the pipeline then
/// treats them as fatal like any other stage error.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The presentation surface was lost and could not be restored.
    #[error("presentation surface lost: {details}")]
    SurfaceLost {
        /// Backend-specific description.
        details: String,
    },
    /// The underlying device rejected an operation.
    #[error("backend device error: {details}")]
    Device {
        /// Backend-specific description.
        details: String,
    },
}

/// The presentation backend render and sync stages draw through.
///
/// Presenting can block on vsync or on an in-flight GPU queue, so both
/// operations are async; a stage awaiting them is exactly the cooperative
/// suspension point the pipeline's execution model expects.
#[async_trait(?Send)]
pub trait RenderBackend {
    /// Clears the whole presentation surface to `color`.
    async fn clear_screen(&mut self, color: ClearColor) -> Result<(), BackendError>;

    /// Presents the finished frame (swap-buffers equivalent).
    async fn present(&mut self) -> Result<(), BackendError>;
}

/// One GUI panel, drawn against a backend-defined UI handle.
///
/// The handle is type-erased so this crate does not couple to any concrete
/// GUI library; a panel downcasts it to the type its backend documents.
pub trait GuiPanel {
    /// Draws the panel into the current GUI frame.
    fn draw(&mut self, ui: &mut dyn Any);
}

/// The GUI backend used by render stages.
///
/// The `new_frame` → panel draws → `render` ordering is an application
/// convention enforced by the stage authors, not by the pipeline.
pub trait GuiBackend {
    /// Begins a new GUI frame.
    fn new_frame(&mut self);

    /// Dispatches one panel against the current frame's UI handle.
    fn draw(&mut self, panel: &mut dyn GuiPanel);

    /// Finalizes and submits the GUI frame.
    fn render(&mut self) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_constants() {
        assert_eq!(ClearColor::BLACK, ClearColor::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn backend_errors_render_readable_messages() {
        let err = BackendError::SurfaceLost {
            details: "window destroyed".into(),
        };
        assert_eq!(err.to_string(), "presentation surface lost: window destroyed");
    }
}
