//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`PrismError`] covers the recoverable failure modes:
//! - Driver resource creation failures
//! - Shader template, compile and link errors
//! - Per-frame render failures (tagged with the phase that failed)
//!
//! Programming errors (binding program handle zero, deleting resources the
//! cache never created) are not represented here. They panic, because
//! continuing would render with corrupted state.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, PrismError>`.
//!
//! ```rust,ignore
//! use prism::errors::Result;
//!
//! fn frame(renderer: &mut Renderer, scene: &mut Scene, camera: &Camera) -> Result<bool> {
//!     renderer.render(scene, camera)
//! }
//! ```

use thiserror::Error;

/// The main error type for the Prism engine.
#[derive(Error, Debug)]
pub enum PrismError {
    // ========================================================================
    // Driver Errors
    // ========================================================================
    /// The driver returned the null handle when asked for a new object.
    #[error("Driver failed to create {kind}")]
    ResourceCreation {
        /// Kind of object requested ("buffer", "texture", ...)
        kind: &'static str,
    },

    // ========================================================================
    // Shader Errors
    // ========================================================================
    /// No program with this name was registered with the shader manager.
    #[error("Program not registered: {0}")]
    UnknownProgram(String),

    /// A program references a shader source that was never added.
    #[error("Shader source not registered: {0}")]
    UnknownShader(String),

    /// Shader template expansion failed.
    #[error("Shader template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The driver rejected a shader source.
    #[error("Shader '{name}' failed to compile: {log}")]
    ShaderCompile {
        /// Shader source name
        name: String,
        /// Driver info log
        log: String,
    },

    /// The driver rejected a program at link time.
    #[error("Program '{name}' failed to link: {log}")]
    ProgramLink {
        /// Program name
        name: String,
        /// Driver info log
        log: String,
    },

    // ========================================================================
    // Render Errors
    // ========================================================================
    /// A frame was aborted part-way through one of its buckets.
    #[error("Render failed during {phase} pass: {source}")]
    RenderPhase {
        /// "opaque" or "transparent"
        phase: &'static str,
        /// Whether the frame buffer was cleared before the failure, so the
        /// partial frame may still be presented
        did_render: bool,
        /// The underlying failure, unchanged
        #[source]
        source: Box<PrismError>,
    },
}

impl PrismError {
    /// Returns the innermost error, looking through phase tags.
    #[must_use]
    pub fn root_cause(&self) -> &PrismError {
        match self {
            PrismError::RenderPhase { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Alias for `Result<T, PrismError>`.
pub type Result<T> = std::result::Result<T, PrismError>;
