//! Spright Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Spright preview
//! crates. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Description**: The sprite sheet description produced by the `spright`
//!   tool ([`description`] module)
//! - **Zoom**: The discrete zoom levels of the preview ([`zoom`] module)
//! - **Config model**: A structured view of the configuration text
//!   ([`config_model`] module)
//! - **Draw**: Layered SVG output used by renderers ([`draw`] module)

pub mod color;
pub mod config_model;
pub mod description;
pub mod draw;
pub mod geometry;
pub mod zoom;
