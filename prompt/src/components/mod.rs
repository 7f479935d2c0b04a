// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod cursor_ops;
pub mod select_component;
pub mod style;
pub mod text_input_component;

// Re-export.
pub use cursor_ops::*;
pub use select_component::*;
pub use style::*;
pub use text_input_component::*;
