/// UI module exports
pub mod components;
pub mod settings;
pub mod side_panel;
