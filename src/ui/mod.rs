//! User interface: ImGui integration and the studio control panel

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{studio_panel, PanelState, UiAction};
