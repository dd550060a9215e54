pub mod analyze_button;
pub mod capture_panel;
pub mod header;
pub mod result_panel;
pub mod selection_panel;
