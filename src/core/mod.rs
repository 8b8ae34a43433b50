pub mod data;
pub mod form;
pub mod portfolio;
pub mod render;
pub mod session;
pub mod settings;
pub mod site;
pub mod tabs;
