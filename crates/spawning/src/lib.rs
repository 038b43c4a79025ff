pub mod components;
pub mod create;
pub mod engine;
pub mod placement;
pub mod plugins;
pub mod scheduler;
pub mod template;
pub mod world;
